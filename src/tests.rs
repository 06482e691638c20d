use super::*;
use crate::verify::{component_count, is_canonical, same_partition};
use crate::grid;
use once_cell::sync::Lazy;

/// A grid, its connectivity, and one reference labeling.
pub(crate) struct Fixture {
    pub grid: BinaryGrid,
    pub connectivity: Connectivity,
    pub expect: LabelGrid,
}

static FIXTURES: Lazy<Vec<Fixture>> = Lazy::new(|| {
    vec![
        Fixture {
            grid: grid![[1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 1, 1], [0, 0, 1, 1]],
            connectivity: Connectivity::Four,
            expect: grid![[1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 2, 2], [0, 0, 2, 2]],
        },
        Fixture {
            grid: grid![[1, 0, 1], [0, 1, 0], [1, 0, 1]],
            connectivity: Connectivity::Eight,
            expect: grid![[1, 0, 1], [0, 1, 0], [1, 0, 1]],
        },
        Fixture {
            grid: grid![[1, 0, 1], [0, 1, 0], [1, 0, 1]],
            connectivity: Connectivity::Four,
            expect: grid![[1, 0, 2], [0, 3, 0], [4, 0, 5]],
        },
        Fixture {
            grid: BinaryGrid::filled(4, 6, 0),
            connectivity: Connectivity::Four,
            expect: LabelGrid::filled(4, 6, 0),
        },
        Fixture {
            grid: BinaryGrid::filled(4, 6, 0),
            connectivity: Connectivity::Eight,
            expect: LabelGrid::filled(4, 6, 0),
        },
        Fixture {
            grid: BinaryGrid::filled(5, 3, 1),
            connectivity: Connectivity::Four,
            expect: LabelGrid::filled(5, 3, 1),
        },
        Fixture {
            grid: BinaryGrid::filled(5, 3, 1),
            connectivity: Connectivity::Eight,
            expect: LabelGrid::filled(5, 3, 1),
        },
        Fixture {
            // staircase joined only through upper-right diagonals
            grid: grid![[0, 0, 0, 1], [0, 0, 1, 0], [0, 1, 0, 0], [1, 0, 0, 1]],
            connectivity: Connectivity::Eight,
            expect: grid![[0, 0, 0, 1], [0, 0, 1, 0], [0, 1, 0, 0], [1, 0, 0, 2]],
        },
        Fixture {
            // an "M" whose strokes only meet at the bottom row
            grid: grid![
                [1, 0, 1, 0, 1],
                [1, 0, 1, 0, 1],
                [1, 1, 1, 1, 1],
                [0, 0, 0, 0, 0],
                [1, 1, 0, 1, 1],
            ],
            connectivity: Connectivity::Four,
            expect: grid![
                [1, 0, 1, 0, 1],
                [1, 0, 1, 0, 1],
                [1, 1, 1, 1, 1],
                [0, 0, 0, 0, 0],
                [2, 2, 0, 3, 3],
            ],
        },
        Fixture {
            grid: grid![[1]],
            connectivity: Connectivity::Four,
            expect: grid![[1]],
        },
        Fixture {
            grid: BinaryGrid::filled(0, 7, 0),
            connectivity: Connectivity::Four,
            expect: LabelGrid::filled(0, 7, 0),
        },
    ]
});

pub(crate) fn fixtures() -> &'static [Fixture] {
    Lazy::force(&FIXTURES).as_slice()
}

/// Run a labeler over every fixture and compare against the reference
/// partition, ignoring how components are numbered.
pub(crate) fn test_strategy(f: impl Fn(&BinaryGrid, Connectivity) -> LabelGrid) {
    for fixture in fixtures() {
        let actual = f(&fixture.grid, fixture.connectivity);
        assert!(
            is_canonical(&fixture.grid, &actual),
            "non-canonical labeling:\n{}",
            actual
        );
        assert_eq!(component_count(&actual), component_count(&fixture.expect));
        assert!(
            same_partition(&actual, &fixture.expect),
            "expect:\n{}actual:\n{}",
            fixture.expect,
            actual
        );
    }
}
