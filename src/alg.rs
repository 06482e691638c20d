mod compact;

pub mod flood_fill;
pub mod incremental;
pub mod two_pass;
pub mod union_find;

use crate::{BinaryGrid, Connectivity, LabelGrid};
use serde::{Deserialize, Serialize};

/// A connected-component labeling algorithm.
///
/// All strategies produce the same partition of foreground cells for a
/// given connectivity; they may number the components differently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, derive_more::Display,
)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Breadth-first flood fill
    #[display(fmt = "bfs")]
    Bfs,
    /// Depth-first flood fill
    #[display(fmt = "dfs")]
    Dfs,
    /// One pass of unions over all cells, then relabel
    #[display(fmt = "union_find")]
    #[clap(alias("dsu"))]
    UnionFind,
    /// Rosenfeld two-pass with online equivalence resolution
    #[display(fmt = "two_pass")]
    #[clap(alias("2pass"))]
    TwoPass,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Bfs,
        Strategy::Dfs,
        Strategy::UnionFind,
        Strategy::TwoPass,
    ];

    pub fn label(self, grid: &BinaryGrid, connectivity: Connectivity) -> LabelGrid {
        match self {
            Strategy::Bfs => flood_fill::label_bfs(grid, connectivity),
            Strategy::Dfs => flood_fill::label_dfs(grid, connectivity),
            Strategy::UnionFind => union_find::label_union_find(grid, connectivity),
            Strategy::TwoPass => two_pass::label_two_pass(grid, connectivity),
        }
    }
}

pub use flood_fill::{label_bfs, label_dfs};
pub use incremental::{label_incremental, IncrementalLabeler};
pub use two_pass::label_two_pass;
pub use union_find::label_union_find;

#[cfg(test)]
mod tests {
    use super::*;
    use super::Strategy;
    use crate::{
        tests::fixtures,
        verify::{component_count, is_canonical, same_partition},
    };
    use proptest::{prelude::*, strategy::Strategy as _};

    fn binary_grid() -> impl proptest::strategy::Strategy<Value = BinaryGrid> {
        (1..16usize, 1..16usize).prop_flat_map(|(h, w)| {
            proptest::collection::vec(0..=1u8, h * w)
                .prop_map(move |cells| BinaryGrid::new(h, w, cells).unwrap())
        })
    }

    #[test]
    fn test_dispatch() {
        for fixture in fixtures() {
            assert_eq!(
                Strategy::Bfs.label(&fixture.grid, fixture.connectivity),
                label_bfs(&fixture.grid, fixture.connectivity)
            );
            assert_eq!(
                Strategy::TwoPass.label(&fixture.grid, fixture.connectivity),
                label_two_pass(&fixture.grid, fixture.connectivity)
            );
        }
        assert_eq!("union_find", Strategy::UnionFind.to_string());
    }

    proptest! {
        #[test]
        fn test_strategies_agree(grid in binary_grid(), connectivity in any::<Connectivity>()) {
            let reference = label_bfs(&grid, connectivity);
            prop_assert!(is_canonical(&grid, &reference));
            for strategy in Strategy::ALL {
                let labels = strategy.label(&grid, connectivity);
                prop_assert!(is_canonical(&grid, &labels));
                prop_assert_eq!(component_count(&labels), component_count(&reference));
                prop_assert!(same_partition(&labels, &reference));
            }
            let labels = label_incremental(&grid, connectivity);
            prop_assert!(same_partition(&labels, &reference));
        }

        #[test]
        fn test_relabel_is_idempotent(
            grid in binary_grid(),
            connectivity in any::<Connectivity>(),
            strategy in any::<Strategy>(),
        ) {
            let labels = strategy.label(&grid, connectivity);
            let again = strategy.label(&BinaryGrid::binarize(&labels), connectivity);
            prop_assert!(same_partition(&labels, &again));
        }

        #[test]
        fn test_flood_fills_number_identically(grid in binary_grid(), connectivity in any::<Connectivity>()) {
            prop_assert_eq!(label_bfs(&grid, connectivity), label_dfs(&grid, connectivity));
        }

        #[test]
        fn test_eight_never_splits_four(grid in binary_grid()) {
            // every 4-connected pair is also 8-connected
            let four = label_two_pass(&grid, Connectivity::Four);
            let eight = label_two_pass(&grid, Connectivity::Eight);
            prop_assert!(component_count(&eight) <= component_count(&four));
            let mut four_to_eight = std::collections::HashMap::new();
            for (&l4, &l8) in four.iter().zip(eight.iter()) {
                if l4 > 0 {
                    prop_assert_eq!(*four_to_eight.entry(l4).or_insert(l8), l8);
                }
            }
        }
    }
}
