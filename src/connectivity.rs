use serde::{Deserialize, Serialize};

/// Which neighbors of a cell count as adjacent.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    derive_more::Display,
)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Connectivity {
    /// N, S, E and W neighbors.
    #[default]
    #[display(fmt = "4")]
    #[clap(alias("4"))]
    Four,
    /// All eight surrounding neighbors.
    #[display(fmt = "8")]
    #[clap(alias("8"))]
    Eight,
}

const OFFSETS_4: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const OFFSETS_8: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

// right, down, then down-right and down-left
const FORWARD_4: [(isize, isize); 2] = [(0, 1), (1, 0)];
const FORWARD_8: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// left, up, then upper-left and upper-right
const BACKWARD_4: [(isize, isize); 2] = [(0, -1), (-1, 0)];
const BACKWARD_8: [(isize, isize); 4] = [(0, -1), (-1, 0), (-1, -1), (-1, 1)];

impl Connectivity {
    /// Every adjacent `(d_row, d_col)`, in the order flood fills visit them.
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &OFFSETS_4,
            Connectivity::Eight => &OFFSETS_8,
        }
    }

    /// Neighbors that come later in row-major order.
    ///
    /// Visiting these from every cell touches each undirected edge exactly once.
    pub fn forward_offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &FORWARD_4,
            Connectivity::Eight => &FORWARD_8,
        }
    }

    /// Neighbors that come earlier in row-major order, i.e. already scanned.
    pub fn backward_offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &BACKWARD_4,
            Connectivity::Eight => &BACKWARD_8,
        }
    }
}

impl From<bool> for Connectivity {
    fn from(eight_connectivity: bool) -> Self {
        if eight_connectivity {
            Connectivity::Eight
        } else {
            Connectivity::Four
        }
    }
}
