//! Shrinking the labeling working set to the foreground's bounding box.

use crate::{BinaryGrid, Connectivity, Grid, LabelGrid, Strategy, FOREGROUND};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Half-open box `[top, bottom) x [left, right)`.
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
    derive_more::Constructor,
)]
pub struct BoundingBox {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl BoundingBox {
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    pub fn width(&self) -> usize {
        self.right - self.left
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Minimal box around the foreground of `grid`, or `None` if it has none.
    pub fn of_foreground(grid: &BinaryGrid) -> Option<Self> {
        let mut bbox: Option<Self> = None;
        for (row, cells) in grid.rows().enumerate() {
            for (col, _) in cells.iter().enumerate().filter(|&(_, &v)| v == FOREGROUND) {
                let b = bbox.get_or_insert(Self::new(row, col, row + 1, col + 1));
                b.top = b.top.min(row);
                b.left = b.left.min(col);
                b.bottom = b.bottom.max(row + 1);
                b.right = b.right.max(col + 1);
            }
        }
        bbox
    }
}

/// Copy out the foreground's bounding box.
///
/// A grid with no foreground comes back whole, with the sentinel box
/// `(0, 0, height, width)`.
pub fn crop_to_bbox(grid: &BinaryGrid) -> (BinaryGrid, BoundingBox) {
    let Some(bbox) = BoundingBox::of_foreground(grid) else {
        let (height, width) = grid.shape();
        return (grid.clone(), BoundingBox::new(0, 0, height, width));
    };

    let mut cells = Vec::with_capacity(bbox.height() * bbox.width());
    for row in grid.rows().skip(bbox.top).take(bbox.height()) {
        cells.extend_from_slice(&row[bbox.left..bbox.right]);
    }
    (Grid::from_raw(bbox.height(), bbox.width(), cells), bbox)
}

/// Embed `small` into a zeroed `height x width` canvas at `bbox`.
pub fn paste_back<T: Copy + Default>(
    small: &Grid<T>,
    height: usize,
    width: usize,
    bbox: BoundingBox,
) -> Result<Grid<T>> {
    ensure!(
        bbox.top <= bbox.bottom && bbox.left <= bbox.right,
        "inverted box {:?}",
        bbox
    );
    ensure!(
        small.shape() == bbox.shape(),
        "cannot paste a {}x{} grid into a {}x{} box",
        small.height(),
        small.width(),
        bbox.height(),
        bbox.width()
    );
    ensure!(
        bbox.bottom <= height && bbox.right <= width,
        "box {:?} exceeds the {}x{} canvas",
        bbox,
        height,
        width
    );

    let mut out = Grid::filled(height, width, T::default());
    paste_into(&mut out, small, bbox);
    Ok(out)
}

fn paste_into<T: Copy>(out: &mut Grid<T>, small: &Grid<T>, bbox: BoundingBox) {
    for (r, row) in small.rows().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            out[(bbox.top + r, bbox.left + c)] = v;
        }
    }
}

/// Label only the foreground's bounding box, then restore the full shape.
pub fn label_cropped(grid: &BinaryGrid, strategy: Strategy, connectivity: Connectivity) -> LabelGrid {
    let (height, width) = grid.shape();
    let (small, bbox) = crop_to_bbox(grid);
    debug!(
        "cropped {}x{} grid to {}x{} at ({}, {})",
        height,
        width,
        bbox.height(),
        bbox.width(),
        bbox.top,
        bbox.left
    );
    let labels = strategy.label(&small, connectivity);

    // the box lies inside the grid by construction
    let mut out = LabelGrid::filled(height, width, 0);
    paste_into(&mut out, &labels, bbox);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid, Strategy};
    use proptest::{prelude::*, strategy::Strategy as _};

    fn binary_grid() -> impl proptest::strategy::Strategy<Value = BinaryGrid> {
        (0..12usize, 0..12usize, 0.0..1.0f64).prop_flat_map(|(h, w, density)| {
            proptest::collection::vec(proptest::bool::weighted(density), h * w).prop_map(
                move |cells| {
                    BinaryGrid::new(h, w, cells.into_iter().map(u8::from).collect()).unwrap()
                },
            )
        })
    }

    #[test]
    fn test_crop() {
        let g: BinaryGrid = grid![
            [0, 0, 0, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 1, 0, 1, 0],
            [0, 0, 0, 0, 0],
        ];
        let (small, bbox) = crop_to_bbox(&g);
        assert_eq!(bbox, BoundingBox::new(1, 1, 3, 4));
        assert_eq!(small, grid![[0, 1, 0], [1, 0, 1]]);
    }

    #[test]
    fn test_crop_empty() {
        let g = BinaryGrid::filled(3, 4, 0);
        let (small, bbox) = crop_to_bbox(&g);
        assert_eq!(bbox, BoundingBox::new(0, 0, 3, 4));
        assert_eq!(small, g);
    }

    #[test]
    fn test_round_trip() {
        let g: BinaryGrid = grid![
            [0, 0, 0, 0],
            [0, 1, 1, 0],
            [0, 0, 1, 0],
        ];
        let (small, bbox) = crop_to_bbox(&g);
        assert_eq!(paste_back(&small, 3, 4, bbox).unwrap(), g);

        let g = BinaryGrid::filled(2, 2, 0);
        let (small, bbox) = crop_to_bbox(&g);
        assert_eq!(paste_back(&small, 2, 2, bbox).unwrap(), g);
    }

    #[test]
    fn test_paste_back_mismatch() {
        let small = LabelGrid::filled(2, 2, 1);
        assert!(paste_back(&small, 4, 4, BoundingBox::new(0, 0, 3, 2)).is_err());
        assert!(paste_back(&small, 2, 2, BoundingBox::new(1, 1, 3, 3)).is_err());
        assert!(paste_back(&small, 3, 3, BoundingBox::new(1, 1, 3, 3)).is_ok());
    }

    #[test]
    fn test_paste_back_inverted_box() {
        let small = LabelGrid::filled(2, 0, 0);
        assert!(paste_back(&small, 4, 4, BoundingBox::new(3, 0, 1, 0)).is_err());
        assert!(paste_back(&small, 4, 4, BoundingBox::new(0, 3, 2, 1)).is_err());
    }

    #[test]
    fn test_label_cropped() {
        for fixture in crate::tests::fixtures() {
            for strategy in Strategy::ALL {
                let labels = label_cropped(&fixture.grid, strategy, fixture.connectivity);
                let expect = strategy.label(&fixture.grid, fixture.connectivity);
                assert!(crate::verify::same_partition(&labels, &expect));
            }
        }
    }

    proptest! {
        #[test]
        fn test_crop_paste_round_trip(g in binary_grid()) {
            let (height, width) = g.shape();
            let (small, bbox) = crop_to_bbox(&g);
            prop_assert!(bbox.bottom <= height && bbox.right <= width);
            prop_assert_eq!(small.foreground_count(), g.foreground_count());
            if let Some(tight) = BoundingBox::of_foreground(&g) {
                prop_assert_eq!(tight, bbox);
                prop_assert!(small.rows().next().map_or(false, |r| r.contains(&FOREGROUND)));
            } else {
                prop_assert_eq!(bbox, BoundingBox::new(0, 0, height, width));
            }
            prop_assert_eq!(paste_back(&small, height, width, bbox).unwrap(), g);
        }
    }
}
