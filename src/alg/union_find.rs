use super::compact::to_label;
use crate::{BinaryGrid, Connectivity, LabelGrid, UnionFind};

/// One-pass union-find labeling.
///
/// Every foreground cell is unioned with its forward neighbors (right, down,
/// and under 8-connectivity down-right and down-left), one DSU element per
/// cell. A second scan then numbers the classes in the row-major order their
/// first cell appears.
pub fn label_union_find(grid: &BinaryGrid, connectivity: Connectivity) -> LabelGrid {
    let (height, width) = grid.shape();
    let mut dsu = UnionFind::new(height * width);

    for row in 0..height {
        for col in 0..width {
            if !grid.is_foreground(row, col) {
                continue;
            }
            let idx = grid.index_of(row, col);
            for &offset in connectivity.forward_offsets() {
                if let Some((nr, nc)) = grid.offset(row, col, offset) {
                    if grid.is_foreground(nr, nc) {
                        dsu.union(idx, grid.index_of(nr, nc));
                    }
                }
            }
        }
    }

    // root -> compacted label, 0 while the root is unseen
    let mut root_label = vec![0u32; height * width];
    let mut labels = LabelGrid::filled(height, width, 0);
    let mut k = 0;
    for row in 0..height {
        for col in 0..width {
            if !grid.is_foreground(row, col) {
                continue;
            }
            let root = dsu.find(grid.index_of(row, col));
            if root_label[root] == 0 {
                k += 1;
                root_label[root] = to_label(k);
            }
            labels[(row, col)] = root_label[root];
        }
    }

    trace!("union find found {} components", k);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid, tests::test_strategy};

    #[test]
    fn test() {
        test_strategy(label_union_find);
    }

    #[test]
    fn test_discovery_order_numbering() {
        // the right-hand column is reached first in scan order
        let g: BinaryGrid = grid![
            [0, 0, 1],
            [1, 0, 1],
            [1, 1, 1],
            [0, 0, 0],
            [1, 1, 0],
        ];
        let expect: LabelGrid = grid![
            [0, 0, 1],
            [1, 0, 1],
            [1, 1, 1],
            [0, 0, 0],
            [2, 2, 0],
        ];
        assert_eq!(label_union_find(&g, Connectivity::Four), expect);
    }

    #[test]
    fn test_anti_diagonal_needs_down_left() {
        let g: BinaryGrid = grid![[0, 1], [1, 0]];
        assert_eq!(label_union_find(&g, Connectivity::Eight), grid![[0, 1], [1, 0]]);
        assert_eq!(label_union_find(&g, Connectivity::Four), grid![[0, 1], [2, 0]]);
    }
}
