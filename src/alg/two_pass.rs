use super::compact::{compact_by_sorted_root, to_label};
use crate::{BinaryGrid, Connectivity, LabelGrid, UnionFind};
use bit_set::BitSet;

/// Two-pass (Rosenfeld) labeling with online equivalence recording.
///
/// The first scan gives each foreground cell the smallest temporary label
/// among its already-scanned neighbors (left, up, and under 8-connectivity
/// upper-left and upper-right), or a fresh one, and unions that label with
/// every other neighbor label. The second scan replaces each temporary label
/// by the rank of its class root among all roots in ascending order.
pub fn label_two_pass(grid: &BinaryGrid, connectivity: Connectivity) -> LabelGrid {
    let (height, width) = grid.shape();
    let mut labels = LabelGrid::filled(height, width, 0);

    // Temporary labels start at 1, and no cell allocates more than one.
    let mut dsu = UnionFind::new(grid.foreground_count() + 1);
    let mut next_label = 1;

    let backward = connectivity.backward_offsets();
    let mut neighbors = [0u32; 4];
    for row in 0..height {
        for col in 0..width {
            if !grid.is_foreground(row, col) {
                continue;
            }

            let mut len = 0;
            for &offset in backward {
                if let Some(cell) = grid.offset(row, col, offset) {
                    let l = labels[cell];
                    if l > 0 {
                        neighbors[len] = l;
                        len += 1;
                    }
                }
            }

            let assigned = match neighbors[..len].iter().min() {
                None => {
                    let l = to_label(next_label);
                    next_label += 1;
                    l
                }
                Some(&m) => {
                    for &nb in &neighbors[..len] {
                        if nb != m {
                            dsu.union(m as usize, nb as usize);
                        }
                    }
                    m
                }
            };
            labels[(row, col)] = assigned;
        }
    }
    debug!(
        "two pass allocated {} temporary labels for {}x{} grid",
        next_label - 1,
        height,
        width
    );

    let used: BitSet = labels
        .iter()
        .filter(|&&l| l > 0)
        .map(|&l| l as usize)
        .collect();
    if used.is_empty() {
        return labels;
    }

    let (final_label, k) = compact_by_sorted_root(&mut dsu, &used);
    trace!("two pass resolved {} components", k);

    labels.map(|&l| final_label[l as usize])
}
