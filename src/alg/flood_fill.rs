use super::compact::to_label;
use crate::{BinaryGrid, Connectivity, LabelGrid};
use bit_set::BitSet;
use std::collections::VecDeque;

/// Pending cells of the fill currently in progress.
trait Frontier: Default {
    fn push(&mut self, cell: (usize, usize));
    fn pop(&mut self) -> Option<(usize, usize)>;
}

/// FIFO: breadth-first.
impl Frontier for VecDeque<(usize, usize)> {
    #[inline]
    fn push(&mut self, cell: (usize, usize)) {
        self.push_back(cell);
    }

    #[inline]
    fn pop(&mut self) -> Option<(usize, usize)> {
        self.pop_front()
    }
}

/// LIFO: depth-first.
impl Frontier for Vec<(usize, usize)> {
    #[inline]
    fn push(&mut self, cell: (usize, usize)) {
        Vec::push(self, cell);
    }

    #[inline]
    fn pop(&mut self) -> Option<(usize, usize)> {
        Vec::pop(self)
    }
}

/// Breadth-first flood fill labeling.
///
/// Seeds are taken in row-major order, so label `k` is the component of the
/// `k`-th foreground cell that no earlier fill reached.
pub fn label_bfs(grid: &BinaryGrid, connectivity: Connectivity) -> LabelGrid {
    flood_fill::<VecDeque<_>>(grid, connectivity)
}

/// Depth-first flood fill labeling, with an explicit stack.
///
/// Produces exactly the same labels as [`label_bfs`].
pub fn label_dfs(grid: &BinaryGrid, connectivity: Connectivity) -> LabelGrid {
    flood_fill::<Vec<_>>(grid, connectivity)
}

fn flood_fill<F: Frontier>(grid: &BinaryGrid, connectivity: Connectivity) -> LabelGrid {
    let (height, width) = grid.shape();
    let offsets = connectivity.offsets();
    let mut labels = LabelGrid::filled(height, width, 0);
    let mut visited = BitSet::with_capacity(height * width);
    let mut frontier = F::default();
    let mut current = 0;

    for row in 0..height {
        for col in 0..width {
            if !grid.is_foreground(row, col) || !visited.insert(grid.index_of(row, col)) {
                continue;
            }
            current += 1;
            let label = to_label(current);
            labels[(row, col)] = label;
            frontier.push((row, col));

            while let Some((r, c)) = frontier.pop() {
                for &offset in offsets {
                    let Some((nr, nc)) = grid.offset(r, c, offset) else {
                        continue;
                    };
                    if grid.is_foreground(nr, nc) && visited.insert(grid.index_of(nr, nc)) {
                        labels[(nr, nc)] = label;
                        frontier.push((nr, nc));
                    }
                }
            }
        }
    }

    trace!("flood fill found {} components", current);
    labels
}
