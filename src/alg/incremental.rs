use super::compact::compact_by_sorted_root;
use crate::{BinaryGrid, Connectivity, LabelGrid, UnionFind};
use bit_set::BitSet;
use std::collections::HashMap;

/// Labels a grid whose foreground pixels arrive one at a time, in any order.
///
/// Unlike the two-pass scan, an arriving pixel may have neighbors on any
/// side, so the full neighbor policy is inspected on every insertion. The
/// component count is maintained live.
///
/// The forest only holds foreground pixels: each arrival pushes one node,
/// so memory follows the pixels seen rather than the grid area.
#[derive(Debug, Clone)]
pub struct IncrementalLabeler {
    height: usize,
    width: usize,
    connectivity: Connectivity,
    dsu: UnionFind,
    // pixel index -> node id
    nodes: HashMap<usize, usize>,
    // node id -> pixel index
    pixels: Vec<usize>,
    num_of_components: usize,
}

impl IncrementalLabeler {
    pub fn new(height: usize, width: usize, connectivity: Connectivity) -> Self {
        Self {
            height,
            width,
            connectivity,
            dsu: UnionFind::new(0),
            nodes: HashMap::new(),
            pixels: Vec::new(),
            num_of_components: 0,
        }
    }

    /// Feed every foreground cell of `grid` in row-major order.
    pub fn from_grid(grid: &BinaryGrid, connectivity: Connectivity) -> Self {
        let (height, width) = grid.shape();
        let mut labeler = Self::new(height, width, connectivity);
        for row in 0..height {
            for col in 0..width {
                if grid.is_foreground(row, col) {
                    labeler.add_pixel(row, col);
                }
            }
        }
        labeler
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn num_of_components(&self) -> usize {
        self.num_of_components
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.nodes.contains_key(&(row * self.width + col))
    }

    /// Mark `(row, col)` as foreground.
    ///
    /// Return `false` if it already was.
    ///
    /// **Panics** if the pixel lies outside the grid.
    pub fn add_pixel(&mut self, row: usize, col: usize) -> bool {
        assert!(
            row < self.height && col < self.width,
            "pixel ({}, {}) outside {}x{} grid",
            row,
            col,
            self.height,
            self.width
        );
        let idx = row * self.width + col;
        if self.nodes.contains_key(&idx) {
            return false;
        }
        let node = self.dsu.push();
        self.nodes.insert(idx, node);
        self.pixels.push(idx);

        self.num_of_components += 1;
        for &(dr, dc) in self.connectivity.offsets() {
            let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
                continue;
            };
            if r >= self.height || c >= self.width {
                continue;
            }
            if let Some(&neighbor) = self.nodes.get(&(r * self.width + c)) {
                if self.dsu.union(node, neighbor) {
                    self.num_of_components -= 1;
                }
            }
        }
        true
    }

    /// Canonical labels of the pixels added so far, numbered by ascending class root.
    ///
    /// Node ids follow arrival order, so the numbering depends on it; the
    /// partition does not.
    pub fn labels(&mut self) -> LabelGrid {
        let used: BitSet = (0..self.dsu.len()).collect();
        let (table, k) = compact_by_sorted_root(&mut self.dsu, &used);
        debug_assert_eq!(k, self.num_of_components);

        let mut cells = vec![0; self.height * self.width];
        for (node, &idx) in self.pixels.iter().enumerate() {
            cells[idx] = table[node];
        }
        LabelGrid::from_raw(self.height, self.width, cells)
    }
}

/// Label a whole grid through an [`IncrementalLabeler`].
pub fn label_incremental(grid: &BinaryGrid, connectivity: Connectivity) -> LabelGrid {
    IncrementalLabeler::from_grid(grid, connectivity).labels()
}
