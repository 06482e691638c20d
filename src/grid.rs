use anyhow::{ensure, Result};
use std::{
    fmt,
    ops::{Index, IndexMut},
};

/// Cell value marking background in a [`BinaryGrid`].
pub const BACKGROUND: u8 = 0;
/// Cell value marking foreground in a [`BinaryGrid`].
pub const FOREGROUND: u8 = 1;

/// A dense `height x width` array stored in row-major order.
///
/// The flat position of `(row, col)` is `row * width + col`; DSU-based
/// labelers use it directly as the element id of a cell.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, derive_more::Deref)]
pub struct Grid<T> {
    height: usize,
    width: usize,
    #[deref]
    cells: Vec<T>,
}

/// Binary occupancy grid. Cells must be [`BACKGROUND`] or [`FOREGROUND`].
pub type BinaryGrid = Grid<u8>;

/// Output of every labeler: 0 for background, `1..=K` for the K components.
pub type LabelGrid = Grid<u32>;

impl<T> Grid<T> {
    pub fn new(height: usize, width: usize, cells: Vec<T>) -> Result<Self> {
        ensure!(
            cells.len() == height * width,
            "expect {} cells for a {}x{} grid, got {}",
            height * width,
            height,
            width,
            cells.len()
        );
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Wrap a buffer already known to hold `height * width` cells.
    pub(crate) fn from_raw(height: usize, width: usize, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), height * width);
        Self {
            height,
            width,
            cells,
        }
    }

    pub fn filled(height: usize, width: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            height,
            width,
            cells: vec![value; height * width],
        }
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(height * width);
        for (i, row) in rows.into_iter().enumerate() {
            ensure!(
                row.len() == width,
                "row {} has {} cells, expect {}",
                i,
                row.len(),
                width
            );
            cells.extend(row);
        }
        Self::new(height, width, cells)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }

    /// The cell at `(row, col)` shifted by `(dr, dc)`, if it stays inside the grid.
    #[inline]
    pub fn offset(&self, row: usize, col: usize, (dr, dc): (isize, isize)) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < self.height && c < self.width).then_some((r, c))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // `chunks` rejects a zero chunk size
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            height: self.height,
            width: self.width,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }
}

impl BinaryGrid {
    #[inline]
    pub fn is_foreground(&self, row: usize, col: usize) -> bool {
        self[(row, col)] == FOREGROUND
    }

    pub fn is_binary(&self) -> bool {
        self.cells
            .iter()
            .all(|&v| v == BACKGROUND || v == FOREGROUND)
    }

    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Map every nonzero value to [`FOREGROUND`].
    pub fn binarize<T: Copy + Default + PartialEq>(grid: &Grid<T>) -> Self {
        grid.map(|&v| u8::from(v != T::default()))
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.cells[self.index_of(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let i = self.index_of(row, col);
        &mut self.cells[i]
    }
}

impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let mut first = true;
            for v in row {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{v}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build a [`Grid`] from row literals.
///
/// ```
/// # use binary_ccl::grid;
/// let g = grid![[1, 1, 0], [0, 0, 1]];
/// assert_eq!(g.shape(), (2, 3));
/// ```
///
/// Panics if the rows have different lengths.
#[macro_export]
macro_rules! grid {
    () => {
        $crate::Grid::default()
    };
    ($([$($x:expr),* $(,)?]),+ $(,)?) => {
        $crate::Grid::from_rows(vec![$(vec![$($x),*]),+]).expect("ragged grid literal")
    };
}
