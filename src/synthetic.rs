use crate::BinaryGrid;
use rand::Rng;

/// A `height x width` grid whose cells are foreground with probability `density`.
///
/// **Panics** if `density` is outside `[0, 1]`.
pub fn random_grid(height: usize, width: usize, density: f64, rng: &mut impl Rng) -> BinaryGrid {
    let cells = (0..height * width)
        .map(|_| u8::from(rng.gen_bool(density)))
        .collect();
    BinaryGrid::from_raw(height, width, cells)
}
