//! Turning a photograph into the binary grid the labelers consume.
//!
//! Dark pixels are foreground: a lesion on skin is darker than its surroundings.

use crate::{BinaryGrid, FOREGROUND};
use anyhow::{bail, Context, Error, Result};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::{distance_transform::Norm, filter::gaussian_blur_f32, morphology};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, str::FromStr};

/// Fixed cutoff for [`MaskMethod::Gray`].
pub const GRAY_THRESHOLD: u8 = 150;
/// The darkest share of pixels kept by [`MaskMethod::Darkness`], in percent.
pub const DARKNESS_PERCENTILE: f64 = 35.;

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum MaskMethod {
    /// Grayscale below [`GRAY_THRESHOLD`].
    #[display(fmt = "gray")]
    Gray,
    /// Grayscale at or below the Otsu threshold, after optional smoothing.
    #[default]
    #[display(fmt = "otsu")]
    Otsu,
    /// Mean RGB luminance at or below the [`DARKNESS_PERCENTILE`]-th percentile.
    #[display(fmt = "darkness")]
    Darkness,
}

impl FromStr for MaskMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(MaskMethod::Gray),
            "otsu" => Ok(MaskMethod::Otsu),
            "darkness" => Ok(MaskMethod::Darkness),
            _ => bail!(
                "unknown mask method `{}`, expect one of: gray, otsu, darkness",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskOptions {
    pub method: MaskMethod,
    /// Swap foreground and background after thresholding.
    pub invert: bool,
    /// Gaussian sigma in pixels applied before Otsu thresholding; 0 disables.
    pub smooth: u32,
    /// Rounds of binary opening with a cross-shaped element; 0 disables.
    pub morph_open: u8,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            method: MaskMethod::Otsu,
            invert: false,
            smooth: 1,
            morph_open: 1,
        }
    }
}

impl MaskOptions {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("invalid mask options in {}", path.display()))
    }
}

/// Otsu's threshold: the cut maximising between-class variance of a 256-bin histogram.
pub fn otsu_threshold(pixels: &[u8]) -> u8 {
    let mut hist = [0u64; 256];
    for &p in pixels {
        hist[p as usize] += 1;
    }
    let total = pixels.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(t, &n)| t as f64 * n as f64)
        .sum();

    let mut sum_b = 0.;
    let mut w_b = 0.;
    let mut var_max = 0.;
    let mut threshold = 0;
    for (t, &n) in hist.iter().enumerate() {
        w_b += n as f64;
        if w_b == 0. {
            continue;
        }
        let w_f = total - w_b;
        if w_f == 0. {
            break;
        }

        sum_b += t as f64 * n as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;
        let var_between = w_b * w_f * (m_b - m_f).powi(2);
        if var_between > var_max {
            var_max = var_between;
            threshold = t as u8;
        }
    }
    threshold
}

/// The `q`-th percentile of `values`, interpolating linearly between ranks.
///
/// Returns `NaN` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let rank = q.clamp(0., 100.) / 100. * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// ITU-R 601-2 luma with the rounding common image libraries apply.
fn luma(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}

pub fn generate_mask(img: &DynamicImage, options: &MaskOptions) -> Result<BinaryGrid> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut mask: Vec<u8> = match options.method {
        MaskMethod::Gray => luma(&rgb)
            .as_raw()
            .iter()
            .map(|&v| u8::from(v < GRAY_THRESHOLD))
            .collect(),
        MaskMethod::Otsu => {
            let mut gray = luma(&rgb);
            if options.smooth > 0 {
                gray = gaussian_blur_f32(&gray, options.smooth as f32);
            }
            let threshold = otsu_threshold(gray.as_raw());
            debug!("otsu threshold: {}", threshold);
            gray.as_raw()
                .iter()
                .map(|&v| u8::from(v <= threshold))
                .collect()
        }
        MaskMethod::Darkness => {
            let lum: Vec<f64> = rgb
                .pixels()
                .map(|p| p.0.iter().map(|&c| c as f64).sum::<f64>() / 3.)
                .collect();
            let threshold = percentile(&lum, DARKNESS_PERCENTILE);
            debug!("darkness threshold: {:.2}", threshold);
            lum.iter().map(|&l| u8::from(l <= threshold)).collect()
        }
    };

    if options.invert {
        for v in &mut mask {
            *v = FOREGROUND - *v;
        }
    }

    if options.morph_open > 0 {
        let pixels = mask.iter().map(|&v| u8::from(v != 0) * 255).collect();
        let img = GrayImage::from_raw(width, height, pixels)
            .context("mask buffer does not match image size")?;
        let opened = morphology::open(&img, Norm::L1, options.morph_open);
        mask = opened.as_raw().iter().map(|&v| u8::from(v > 0)).collect();
    }

    BinaryGrid::new(height as usize, width as usize, mask)
}

/// Read a mask image; any nonzero pixel is foreground.
pub fn load_mask(path: impl AsRef<Path>) -> Result<BinaryGrid> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("cannot read mask {}", path.display()))?
        .to_luma8();
    let (width, height) = img.dimensions();
    BinaryGrid::new(
        height as usize,
        width as usize,
        img.as_raw().iter().map(|&v| u8::from(v > 0)).collect(),
    )
}

/// Write `mask` as a 0/255 grayscale image.
pub fn save_mask(mask: &BinaryGrid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let width = u32::try_from(mask.width())?;
    let height = u32::try_from(mask.height())?;
    let pixels = mask.iter().map(|&v| u8::from(v != 0) * 255).collect();
    let img = GrayImage::from_raw(width, height, pixels)
        .context("mask buffer does not match its shape")?;
    img.save(path)
        .with_context(|| format!("cannot write mask {}", path.display()))?;
    Ok(())
}
