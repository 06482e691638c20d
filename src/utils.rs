use anyhow::{Error, Result};
use tracing_subscriber::EnvFilter;

pub fn init_tracing_subscriber(default_filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(Error::msg)
}

pub fn setup_rayon(num_threads: Option<usize>) -> Result<()> {
    if let Some(num_threads) = num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }
    Ok(())
}

/// Megapixels per second for labeling `pixels` cells in `secs` seconds.
#[inline]
pub fn throughput(pixels: usize, secs: f64) -> f64 {
    if secs > 0. {
        pixels as f64 / 1e6 / secs
    } else {
        0.
    }
}
