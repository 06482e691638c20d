#[macro_use]
extern crate tracing;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod alg;
pub mod bbox;
pub mod connectivity;
pub mod mask;
pub mod synthetic;
pub mod unionfind;
pub mod utils;
pub mod verify;

pub mod grid;
pub use grid::*;

#[cfg(test)]
pub(crate) mod tests;

pub use alg::Strategy;
pub use bbox::BoundingBox;
pub use connectivity::Connectivity;
pub use unionfind::UnionFind;

/// Timing and outcome of one strategy over one grid.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    pub strategy: String,
    #[serde(with = "serde_time")]
    pub avg_time: Duration,
    #[serde(with = "serde_time")]
    pub total_time: Duration,
    pub iterations: usize,
    pub num_of_components: usize,
    /// Megapixels per second.
    pub throughput: f64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    pub height: usize,
    pub width: usize,
    pub foreground: usize,
    pub connectivity: Connectivity,
    #[serde(with = "serde_time")]
    pub total_time: Duration,
    pub reports: Vec<StrategyReport>,
}

mod serde_time {
    use super::*;
    use serde::{de::Deserializer, ser::Serializer};

    pub fn serialize<S: Serializer>(t: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(t.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let t = <f64>::deserialize(d)?;
        Ok(Duration::from_secs_f64(t))
    }
}
