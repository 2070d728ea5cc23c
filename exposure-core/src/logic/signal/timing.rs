//! Timing profile
//!
//! Summary of jitter samples for the detailed view. Does not feed the score.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingProfile {
    pub sample_count: usize,
    pub mean_ms: f64,
    /// Largest absolute distance from the mean
    pub max_deviation_ms: f64,
}

impl TimingProfile {
    /// None when there is nothing to summarize
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let max_deviation = samples
            .iter()
            .map(|s| (s - mean).abs())
            .fold(0.0f64, f64::max);

        Some(Self {
            sample_count: samples.len(),
            mean_ms: mean,
            max_deviation_ms: max_deviation,
        })
    }
}
