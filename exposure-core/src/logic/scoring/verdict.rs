//! Verdict mapping
//!
//! Two-threshold comparison. Both thresholds are inclusive bounds of the
//! safer tier.

use super::rules::{ThresholdDirection, VerdictThresholds};
use super::types::Verdict;

pub fn verdict_for(score: u32, thresholds: &VerdictThresholds) -> Verdict {
    match thresholds.direction {
        ThresholdDirection::HigherIsSafer => {
            if score >= thresholds.high {
                Verdict::Low
            } else if score >= thresholds.low {
                Verdict::Moderate
            } else {
                Verdict::High
            }
        }
        ThresholdDirection::LowerIsSafer => {
            if score <= thresholds.low {
                Verdict::Low
            } else if score <= thresholds.high {
                Verdict::Moderate
            } else {
                Verdict::High
            }
        }
    }
}
