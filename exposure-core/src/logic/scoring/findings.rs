//! Finding-based scorer
//!
//! Risk points: every finding adds its weight, the sum is clamped.

use crate::logic::exposure::Finding;
use super::rules::{finding_points, VerdictThresholds, FINDING_SCORE_CEILING};
use super::types::FindingScore;
use super::verdict::verdict_for;

/// Sum of finding weights clamped to [0, 100]
pub fn score_findings(findings: &[Finding]) -> u32 {
    let raw = findings
        .iter()
        .map(|f| finding_points(f.finding_type) as i64)
        .fold(0i64, i64::saturating_add);

    clamp_score(raw, FINDING_SCORE_CEILING)
}

/// Score plus verdict under the given thresholds
pub fn score_findings_with(findings: &[Finding], thresholds: &VerdictThresholds) -> FindingScore {
    let score = score_findings(findings);
    FindingScore {
        score,
        verdict: verdict_for(score, thresholds),
    }
}

/// Clamp into [0, ceiling]; lower bound holds for negative weights too
pub fn clamp_score(raw: i64, ceiling: u32) -> u32 {
    raw.clamp(0, ceiling as i64) as u32
}
