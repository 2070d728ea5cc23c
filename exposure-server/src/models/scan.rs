//! Scan request / response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use callbreach_core::logic::session::ScanState;
use callbreach_core::{ExposurePolicy, Flow, ScanSession, SignalRecord};

/// Named policy preset a caller may pick per request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPreset {
    #[default]
    Default,
    Strict,
    Relaxed,
}

impl PolicyPreset {
    /// Server policy with this preset's verdict tiers
    pub fn apply(self, base: &ExposurePolicy) -> ExposurePolicy {
        let thresholds = match self {
            PolicyPreset::Default => return base.clone(),
            PolicyPreset::Strict => ExposurePolicy::strict().thresholds,
            PolicyPreset::Relaxed => ExposurePolicy::relaxed().thresholds,
        };
        ExposurePolicy { thresholds, ..base.clone() }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateScan {
    #[serde(default)]
    pub preset: PolicyPreset,
    #[validate(range(min = 100, max = 60000))]
    pub window_ms: Option<u64>,
    #[validate(length(min = 1, max = 64))]
    pub simulation: Option<String>,
    pub show_details: Option<bool>,
}

impl CreateScan {
    /// Per-session policy derived from the server default
    pub fn policy(&self, base: &ExposurePolicy) -> ExposurePolicy {
        let mut policy = self.preset.apply(base);
        if let Some(window_ms) = self.window_ms {
            policy.capture.window_ms = window_ms;
        }
        if let Some(dataset) = &self.simulation {
            policy.simulation = Some(dataset.trim().to_lowercase());
        }
        if let Some(show) = self.show_details {
            policy.show_details = show;
        }
        policy
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PushCandidates {
    /// Raw SDP candidate lines
    #[serde(default)]
    #[validate(length(max = 4096))]
    pub candidates: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub flows: Vec<Flow>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeFlows {
    #[validate(length(min = 1, max = 1024))]
    pub flows: Vec<Flow>,
    #[serde(default)]
    pub preset: PolicyPreset,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScoreRecord {
    pub record: SignalRecord,
    #[serde(default)]
    pub preset: PolicyPreset,
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ScanView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub finding_count: usize,
    #[serde(flatten)]
    pub state: ScanState,
}

impl ScanView {
    pub fn of(session: &ScanSession) -> Self {
        Self {
            id: session.id(),
            created_at: session.created_at(),
            finding_count: session.findings().len(),
            state: session.state(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RejectedCandidate {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct PushResult {
    pub accepted: usize,
    pub rejected: Vec<RejectedCandidate>,
    pub findings_added: usize,
    #[serde(flatten)]
    pub scan: ScanView,
}
