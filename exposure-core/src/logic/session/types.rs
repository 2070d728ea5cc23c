//! Session Types
//!
//! Report và state của một scan session.
//! KHÔNG chứa logic - chỉ data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::logic::capture::{CaptureError, CloseReason};
use crate::logic::error::ExposureError;
use crate::logic::exposure::Finding;
use crate::logic::policy::PolicyError;
use crate::logic::scoring::{FindingScore, ScoreBreakdown, Verdict};
use crate::logic::signal::{CandidateObservation, SignalRecord, TimingProfile};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Input(#[from] ExposureError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

// ============================================================================
// REPORT
// ============================================================================

/// Scored result of one scan (final or provisional)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureReport {
    /// None for stateless scoring calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
    /// Scored from a snapshot of an open window
    pub provisional: bool,
    pub score: u32,
    pub verdict: Verdict,
    /// SAFE / EXPOSED / CRITICAL
    pub status: String,
    /// Finding-based score over the session's flows
    pub finding_score: FindingScore,
    pub reasons: Vec<String>,
    /// Dataset key when the record came from a simulation fixture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated: Option<String>,
    /// Present when the policy has `show_details`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ReportDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDetails {
    pub signals: SignalRecord,
    pub breakdown: ScoreBreakdown,
    pub findings: Vec<Finding>,
    pub candidates: Vec<CandidateObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<CloseReason>,
    pub elapsed_ms: u64,
}

/// Result of the finding-based path on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowReport {
    pub findings: Vec<Finding>,
    pub score: u32,
    pub verdict: Verdict,
    pub status: String,
}

/// What one batch push changed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PushOutcome {
    pub accepted: usize,
    /// Malformed descriptors, by index in the batch
    pub rejected: Vec<(usize, ExposureError)>,
    pub findings_added: usize,
}

// ============================================================================
// SCAN STATE
// ============================================================================

/// What a caller sees when asking a session where it is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanState {
    /// Nothing has been captured or scored yet - never a score of 0
    NoScanRun,
    Capturing { candidate_count: usize, elapsed_ms: u64 },
    Complete { report: Box<ExposureReport> },
    Abandoned,
}

impl ScanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanState::NoScanRun => "NO_SCAN_RUN",
            ScanState::Capturing { .. } => "CAPTURING",
            ScanState::Complete { .. } => "COMPLETE",
            ScanState::Abandoned => "ABANDONED",
        }
    }

    pub fn report(&self) -> Option<&ExposureReport> {
        match self {
            ScanState::Complete { report } => Some(report.as_ref()),
            _ => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.report().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_scan_run_serializes_without_score() {
        let value = serde_json::to_value(ScanState::NoScanRun).unwrap();
        assert_eq!(value["state"], "NO_SCAN_RUN");
        assert!(value.get("score").is_none());
        assert!(!ScanState::NoScanRun.is_scored());
    }

    #[test]
    fn test_capturing_state_shape() {
        let state = ScanState::Capturing { candidate_count: 3, elapsed_ms: 120 };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["state"], "CAPTURING");
        assert_eq!(value["candidate_count"], 3);
        assert_eq!(state.as_str(), "CAPTURING");
    }
}
