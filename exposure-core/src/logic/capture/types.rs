//! Capture Types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::error::ExposureError;
use crate::logic::signal::{CandidateObservation, SignalRecord};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Caller abandoned the window before it closed
    #[error("capture cancelled")]
    Cancelled,

    #[error("capture window already closed")]
    AlreadyClosed,

    #[error("capture source error: {0}")]
    Source(String),

    /// Malformed descriptor or capacity overflow
    #[error(transparent)]
    Input(#[from] ExposureError),
}

// ============================================================================
// CLOSED WINDOW
// ============================================================================

/// Why a window stopped accepting candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Caller signalled end of gathering
    Explicit,
    /// Window duration elapsed
    Timeout,
    /// Candidate source hung up
    SourceEnded,
}

/// Frozen result of one negotiation window
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedWindow {
    pub record: SignalRecord,
    pub observations: Vec<CandidateObservation>,
    pub reason: CloseReason,
    pub elapsed_ms: u64,
    /// Descriptors dropped as malformed
    pub rejected: usize,
}

impl ClosedWindow {
    /// Window for a record reduced by an external collaborator
    pub fn from_record(record: SignalRecord) -> Self {
        Self {
            record,
            observations: Vec::new(),
            reason: CloseReason::Explicit,
            elapsed_ms: 0,
            rejected: 0,
        }
    }
}
