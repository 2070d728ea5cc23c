//! Shared input errors
//!
//! Raised by the signal, exposure and session modules when a caller hands
//! over something that cannot be analyzed. A clean input never produces one
//! of these: "no findings" and "malformed" stay distinguishable.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExposureError {
    /// Required structure missing or unparsable
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A bounded sequence would grow past its configured cap
    #[error("{what} limit of {limit} exceeded")]
    CapacityExceeded { what: &'static str, limit: usize },
}

impl ExposureError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ExposureError::MalformedInput(msg.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ExposureError::MalformedInput(_))
    }
}
