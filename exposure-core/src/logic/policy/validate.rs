//! Policy validation & loading
//!
//! Fail fast: the first invalid field rejects the whole policy, so a scan
//! never runs with an undefined penalty or inverted thresholds.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants;
use crate::logic::scoring::rules::{VerdictThresholds, FINDING_SCORE_CEILING};
use crate::logic::simulation;
use super::config::{
    ExposurePolicy, HARD_MAX_CANDIDATES, HARD_MAX_FINDINGS, MAX_WINDOW_MS, MIN_WINDOW_MS,
};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid policy field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("`{field}` thresholds out of order: low {low} must be below high {high}")]
    ThresholdOrder { field: &'static str, low: u32, high: u32 },

    #[error("policy parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read policy file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown simulation dataset '{0}'")]
    UnknownDataset(String),
}

fn invalid(field: &str, reason: impl Into<String>) -> PolicyError {
    PolicyError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

impl ExposurePolicy {
    /// Check every field, stopping at the first problem
    pub fn validate(&self) -> Result<(), PolicyError> {
        validate_max_score(self)?;
        validate_penalties(self)?;
        validate_thresholds("thresholds", &self.thresholds, self.max_score)?;
        validate_thresholds("finding_thresholds", &self.finding_thresholds, FINDING_SCORE_CEILING)?;
        validate_capture(self)?;
        validate_simulation(self)?;
        Ok(())
    }

    /// Parse and validate a JSON policy
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let policy: ExposurePolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load and validate a policy file
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let policy = Self::from_json(&json)?;
        log::info!("Policy loaded from {:?}", path);
        Ok(policy)
    }

    /// Policy file from the environment (or defaults), plus simulation override
    pub fn from_env() -> Result<Self, PolicyError> {
        let mut policy = match constants::get_policy_file() {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };

        if let Some(dataset) = constants::get_simulation_dataset() {
            policy.simulation = Some(dataset);
        }

        policy.validate()?;
        Ok(policy)
    }
}

fn validate_max_score(policy: &ExposurePolicy) -> Result<(), PolicyError> {
    if policy.max_score == 0 || policy.max_score > FINDING_SCORE_CEILING {
        return Err(invalid(
            "max_score",
            format!("must be within 1..={}, got {}", FINDING_SCORE_CEILING, policy.max_score),
        ));
    }
    Ok(())
}

fn validate_penalties(policy: &ExposurePolicy) -> Result<(), PolicyError> {
    for (name, points) in policy.penalties.named() {
        if points > policy.max_score {
            return Err(invalid(
                &format!("penalties.{}", name),
                format!("{} exceeds max_score {}", points, policy.max_score),
            ));
        }
    }
    Ok(())
}

fn validate_thresholds(
    field: &'static str,
    thresholds: &VerdictThresholds,
    ceiling: u32,
) -> Result<(), PolicyError> {
    if thresholds.low >= thresholds.high {
        return Err(PolicyError::ThresholdOrder {
            field,
            low: thresholds.low,
            high: thresholds.high,
        });
    }
    if thresholds.high > ceiling {
        return Err(invalid(
            &format!("{}.high", field),
            format!("{} exceeds score ceiling {}", thresholds.high, ceiling),
        ));
    }
    Ok(())
}

fn validate_capture(policy: &ExposurePolicy) -> Result<(), PolicyError> {
    let capture = &policy.capture;

    if !(MIN_WINDOW_MS..=MAX_WINDOW_MS).contains(&capture.window_ms) {
        return Err(invalid(
            "capture.window_ms",
            format!("must be within {}..={} ms, got {}", MIN_WINDOW_MS, MAX_WINDOW_MS, capture.window_ms),
        ));
    }
    if capture.max_candidates == 0 || capture.max_candidates > HARD_MAX_CANDIDATES {
        return Err(invalid(
            "capture.max_candidates",
            format!("must be within 1..={}", HARD_MAX_CANDIDATES),
        ));
    }
    if capture.max_findings == 0 || capture.max_findings > HARD_MAX_FINDINGS {
        return Err(invalid(
            "capture.max_findings",
            format!("must be within 1..={}", HARD_MAX_FINDINGS),
        ));
    }
    Ok(())
}

fn validate_simulation(policy: &ExposurePolicy) -> Result<(), PolicyError> {
    match &policy.simulation {
        Some(key) if !simulation::is_known(key) => Err(PolicyError::UnknownDataset(key.clone())),
        _ => Ok(()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
