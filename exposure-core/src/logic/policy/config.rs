//! Policy Configuration
//!
//! Strongly typed policy. Loaded from a JSON file or set at runtime, always
//! validated before the first scan runs (see `validate.rs`).

use serde::{Deserialize, Serialize};

use crate::logic::scoring::rules::{PenaltyWeights, VerdictThresholds, DEFAULT_MAX_SCORE};

// ============================================================================
// CAPTURE LIMITS
// ============================================================================

/// Default negotiation window (ms)
pub const DEFAULT_WINDOW_MS: u64 = 2_000;

/// Accepted window range (ms)
pub const MIN_WINDOW_MS: u64 = 100;
pub const MAX_WINDOW_MS: u64 = 60_000;

pub const DEFAULT_MAX_CANDIDATES: usize = 64;
pub const DEFAULT_MAX_FINDINGS: usize = 256;

/// Hard ceilings no policy may raise the caps above
pub const HARD_MAX_CANDIDATES: usize = 4_096;
pub const HARD_MAX_FINDINGS: usize = 16_384;

/// Accumulation limits for one scan session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureSettings {
    /// How long candidates are gathered before the window closes
    pub window_ms: u64,
    pub max_candidates: usize,
    pub max_findings: usize,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_findings: DEFAULT_MAX_FINDINGS,
        }
    }
}

impl CaptureSettings {
    pub fn window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.window_ms)
    }
}

// ============================================================================
// EXPOSURE POLICY
// ============================================================================

/// Complete scoring policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExposurePolicy {
    pub max_score: u32,
    pub penalties: PenaltyWeights,
    /// Record scorer tiers
    pub thresholds: VerdictThresholds,
    /// Finding scorer tiers
    pub finding_thresholds: VerdictThresholds,
    pub capture: CaptureSettings,
    /// Include signals and findings in reports
    pub show_details: bool,
    /// Dataset key - use a canned record instead of live capture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<String>,
}

impl Default for ExposurePolicy {
    fn default() -> Self {
        Self {
            max_score: DEFAULT_MAX_SCORE,
            penalties: PenaltyWeights::default(),
            thresholds: VerdictThresholds::default(),
            finding_thresholds: VerdictThresholds::for_findings(),
            capture: CaptureSettings::default(),
            show_details: true,
            simulation: None,
        }
    }
}

impl ExposurePolicy {
    /// Strict mode - LOW requires a score of 85
    pub fn strict() -> Self {
        Self {
            thresholds: VerdictThresholds::strict(),
            ..Default::default()
        }
    }

    /// Relaxed mode - LOW from a score of 65
    pub fn relaxed() -> Self {
        Self {
            thresholds: VerdictThresholds::relaxed(),
            ..Default::default()
        }
    }

    /// Run against a canned dataset
    pub fn with_simulation(mut self, dataset: &str) -> Self {
        self.simulation = Some(dataset.to_string());
        self
    }

    pub fn is_simulation(&self) -> bool {
        self.simulation.is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================
