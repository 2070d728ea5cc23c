//! Central Configuration Constants
//!
//! Single source of truth for names and environment overrides.
//! Scoring defaults live in `logic::scoring::rules`, capture limits in
//! `logic::policy::config`.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "CallBreach";

/// Env var holding a JSON policy file path
pub const POLICY_FILE_ENV: &str = "CALLBREACH_POLICY_FILE";

/// Env var selecting a simulation dataset
pub const SIMULATION_ENV: &str = "CALLBREACH_SIMULATION";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Policy file path from environment, if set and non-empty
pub fn get_policy_file() -> Option<PathBuf> {
    std::env::var(POLICY_FILE_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Simulation dataset key from environment, if set and non-empty
pub fn get_simulation_dataset() -> Option<String> {
    std::env::var(SIMULATION_ENV)
        .ok()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}
