//! Policy Module
//!
//! Cấu hình scoring: max_score, penalty weights, verdict thresholds,
//! capture limits, detail display và simulation mode.
//!
//! ## Structure
//! - `config`: ExposurePolicy, CaptureSettings, presets
//! - `validate`: load-time validation, PolicyError
//!
//! ## Usage
//! ```ignore
//! use crate::logic::policy::ExposurePolicy;
//!
//! let policy = ExposurePolicy::load(Path::new("policy.json"))?;
//! let result = score_record_with(&record, &policy);
//! ```

pub mod config;
pub mod validate;

pub use config::{CaptureSettings, ExposurePolicy};
pub use validate::PolicyError;
