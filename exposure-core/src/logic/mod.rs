//! Logic Module - Exposure analysis engines
//!
//! Chứa các engines xử lý: signal reduction, classifier, scorers, capture, session.
//!
//! ## Layout (leaves first)
//! - `signal/` - candidate parsing, interface classes, SignalRecord
//! - `exposure/` - flow metadata -> Findings
//! - `scoring/` - finding scorer, record scorer, verdict tiers
//! - `policy/` - validated scoring policy
//! - `capture/` - bounded window, async collection, capture sources
//! - `session/` - scan lifecycle and reports

pub mod error;
pub mod signal;
pub mod exposure;
pub mod scoring;
pub mod policy;
pub mod simulation;
pub mod capture;
pub mod session;

pub use error::ExposureError;
