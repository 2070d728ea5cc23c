//! Exposure Module
//!
//! Phân loại flow metadata thành Findings (IP_EXPOSURE, ICE_CANDIDATE).
//!
//! ## Structure
//! - `types`: Flow, Finding, FindingType, Direction
//! - `classifier`: analyze / analyze_all

pub mod types;
pub mod classifier;

pub use types::{Direction, Finding, FindingType, Flow};
pub use classifier::{analyze, analyze_all};
