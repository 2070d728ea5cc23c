//! Scoring Module
//!
//! Hai scorer: Finding-based (risk points, 0 = clean) và Signal-Record-based
//! (privacy score, max_score = clean). Cả hai trả về số nguyên trong [0, 100].
//!
//! ## Structure
//! - `types`: Verdict, PenaltyFactor, ScoreBreakdown, RecordScore, FindingScore
//! - `rules`: Weights, thresholds and their config structs
//! - `findings`: Finding-based scorer
//! - `record`: Signal-Record scorer
//! - `verdict`: Two-threshold tier mapping
//!
//! ## Usage
//! ```ignore
//! use crate::logic::scoring::{score_record, Verdict};
//!
//! let result = score_record(&record);
//! match result.verdict {
//!     Verdict::Low => println!("Safe"),
//!     Verdict::Moderate => println!("Some identifiers exposed"),
//!     Verdict::High => println!("High exposure"),
//! }
//! ```

pub mod types;
pub mod rules;
pub mod findings;
pub mod record;
pub mod verdict;

pub use types::{
    AppliedPenalty,
    FindingScore,
    PenaltyFactor,
    RecordScore,
    ScoreBreakdown,
    Verdict,
};

pub use rules::{PenaltyWeights, ThresholdDirection, VerdictThresholds};

pub use findings::{clamp_score, score_findings, score_findings_with};
pub use record::{score_record, score_record_with};
pub use verdict::verdict_for;
