//! Signal Module
//!
//! Normalized data contract cho một lần observation: candidates vào,
//! SignalRecord (frozen) ra.
//!
//! ## Structure
//! - `types`: CandidateObservation, SignalRecord, DeviceContext, InterfaceClass
//! - `interface`: IP prefix -> LAN / PUBLIC
//! - `descriptor`: SDP `candidate:` line parser
//! - `reduce`: observation sequence -> SignalRecord
//! - `timing`: jitter summary for display
//!
//! ## Usage
//! ```ignore
//! use crate::logic::signal::{parse_candidate, reduce};
//!
//! let obs = parse_candidate("candidate:1 1 udp 2122260223 192.168.1.5 5000 typ host", 0, 12)?;
//! let record = reduce(&[obs]);
//! assert!(record.has_host);
//! ```

pub mod types;
pub mod interface;
pub mod descriptor;
pub mod reduce;
pub mod timing;

pub use types::{
    CandidateKind,
    CandidateObservation,
    DeviceContext,
    InterfaceClass,
    SignalRecord,
};

pub use interface::{classify_address, classify_ip};
pub use descriptor::parse_candidate;
pub use reduce::reduce;
pub use timing::TimingProfile;
