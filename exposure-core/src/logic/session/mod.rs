//! Session Module
//!
//! Scan session lifecycle: NO_SCAN_RUN -> CAPTURING -> COMPLETE (hoặc ABANDONED).
//!
//! ## Structure
//! - `types`: ExposureReport, ScanState, SessionError
//! - `report`: report builder + stateless scoring entry points
//! - `scan`: ScanSession state machine

pub mod types;
pub mod report;
pub mod scan;

#[cfg(test)]
mod tests;

pub use types::{ExposureReport, FlowReport, PushOutcome, ReportDetails, ScanState, SessionError};
pub use report::{analyze_flows, report_for_dataset, report_for_record, ReportInput};
pub use scan::ScanSession;
