//! CallBreach core - đo mức lộ thông tin mạng của một cuộc gọi P2P.
//!
//! Captured signals go in, a bounded score and a LOW / MODERATE / HIGH
//! verdict come out. Capture itself and presentation live elsewhere.

pub mod constants;
pub mod logic;

pub use logic::capture::{CaptureError, CaptureSource, CaptureWindow, MockCapture};
pub use logic::error::ExposureError;
pub use logic::exposure::{analyze, Finding, FindingType, Flow};
pub use logic::policy::{ExposurePolicy, PolicyError};
pub use logic::scoring::{score_findings, score_record, Verdict};
pub use logic::session::{ExposureReport, ScanSession, ScanState, SessionError};
pub use logic::signal::{InterfaceClass, SignalRecord};
