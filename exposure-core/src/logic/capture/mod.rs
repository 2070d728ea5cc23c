//! Capture Module
//!
//! Thu thập candidates trong một window có giới hạn (thời gian + số lượng),
//! rồi reduce một lần thành SignalRecord.
//!
//! ## Structure
//! - `types`: CaptureError, CloseReason, ClosedWindow
//! - `window`: bounded synchronous accumulation
//! - `collect`: async driver with timeout and cancellation
//! - `source`: CaptureSource trait + MockCapture

pub mod types;
pub mod window;
pub mod collect;
pub mod source;

pub use types::{CaptureError, CloseReason, ClosedWindow};
pub use window::CaptureWindow;
pub use collect::{cancel_pair, collect_window, CancelHandle, CancelSignal, CaptureEvent};
pub use source::{CaptureSource, MockCapture};
