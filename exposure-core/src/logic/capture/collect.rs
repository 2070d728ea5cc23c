//! Async window collection
//!
//! Drives a [`CaptureWindow`] from an event channel until the caller closes
//! it, the window times out, the source hangs up, or the host cancels.
//! This is the only suspending operation in the crate.

use tokio::sync::{mpsc, watch};

use crate::logic::error::ExposureError;
use crate::logic::policy::CaptureSettings;
use super::types::{CaptureError, CloseReason, ClosedWindow};
use super::window::CaptureWindow;

/// Event delivered by the capture collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// Raw SDP candidate line
    Candidate(String),
    /// Gathering finished
    Close,
}

// ============================================================================
// CANCELLATION
// ============================================================================

/// Owner side: abandon the window
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

/// Collector side
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelSignal(rx))
}

impl CancelHandle {
    pub fn cancel(&self) {
        // no receiver left = nothing to cancel
        let _ = self.0.send(true);
    }
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }
}

// ============================================================================
// COLLECTOR
// ============================================================================

/// Gather candidates until the window closes
///
/// Malformed descriptors are dropped and counted in `rejected`; capacity
/// overflow aborts the window with an error.
pub async fn collect_window(
    mut events: mpsc::Receiver<CaptureEvent>,
    settings: CaptureSettings,
    cancel: CancelSignal,
) -> Result<ClosedWindow, CaptureError> {
    let CancelSignal(mut cancel_rx) = cancel;
    if *cancel_rx.borrow_and_update() {
        return Err(CaptureError::Cancelled);
    }

    let mut window = CaptureWindow::open(settings);
    let deadline = tokio::time::sleep(window.remaining());
    tokio::pin!(deadline);

    let mut cancel_live = true;

    loop {
        tokio::select! {
            _ = &mut deadline => {
                return Ok(window.close(CloseReason::Timeout));
            }

            changed = cancel_rx.changed(), if cancel_live => {
                match changed {
                    Ok(()) if *cancel_rx.borrow_and_update() => {
                        log::info!("Capture cancelled after {} candidates", window.len());
                        return Err(CaptureError::Cancelled);
                    }
                    Ok(()) => {}
                    // handle dropped: cancellation can no longer happen
                    Err(_) => cancel_live = false,
                }
            }

            event = events.recv() => {
                match event {
                    Some(CaptureEvent::Candidate(line)) => match window.push_descriptor(&line) {
                        Ok(_) => {}
                        Err(CaptureError::Input(ExposureError::MalformedInput(_))) => {}
                        // deadline passed before the timer branch was polled
                        Err(CaptureError::AlreadyClosed) => {
                            return Ok(window.close(CloseReason::Timeout));
                        }
                        Err(e) => return Err(e),
                    },
                    Some(CaptureEvent::Close) => return Ok(window.close(CloseReason::Explicit)),
                    None => return Ok(window.close(CloseReason::SourceEnded)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const HOST: &str = "candidate:1 1 udp 2122260223 192.168.1.20 54400 typ host";
    const SRFLX: &str = "candidate:2 1 udp 1686052607 203.0.113.7 61000 typ srflx";

    fn settings(window_ms: u64, max_candidates: usize) -> CaptureSettings {
        CaptureSettings { window_ms, max_candidates, ..Default::default() }
    }

    #[tokio::test]
    async fn test_explicit_close() {
        let (tx, rx) = mpsc::channel(8);
        let (_handle, signal) = cancel_pair();

        tx.send(CaptureEvent::Candidate(HOST.into())).await.unwrap();
        tx.send(CaptureEvent::Candidate(SRFLX.into())).await.unwrap();
        tx.send(CaptureEvent::Close).await.unwrap();

        let closed = collect_window(rx, settings(5_000, 8), signal).await.unwrap();
        assert_eq!(closed.reason, CloseReason::Explicit);
        assert_eq!(closed.record.candidate_count, 2);
    }

    #[tokio::test]
    async fn test_timeout_closes_window() {
        let (tx, rx) = mpsc::channel(8);
        let (_handle, signal) = cancel_pair();
        tx.send(CaptureEvent::Candidate(HOST.into())).await.unwrap();

        // keep the sender alive so only the deadline can end the window
        let closed = collect_window(rx, settings(50, 8), signal).await.unwrap();
        assert_eq!(closed.reason, CloseReason::Timeout);
        assert!(closed.record.has_host);
        drop(tx);
    }

    #[tokio::test]
    async fn test_timeout_without_candidates_is_not_an_error() {
        let (_tx, rx) = mpsc::channel::<CaptureEvent>(8);
        let (_handle, signal) = cancel_pair();

        let closed = collect_window(rx, settings(30, 8), signal).await.unwrap();
        assert_eq!(closed.reason, CloseReason::Timeout);
        assert!(closed.record.is_empty_observation());
    }

    #[tokio::test]
    async fn test_source_hangup() {
        let (tx, rx) = mpsc::channel(8);
        let (_handle, signal) = cancel_pair();
        tx.send(CaptureEvent::Candidate(HOST.into())).await.unwrap();
        drop(tx);

        let closed = collect_window(rx, settings(5_000, 8), signal).await.unwrap();
        assert_eq!(closed.reason, CloseReason::SourceEnded);
        assert_eq!(closed.observations.len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_abandons_window() {
        let (_tx, rx) = mpsc::channel::<CaptureEvent>(8);
        let (handle, signal) = cancel_pair();

        let task = tokio::spawn(collect_window(rx, settings(5_000, 8), signal));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();

        assert_eq!(task.await.unwrap(), Err(CaptureError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (_tx, rx) = mpsc::channel::<CaptureEvent>(8);
        let (handle, signal) = cancel_pair();
        handle.cancel();
        assert!(signal.is_cancelled());

        assert_eq!(
            collect_window(rx, settings(5_000, 8), signal).await,
            Err(CaptureError::Cancelled)
        );
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_cancel() {
        let (tx, rx) = mpsc::channel(8);
        let (handle, signal) = cancel_pair();
        drop(handle);
        tx.send(CaptureEvent::Candidate(HOST.into())).await.unwrap();
        tx.send(CaptureEvent::Close).await.unwrap();

        let closed = collect_window(rx, settings(5_000, 8), signal).await.unwrap();
        assert_eq!(closed.reason, CloseReason::Explicit);
    }

    #[tokio::test]
    async fn test_malformed_is_skipped_overflow_is_fatal() {
        let (tx, rx) = mpsc::channel(8);
        let (_handle, signal) = cancel_pair();
        tx.send(CaptureEvent::Candidate("junk".into())).await.unwrap();
        tx.send(CaptureEvent::Candidate(HOST.into())).await.unwrap();
        tx.send(CaptureEvent::Close).await.unwrap();

        let closed = collect_window(rx, settings(5_000, 8), signal.clone()).await.unwrap();
        assert_eq!(closed.rejected, 1);
        assert_eq!(closed.observations.len(), 1);

        let (tx, rx) = mpsc::channel(8);
        tx.send(CaptureEvent::Candidate(HOST.into())).await.unwrap();
        tx.send(CaptureEvent::Candidate(SRFLX.into())).await.unwrap();
        let err = collect_window(rx, settings(5_000, 1), signal).await.unwrap_err();
        assert!(matches!(err, CaptureError::Input(ExposureError::CapacityExceeded { .. })));
    }
}
