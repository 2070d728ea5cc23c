//! Session scenarios

use std::time::Duration;

use tokio::sync::mpsc;

use super::*;
use crate::logic::capture::{cancel_pair, collect_window, CaptureError, CaptureEvent, CloseReason, MockCapture};
use crate::logic::capture::CaptureSource;
use crate::logic::error::ExposureError;
use crate::logic::exposure::Flow;
use crate::logic::policy::{CaptureSettings, ExposurePolicy};
use crate::logic::scoring::Verdict;
use crate::logic::signal::{InterfaceClass, SignalRecord};

const HOST_PUBLIC: &str = "candidate:1 1 udp 2122260223 203.0.113.7 54400 typ host";
const SRFLX_PUBLIC: &str = "candidate:2 1 udp 1686052607 203.0.113.7 54400 typ srflx raddr 203.0.113.7 rport 54400";
const RELAY: &str = "candidate:3 1 udp 41885439 198.51.100.9 3478 typ relay raddr 0.0.0.0 rport 0";

fn session() -> ScanSession {
    ScanSession::new(ExposurePolicy::default()).unwrap()
}

fn short_window(window_ms: u64) -> ExposurePolicy {
    ExposurePolicy {
        capture: CaptureSettings { window_ms, ..Default::default() },
        ..Default::default()
    }
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_new_session_has_no_scan_run() {
    let s = session();
    assert_eq!(s.state(), ScanState::NoScanRun);
    assert!(s.provisional().is_none());
    assert!(s.findings().is_empty());
}

#[test]
fn test_invalid_policy_rejected_up_front() {
    let mut policy = ExposurePolicy::default();
    policy.thresholds.low = 90;
    assert!(ScanSession::new(policy).is_err());
}

#[test]
fn test_direct_public_scan() {
    let mut s = session();
    s.push_candidate(HOST_PUBLIC).unwrap();
    s.push_candidate(SRFLX_PUBLIC).unwrap();
    assert!(matches!(s.state(), ScanState::Capturing { candidate_count: 2, .. }));

    let report = s.close().unwrap();
    assert_eq!(report.score, 25);
    assert_eq!(report.verdict, Verdict::High);
    assert_eq!(report.status, "CRITICAL");
    assert_eq!(report.session_id, Some(s.id()));

    let details = report.details.as_ref().unwrap();
    assert_eq!(details.close_reason, Some(CloseReason::Explicit));
    assert!(details.signals.has_interface(InterfaceClass::Public));

    assert_eq!(s.state().report(), Some(&report));
}

#[test]
fn test_close_is_idempotent() {
    let mut s = session();
    s.push_candidate(RELAY).unwrap();
    let first = s.close().unwrap();
    let second = s.close().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.score, 95);
}

#[test]
fn test_close_without_capture_scores_empty_record() {
    let mut s = session();
    let report = s.close().unwrap();
    assert_eq!(report.score, 100);
    assert_eq!(report.verdict, Verdict::Low);
}

#[test]
fn test_completed_session_refuses_input() {
    let mut s = session();
    s.close().unwrap();

    assert!(matches!(
        s.push_candidate(RELAY),
        Err(SessionError::Capture(CaptureError::AlreadyClosed))
    ));
    assert!(s.add_flow(&Flow::new("udp").with_meta("ip", "8.8.8.8")).is_err());
}

#[test]
fn test_abandon() {
    let mut s = session();
    s.push_candidate(HOST_PUBLIC).unwrap();
    s.abandon();

    assert_eq!(s.state(), ScanState::Abandoned);
    assert!(s.provisional().is_none());
    assert!(matches!(s.close(), Err(SessionError::Capture(CaptureError::Cancelled))));
    assert!(matches!(
        s.begin_capture(),
        Err(CaptureError::Cancelled)
    ));
}

// ============================================================================
// PROVISIONAL / TIMEOUT
// ============================================================================

#[test]
fn test_provisional_is_tagged_and_window_stays_open() {
    let mut s = session();
    s.push_candidate(HOST_PUBLIC).unwrap();

    let snapshot = s.provisional().unwrap();
    assert!(snapshot.provisional);
    assert!(snapshot.details.unwrap().close_reason.is_none());
    assert!(matches!(s.state(), ScanState::Capturing { .. }));

    s.push_candidate(SRFLX_PUBLIC).unwrap();
    let report = s.close().unwrap();
    assert!(!report.provisional);
    assert_eq!(report.score, 25);
}

#[test]
fn test_expired_window_finalizes_on_push() {
    let mut s = ScanSession::new(short_window(100)).unwrap();
    s.push_candidate(RELAY).unwrap();
    std::thread::sleep(Duration::from_millis(150));

    assert!(matches!(
        s.push_candidate(HOST_PUBLIC),
        Err(SessionError::Capture(CaptureError::AlreadyClosed))
    ));

    let report = s.state().report().cloned().unwrap();
    assert_eq!(report.details.unwrap().close_reason, Some(CloseReason::Timeout));
    assert_eq!(report.score, 95);
}

#[test]
fn test_poll_finalizes_after_timeout() {
    let mut s = ScanSession::new(short_window(100)).unwrap();
    s.begin_capture().unwrap();
    assert_eq!(s.poll().unwrap(), None);

    std::thread::sleep(Duration::from_millis(150));
    let report = s.poll().unwrap().unwrap();

    // timeout with zero candidates is a valid minimal record
    assert_eq!(report.score, 100);
    assert!(s.state().is_scored());
}

#[test]
fn test_malformed_candidate_keeps_window_usable() {
    let mut s = session();
    let err = s.push_candidate("not a candidate").unwrap_err();
    assert!(matches!(
        err,
        SessionError::Capture(CaptureError::Input(ExposureError::MalformedInput(_)))
    ));
    s.push_candidate(RELAY).unwrap();
    assert_eq!(s.close().unwrap().score, 95);
}

#[test]
fn test_candidate_cap() {
    let policy = ExposurePolicy {
        capture: CaptureSettings { max_candidates: 1, ..Default::default() },
        ..Default::default()
    };
    let mut s = ScanSession::new(policy).unwrap();
    s.push_candidate(HOST_PUBLIC).unwrap();
    assert!(matches!(
        s.push_candidate(SRFLX_PUBLIC),
        Err(SessionError::Capture(CaptureError::Input(ExposureError::CapacityExceeded { .. })))
    ));
}

#[test]
fn test_batch_overflow_leaves_session_untouched() {
    let policy = ExposurePolicy {
        capture: CaptureSettings { max_candidates: 2, ..Default::default() },
        ..Default::default()
    };
    let mut s = ScanSession::new(policy).unwrap();
    let flows = vec![Flow::new("udp").with_meta("ip", "8.8.8.8")];

    let err = s
        .push_batch(&[HOST_PUBLIC, SRFLX_PUBLIC, RELAY], &flows)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Capture(CaptureError::Input(ExposureError::CapacityExceeded { limit: 2, .. }))
    ));
    assert_eq!(s.state(), ScanState::NoScanRun);
    assert!(s.findings().is_empty());

    // a bad flow also blocks the candidates
    let malformed = vec![Flow { protocol: None, metadata: None }];
    assert!(s.push_batch(&[HOST_PUBLIC], &malformed).is_err());
    assert_eq!(s.state(), ScanState::NoScanRun);

    let outcome = s.push_batch(&[HOST_PUBLIC, "garbage", SRFLX_PUBLIC], &flows).unwrap();
    assert_eq!(outcome.accepted, 2);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].0, 1);
    assert_eq!(outcome.findings_added, 1);
    assert!(matches!(s.state(), ScanState::Capturing { candidate_count: 2, .. }));

    // an open window at the cap keeps its candidates and findings
    assert!(s.push_batch(&[RELAY], &flows).is_err());
    assert!(matches!(s.state(), ScanState::Capturing { candidate_count: 2, .. }));
    assert_eq!(s.findings().len(), 1);
}

#[test]
fn test_flow_only_batch_does_not_open_window() {
    let mut s = session();
    let flows = vec![Flow::new("udp").with_meta("ip", "8.8.8.8")];
    let outcome = s.push_batch::<&str>(&[], &flows).unwrap();
    assert_eq!(outcome.accepted, 0);
    assert_eq!(outcome.findings_added, 1);
    assert_eq!(s.state(), ScanState::NoScanRun);
}

// ============================================================================
// FINDINGS
// ============================================================================

#[test]
fn test_flows_feed_finding_score() {
    let mut s = session();
    let added = s.add_flow(&Flow::new("udp").with_meta("ip", "8.8.8.8")).unwrap();
    assert_eq!(added, 1);

    let report = s.close().unwrap();
    assert_eq!(report.finding_score.score, 20);
    assert_eq!(report.details.unwrap().findings.len(), 1);
}

#[test]
fn test_finding_cap_is_all_or_nothing() {
    let policy = ExposurePolicy {
        capture: CaptureSettings { max_findings: 2, ..Default::default() },
        ..Default::default()
    };
    let mut s = ScanSession::new(policy).unwrap();
    let flows = vec![
        Flow::new("udp").with_meta("ip", "203.0.113.7"),
        Flow::new("udp")
            .with_meta("ip", "203.0.113.8")
            .with_meta("ice_candidate", RELAY),
    ];

    assert!(matches!(
        s.add_flows(&flows),
        Err(SessionError::Input(ExposureError::CapacityExceeded { limit: 2, .. }))
    ));
    assert!(s.findings().is_empty());
}

#[test]
fn test_ingest_from_mock_capture() {
    let mut s = session();
    let mut capture = MockCapture::simulated();
    capture.start().unwrap();

    assert_eq!(s.ingest(&mut capture).unwrap(), 2);
    assert_eq!(s.ingest(&mut capture).unwrap(), 0);
    capture.stop().unwrap();

    assert_eq!(s.close().unwrap().finding_score.score, 35);
}

// ============================================================================
// EXTERNAL RECORDS / SIMULATION
// ============================================================================

#[test]
fn test_complete_with_external_record() {
    let mut s = session();
    let record = SignalRecord {
        has_relay: true,
        has_mdns: true,
        has_server_reflexive: true,
        interfaces: [InterfaceClass::Public].into_iter().collect(),
        candidate_count: 3,
        ..Default::default()
    };
    let report = s.complete_with_record(record).unwrap();
    assert_eq!(report.score, 60);
    assert_eq!(report.verdict, Verdict::Moderate);
}

#[test]
fn test_simulation_overrides_capture() {
    let policy = ExposurePolicy::default().with_simulation("dual_stack_leak");
    let mut s = ScanSession::new(policy).unwrap();
    s.push_candidate(RELAY).unwrap();

    let report = s.close().unwrap();
    assert_eq!(report.simulated.as_deref(), Some("dual_stack_leak"));
    assert_eq!(report.score, 0);
    assert_eq!(report.details.unwrap().candidates.len(), 6);
}

#[test]
fn test_sessions_are_isolated() {
    let mut a = session();
    let mut b = session();
    a.push_candidate(HOST_PUBLIC).unwrap();
    b.push_candidate(RELAY).unwrap();

    assert_ne!(a.id(), b.id());
    assert_eq!(b.close().unwrap().score, 95);
    assert!(matches!(a.state(), ScanState::Capturing { candidate_count: 1, .. }));
}

#[tokio::test]
async fn test_async_collection_into_session() {
    let mut s = session();
    let (tx, rx) = mpsc::channel(8);
    let (_handle, signal) = cancel_pair();

    tx.send(CaptureEvent::Candidate(HOST_PUBLIC.into())).await.unwrap();
    tx.send(CaptureEvent::Candidate(SRFLX_PUBLIC.into())).await.unwrap();
    tx.send(CaptureEvent::Close).await.unwrap();

    let closed = collect_window(rx, s.policy().capture.clone(), signal).await.unwrap();
    let report = s.complete_window(closed).unwrap();
    assert_eq!(report.score, 25);
}
