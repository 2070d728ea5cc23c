//! Scan Session
//!
//! Một session = một negotiation attempt: findings từ flows, một capture
//! window, và đúng một final report. Sessions share nothing; a server keeps
//! many of them side by side.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logic::capture::{CaptureError, CaptureSource, CaptureWindow, CloseReason, ClosedWindow};
use crate::logic::error::ExposureError;
use crate::logic::exposure::{analyze, Finding, Flow};
use crate::logic::policy::{ExposurePolicy, PolicyError};
use crate::logic::signal::{CandidateObservation, SignalRecord};
use super::report::{simulated_window, ReportInput};
use super::types::{ExposureReport, PushOutcome, ScanState, SessionError};

#[derive(Debug)]
enum Phase {
    Idle,
    Capturing(CaptureWindow),
    Complete(Box<ExposureReport>),
    Abandoned,
}

#[derive(Debug)]
pub struct ScanSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    policy: ExposurePolicy,
    findings: Vec<Finding>,
    phase: Phase,
}

impl ScanSession {
    /// New idle session; the policy is validated before anything runs
    pub fn new(policy: ExposurePolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            policy,
            findings: Vec::new(),
            phase: Phase::Idle,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn policy(&self) -> &ExposurePolicy {
        &self.policy
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn state(&self) -> ScanState {
        match &self.phase {
            Phase::Idle => ScanState::NoScanRun,
            Phase::Capturing(window) => ScanState::Capturing {
                candidate_count: window.len(),
                elapsed_ms: window.elapsed_ms(),
            },
            Phase::Complete(report) => ScanState::Complete { report: report.clone() },
            Phase::Abandoned => ScanState::Abandoned,
        }
    }

    // ========================================================================
    // FINDINGS
    // ========================================================================

    /// Classify one flow; returns how many findings it added
    pub fn add_flow(&mut self, flow: &Flow) -> Result<usize, SessionError> {
        self.add_flows(std::slice::from_ref(flow))
    }

    /// Classify a batch of flows; all or nothing
    pub fn add_flows(&mut self, flows: &[Flow]) -> Result<usize, SessionError> {
        self.ensure_open()?;
        let batch = self.classify(flows)?;

        let added = batch.len();
        self.findings.extend(batch);
        Ok(added)
    }

    /// Drain whatever a running capture source has collected
    pub fn ingest(&mut self, source: &mut dyn CaptureSource) -> Result<usize, SessionError> {
        let flows = source.drain_flows();
        log::debug!("Session {}: {} flows from {}", self.id, flows.len(), source.name());
        self.add_flows(&flows)
    }

    // ========================================================================
    // CAPTURE WINDOW
    // ========================================================================

    /// Open the capture window if it is not open yet
    pub fn begin_capture(&mut self) -> Result<(), CaptureError> {
        self.ensure_open()?;
        if matches!(self.phase, Phase::Idle) {
            self.phase = Phase::Capturing(CaptureWindow::open(self.policy.capture.clone()));
            log::debug!("Session {}: capture window opened", self.id);
        }
        Ok(())
    }

    /// Append one raw descriptor; opens the window on first use
    ///
    /// A window whose deadline has passed is finalized on the spot and the
    /// candidate is refused with `AlreadyClosed`.
    pub fn push_candidate(&mut self, descriptor: &str) -> Result<CandidateObservation, SessionError> {
        self.begin_capture()?;

        if self.window_expired() {
            self.finalize_window(CloseReason::Timeout)?;
            return Err(CaptureError::AlreadyClosed.into());
        }

        match &mut self.phase {
            Phase::Capturing(window) => Ok(window.push_descriptor(descriptor)?.clone()),
            _ => Err(CaptureError::AlreadyClosed.into()),
        }
    }

    /// Append descriptors and flows together; all or nothing
    ///
    /// Malformed descriptors are skipped and reported by index. A closed
    /// window, an exceeded cap or a malformed flow leaves the session as it
    /// was, apart from finalizing a window whose deadline already passed.
    pub fn push_batch<S: AsRef<str>>(
        &mut self,
        descriptors: &[S],
        flows: &[Flow],
    ) -> Result<PushOutcome, SessionError> {
        self.ensure_open()?;
        if self.window_expired() {
            self.finalize_window(CloseReason::Timeout)?;
            return Err(CaptureError::AlreadyClosed.into());
        }

        let batch = self.classify(flows)?;

        let mut outcome = PushOutcome::default();
        if !descriptors.is_empty() {
            let was_idle = matches!(self.phase, Phase::Idle);
            self.begin_capture()?;

            let pushed = match &mut self.phase {
                Phase::Capturing(window) => {
                    let before = window.len();
                    window
                        .push_descriptors(descriptors)
                        .map(|rejected| (window.len() - before, rejected))
                }
                _ => Err(CaptureError::AlreadyClosed),
            };

            match pushed {
                Ok((accepted, rejected)) => {
                    outcome.accepted = accepted;
                    outcome.rejected = rejected;
                }
                Err(e) => {
                    if was_idle {
                        self.phase = Phase::Idle;
                    }
                    return Err(e.into());
                }
            }
        }

        outcome.findings_added = batch.len();
        self.findings.extend(batch);
        Ok(outcome)
    }

    /// Finalize on timeout; returns the report once one exists
    pub fn poll(&mut self) -> Result<Option<ExposureReport>, SessionError> {
        if self.window_expired() {
            return self.finalize_window(CloseReason::Timeout).map(Some);
        }

        Ok(match &self.phase {
            Phase::Complete(report) => Some(report.as_ref().clone()),
            _ => None,
        })
    }

    /// Score what has arrived so far without closing the window
    pub fn provisional(&self) -> Option<ExposureReport> {
        let Phase::Capturing(window) = &self.phase else {
            return None;
        };

        let record = window.snapshot();
        let input = ReportInput {
            session_id: Some(self.id),
            policy: &self.policy,
            record: &record,
            observations: window.observations(),
            findings: &self.findings,
            close_reason: None,
            elapsed_ms: window.elapsed_ms(),
            provisional: true,
            simulated: None,
        };
        Some(input.build())
    }

    // ========================================================================
    // COMPLETION
    // ========================================================================

    /// Close the window (or score an empty one) and produce the final report
    ///
    /// Closing twice returns the same report.
    pub fn close(&mut self) -> Result<ExposureReport, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Complete(report) => {
                let out = report.as_ref().clone();
                self.phase = Phase::Complete(report);
                Ok(out)
            }
            Phase::Abandoned => {
                self.phase = Phase::Abandoned;
                Err(CaptureError::Cancelled.into())
            }
            Phase::Idle => self.finish(ClosedWindow::from_record(SignalRecord::empty())),
            Phase::Capturing(window) => {
                let reason = if window.is_expired() {
                    CloseReason::Timeout
                } else {
                    CloseReason::Explicit
                };
                self.finish(window.close(reason))
            }
        }
    }

    /// Finish with a window collected elsewhere (e.g. `collect_window`)
    pub fn complete_window(&mut self, window: ClosedWindow) -> Result<ExposureReport, SessionError> {
        self.ensure_open()?;
        self.finish(window)
    }

    /// Finish with a record reduced by an external collaborator
    pub fn complete_with_record(&mut self, record: SignalRecord) -> Result<ExposureReport, SessionError> {
        self.ensure_open()?;
        record.validate()?;
        self.finish(ClosedWindow::from_record(record))
    }

    /// Drop the window; later calls fail with `Cancelled`
    pub fn abandon(&mut self) {
        if !matches!(self.phase, Phase::Abandoned) {
            log::info!("Session {} abandoned", self.id);
        }
        self.phase = Phase::Abandoned;
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn ensure_open(&self) -> Result<(), CaptureError> {
        match self.phase {
            Phase::Complete(_) => Err(CaptureError::AlreadyClosed),
            Phase::Abandoned => Err(CaptureError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Findings for `flows`, checked against the cap but not stored
    fn classify(&self, flows: &[Flow]) -> Result<Vec<Finding>, SessionError> {
        let mut batch = Vec::new();
        for flow in flows {
            batch.extend(analyze(flow)?);
        }

        let limit = self.policy.capture.max_findings;
        if self.findings.len() + batch.len() > limit {
            log::warn!(
                "Session {}: finding cap {} reached, rejecting {} new findings",
                self.id,
                limit,
                batch.len()
            );
            return Err(ExposureError::CapacityExceeded { what: "finding", limit }.into());
        }
        Ok(batch)
    }

    fn window_expired(&self) -> bool {
        matches!(&self.phase, Phase::Capturing(window) if window.is_expired())
    }

    fn finalize_window(&mut self, reason: CloseReason) -> Result<ExposureReport, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Capturing(window) => self.finish(window.close(reason)),
            other => {
                self.phase = other;
                Err(CaptureError::AlreadyClosed.into())
            }
        }
    }

    /// Score, store and return the final report
    fn finish(&mut self, window: ClosedWindow) -> Result<ExposureReport, SessionError> {
        let (window, simulated) = match &self.policy.simulation {
            Some(key) => (simulated_window(key)?, Some(key.clone())),
            None => (window, None),
        };

        let mut input = ReportInput::from_window(Some(self.id), &self.policy, &window, &self.findings);
        input.simulated = simulated;
        let report = input.build();

        log::info!(
            "Session {} scored {} ({}) from {} candidates, {} findings",
            self.id,
            report.score,
            report.verdict,
            window.record.candidate_count,
            self.findings.len()
        );

        self.phase = Phase::Complete(Box::new(report.clone()));
        Ok(report)
    }
}
