//! Report builder
//!
//! Turns a frozen record plus the session's findings into an ExposureReport.
//! Both scorers run here; nothing is cached between calls.

use chrono::Utc;
use uuid::Uuid;

use crate::logic::capture::{CloseReason, ClosedWindow};
use crate::logic::error::ExposureError;
use crate::logic::exposure::{analyze_all, Finding, Flow};
use crate::logic::policy::{ExposurePolicy, PolicyError};
use crate::logic::scoring::{score_findings_with, score_record_with};
use crate::logic::signal::{CandidateObservation, SignalRecord, TimingProfile};
use crate::logic::simulation;
use super::types::{ExposureReport, FlowReport, ReportDetails};

/// Everything a report is computed from
pub struct ReportInput<'a> {
    pub session_id: Option<Uuid>,
    pub policy: &'a ExposurePolicy,
    pub record: &'a SignalRecord,
    pub observations: &'a [CandidateObservation],
    pub findings: &'a [Finding],
    pub close_reason: Option<CloseReason>,
    pub elapsed_ms: u64,
    pub provisional: bool,
    pub simulated: Option<String>,
}

impl<'a> ReportInput<'a> {
    /// Input for a closed capture window
    pub fn from_window(
        session_id: Option<Uuid>,
        policy: &'a ExposurePolicy,
        window: &'a ClosedWindow,
        findings: &'a [Finding],
    ) -> Self {
        Self {
            session_id,
            policy,
            record: &window.record,
            observations: &window.observations,
            findings,
            close_reason: Some(window.reason),
            elapsed_ms: window.elapsed_ms,
            provisional: false,
            simulated: None,
        }
    }

    pub fn build(self) -> ExposureReport {
        let scored = score_record_with(self.record, self.policy);
        let finding_score = score_findings_with(self.findings, &self.policy.finding_thresholds);

        let details = self.policy.show_details.then(|| ReportDetails {
            signals: self.record.clone(),
            breakdown: scored.breakdown.clone(),
            findings: self.findings.to_vec(),
            candidates: self.observations.to_vec(),
            timing: self
                .record
                .jitter_samples
                .as_deref()
                .and_then(TimingProfile::from_samples),
            close_reason: self.close_reason,
            elapsed_ms: self.elapsed_ms,
        });

        ExposureReport {
            session_id: self.session_id,
            generated_at: Utc::now(),
            provisional: self.provisional,
            score: scored.score,
            verdict: scored.verdict,
            status: scored.verdict.status_label().to_string(),
            finding_score,
            reasons: scored.breakdown.reasons(),
            simulated: self.simulated,
            details,
        }
    }
}

// ============================================================================
// STATELESS ENTRY POINTS
// ============================================================================

/// Score a record handed over by an external collaborator
pub fn report_for_record(record: &SignalRecord, policy: &ExposurePolicy) -> Result<ExposureReport, ExposureError> {
    record.validate()?;
    let window = ClosedWindow::from_record(record.clone());
    Ok(ReportInput::from_window(None, policy, &window, &[]).build())
}

/// Score a simulation fixture
pub fn report_for_dataset(key: &str, policy: &ExposurePolicy) -> Result<ExposureReport, PolicyError> {
    let window = simulated_window(key)?;
    let mut input = ReportInput::from_window(None, policy, &window, &[]);
    input.simulated = Some(key.to_string());
    Ok(input.build())
}

/// Classify flows and score the findings
pub fn analyze_flows(flows: &[Flow], policy: &ExposurePolicy) -> Result<FlowReport, ExposureError> {
    let findings = analyze_all(flows, policy.capture.max_findings)?;
    let scored = score_findings_with(&findings, &policy.finding_thresholds);

    log::info!(
        "Analyzed {} flows: {} findings, score {}",
        flows.len(),
        findings.len(),
        scored.score
    );

    Ok(FlowReport {
        findings,
        score: scored.score,
        verdict: scored.verdict,
        status: scored.verdict.status_label().to_string(),
    })
}

/// Closed window replaying a dataset's candidates
pub(crate) fn simulated_window(key: &str) -> Result<ClosedWindow, PolicyError> {
    let observations = simulation::observations(key)?;
    let elapsed_ms = observations.last().map(|o| o.elapsed_ms).unwrap_or(0);

    Ok(ClosedWindow {
        record: simulation::fixture(key)?,
        observations,
        reason: CloseReason::Explicit,
        elapsed_ms,
        rejected: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scoring::Verdict;

    #[test]
    fn test_flow_scenario_8_8_8_8() {
        let flows = vec![Flow::new("udp").with_meta("ip", "8.8.8.8")];
        let report = analyze_flows(&flows, &ExposurePolicy::default()).unwrap();

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.score, 20);
        assert_eq!(report.status, "EXPOSED");
    }

    #[test]
    fn test_clean_flows_are_safe() {
        let flows = vec![Flow::new("tcp").with_meta("codec", "opus")];
        let report = analyze_flows(&flows, &ExposurePolicy::default()).unwrap();
        assert!(report.findings.is_empty());
        assert_eq!(report.score, 0);
        assert_eq!(report.status, "SAFE");
    }

    #[test]
    fn test_flow_without_metadata_is_rejected() {
        let flows = vec![Flow { protocol: Some("udp".into()), metadata: None }];
        assert!(analyze_flows(&flows, &ExposurePolicy::default())
            .unwrap_err()
            .is_malformed());
    }

    #[test]
    fn test_record_report_details() {
        let record = simulation::fixture("direct_public").unwrap();
        let report = report_for_record(&record, &ExposurePolicy::default()).unwrap();

        assert_eq!(report.score, 25);
        assert_eq!(report.verdict, Verdict::High);
        assert!(!report.provisional);
        assert!(report.session_id.is_none());

        let details = report.details.unwrap();
        assert_eq!(details.breakdown.final_score, 25);
        assert_eq!(details.timing.unwrap().sample_count, 3);
        assert_eq!(report.reasons.len(), details.breakdown.penalties.len());
    }

    #[test]
    fn test_show_details_off() {
        let policy = ExposurePolicy { show_details: false, ..Default::default() };
        let report = report_for_record(&SignalRecord::empty(), &policy).unwrap();
        assert!(report.details.is_none());
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_dataset_report_is_tagged() {
        let report = report_for_dataset("mdns_masked", &ExposurePolicy::default()).unwrap();
        assert_eq!(report.simulated.as_deref(), Some("mdns_masked"));
        assert_eq!(report.score, 45);
        assert_eq!(report.details.unwrap().candidates.len(), 3);

        assert!(matches!(
            report_for_dataset("nope", &ExposurePolicy::default()),
            Err(PolicyError::UnknownDataset(_))
        ));
    }
}
