//! Signal-Record scorer
//!
//! CORE LOGIC - deterministic và explainable.
//! Starts from `max_score` and subtracts every triggered penalty. All
//! conditions are evaluated independently against the frozen record.

use crate::logic::policy::ExposurePolicy;
use crate::logic::signal::{InterfaceClass, SignalRecord};
use super::findings::clamp_score;
use super::types::{AppliedPenalty, PenaltyFactor, RecordScore, ScoreBreakdown};
use super::verdict::verdict_for;

// ============================================================================
// MAIN SCORING FUNCTION
// ============================================================================

/// Score with the default policy
pub fn score_record(record: &SignalRecord) -> RecordScore {
    score_record_with(record, &ExposurePolicy::default())
}

/// Score with a custom (already validated) policy
pub fn score_record_with(record: &SignalRecord, policy: &ExposurePolicy) -> RecordScore {
    let weights = &policy.penalties;

    // no_relay / no_mdns only mean something once a flag or interface was seen
    let observed = !record.is_empty_observation();

    let exposed_interfaces = record.interfaces.iter().filter(|c| c.is_known()).count();

    let checks = [
        (PenaltyFactor::Host, record.has_host, weights.host),
        (PenaltyFactor::ServerReflexive, record.has_server_reflexive, weights.server_reflexive),
        (PenaltyFactor::NoRelay, observed && !record.has_relay, weights.no_relay),
        (
            PenaltyFactor::PublicInterface,
            record.has_interface(InterfaceClass::Public),
            weights.public_interface,
        ),
        (
            PenaltyFactor::LanInterface,
            record.has_interface(InterfaceClass::Lan),
            weights.lan_interface,
        ),
        (PenaltyFactor::MultiInterface, exposed_interfaces > 1, weights.multi_interface),
        (PenaltyFactor::Ipv6, record.has_ipv6, weights.ipv6),
        (PenaltyFactor::NoMdns, observed && !record.has_mdns, weights.no_mdns),
        (
            PenaltyFactor::CandidateVolume,
            record.candidate_count > weights.volume_threshold,
            weights.volume,
        ),
    ];

    let penalties: Vec<AppliedPenalty> = checks
        .iter()
        .filter(|(_, triggered, points)| *triggered && *points > 0)
        .map(|&(factor, _, points)| AppliedPenalty { factor, points })
        .collect();

    let total: i64 = penalties.iter().map(|p| p.points as i64).sum();
    let raw_score = policy.max_score as i64 - total;
    let score = clamp_score(raw_score, policy.max_score);
    let verdict = verdict_for(score, &policy.thresholds);

    log::debug!(
        "Record scored {} ({}) with {} penalties",
        score,
        verdict,
        penalties.len()
    );

    RecordScore {
        score,
        verdict,
        breakdown: ScoreBreakdown {
            max_score: policy.max_score,
            penalties,
            raw_score,
            final_score: score,
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scoring::rules::{PenaltyWeights, VerdictThresholds};
    use crate::logic::scoring::types::Verdict;

    fn interfaces(classes: &[InterfaceClass]) -> std::collections::BTreeSet<InterfaceClass> {
        classes.iter().copied().collect()
    }

    fn direct_public() -> SignalRecord {
        SignalRecord {
            has_relay: false,
            has_server_reflexive: true,
            has_host: true,
            interfaces: interfaces(&[InterfaceClass::Public]),
            has_ipv6: false,
            has_mdns: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_direct_public_scenario() {
        // 100 - 15 host - 20 srflx - 15 no relay - 20 public - 5 no mdns
        let result = score_record(&direct_public());
        assert_eq!(result.score, 25);
        assert_eq!(result.verdict, Verdict::High);
        assert_eq!(result.breakdown.penalties.len(), 5);
        assert_eq!(result.breakdown.raw_score, 25);
    }

    #[test]
    fn test_nothing_observed_is_max_score() {
        let result = score_record(&SignalRecord::empty());
        assert_eq!(result.score, 100);
        assert_eq!(result.verdict, Verdict::Low);
        assert!(result.breakdown.penalties.is_empty());

        let policy = ExposurePolicy { max_score: 90, ..Default::default() };
        assert_eq!(score_record_with(&SignalRecord::empty(), &policy).score, 90);
    }

    #[test]
    fn test_candidate_count_alone_keeps_max_score() {
        // e.g. prflx candidates whose address never classified
        let record = SignalRecord { candidate_count: 3, ..Default::default() };
        let result = score_record(&record);
        assert_eq!(result.score, 100);
        assert!(result.breakdown.penalties.is_empty());
    }

    #[test]
    fn test_all_penalties_clamp_to_zero() {
        let record = SignalRecord {
            has_host: true,
            has_server_reflexive: true,
            has_ipv6: true,
            interfaces: interfaces(&[InterfaceClass::Lan, InterfaceClass::Public]),
            candidate_count: 6,
            ..Default::default()
        };
        let result = score_record(&record);
        assert_eq!(result.breakdown.raw_score, -10);
        assert_eq!(result.score, 0);
        assert_eq!(result.verdict, Verdict::High);
        assert_eq!(result.breakdown.penalties.len(), 9);
    }

    #[test]
    fn test_relay_and_mdns_remove_their_penalties() {
        let mut record = direct_public();
        record.has_relay = true;
        record.has_mdns = true;
        let result = score_record(&record);
        assert_eq!(result.score, 45);
        assert_eq!(result.verdict, Verdict::Moderate);
        assert!(!result.breakdown.applied(PenaltyFactor::NoRelay));
        assert!(!result.breakdown.applied(PenaltyFactor::NoMdns));
    }

    #[test]
    fn test_exposure_flags_are_monotonic() {
        let base = SignalRecord {
            has_relay: true,
            has_mdns: true,
            candidate_count: 1,
            ..Default::default()
        };
        let before = score_record(&base).score;

        let variants = [
            SignalRecord { has_host: true, ..base.clone() },
            SignalRecord { has_server_reflexive: true, ..base.clone() },
            SignalRecord { has_ipv6: true, ..base.clone() },
            SignalRecord { interfaces: interfaces(&[InterfaceClass::Lan]), ..base.clone() },
            SignalRecord { interfaces: interfaces(&[InterfaceClass::Public]), ..base.clone() },
        ];
        for record in variants {
            assert!(score_record(&record).score <= before);
        }

        // from an empty record too
        let empty = score_record(&SignalRecord::empty()).score;
        let host_only = SignalRecord { has_host: true, ..Default::default() };
        assert!(score_record(&host_only).score <= empty);
    }

    #[test]
    fn test_lan_penalty_can_be_disabled() {
        let record = SignalRecord {
            has_relay: true,
            has_mdns: true,
            interfaces: interfaces(&[InterfaceClass::Lan]),
            candidate_count: 1,
            ..Default::default()
        };
        assert_eq!(score_record(&record).score, 90);

        let policy = ExposurePolicy {
            penalties: PenaltyWeights { lan_interface: 0, ..Default::default() },
            ..Default::default()
        };
        let result = score_record_with(&record, &policy);
        assert_eq!(result.score, 100);
        assert!(!result.breakdown.applied(PenaltyFactor::LanInterface));
    }

    #[test]
    fn test_volume_threshold_is_exclusive() {
        let mut record = SignalRecord {
            has_relay: true,
            has_mdns: true,
            candidate_count: 4,
            ..Default::default()
        };
        assert!(!score_record(&record).breakdown.applied(PenaltyFactor::CandidateVolume));
        record.candidate_count = 5;
        assert!(score_record(&record).breakdown.applied(PenaltyFactor::CandidateVolume));
    }

    #[test]
    fn test_custom_thresholds_change_only_verdict() {
        let strict = ExposurePolicy {
            thresholds: VerdictThresholds::strict(),
            ..Default::default()
        };
        let record = SignalRecord {
            has_host: true,
            has_relay: true,
            has_mdns: true,
            candidate_count: 1,
            ..Default::default()
        };
        let default_result = score_record(&record);
        let strict_result = score_record_with(&record, &strict);
        assert_eq!(default_result.score, 85);
        assert_eq!(default_result.score, strict_result.score);
        assert_eq!(default_result.verdict, Verdict::Low);
        assert_eq!(strict_result.verdict, Verdict::Low);

        // 75 sits on the default high threshold but under the strict one
        let record = SignalRecord { has_ipv6: true, ..record };
        assert_eq!(score_record(&record).score, 75);
        assert_eq!(score_record(&record).verdict, Verdict::Low);
        assert_eq!(score_record_with(&record, &strict).verdict, Verdict::Moderate);
    }

    #[test]
    fn test_deterministic() {
        let record = direct_public();
        assert_eq!(score_record(&record), score_record(&record));
    }
}
