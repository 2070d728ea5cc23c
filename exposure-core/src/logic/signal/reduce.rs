//! Observation reducer
//!
//! Single pure pass over a finished observation sequence. The booleans are
//! OR-accumulated, so once a flag is set no later candidate can clear it.

use super::types::{CandidateKind, CandidateObservation, SignalRecord};

/// Build the frozen record for a closed window
pub fn reduce(observations: &[CandidateObservation]) -> SignalRecord {
    observations
        .iter()
        .fold(SignalRecord::empty(), |mut record, obs| {
            absorb(&mut record, obs);
            record
        })
}

fn absorb(record: &mut SignalRecord, obs: &CandidateObservation) {
    match obs.kind {
        CandidateKind::Host => record.has_host = true,
        CandidateKind::ServerReflexive => record.has_server_reflexive = true,
        CandidateKind::Relay => record.has_relay = true,
        CandidateKind::PeerReflexive => {}
    }

    record.has_ipv6 |= obs.is_ipv6;
    record.has_mdns |= obs.is_mdns;

    if obs.kind.reveals_local_interface() && obs.interface.is_known() {
        record.interfaces.insert(obs.interface);
    }

    record.candidate_count = record.candidate_count.saturating_add(1);
}
