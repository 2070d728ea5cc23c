//! Candidate descriptor parser
//!
//! Turns an SDP `candidate:` line into a [`CandidateObservation`]:
//!
//! ```text
//! candidate:<foundation> <component> <transport> <priority> <address> <port> typ <kind> [...]
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::logic::error::ExposureError;
use super::interface::{classify_address, is_ipv6_address, is_mdns_name};
use super::types::{CandidateKind, CandidateObservation};

static CANDIDATE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:a=)?candidate:(?P<foundation>\S+)\s+(?P<component>\d+)\s+(?P<transport>\S+)\s+(?P<priority>\d+)\s+(?P<address>\S+)\s+(?P<port>\d+)\s+typ\s+(?P<typ>\S+)",
    )
    .expect("candidate pattern compiles")
});

/// Parse one descriptor observed `elapsed_ms` after negotiation started
pub fn parse_candidate(
    descriptor: &str,
    sequence: u32,
    elapsed_ms: u64,
) -> Result<CandidateObservation, ExposureError> {
    let line = descriptor.trim();
    let caps = CANDIDATE_LINE
        .captures(line)
        .ok_or_else(|| ExposureError::malformed(format!("not a candidate line: {:?}", line)))?;

    let typ = &caps["typ"];
    let kind = CandidateKind::from_typ(typ)
        .ok_or_else(|| ExposureError::malformed(format!("unknown candidate type: {}", typ)))?;

    if caps["port"].parse::<u16>().is_err() {
        return Err(ExposureError::malformed(format!("port out of range: {}", &caps["port"])));
    }

    let address = caps["address"].to_string();
    let observation = CandidateObservation {
        descriptor: line.to_string(),
        kind,
        is_mdns: is_mdns_name(&address),
        is_ipv6: is_ipv6_address(&address),
        interface: classify_address(&address),
        address,
        sequence,
        elapsed_ms,
    };

    log::debug!(
        "Candidate #{} {} {} ({})",
        sequence,
        observation.kind.as_typ(),
        observation.address,
        observation.interface
    );

    Ok(observation)
}
