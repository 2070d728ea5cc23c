//! Simulation datasets
//!
//! Canned capture results for tests and demos, selected by dataset key.
//! Each fixture is built from real candidate lines through the same parser
//! and reducer as live capture.
//!
//! | key               | default score | verdict  |
//! |-------------------|---------------|----------|
//! | `clean`           | 100           | LOW      |
//! | `relay_only`      | 95            | LOW      |
//! | `mdns_masked`     | 45            | MODERATE |
//! | `direct_public`   | 25            | HIGH     |
//! | `dual_stack_leak` | 0             | HIGH     |

use crate::logic::exposure::Flow;
use crate::logic::policy::PolicyError;
use crate::logic::signal::{parse_candidate, reduce, CandidateObservation, DeviceContext, SignalRecord};

/// Recognized dataset keys
pub const DATASETS: [&str; 5] = [
    "clean",
    "relay_only",
    "mdns_masked",
    "direct_public",
    "dual_stack_leak",
];

pub fn is_known(key: &str) -> bool {
    DATASETS.contains(&key)
}

/// Candidate lines a dataset "observed", in arrival order
pub fn descriptors(key: &str) -> Result<&'static [&'static str], PolicyError> {
    let lines: &'static [&'static str] = match key {
        "clean" => &[],
        "relay_only" => &[
            "candidate:3 1 udp 41885439 198.51.100.9 3478 typ relay raddr 0.0.0.0 rport 0",
        ],
        "mdns_masked" => &[
            "candidate:1 1 udp 2122260223 3f1c6a2e-9b7d-4c1e-8f2a-5d6e7f8a9b0c.local 54400 typ host",
            "candidate:2 1 udp 1686052607 198.51.100.23 61000 typ srflx raddr 0.0.0.0 rport 0",
            "candidate:3 1 udp 41885439 192.0.2.50 3478 typ relay raddr 198.51.100.23 rport 61000",
        ],
        "direct_public" => &[
            "candidate:1 1 udp 2122260223 203.0.113.7 54400 typ host",
            "candidate:2 1 udp 1686052607 203.0.113.7 54400 typ srflx raddr 203.0.113.7 rport 54400",
        ],
        "dual_stack_leak" => &[
            "candidate:1 1 udp 2122260223 192.168.1.20 54400 typ host",
            "candidate:2 1 udp 2122262783 2001:db8::1a 54401 typ host",
            "candidate:3 1 udp 2122194687 10.0.0.7 54402 typ host",
            "candidate:4 1 udp 1686052607 203.0.113.7 61000 typ srflx raddr 192.168.1.20 rport 54400",
            "candidate:5 1 udp 1686054655 2001:db8::1a 61001 typ srflx raddr 2001:db8::1a rport 54401",
            "candidate:1 2 udp 2122260222 192.168.1.20 54403 typ host",
        ],
        other => return Err(PolicyError::UnknownDataset(other.to_string())),
    };
    Ok(lines)
}

/// Observation sequence for a dataset (20 ms apart)
pub fn observations(key: &str) -> Result<Vec<CandidateObservation>, PolicyError> {
    descriptors(key)?
        .iter()
        .enumerate()
        .map(|(i, line)| {
            parse_candidate(line, i as u32, (i as u64 + 1) * 20).map_err(|e| {
                PolicyError::InvalidField {
                    field: format!("simulation.{}", key),
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// Frozen record for a dataset
pub fn fixture(key: &str) -> Result<SignalRecord, PolicyError> {
    let record = reduce(&observations(key)?);

    let record = match key {
        "dual_stack_leak" => record
            .with_device(DeviceContext {
                core_count: Some(8),
                memory_gb: Some(8.0),
                pixel_ratio: Some(2.0),
                timezone_offset_min: Some(-120),
            })
            .with_jitter(vec![4.0, 9.5, 3.5, 12.0, 6.0]),
        "direct_public" => record.with_jitter(vec![2.0, 2.5, 3.0]),
        _ => record,
    };

    Ok(record)
}

/// Canned flows for the finding-based path
pub fn mock_flows() -> Vec<Flow> {
    vec![
        Flow::new("udp").with_meta("ip", "203.0.113.7"),
        Flow::new("udp")
            .with_meta("ice_candidate", "candidate:2 1 udp 1686052607 203.0.113.7 61000 typ srflx"),
        Flow::new("tcp").with_meta("codec", "opus"),
    ]
}
