//! Exposure Classifier
//!
//! CHỈ chứa logic classify - không có types.
//! Input: Flow (metadata mapping)
//! Output: Vec<Finding>, in fixed key order

use std::collections::BTreeMap;

use serde_json::Value;

use crate::logic::error::ExposureError;
use super::types::{Finding, Flow};

/// Metadata keys that produce findings, in emission order
pub const FINDING_KEYS: [&str; 2] = ["ip", "ice_candidate"];

/// Keys that are understood but never produce a finding
pub const AUXILIARY_KEYS: [&str; 1] = ["protocol"];

// ============================================================================
// MAIN CLASSIFICATION FUNCTION
// ============================================================================

/// Classify one flow
///
/// Pure: same flow in, same findings out. Findings follow `FINDING_KEYS`
/// order, not metadata iteration order.
pub fn analyze(flow: &Flow) -> Result<Vec<Finding>, ExposureError> {
    let metadata = flow
        .metadata
        .as_ref()
        .ok_or_else(|| ExposureError::malformed("flow has no metadata mapping"))?;

    let mut findings = Vec::with_capacity(FINDING_KEYS.len());

    if let Some(ip) = recognized_text(metadata, "ip")? {
        findings.push(Finding::ip_exposure(ip, flow_protocol(flow)));
    }

    if let Some(candidate) = recognized_text(metadata, "ice_candidate")? {
        findings.push(Finding::ice_candidate(candidate));
    }

    for key in metadata.keys() {
        let key = key.as_str();
        if !FINDING_KEYS.contains(&key) && !AUXILIARY_KEYS.contains(&key) {
            log::debug!("Ignoring unknown metadata key '{}'", key);
        }
    }

    Ok(findings)
}

/// Classify many flows, refusing to grow past `max_findings`
pub fn analyze_all(flows: &[Flow], max_findings: usize) -> Result<Vec<Finding>, ExposureError> {
    let mut findings = Vec::new();

    for flow in flows {
        let batch = analyze(flow)?;
        if findings.len() + batch.len() > max_findings {
            log::warn!(
                "Finding cap reached ({}), rejecting flow batch of {}",
                max_findings,
                batch.len()
            );
            return Err(ExposureError::CapacityExceeded {
                what: "finding",
                limit: max_findings,
            });
        }
        findings.extend(batch);
    }

    Ok(findings)
}

/// Value of a recognized key; anything but a string is malformed
fn recognized_text<'a>(
    metadata: &'a BTreeMap<String, Value>,
    key: &str,
) -> Result<Option<&'a str>, ExposureError> {
    match metadata.get(key) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(ExposureError::malformed(format!(
            "metadata key '{}' must be a string, got {}",
            key, other
        ))),
    }
}

/// Transport protocol: explicit flow field first, then metadata
fn flow_protocol(flow: &Flow) -> Option<String> {
    flow.protocol
        .clone()
        .or_else(|| flow.meta("protocol").map(str::to_string))
}

// ============================================================================
// TESTS
// ============================================================================
