//! Exposure Types
//!
//! Flow input và Finding output cho classifier.
//! KHÔNG chứa logic - chỉ data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// FLOW
// ============================================================================

/// Flow-like record handed over by the capture side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Absent (or null) metadata marks a malformed flow; empty is clean.
    /// Values are arbitrary JSON; only recognized keys must be strings.
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, Value>>,
}

impl Flow {
    /// Flow with an empty metadata mapping
    pub fn new(protocol: &str) -> Self {
        Self {
            protocol: Some(protocol.to_string()),
            metadata: Some(BTreeMap::new()),
        }
    }

    /// Add a string metadata entry
    pub fn with_meta(self, key: &str, value: &str) -> Self {
        self.with_meta_value(key, Value::String(value.to_string()))
    }

    /// Add a metadata entry of any JSON type
    pub fn with_meta_value(mut self, key: &str, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value);
        self
    }

    /// String value of a metadata key; None when absent or not a string
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key)?.as_str()
    }
}

// ============================================================================
// FINDING
// ============================================================================

/// Exposure categories the classifier knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingType {
    IpExposure,
    IceCandidate,
}

impl FindingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingType::IpExposure => "IP_EXPOSURE",
            FindingType::IceCandidate => "ICE_CANDIDATE",
        }
    }
}

impl std::fmt::Display for FindingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outbound,
    Inbound,
}

/// One classified exposure instance. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Finding {
    pub fn ip_exposure(ip: &str, protocol: Option<String>) -> Self {
        Self {
            finding_type: FindingType::IpExposure,
            value: ip.to_string(),
            protocol,
            direction: Some(Direction::Outbound),
        }
    }

    pub fn ice_candidate(candidate: &str) -> Self {
        Self {
            finding_type: FindingType::IceCandidate,
            value: candidate.to_string(),
            protocol: None,
            direction: None,
        }
    }
}
