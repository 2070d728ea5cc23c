//! Signal Types
//!
//! Data contract for one observation pass.
//! KHÔNG chứa logic reduce - chỉ data structures và accessors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::logic::error::ExposureError;

// ============================================================================
// INTERFACE CLASS
// ============================================================================

/// Where an observed address lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterfaceClass {
    /// RFC 1918 private range
    Lan,
    /// Routable address
    Public,
    /// Opaque name or unparsable address
    Unknown,
}

impl InterfaceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceClass::Lan => "LAN",
            InterfaceClass::Public => "PUBLIC",
            InterfaceClass::Unknown => "UNKNOWN",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, InterfaceClass::Unknown)
    }
}

impl std::fmt::Display for InterfaceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CANDIDATE KIND
// ============================================================================

/// ICE candidate type (`typ` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Host,
    ServerReflexive,
    PeerReflexive,
    Relay,
}

impl CandidateKind {
    /// Parse the SDP `typ` token
    pub fn from_typ(typ: &str) -> Option<Self> {
        match typ.to_ascii_lowercase().as_str() {
            "host" => Some(CandidateKind::Host),
            "srflx" => Some(CandidateKind::ServerReflexive),
            "prflx" => Some(CandidateKind::PeerReflexive),
            "relay" => Some(CandidateKind::Relay),
            _ => None,
        }
    }

    pub fn as_typ(&self) -> &'static str {
        match self {
            CandidateKind::Host => "host",
            CandidateKind::ServerReflexive => "srflx",
            CandidateKind::PeerReflexive => "prflx",
            CandidateKind::Relay => "relay",
        }
    }

    /// Relay addresses belong to the relay server, not to this device
    pub fn reveals_local_interface(&self) -> bool {
        !matches!(self, CandidateKind::Relay)
    }
}

// ============================================================================
// CANDIDATE OBSERVATION
// ============================================================================

/// One network path descriptor seen during negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateObservation {
    /// Raw descriptor as delivered by the capture side
    pub descriptor: String,
    pub kind: CandidateKind,
    /// Connection address (IP literal or mDNS name)
    pub address: String,
    pub is_mdns: bool,
    pub is_ipv6: bool,
    pub interface: InterfaceClass,
    /// Position in the observation sequence
    pub sequence: u32,
    /// Milliseconds since negotiation start
    pub elapsed_ms: u64,
}

// ============================================================================
// DEVICE CONTEXT
// ============================================================================

/// Optional fingerprint fields reported alongside the candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_count: Option<u32>,
    /// Device memory estimate (GB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_ratio: Option<f32>,
    /// Minutes from UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_offset_min: Option<i32>,
}

impl DeviceContext {
    pub fn is_empty(&self) -> bool {
        self.core_count.is_none()
            && self.memory_gb.is_none()
            && self.pixel_ratio.is_none()
            && self.timezone_offset_min.is_none()
    }
}

// ============================================================================
// SIGNAL RECORD
// ============================================================================

/// Frozen aggregate of one negotiation attempt - the scorer's input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalRecord {
    pub has_relay: bool,
    pub has_server_reflexive: bool,
    pub has_host: bool,
    pub has_ipv6: bool,
    pub has_mdns: bool,
    pub interfaces: BTreeSet<InterfaceClass>,
    #[serde(default)]
    pub candidate_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceContext>,
    /// Timing jitter samples (ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter_samples: Option<Vec<f64>>,
}

impl SignalRecord {
    /// Record of a window that saw nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a record handed over by an external capture collaborator
    pub fn from_json(json: &str) -> Result<Self, ExposureError> {
        let record: SignalRecord = serde_json::from_str(json)
            .map_err(|e| ExposureError::malformed(format!("signal record: {}", e)))?;
        record.validate()?;
        Ok(record)
    }

    /// Structural checks that serde cannot express
    pub fn validate(&self) -> Result<(), ExposureError> {
        if self.interfaces.contains(&InterfaceClass::Unknown) {
            return Err(ExposureError::malformed(
                "interfaces may only contain LAN or PUBLIC",
            ));
        }
        if let Some(samples) = &self.jitter_samples {
            if samples.iter().any(|s| !s.is_finite()) {
                return Err(ExposureError::malformed("jitter samples must be finite"));
            }
        }
        Ok(())
    }

    /// Attach device context
    pub fn with_device(mut self, device: DeviceContext) -> Self {
        self.device = if device.is_empty() { None } else { Some(device) };
        self
    }

    /// Attach timing jitter samples
    pub fn with_jitter(mut self, samples: Vec<f64>) -> Self {
        self.jitter_samples = if samples.is_empty() { None } else { Some(samples) };
        self
    }

    pub fn has_interface(&self, class: InterfaceClass) -> bool {
        self.interfaces.contains(&class)
    }

    /// True when no signal flag is set and no interface was classified;
    /// `candidate_count` alone does not count as an observation
    pub fn is_empty_observation(&self) -> bool {
        self.interfaces.is_empty()
            && !self.has_relay
            && !self.has_server_reflexive
            && !self.has_host
            && !self.has_ipv6
            && !self.has_mdns
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_kind_from_typ() {
        assert_eq!(CandidateKind::from_typ("host"), Some(CandidateKind::Host));
        assert_eq!(CandidateKind::from_typ("SRFLX"), Some(CandidateKind::ServerReflexive));
        assert_eq!(CandidateKind::from_typ("relay"), Some(CandidateKind::Relay));
        assert_eq!(CandidateKind::from_typ("bogus"), None);
        assert!(!CandidateKind::Relay.reveals_local_interface());
    }

    #[test]
    fn test_record_json_roundtrip_names() {
        let json = r#"{
            "has_relay": false,
            "has_server_reflexive": true,
            "has_host": true,
            "has_ipv6": false,
            "has_mdns": false,
            "interfaces": ["PUBLIC"]
        }"#;
        let record = SignalRecord::from_json(json).unwrap();
        assert!(record.has_interface(InterfaceClass::Public));
        assert_eq!(record.candidate_count, 0);
        assert!(record.device.is_none());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["interfaces"][0], "PUBLIC");
        assert!(value.get("jitter_samples").is_none());
    }

    #[test]
    fn test_record_rejects_unknown_and_missing_fields() {
        let unknown = r#"{"has_relay": false, "has_server_reflexive": false, "has_host": false,
            "has_ipv6": false, "has_mdns": false, "interfaces": [], "battery": 40}"#;
        assert!(SignalRecord::from_json(unknown).unwrap_err().is_malformed());

        let missing = r#"{"has_relay": false, "interfaces": []}"#;
        assert!(SignalRecord::from_json(missing).unwrap_err().is_malformed());
    }

    #[test]
    fn test_record_rejects_unknown_interface_class() {
        let json = r#"{"has_relay": false, "has_server_reflexive": false, "has_host": true,
            "has_ipv6": false, "has_mdns": false, "interfaces": ["UNKNOWN"]}"#;
        assert!(SignalRecord::from_json(json).is_err());
    }

    #[test]
    fn test_empty_observation() {
        assert!(SignalRecord::empty().is_empty_observation());

        let relay = SignalRecord { has_relay: true, ..Default::default() };
        assert!(!relay.is_empty_observation());

        let counted = SignalRecord { candidate_count: 3, ..Default::default() };
        assert!(counted.is_empty_observation());

        let lan = SignalRecord {
            interfaces: [InterfaceClass::Lan].into_iter().collect(),
            ..Default::default()
        };
        assert!(!lan.is_empty_observation());
    }

    #[test]
    fn test_builders_drop_empty_context() {
        let record = SignalRecord::empty()
            .with_device(DeviceContext::default())
            .with_jitter(vec![]);
        assert!(record.device.is_none());
        assert!(record.jitter_samples.is_none());

        let record = SignalRecord::empty()
            .with_device(DeviceContext { core_count: Some(8), ..Default::default() })
            .with_jitter(vec![1.0, 2.0]);
        assert_eq!(record.device.unwrap().core_count, Some(8));
        assert_eq!(record.jitter_samples.unwrap().len(), 2);
    }
}
