//! Scoring Rules & Thresholds
//!
//! Định nghĩa weights và thresholds cho cả hai scorer.
//! KHÔNG chứa logic score - chỉ constants và config structs.

use serde::{Deserialize, Serialize};

use crate::logic::exposure::FindingType;

// ============================================================================
// FINDING WEIGHTS (Finding-based scorer)
// ============================================================================

/// Points per IP_EXPOSURE finding
pub const IP_EXPOSURE_POINTS: u32 = 20;

/// Points per ICE_CANDIDATE finding
pub const ICE_CANDIDATE_POINTS: u32 = 15;

/// Upper bound of the finding-based score
pub const FINDING_SCORE_CEILING: u32 = 100;

pub fn finding_points(finding_type: FindingType) -> u32 {
    match finding_type {
        FindingType::IpExposure => IP_EXPOSURE_POINTS,
        FindingType::IceCandidate => ICE_CANDIDATE_POINTS,
    }
}

// ============================================================================
// RECORD PENALTIES (Signal-Record scorer)
// ============================================================================

pub const DEFAULT_MAX_SCORE: u32 = 100;

pub const HOST_PENALTY: u32 = 15;
pub const SERVER_REFLEXIVE_PENALTY: u32 = 20;
pub const NO_RELAY_PENALTY: u32 = 15;
pub const PUBLIC_INTERFACE_PENALTY: u32 = 20;
pub const LAN_INTERFACE_PENALTY: u32 = 10;
pub const MULTI_INTERFACE_PENALTY: u32 = 10;
pub const IPV6_PENALTY: u32 = 10;
pub const NO_MDNS_PENALTY: u32 = 5;
pub const VOLUME_PENALTY: u32 = 5;

/// More candidates than this = volume penalty
pub const DEFAULT_VOLUME_THRESHOLD: u32 = 4;

// ============================================================================
// VERDICT THRESHOLDS
// ============================================================================

/// Record score at or above this = LOW risk
pub const DEFAULT_HIGH_THRESHOLD: u32 = 75;

/// Record score at or above this = MODERATE, below = HIGH risk
pub const DEFAULT_LOW_THRESHOLD: u32 = 45;

/// Finding score at or below this = LOW risk
pub const FINDING_LOW_THRESHOLD: u32 = 0;

/// Finding score at or below this = MODERATE, above = HIGH risk
pub const FINDING_HIGH_THRESHOLD: u32 = 39;

// ============================================================================
// CONFIGURABLE WEIGHTS
// ============================================================================

/// Per-factor penalty weights for the record scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PenaltyWeights {
    pub host: u32,
    pub server_reflexive: u32,
    pub no_relay: u32,
    pub public_interface: u32,
    /// 0 disables the dual-interface LAN penalty
    pub lan_interface: u32,
    pub multi_interface: u32,
    pub ipv6: u32,
    pub no_mdns: u32,
    pub volume: u32,
    pub volume_threshold: u32,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            host: HOST_PENALTY,
            server_reflexive: SERVER_REFLEXIVE_PENALTY,
            no_relay: NO_RELAY_PENALTY,
            public_interface: PUBLIC_INTERFACE_PENALTY,
            lan_interface: LAN_INTERFACE_PENALTY,
            multi_interface: MULTI_INTERFACE_PENALTY,
            ipv6: IPV6_PENALTY,
            no_mdns: NO_MDNS_PENALTY,
            volume: VOLUME_PENALTY,
            volume_threshold: DEFAULT_VOLUME_THRESHOLD,
        }
    }
}

impl PenaltyWeights {
    /// Weights as (field name, value), volume_threshold excluded
    pub fn named(&self) -> [(&'static str, u32); 9] {
        [
            ("host", self.host),
            ("server_reflexive", self.server_reflexive),
            ("no_relay", self.no_relay),
            ("public_interface", self.public_interface),
            ("lan_interface", self.lan_interface),
            ("multi_interface", self.multi_interface),
            ("ipv6", self.ipv6),
            ("no_mdns", self.no_mdns),
            ("volume", self.volume),
        ]
    }
}

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

/// Which end of the scale is safe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdDirection {
    /// `>= high` is LOW risk (record scorer)
    #[default]
    HigherIsSafer,
    /// `<= low` is LOW risk (finding scorer)
    LowerIsSafer,
}

/// Two-threshold verdict mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerdictThresholds {
    pub low: u32,
    pub high: u32,
    #[serde(default)]
    pub direction: ThresholdDirection,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
            direction: ThresholdDirection::HigherIsSafer,
        }
    }
}

impl VerdictThresholds {
    /// Risk-point convention of the finding scorer
    pub fn for_findings() -> Self {
        Self {
            low: FINDING_LOW_THRESHOLD,
            high: FINDING_HIGH_THRESHOLD,
            direction: ThresholdDirection::LowerIsSafer,
        }
    }

    /// Strict - fewer records reach LOW
    pub fn strict() -> Self {
        Self {
            low: 60,
            high: 85,
            ..Default::default()
        }
    }

    /// Relaxed - more records reach LOW
    pub fn relaxed() -> Self {
        Self {
            low: 35,
            high: 65,
            ..Default::default()
        }
    }
}
