//! Scoring Types
//!
//! Verdict, penalty breakdown và score results.
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// VERDICT
// ============================================================================

/// Risk tier; ordered from least to most exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Low,
    Moderate,
    High,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Low => "LOW",
            Verdict::Moderate => "MODERATE",
            Verdict::High => "HIGH",
        }
    }

    /// Status wording used by the presentation layer
    pub fn status_label(&self) -> &'static str {
        match self {
            Verdict::Low => "SAFE",
            Verdict::Moderate => "EXPOSED",
            Verdict::High => "CRITICAL",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            Verdict::Low => 0,
            Verdict::Moderate => 1,
            Verdict::High => 2,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Verdict::Low => "#198754",      // Green
            Verdict::Moderate => "#ffc107", // Yellow
            Verdict::High => "#dc3545",     // Red
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PENALTY BREAKDOWN
// ============================================================================

/// Condition that costs points in the record scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyFactor {
    Host,
    ServerReflexive,
    NoRelay,
    PublicInterface,
    LanInterface,
    MultiInterface,
    Ipv6,
    NoMdns,
    CandidateVolume,
}

impl PenaltyFactor {
    pub fn describe(&self) -> &'static str {
        match self {
            PenaltyFactor::Host => "Host candidate reveals local address",
            PenaltyFactor::ServerReflexive => "Server-reflexive candidate reveals public address",
            PenaltyFactor::NoRelay => "No relay candidate to hide the true address",
            PenaltyFactor::PublicInterface => "Public interface observed",
            PenaltyFactor::LanInterface => "LAN interface observed",
            PenaltyFactor::MultiInterface => "Multiple interface classes can be correlated",
            PenaltyFactor::Ipv6 => "IPv6 address exposed",
            PenaltyFactor::NoMdns => "Host addresses not masked by mDNS",
            PenaltyFactor::CandidateVolume => "Unusually many candidates",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPenalty {
    pub factor: PenaltyFactor,
    pub points: u32,
}

/// How the record score was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub max_score: u32,
    pub penalties: Vec<AppliedPenalty>,
    /// max_score minus every penalty, before the clamp
    pub raw_score: i64,
    pub final_score: u32,
}

impl ScoreBreakdown {
    pub fn total_penalty(&self) -> u64 {
        self.penalties.iter().map(|p| p.points as u64).sum()
    }

    pub fn applied(&self, factor: PenaltyFactor) -> bool {
        self.penalties.iter().any(|p| p.factor == factor)
    }

    pub fn reasons(&self) -> Vec<String> {
        self.penalties
            .iter()
            .map(|p| format!("-{} {}", p.points, p.factor.describe()))
            .collect()
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Record scorer output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordScore {
    pub score: u32,
    pub verdict: Verdict,
    pub breakdown: ScoreBreakdown,
}

/// Finding scorer output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingScore {
    pub score: u32,
    pub verdict: Verdict,
}
