//! Risk assessment models shared by the scorer and the medication checks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete risk tier derived from a clamped 0-100 score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Tier for a composite symptom risk score.
    ///
    /// Never yields `Minimal`: the symptom scale bottoms out at `Low`.
    pub fn from_assessment_score(score: u8) -> Self {
        if score >= 80 {
            RiskLevel::Critical
        } else if score >= 60 {
            RiskLevel::High
        } else if score >= 40 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Tier for an interaction or contraindication score.
    pub fn from_medication_score(score: u8) -> Self {
        if score >= 70 {
            RiskLevel::Critical
        } else if score >= 50 {
            RiskLevel::High
        } else if score >= 30 {
            RiskLevel::Medium
        } else if score > 0 {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "minimal",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// High and critical share the cautious general advice.
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How soon the patient should be seen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Routine,
    SemiUrgent,
    Urgent,
    Emergency,
}

impl Urgency {
    /// Urgency for a score. Any red flag forces `Emergency`, even at score 0.
    pub fn from_score(score: u8, has_red_flags: bool) -> Self {
        if has_red_flags || score >= 85 {
            Urgency::Emergency
        } else if score >= 70 {
            Urgency::Urgent
        } else if score >= 50 {
            Urgency::SemiUrgent
        } else {
            Urgency::Routine
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Routine => "routine",
            Urgency::SemiUrgent => "semi_urgent",
            Urgency::Urgent => "urgent",
            Urgency::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Breakdown of the factors that produced a composite score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFactors {
    /// Averaged symptom weight after the symptom-count multiplier (0 - 100)
    pub symptom_risk: f64,
    /// Highest weight among candidate conditions (0 - 100)
    pub condition_risk: f64,
    pub age_multiplier: f64,
    pub history_multiplier: f64,
    /// 20 points per red flag
    pub red_flag_bonus: u32,
}

/// Terminal output of the risk scorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    /// Composite score, clamped to 0 - 100
    pub score: u8,
    pub level: RiskLevel,
    pub urgency: Urgency,
    /// Absent on the fallback assessment
    pub factors: Option<RiskFactors>,
    pub recommendations: Vec<String>,
    /// RFC 3339 timestamp
    pub calculated_at: String,
}

impl RiskAssessment {
    /// Fixed medium-risk assessment returned when scoring cannot complete.
    pub fn fallback() -> Self {
        Self {
            score: 50,
            level: RiskLevel::Medium,
            urgency: Urgency::Routine,
            factors: None,
            recommendations: vec!["Consult healthcare provider for evaluation".into()],
            calculated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Direction of a risk trend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendKind {
    InsufficientData,
    Increasing,
    Decreasing,
    Stable,
}

impl TrendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendKind::InsufficientData => "insufficient_data",
            TrendKind::Increasing => "increasing",
            TrendKind::Decreasing => "decreasing",
            TrendKind::Stable => "stable",
        }
    }
}

/// Clinical reading of a trend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Worsening,
    Improving,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Worsening => "worsening",
            TrendDirection::Improving => "improving",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Trend over a caller-supplied series of risk scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskTrend {
    pub trend: TrendKind,
    pub direction: TrendDirection,
    /// The window the trend was computed on (last five scores)
    pub recent_scores: Vec<u8>,
    pub average_score: Option<f64>,
}
