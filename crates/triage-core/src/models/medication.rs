//! Drug interaction and contraindication models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// Severity of a co-administration interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionSeverity {
    Major,
    Moderate,
    /// Only present in configured tables; the built-in table has none
    Minor,
}

impl InteractionSeverity {
    /// Points contributed to the interaction risk score.
    pub fn score(&self) -> u32 {
        match self {
            InteractionSeverity::Major => 30,
            InteractionSeverity::Moderate => 15,
            InteractionSeverity::Minor => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionSeverity::Major => "major",
            InteractionSeverity::Moderate => "moderate",
            InteractionSeverity::Minor => "minor",
        }
    }

    /// Effect text used when the table has no specific effect for a pair.
    pub fn default_effect(&self) -> &'static str {
        match self {
            InteractionSeverity::Major => "Significant interaction",
            InteractionSeverity::Moderate => "Moderate interaction",
            InteractionSeverity::Minor => "Minor interaction",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            InteractionSeverity::Major => "Avoid combination or monitor closely",
            InteractionSeverity::Moderate | InteractionSeverity::Minor => {
                "Monitor for adverse effects"
            }
        }
    }
}

impl fmt::Display for InteractionSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected interaction. `drug_a` is the drug whose table entry matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: InteractionSeverity,
    pub effect: String,
    pub recommendation: String,
}

/// Severity of a drug-condition contraindication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContraindicationSeverity {
    Absolute,
    Relative,
}

impl ContraindicationSeverity {
    pub fn score(&self) -> u32 {
        match self {
            ContraindicationSeverity::Absolute => 50,
            ContraindicationSeverity::Relative => 25,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContraindicationSeverity::Absolute => "absolute",
            ContraindicationSeverity::Relative => "relative",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            ContraindicationSeverity::Absolute => "Do not use this medication",
            ContraindicationSeverity::Relative => "Use with caution and close monitoring",
        }
    }

    pub fn risk_description(&self) -> &'static str {
        match self {
            ContraindicationSeverity::Absolute => "High risk of serious adverse effects",
            ContraindicationSeverity::Relative => "Increased risk of adverse effects",
        }
    }
}

impl fmt::Display for ContraindicationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched contraindication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContraindicationRecord {
    /// Drug or drug class whose table entry matched
    pub drug_or_class: String,
    pub condition: String,
    pub severity: ContraindicationSeverity,
    pub recommendation: String,
    pub risk_description: String,
}

/// Result of checking a medication list for pairwise interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionReport {
    pub interactions: Vec<InteractionRecord>,
    /// Summed severity points, capped at 100
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub total_medications: usize,
    pub checked_at: String,
}

impl InteractionReport {
    pub fn has_major(&self) -> bool {
        self.interactions
            .iter()
            .any(|i| i.severity == InteractionSeverity::Major)
    }
}

/// Result of checking one medication against patient conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContraindicationReport {
    /// Medication as supplied by the caller
    pub medication: String,
    pub contraindications: Vec<ContraindicationRecord>,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    /// False iff at least one absolute contraindication matched
    pub is_safe: bool,
    pub checked_at: String,
}

/// Reference information for a single drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugInfo {
    pub name: String,
    pub normalized_name: String,
    /// "Unknown" when the drug has no registered class
    pub drug_class: String,
    pub common_side_effects: Vec<String>,
    pub monitoring_parameters: Vec<String>,
    pub food_interactions: Vec<String>,
    pub pregnancy_category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_points() {
        assert_eq!(InteractionSeverity::Major.score(), 30);
        assert_eq!(InteractionSeverity::Moderate.score(), 15);
        assert_eq!(InteractionSeverity::Minor.score(), 5);
    }

    #[test]
    fn test_contraindication_points() {
        assert_eq!(ContraindicationSeverity::Absolute.score(), 50);
        assert_eq!(ContraindicationSeverity::Relative.score(), 25);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&InteractionSeverity::Major).unwrap(),
            "\"major\""
        );
        let parsed: ContraindicationSeverity = serde_json::from_str("\"relative\"").unwrap();
        assert_eq!(parsed, ContraindicationSeverity::Relative);
    }
}
