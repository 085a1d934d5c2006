//! Curated clinical knowledge tables.
//!
//! A [`KnowledgeBase`] is built once at startup (compiled-in or loaded from a
//! JSON file), validated, and then shared read-only by every component.

mod builtin;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{Normalizer, TermKind};
use crate::models::InteractionSeverity;

/// Knowledge base loading errors.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("I/O error reading knowledge base: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid knowledge base: {0}")]
    Invalid(String),
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Symptom key and the conditions it suggests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomConditions {
    pub symptom: String,
    pub conditions: Vec<String>,
}

/// Keyword that routes to one or more specializations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordSpecializations {
    pub keyword: String,
    pub specializations: Vec<String>,
}

/// Substring keyword with a 0-100 risk weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightedKeyword {
    pub keyword: String,
    pub weight: u8,
}

/// Age band `[min_age, max_age)` with its risk multiplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgeMultiplierBand {
    pub min_age: u32,
    pub max_age: u32,
    pub multiplier: f64,
}

impl AgeMultiplierBand {
    pub fn contains(&self, age: u32) -> bool {
        self.min_age <= age && age < self.max_age
    }
}

/// Exact-match alias tables, one per term kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AliasTables {
    #[serde(default)]
    pub symptom: BTreeMap<String, String>,
    #[serde(default)]
    pub drug: BTreeMap<String, String>,
    #[serde(default)]
    pub condition: BTreeMap<String, String>,
}

impl AliasTables {
    pub fn for_kind(&self, kind: TermKind) -> &BTreeMap<String, String> {
        match kind {
            TermKind::Symptom => &self.symptom,
            TermKind::Drug => &self.drug,
            TermKind::Condition => &self.condition,
        }
    }
}

/// Interacting partners of one drug. Lookups are directed: only the drug
/// owning the profile is consulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InteractionProfile {
    #[serde(default)]
    pub major: Vec<String>,
    #[serde(default)]
    pub moderate: Vec<String>,
    #[serde(default)]
    pub minor: Vec<String>,
    /// Partner → effect description
    #[serde(default)]
    pub effects: BTreeMap<String, String>,
}

impl InteractionProfile {
    /// Severity of the interaction with `partner`, probing major first.
    pub fn severity_with(&self, partner: &str) -> Option<InteractionSeverity> {
        let listed = |list: &[String]| list.iter().any(|d| d == partner);

        if listed(&self.major) {
            Some(InteractionSeverity::Major)
        } else if listed(&self.moderate) {
            Some(InteractionSeverity::Moderate)
        } else if listed(&self.minor) {
            Some(InteractionSeverity::Minor)
        } else {
            None
        }
    }

    pub fn effect_with(&self, partner: &str) -> Option<&str> {
        self.effects.get(partner).map(String::as_str)
    }
}

/// Conditions under which a drug (or drug class) must not or should
/// cautiously be used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContraindicationProfile {
    #[serde(default)]
    pub absolute: Vec<String>,
    #[serde(default)]
    pub relative: Vec<String>,
}

/// Reference data for drug information lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrugMonograph {
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub monitoring: Vec<String>,
    #[serde(default)]
    pub food_interactions: Vec<String>,
    #[serde(default)]
    pub pregnancy_category: Option<String>,
}

/// Every table the engine consults. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeBase {
    pub symptom_conditions: Vec<SymptomConditions>,
    pub emergency_keywords: Vec<String>,
    pub red_flag_symptoms: Vec<String>,
    pub symptom_specializations: Vec<KeywordSpecializations>,
    pub condition_specializations: Vec<KeywordSpecializations>,
    pub default_specialization: String,
    /// Scanned in order; the first substring hit wins
    pub symptom_weights: Vec<WeightedKeyword>,
    /// Scanned in order; the first substring hit wins
    pub high_risk_conditions: Vec<WeightedKeyword>,
    pub age_bands: Vec<AgeMultiplierBand>,
    pub high_risk_history: Vec<String>,
    #[serde(default)]
    pub aliases: AliasTables,
    /// Directed: drug → interacting partners
    #[serde(default)]
    pub interactions: BTreeMap<String, InteractionProfile>,
    /// Keyed by drug or drug class
    #[serde(default)]
    pub contraindications: BTreeMap<String, ContraindicationProfile>,
    /// Drug → class key into `contraindications`
    #[serde(default)]
    pub drug_classes: BTreeMap<String, String>,
    #[serde(default)]
    pub monographs: BTreeMap<String, DrugMonograph>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    /// Parse and validate a knowledge base from JSON.
    pub fn from_json_str(json: &str) -> KnowledgeResult<Self> {
        let kb: KnowledgeBase = serde_json::from_str(json)?;
        kb.validate()?;
        Ok(kb)
    }

    /// Load and validate a knowledge base from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> KnowledgeResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let kb = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), "Loaded knowledge base");
        Ok(kb)
    }

    /// Load from `TRIAGE_KNOWLEDGE_BASE` when set, otherwise the built-in tables.
    pub fn from_env() -> KnowledgeResult<Self> {
        match crate::config::knowledge_base_path() {
            Some(path) => Self::from_path(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Serialize to pretty JSON (the format `from_json_str` accepts).
    pub fn to_json(&self) -> KnowledgeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural invariants the engine relies on.
    pub fn validate(&self) -> KnowledgeResult<()> {
        for entry in self.symptom_weights.iter().chain(&self.high_risk_conditions) {
            if entry.weight > 100 {
                return Err(KnowledgeError::Invalid(format!(
                    "weight {} for '{}' exceeds 100",
                    entry.weight, entry.keyword
                )));
            }
        }

        let mut bands: Vec<&AgeMultiplierBand> = self.age_bands.iter().collect();
        bands.sort_by_key(|b| b.min_age);
        for band in &bands {
            if band.min_age >= band.max_age {
                return Err(KnowledgeError::Invalid(format!(
                    "empty age band [{}, {})",
                    band.min_age, band.max_age
                )));
            }
            if !band.multiplier.is_finite() || band.multiplier <= 0.0 {
                return Err(KnowledgeError::Invalid(format!(
                    "age band [{}, {}) has multiplier {}",
                    band.min_age, band.max_age, band.multiplier
                )));
            }
        }
        for pair in bands.windows(2) {
            if pair[1].min_age < pair[0].max_age {
                return Err(KnowledgeError::Invalid(format!(
                    "age bands [{}, {}) and [{}, {}) overlap",
                    pair[0].min_age, pair[0].max_age, pair[1].min_age, pair[1].max_age
                )));
            }
        }

        if self.default_specialization.trim().is_empty() {
            return Err(KnowledgeError::Invalid(
                "default specialization is empty".into(),
            ));
        }

        for (class_drug, class) in &self.drug_classes {
            if !self.contraindications.contains_key(class) {
                tracing::debug!(drug = %class_drug, class = %class, "Drug class has no contraindication profile");
            }
        }

        self.validate_aliases()
    }

    /// Alias targets must already be in normal form, or normalization would
    /// stop being idempotent.
    fn validate_aliases(&self) -> KnowledgeResult<()> {
        let normalizer = Normalizer::new(self);

        for kind in [TermKind::Symptom, TermKind::Drug, TermKind::Condition] {
            let table = self.aliases.for_kind(kind);
            for (alias, canonical) in table {
                if table.contains_key(canonical) {
                    return Err(KnowledgeError::Invalid(format!(
                        "{kind} alias '{alias}' points at another alias '{canonical}'"
                    )));
                }
                let renormalized = normalizer.normalize(canonical, kind);
                if &renormalized != canonical {
                    return Err(KnowledgeError::Invalid(format!(
                        "{kind} alias target '{canonical}' is not normalized (normalizes to '{renormalized}')"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Contraindication profile key for a drug's class, if any.
    pub fn drug_class(&self, drug: &str) -> Option<&str> {
        self.drug_classes.get(drug).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_validates() {
        KnowledgeBase::builtin().validate().unwrap();
    }

    #[test]
    fn test_json_round_trip() {
        let kb = KnowledgeBase::builtin();
        let json = kb.to_json().unwrap();
        let loaded = KnowledgeBase::from_json_str(&json).unwrap();
        assert_eq!(loaded, kb);
    }

    #[test]
    fn test_overlapping_age_bands_rejected() {
        let mut kb = KnowledgeBase::builtin();
        kb.age_bands.push(AgeMultiplierBand {
            min_age: 10,
            max_age: 20,
            multiplier: 1.0,
        });
        assert!(matches!(kb.validate(), Err(KnowledgeError::Invalid(_))));
    }

    #[test]
    fn test_nonpositive_multiplier_rejected() {
        let mut kb = KnowledgeBase::builtin();
        kb.age_bands[0].multiplier = 0.0;
        assert!(matches!(kb.validate(), Err(KnowledgeError::Invalid(_))));
    }

    #[test]
    fn test_weight_above_100_rejected() {
        let mut kb = KnowledgeBase::builtin();
        kb.symptom_weights[0].weight = 101;
        assert!(matches!(kb.validate(), Err(KnowledgeError::Invalid(_))));
    }

    #[test]
    fn test_chained_alias_rejected() {
        let mut kb = KnowledgeBase::builtin();
        kb.aliases.drug.insert("ibuprofen".into(), "advil".into());
        assert!(matches!(kb.validate(), Err(KnowledgeError::Invalid(_))));
    }

    #[test]
    fn test_unnormalized_alias_target_rejected() {
        let mut kb = KnowledgeBase::builtin();
        kb.aliases.drug.insert("brandx".into(), "Some Drug".into());
        assert!(matches!(kb.validate(), Err(KnowledgeError::Invalid(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults_for_optional_tables() {
        let json = r#"{
            "symptom_conditions": [],
            "emergency_keywords": [],
            "red_flag_symptoms": [],
            "symptom_specializations": [],
            "condition_specializations": [],
            "default_specialization": "general_medicine",
            "symptom_weights": [{"keyword": "cough", "weight": 40}],
            "high_risk_conditions": [],
            "age_bands": [],
            "high_risk_history": []
        }"#;
        let kb = KnowledgeBase::from_json_str(json).unwrap();
        assert!(kb.interactions.is_empty());
        assert!(kb.aliases.drug.is_empty());
        assert_eq!(kb.symptom_weights[0].weight, 40);
    }

    #[test]
    fn test_interaction_profile_probe_order() {
        let profile = InteractionProfile {
            major: vec!["x".into()],
            moderate: vec!["x".into(), "y".into()],
            minor: vec!["z".into()],
            effects: BTreeMap::new(),
        };
        assert_eq!(profile.severity_with("x"), Some(InteractionSeverity::Major));
        assert_eq!(profile.severity_with("y"), Some(InteractionSeverity::Moderate));
        assert_eq!(profile.severity_with("z"), Some(InteractionSeverity::Minor));
        assert_eq!(profile.severity_with("w"), None);
    }

    #[test]
    fn test_age_band_upper_bound_exclusive() {
        let band = AgeMultiplierBand {
            min_age: 65,
            max_age: 80,
            multiplier: 1.2,
        };
        assert!(band.contains(65));
        assert!(band.contains(79));
        assert!(!band.contains(80));
    }
}
