//! Symptom analysis models.

use serde::{Deserialize, Serialize};

use super::{ContraindicationReport, InteractionReport, RiskAssessment};

/// A condition suggested by the symptom table, with its accumulated score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionCandidate {
    pub name: String,
    /// +2 per exact symptom key hit, +1 per substring overlap
    pub score: u32,
}

/// Patient input for a triage run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TriageRequest {
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl TriageRequest {
    pub fn new(symptoms: Vec<String>) -> Self {
        Self {
            symptoms,
            ..Default::default()
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.medical_history = history;
        self
    }

    pub fn with_medications(mut self, medications: Vec<String>) -> Self {
        self.medications = medications;
        self
    }
}

/// Result of analyzing a symptom list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomAnalysis {
    /// Top five candidate conditions, best first
    pub possible_conditions: Vec<String>,
    pub recommended_specialization: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub red_flags: Vec<String>,
    /// Always within 0.1 - 0.95
    pub confidence: f64,
    pub explanation: String,
    pub analyzed_symptoms: Vec<String>,
    /// RFC 3339 timestamp
    pub analyzed_at: String,
}

impl SymptomAnalysis {
    pub fn has_red_flags(&self) -> bool {
        !self.red_flags.is_empty()
    }
}

/// Medication checks attached to a triage run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationReview {
    pub interactions: InteractionReport,
    /// One report per medication, checked against the medical history
    pub contraindications: Vec<ContraindicationReport>,
}

impl MedicationReview {
    /// True when any medication is absolutely contraindicated.
    pub fn has_absolute_contraindication(&self) -> bool {
        self.contraindications.iter().any(|c| !c.is_safe)
    }
}

/// Full triage decision for one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriageReport {
    pub analysis: SymptomAnalysis,
    pub risk: RiskAssessment,
    /// Present when the request listed medications
    pub medication_review: Option<MedicationReview>,
}
