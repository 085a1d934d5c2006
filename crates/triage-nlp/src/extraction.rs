//! Annotation types and conversion into engine requests.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use triage_core::TriageRequest;

use crate::annotator::is_known_term;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Symptom,
    Medication,
    Condition,
    BodyPart,
}

/// Which rule produced an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySource {
    DirectSymptom,
    PainLocation,
    DurationSymptom,
    SeveritySymptom,
    CurrentMedication,
    MedicationAllergy,
    DiscontinuedMedication,
    MedicalCondition,
    FamilyHistory,
    SurgicalHistory,
    Dictionary,
    FuzzyDictionary,
}

impl EntitySource {
    /// Mentions that describe something the patient does not currently have or take.
    pub fn is_excluded_from_request(self) -> bool {
        matches!(
            self,
            Self::MedicationAllergy | Self::DiscontinuedMedication | Self::FamilyHistory
        )
    }
}

/// An extracted mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Text as it appeared after preprocessing.
    pub text: String,
    pub kind: EntityKind,
    pub source: EntitySource,
    /// In [0, 1].
    pub confidence: f64,
    /// Canonical dictionary term when one matched, otherwise the cleaned phrase.
    pub normalized: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityCategory {
    Severe,
    Moderate,
    Mild,
    Urgent,
    Chronic,
}

impl SeverityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Severe => "severe",
            Self::Moderate => "moderate",
            Self::Mild => "mild",
            Self::Urgent => "urgent",
            Self::Chronic => "chronic",
        }
    }

    /// Severe, moderate and mild grade intensity; the rest grade urgency.
    pub fn is_intensity(&self) -> bool {
        matches!(self, Self::Severe | Self::Moderate | Self::Mild)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityKeyword {
    pub keyword: String,
    pub category: SeverityCategory,
    pub confidence: f64,
}

/// Severity and urgency indicators found in the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityInfo {
    pub severity_level: Option<SeverityCategory>,
    pub urgency_level: Option<SeverityCategory>,
    pub keywords: Vec<SeverityKeyword>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    Duration,
    Frequency,
    Onset,
    Interval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalMention {
    pub kind: TemporalKind,
    pub text: String,
    pub value: String,
    pub unit: Option<String>,
}

/// Everything extracted from one piece of free text.
///
/// Entity lists are deduplicated by `(normalized, kind)` and sorted by
/// descending confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub original_text: String,
    pub processed_text: String,
    pub symptoms: Vec<Entity>,
    pub medications: Vec<Entity>,
    pub conditions: Vec<Entity>,
    pub body_parts: Vec<Entity>,
    pub temporal: Vec<TemporalMention>,
    pub severity: SeverityInfo,
    pub age: Option<u32>,
    pub annotated_at: String,
}

impl Annotation {
    /// Build the engine request for this text.
    ///
    /// Allergies, discontinued drugs and family history are left out. A
    /// condition capture that merely repeats a symptom is dropped unless it
    /// names a known condition, and a symptom capture naming a known
    /// condition that is not also a symptom is dropped.
    pub fn to_triage_request(&self) -> TriageRequest {
        let symptoms = unique(
            self.symptoms
                .iter()
                .filter(|e| {
                    is_known_term(&e.normalized, EntityKind::Symptom)
                        || !is_known_term(&e.normalized, EntityKind::Condition)
                })
                .map(|e| e.normalized.clone()),
        );

        let symptom_set: HashSet<&str> = symptoms.iter().map(String::as_str).collect();

        let medications = unique(
            self.medications
                .iter()
                .filter(|e| !e.source.is_excluded_from_request())
                .map(|e| e.normalized.clone()),
        );

        let history = unique(
            self.conditions
                .iter()
                .filter(|e| !e.source.is_excluded_from_request())
                .filter(|e| {
                    !symptom_set.contains(e.normalized.as_str())
                        || is_known_term(&e.normalized, EntityKind::Condition)
                })
                .map(|e| e.normalized.clone()),
        );

        let mut request = TriageRequest::new(symptoms)
            .with_history(history)
            .with_medications(medications);
        request.age = self.age;
        request
    }
}

/// Structured output of an external annotator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalAnnotation {
    pub symptoms: Vec<String>,
    pub medications: Vec<String>,
    pub conditions: Vec<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

impl ExternalAnnotation {
    pub fn to_triage_request(&self) -> TriageRequest {
        let clean = |items: &[String]| {
            unique(
                items
                    .iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            )
        };

        let mut request = TriageRequest::new(clean(&self.symptoms))
            .with_history(clean(&self.conditions))
            .with_medications(clean(&self.medications));
        request.age = self.age;
        request.gender = self.gender.clone();
        request
    }
}

/// Parse annotator output JSON, tolerating prose around the object.
pub fn parse_annotator_output(output: &str) -> ExtractionResult<ExternalAnnotation> {
    let json_start = output.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = output.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let annotation: ExternalAnnotation = serde_json::from_str(&output[json_start..=json_end])?;
    Ok(annotation)
}

fn unique(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}
