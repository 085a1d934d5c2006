//! Triage Core Library
//!
//! Rule-based clinical triage: symptom analysis, composite risk scoring and
//! medication safety checks over a curated, immutable knowledge base.
//!
//! # Architecture
//!
//! ```text
//! Symptoms ──► Normalizer ──┬──► Condition Inference ──┐
//!                           │                          ├──► Specialization Mapper
//!          (raw text) ──────┴──► Red-Flag Detector ────┤
//!                                                      ▼
//!                          age, history ──────────► Risk Scorer ──► Recommendations
//!
//! Medications ──► Normalizer ──► Interaction Matrix / Contraindications
//! ```
//!
//! # Core Principle
//!
//! **Every operation is total.** Malformed input is normalized, never
//! rejected; a numeric fault while scoring yields a fixed medium-risk
//! assessment marked as degraded.
//!
//! # Modules
//!
//! - [`knowledge`]: Clinical tables (built-in or loaded from JSON)
//! - [`engine`]: Normalizer, condition inference, red flags, risk scorer
//! - [`medication`]: Drug interactions, contraindications, drug information
//! - [`models`]: Domain types (TriageRequest, RiskAssessment, etc.)
//! - [`config`]: Constants, environment lookups and logging setup

pub mod config;
pub mod engine;
pub mod knowledge;
pub mod medication;
pub mod models;

// Re-export commonly used types
pub use engine::{Engine, Normalizer, ScoringError, TermKind};
pub use knowledge::{KnowledgeBase, KnowledgeError};
pub use models::{
    ContraindicationReport, DrugInfo, InteractionReport, Outcome, RiskAssessment, RiskLevel,
    RiskTrend, SymptomAnalysis, TriageReport, TriageRequest, Urgency,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TriageError {
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<knowledge::KnowledgeError> for TriageError {
    fn from(e: knowledge::KnowledgeError) -> Self {
        TriageError::KnowledgeBase(e.to_string())
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(e: serde_json::Error) -> Self {
        TriageError::Serialization(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open an engine over `TRIAGE_KNOWLEDGE_BASE`, or the built-in tables.
#[uniffi::export]
pub fn open_engine() -> Result<Arc<TriageCore>, TriageError> {
    Ok(Arc::new(TriageCore {
        engine: Engine::from_env()?,
    }))
}

/// Open an engine over a JSON knowledge base file.
#[uniffi::export]
pub fn open_engine_from_path(path: String) -> Result<Arc<TriageCore>, TriageError> {
    Ok(Arc::new(TriageCore {
        engine: Engine::from_path(&path)?,
    }))
}

/// Install the log subscriber. Returns false if one is already installed.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    config::init_tracing(filter.as_deref())
}

#[uniffi::export]
pub fn core_version() -> String {
    config::APP_VERSION.to_string()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe engine wrapper for FFI.
#[derive(uniffi::Object)]
pub struct TriageCore {
    engine: Engine,
}

#[uniffi::export]
impl TriageCore {
    // =========================================================================
    // Symptom Operations
    // =========================================================================

    /// Analyze a symptom list.
    pub fn analyze_symptoms(&self, request: FfiTriageRequest) -> FfiSymptomAnalysis {
        self.engine.analyze_symptoms(&request.into()).into()
    }

    /// Score risk for a request (runs the symptom analysis first).
    pub fn score_risk(&self, request: FfiTriageRequest) -> FfiRiskAssessment {
        let request: TriageRequest = request.into();
        let analysis = self.engine.analyze_symptoms(&request);
        self.engine.score_risk(&request, &analysis).into()
    }

    /// Full triage decision.
    pub fn triage(&self, request: FfiTriageRequest) -> FfiTriageReport {
        self.engine.triage(&request.into()).into()
    }

    /// Full triage decision as JSON.
    pub fn triage_json(&self, request: FfiTriageRequest) -> Result<String, TriageError> {
        let outcome = self.engine.triage(&request.into());
        Ok(serde_json::to_string(&outcome)?)
    }

    /// Trend over past risk scores, oldest first.
    pub fn calculate_trend(&self, scores: Vec<u8>) -> Result<FfiRiskTrend, TriageError> {
        if let Some(bad) = scores.iter().find(|&&s| s > 100) {
            return Err(TriageError::InvalidInput(format!(
                "risk score {} outside 0-100",
                bad
            )));
        }
        Ok(self.engine.calculate_trend(&scores).into())
    }

    // =========================================================================
    // Medication Operations
    // =========================================================================

    /// Check a medication list for pairwise interactions.
    pub fn check_drug_interactions(&self, medications: Vec<String>) -> FfiInteractionReport {
        self.engine.check_drug_interactions(&medications).into()
    }

    /// Check one medication against patient conditions.
    pub fn check_contraindications(
        &self,
        medication: String,
        conditions: Vec<String>,
    ) -> FfiContraindicationReport {
        self.engine
            .check_contraindications(&medication, &conditions)
            .into()
    }

    /// Reference information for a drug.
    pub fn drug_information(&self, name: String) -> FfiDrugInfo {
        self.engine.drug_information(&name).into()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe triage request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTriageRequest {
    pub symptoms: Vec<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub medical_history: Vec<String>,
    pub medications: Vec<String>,
}

impl From<FfiTriageRequest> for TriageRequest {
    fn from(req: FfiTriageRequest) -> Self {
        TriageRequest {
            symptoms: req.symptoms,
            age: req.age,
            gender: req.gender,
            medical_history: req.medical_history,
            medications: req.medications,
        }
    }
}

/// FFI-safe symptom analysis.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSymptomAnalysis {
    pub possible_conditions: Vec<String>,
    pub recommended_specialization: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub red_flags: Vec<String>,
    pub confidence: f64,
    pub explanation: String,
    pub analyzed_symptoms: Vec<String>,
    pub analyzed_at: String,
}

impl From<SymptomAnalysis> for FfiSymptomAnalysis {
    fn from(analysis: SymptomAnalysis) -> Self {
        Self {
            possible_conditions: analysis.possible_conditions,
            recommended_specialization: analysis.recommended_specialization,
            recommended_actions: analysis.recommended_actions,
            red_flags: analysis.red_flags,
            confidence: analysis.confidence,
            explanation: analysis.explanation,
            analyzed_symptoms: analysis.analyzed_symptoms,
            analyzed_at: analysis.analyzed_at,
        }
    }
}

/// FFI-safe risk assessment. Factor fields are absent on a degraded result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRiskAssessment {
    pub score: u8,
    pub level: String,
    pub urgency: String,
    pub symptom_risk: Option<f64>,
    pub condition_risk: Option<f64>,
    pub age_multiplier: Option<f64>,
    pub history_multiplier: Option<f64>,
    pub red_flag_bonus: Option<u32>,
    pub recommendations: Vec<String>,
    pub calculated_at: String,
    pub degraded_cause: Option<String>,
}

impl From<Outcome<RiskAssessment>> for FfiRiskAssessment {
    fn from(outcome: Outcome<RiskAssessment>) -> Self {
        let degraded_cause = outcome.cause().map(|c| c.to_string());
        let risk = outcome.into_value();
        let factors = risk.factors;

        Self {
            score: risk.score,
            level: risk.level.to_string(),
            urgency: risk.urgency.to_string(),
            symptom_risk: factors.as_ref().map(|f| f.symptom_risk),
            condition_risk: factors.as_ref().map(|f| f.condition_risk),
            age_multiplier: factors.as_ref().map(|f| f.age_multiplier),
            history_multiplier: factors.as_ref().map(|f| f.history_multiplier),
            red_flag_bonus: factors.as_ref().map(|f| f.red_flag_bonus),
            recommendations: risk.recommendations,
            calculated_at: risk.calculated_at,
            degraded_cause,
        }
    }
}

/// FFI-safe drug interaction.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteraction {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: String,
    pub effect: String,
    pub recommendation: String,
}

impl From<models::InteractionRecord> for FfiInteraction {
    fn from(record: models::InteractionRecord) -> Self {
        Self {
            drug_a: record.drug_a,
            drug_b: record.drug_b,
            severity: record.severity.to_string(),
            effect: record.effect,
            recommendation: record.recommendation,
        }
    }
}

/// FFI-safe interaction report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteractionReport {
    pub interactions: Vec<FfiInteraction>,
    pub risk_score: u8,
    pub risk_level: String,
    pub recommendations: Vec<String>,
    pub total_medications: u32,
    pub checked_at: String,
}

impl From<InteractionReport> for FfiInteractionReport {
    fn from(report: InteractionReport) -> Self {
        Self {
            interactions: report.interactions.into_iter().map(|i| i.into()).collect(),
            risk_score: report.risk_score,
            risk_level: report.risk_level.to_string(),
            recommendations: report.recommendations,
            total_medications: report.total_medications as u32,
            checked_at: report.checked_at,
        }
    }
}

/// FFI-safe contraindication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiContraindication {
    pub drug_or_class: String,
    pub condition: String,
    pub severity: String,
    pub recommendation: String,
    pub risk_description: String,
}

impl From<models::ContraindicationRecord> for FfiContraindication {
    fn from(record: models::ContraindicationRecord) -> Self {
        Self {
            drug_or_class: record.drug_or_class,
            condition: record.condition,
            severity: record.severity.to_string(),
            recommendation: record.recommendation,
            risk_description: record.risk_description,
        }
    }
}

/// FFI-safe contraindication report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiContraindicationReport {
    pub medication: String,
    pub contraindications: Vec<FfiContraindication>,
    pub risk_score: u8,
    pub risk_level: String,
    pub recommendations: Vec<String>,
    pub is_safe: bool,
    pub checked_at: String,
}

impl From<ContraindicationReport> for FfiContraindicationReport {
    fn from(report: ContraindicationReport) -> Self {
        Self {
            medication: report.medication,
            contraindications: report
                .contraindications
                .into_iter()
                .map(|c| c.into())
                .collect(),
            risk_score: report.risk_score,
            risk_level: report.risk_level.to_string(),
            recommendations: report.recommendations,
            is_safe: report.is_safe,
            checked_at: report.checked_at,
        }
    }
}

/// FFI-safe medication review.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationReview {
    pub interactions: FfiInteractionReport,
    pub contraindications: Vec<FfiContraindicationReport>,
}

impl From<models::MedicationReview> for FfiMedicationReview {
    fn from(review: models::MedicationReview) -> Self {
        Self {
            interactions: review.interactions.into(),
            contraindications: review
                .contraindications
                .into_iter()
                .map(|c| c.into())
                .collect(),
        }
    }
}

/// FFI-safe drug information.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugInfo {
    pub name: String,
    pub normalized_name: String,
    pub drug_class: String,
    pub common_side_effects: Vec<String>,
    pub monitoring_parameters: Vec<String>,
    pub food_interactions: Vec<String>,
    pub pregnancy_category: String,
}

impl From<DrugInfo> for FfiDrugInfo {
    fn from(info: DrugInfo) -> Self {
        Self {
            name: info.name,
            normalized_name: info.normalized_name,
            drug_class: info.drug_class,
            common_side_effects: info.common_side_effects,
            monitoring_parameters: info.monitoring_parameters,
            food_interactions: info.food_interactions,
            pregnancy_category: info.pregnancy_category,
        }
    }
}

/// FFI-safe risk trend.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRiskTrend {
    pub trend: String,
    pub direction: String,
    pub recent_scores: Vec<u8>,
    pub average_score: Option<f64>,
}

impl From<RiskTrend> for FfiRiskTrend {
    fn from(trend: RiskTrend) -> Self {
        Self {
            trend: trend.trend.as_str().to_string(),
            direction: trend.direction.as_str().to_string(),
            recent_scores: trend.recent_scores,
            average_score: trend.average_score,
        }
    }
}

/// FFI-safe triage report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTriageReport {
    pub analysis: FfiSymptomAnalysis,
    pub risk: FfiRiskAssessment,
    pub medication_review: Option<FfiMedicationReview>,
}

impl From<Outcome<TriageReport>> for FfiTriageReport {
    fn from(outcome: Outcome<TriageReport>) -> Self {
        let degraded_cause = outcome.cause().cloned();
        let report = outcome.into_value();
        let risk = match degraded_cause {
            Some(cause) => Outcome::degraded(report.risk, cause),
            None => Outcome::ok(report.risk),
        };

        Self {
            analysis: report.analysis.into(),
            risk: risk.into(),
            medication_review: report.medication_review.map(|r| r.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffi_request(symptoms: &[&str]) -> FfiTriageRequest {
        FfiTriageRequest {
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            age: None,
            gender: None,
            medical_history: Vec::new(),
            medications: Vec::new(),
        }
    }

    fn core() -> TriageCore {
        TriageCore {
            engine: Engine::builtin(),
        }
    }

    #[test]
    fn test_core_version() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_ffi_triage() {
        let report = core().triage(ffi_request(&["severe chest pain"]));
        assert_eq!(report.risk.urgency, "emergency");
        assert!(report.risk.degraded_cause.is_none());
        assert!(report.risk.symptom_risk.is_some());
        assert!(report.medication_review.is_none());
    }

    #[test]
    fn test_ffi_triage_json() {
        let json = core().triage_json(ffi_request(&["cough"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "ok");
        assert!(value["value"]["risk"]["score"].is_u64());
    }

    #[test]
    fn test_ffi_trend_rejects_out_of_range() {
        let result = core().calculate_trend(vec![10, 200]);
        assert!(matches!(result, Err(TriageError::InvalidInput(_))));

        let trend = core().calculate_trend(vec![10, 30, 60]).unwrap();
        assert_eq!(trend.trend, "increasing");
    }

    #[test]
    fn test_ffi_interactions() {
        let report =
            core().check_drug_interactions(vec!["warfarin".into(), "aspirin".into()]);
        assert_eq!(report.interactions[0].severity, "major");
        assert_eq!(report.risk_level, "medium");
    }

    #[test]
    fn test_open_engine_from_missing_path() {
        let result = open_engine_from_path("/nonexistent/knowledge.json".into());
        assert!(matches!(result, Err(TriageError::KnowledgeBase(_))));
    }
}
