//! Rule-based triage engine.
//!
//! Pipeline: normalize symptoms → infer conditions and detect red flags →
//! route to specializations → score risk → attach recommendations.
//! Medication checks run alongside when the request lists medications.

mod analyzer;
mod conditions;
mod normalizer;
pub mod recommendations;
mod red_flags;
mod scorer;
mod specialization;

pub use analyzer::*;
pub use conditions::*;
pub use normalizer::*;
pub use red_flags::*;
pub use scorer::*;
pub use specialization::*;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::knowledge::{KnowledgeBase, KnowledgeResult};
use crate::medication::{ContraindicationChecker, DrugInfoLookup, InteractionChecker};
use crate::models::{
    ContraindicationReport, DrugInfo, InteractionReport, MedicationReview, Outcome,
    RiskAssessment, RiskTrend, SymptomAnalysis, TriageReport, TriageRequest,
};

/// Faults inside a scoring computation. Never surfaced as a hard error:
/// they travel inside [`Outcome::Degraded`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Non-finite {stage} value: {value}")]
    NonFinite { stage: &'static str, value: f64 },
}

pub type ScoringResult<T> = Result<T, ScoringError>;

/// Entry point for every triage operation.
///
/// Cheap to clone and safe to share across threads: the knowledge base is
/// immutable and every operation is a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct Engine {
    kb: Arc<KnowledgeBase>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Engine {
    pub fn new(kb: KnowledgeBase) -> Self {
        tracing::info!(
            conditions = kb.symptom_conditions.len(),
            interactions = kb.interactions.len(),
            "Triage engine ready"
        );
        Self { kb: Arc::new(kb) }
    }

    /// Engine over the compiled-in tables.
    pub fn builtin() -> Self {
        Self::new(KnowledgeBase::builtin())
    }

    /// Engine over a JSON knowledge base file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> KnowledgeResult<Self> {
        Ok(Self::new(KnowledgeBase::from_path(path)?))
    }

    /// Engine over `TRIAGE_KNOWLEDGE_BASE` when set, otherwise the built-in tables.
    pub fn from_env() -> KnowledgeResult<Self> {
        Ok(Self::new(KnowledgeBase::from_env()?))
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn analyze_symptoms(&self, request: &TriageRequest) -> SymptomAnalysis {
        SymptomAnalyzer::new(&self.kb).analyze(request)
    }

    /// Risk for a request given its symptom analysis. Symptom weights are
    /// matched on the raw symptom text.
    pub fn score_risk(
        &self,
        request: &TriageRequest,
        analysis: &SymptomAnalysis,
    ) -> Outcome<RiskAssessment> {
        RiskScorer::new(&self.kb).score(
            &request.symptoms,
            &analysis.possible_conditions,
            &analysis.red_flags,
            request.age,
            &request.medical_history,
        )
    }

    pub fn check_drug_interactions<S: AsRef<str>>(&self, medications: &[S]) -> InteractionReport {
        InteractionChecker::new(&self.kb).check(medications)
    }

    pub fn check_contraindications<C: AsRef<str>>(
        &self,
        medication: &str,
        conditions: &[C],
    ) -> ContraindicationReport {
        ContraindicationChecker::new(&self.kb).check(medication, conditions)
    }

    pub fn drug_information(&self, name: &str) -> DrugInfo {
        DrugInfoLookup::new(&self.kb).lookup(name)
    }

    pub fn calculate_trend(&self, scores: &[u8]) -> RiskTrend {
        calculate_trend(scores)
    }

    /// Full triage: analysis, risk and, when medications are listed, a
    /// medication review against the medical history.
    pub fn triage(&self, request: &TriageRequest) -> Outcome<TriageReport> {
        let analysis = self.analyze_symptoms(request);
        let risk = self.score_risk(request, &analysis);

        let medication_review = if request.medications.is_empty() {
            None
        } else {
            Some(MedicationReview {
                interactions: self.check_drug_interactions(&request.medications),
                contraindications: request
                    .medications
                    .iter()
                    .map(|m| self.check_contraindications(m, &request.medical_history))
                    .collect(),
            })
        };

        tracing::info!(
            symptoms = request.symptoms.len(),
            medications = request.medications.len(),
            "Triage complete"
        );

        risk.map(|risk| TriageReport {
            analysis,
            risk,
            medication_review,
        })
    }
}
