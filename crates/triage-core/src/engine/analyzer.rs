//! Symptom analysis: normalization, condition inference, red flags,
//! specialization routing and a confidence estimate in one pass.

use crate::knowledge::KnowledgeBase;
use crate::models::{SymptomAnalysis, TriageRequest};

use super::conditions::{ConditionInference, MAX_CONDITIONS};
use super::normalizer::{Normalizer, TermKind};
use super::recommendations;
use super::red_flags::RedFlagDetector;
use super::specialization::SpecializationMapper;

const BASE_CONFIDENCE: f64 = 0.6;
const MIN_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;

/// Words that make a symptom description too vague to be trusted.
const VAGUE_WORDS: [&str; 4] = ["pain", "discomfort", "feeling unwell", "tired"];

const DISCLAIMER: &str = "This analysis is for informational purposes only and should not \
replace professional medical advice. Please consult with a qualified healthcare provider for \
proper diagnosis and treatment.";

pub struct SymptomAnalyzer<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> SymptomAnalyzer<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Analyze the symptoms of a request. Gender and medications are carried
    /// by the request but do not influence the result.
    pub fn analyze(&self, request: &TriageRequest) -> SymptomAnalysis {
        let normalized = Normalizer::new(self.kb).normalize_all(&request.symptoms, TermKind::Symptom);

        let ranked = ConditionInference::new(self.kb).rank(&normalized);
        let all_conditions: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();

        let red_flags = RedFlagDetector::new(self.kb).detect(&request.symptoms);
        let specializations =
            SpecializationMapper::new(self.kb).recommend(&normalized, &all_conditions);
        let actions =
            recommendations::for_analysis(&request.symptoms, !red_flags.is_empty(), request.age);
        let confidence = confidence(
            &normalized,
            all_conditions.len(),
            !request.medical_history.is_empty(),
        );
        let explanation = explanation(&normalized, &all_conditions, !red_flags.is_empty());

        tracing::debug!(
            symptoms = normalized.len(),
            conditions = all_conditions.len(),
            red_flags = red_flags.len(),
            confidence,
            "Symptoms analyzed"
        );

        SymptomAnalysis {
            possible_conditions: all_conditions
                .iter()
                .take(MAX_CONDITIONS)
                .map(|c| c.to_string())
                .collect(),
            recommended_specialization: specializations,
            recommended_actions: actions,
            red_flags,
            confidence,
            explanation,
            analyzed_symptoms: normalized,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn confidence(symptoms: &[String], condition_count: usize, has_history: bool) -> f64 {
    let symptom_bonus = (symptoms.len() as f64 * 0.05).min(0.2);
    let condition_bonus = (condition_count as f64 * 0.03).min(0.15);
    let history_bonus = if has_history { 0.1 } else { 0.0 };
    let vague_penalty = symptoms
        .iter()
        .filter(|s| VAGUE_WORDS.iter().any(|w| s.contains(w)))
        .count() as f64
        * 0.05;

    (BASE_CONFIDENCE + symptom_bonus + condition_bonus + history_bonus - vague_penalty)
        .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

fn explanation(symptoms: &[String], conditions: &[&str], has_red_flags: bool) -> String {
    let finding = if has_red_flags {
        "several concerning indicators have been identified that require immediate medical attention."
            .to_string()
    } else if !conditions.is_empty() {
        let top: Vec<&str> = conditions.iter().take(3).copied().collect();
        format!(
            "the most likely conditions to consider include {}.",
            top.join(", ")
        )
    } else {
        "a general medical evaluation is recommended.".to_string()
    };

    format!(
        "Based on the reported symptoms ({}), {finding} {DISCLAIMER}",
        symptoms.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(request: TriageRequest) -> SymptomAnalysis {
        let kb = KnowledgeBase::builtin();
        SymptomAnalyzer::new(&kb).analyze(&request)
    }

    fn symptoms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_common_cold_presentation() {
        let analysis = analyze(TriageRequest::new(symptoms(&["fever", "cough"])));

        assert_eq!(analysis.analyzed_symptoms, vec!["fever", "cough"]);
        assert_eq!(analysis.possible_conditions[0], "flu");
        assert_eq!(analysis.possible_conditions.len(), 5);
        assert!(analysis.red_flags.is_empty());
        assert!(analysis
            .explanation
            .contains("the most likely conditions to consider include flu, covid-19"));
        assert_eq!(
            analysis.recommended_actions[0],
            "Schedule consultation with healthcare provider"
        );
    }

    #[test]
    fn test_confidence_formula() {
        // 0.6 + 2 * 0.05 + min(7 * 0.03, 0.15)
        let analysis = analyze(TriageRequest::new(symptoms(&["fever", "cough"])));
        assert!((analysis.confidence - 0.85).abs() < 1e-9);

        // History adds 0.1, then the clamp at 0.95 applies
        let analysis = analyze(
            TriageRequest::new(symptoms(&["fever", "cough"])).with_history(symptoms(&["asthma"])),
        );
        assert!((analysis.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_vague_symptoms_lower_confidence() {
        let analysis = analyze(TriageRequest::new(symptoms(&["discomfort", "tired legs"])));
        // 0.6 + 0.1 + 0 - 0.1
        assert!((analysis.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_red_flag_explanation_and_actions() {
        let analysis = analyze(TriageRequest::new(symptoms(&["severe chest pain"])).with_age(70));

        assert!(analysis.has_red_flags());
        assert!(analysis.explanation.contains("require immediate medical attention"));
        assert_eq!(analysis.recommended_actions.len(), 2);
        assert!(analysis
            .recommended_specialization
            .contains(&"cardiology".to_string()));
    }

    #[test]
    fn test_unknown_symptoms() {
        let analysis = analyze(TriageRequest::new(symptoms(&["tingling toes"])));

        assert!(analysis.possible_conditions.is_empty());
        assert_eq!(analysis.recommended_specialization, vec!["general_medicine"]);
        assert!(analysis
            .explanation
            .starts_with("Based on the reported symptoms (tingling toes), a general medical evaluation"));
    }

    #[test]
    fn test_gender_and_medications_ignored() {
        let base = analyze(TriageRequest::new(symptoms(&["headache"])));
        let mut request =
            TriageRequest::new(symptoms(&["headache"])).with_medications(symptoms(&["warfarin"]));
        request.gender = Some("female".into());
        let other = analyze(request);

        assert_eq!(base.possible_conditions, other.possible_conditions);
        assert_eq!(base.confidence, other.confidence);
        assert_eq!(base.recommended_specialization, other.recommended_specialization);
    }

    #[test]
    fn test_empty_request() {
        let analysis = analyze(TriageRequest::default());

        assert!(analysis.possible_conditions.is_empty());
        assert!(analysis.red_flags.is_empty());
        assert!((analysis.confidence - 0.6).abs() < 1e-9);
    }
}
