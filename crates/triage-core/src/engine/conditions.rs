//! Condition inference from normalized symptoms.

use crate::knowledge::{KnowledgeBase, SymptomConditions};
use crate::models::ConditionCandidate;

/// Number of conditions reported to callers.
pub const MAX_CONDITIONS: usize = 5;

const EXACT_MATCH_POINTS: u32 = 2;
const PARTIAL_MATCH_POINTS: u32 = 1;

/// Scores candidate conditions against the symptom table.
pub struct ConditionInference<'a> {
    table: &'a [SymptomConditions],
}

impl<'a> ConditionInference<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self {
            table: &kb.symptom_conditions,
        }
    }

    /// Every condition with a positive score, best first.
    ///
    /// An exact key hit adds 2 to each associated condition, and every key
    /// that contains or is contained in the symptom adds 1 more. A symptom
    /// equal to a key therefore scores 3 for that key's conditions. Ties keep
    /// the order in which conditions were first encountered.
    pub fn rank<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<ConditionCandidate> {
        let mut candidates: Vec<ConditionCandidate> = Vec::new();

        for symptom in symptoms {
            let symptom = symptom.as_ref();
            // An empty string is a substring of every key
            if symptom.is_empty() {
                continue;
            }

            if let Some(entry) = self.table.iter().find(|e| e.symptom == symptom) {
                for condition in &entry.conditions {
                    add_points(&mut candidates, condition, EXACT_MATCH_POINTS);
                }
            }

            for entry in self.table {
                let key = entry.symptom.as_str();
                if key.contains(symptom) || symptom.contains(key) {
                    for condition in &entry.conditions {
                        add_points(&mut candidates, condition, PARTIAL_MATCH_POINTS);
                    }
                }
            }
        }

        // Stable sort keeps first-encounter order among equal scores
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.retain(|c| c.score > 0);
        candidates
    }

    /// Names of the top conditions (at most five).
    pub fn infer<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<String> {
        self.rank(symptoms)
            .into_iter()
            .take(MAX_CONDITIONS)
            .map(|c| c.name)
            .collect()
    }
}

fn add_points(candidates: &mut Vec<ConditionCandidate>, name: &str, points: u32) {
    match candidates.iter_mut().find(|c| c.name == name) {
        Some(candidate) => candidate.score += points,
        None => candidates.push(ConditionCandidate {
            name: name.to_string(),
            score: points,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_of(ranked: &[ConditionCandidate], name: &str) -> Option<u32> {
        ranked.iter().find(|c| c.name == name).map(|c| c.score)
    }

    #[test]
    fn test_exact_match_double_counts_with_substring() {
        // Documented quirk: an exact hit also fires the substring scan.
        let kb = KnowledgeBase::builtin();
        let inference = ConditionInference::new(&kb);

        let ranked = inference.rank(&["cough"]);
        assert_eq!(score_of(&ranked, "pneumonia"), Some(3));
        assert_eq!(score_of(&ranked, "cold"), Some(3));
    }

    #[test]
    fn test_substring_match_both_directions() {
        let kb = KnowledgeBase::builtin();
        let inference = ConditionInference::new(&kb);

        // symptom contained in key: "chest" ⊂ "chest pain"
        let ranked = inference.rank(&["chest"]);
        assert_eq!(score_of(&ranked, "heart attack"), Some(1));

        // key contained in symptom: "fever" ⊂ "high fever"
        let ranked = inference.rank(&["high fever"]);
        assert_eq!(score_of(&ranked, "flu"), Some(1));
    }

    #[test]
    fn test_scores_accumulate_across_symptoms() {
        let kb = KnowledgeBase::builtin();
        let inference = ConditionInference::new(&kb);

        let ranked = inference.rank(&["fever", "cough"]);
        // flu: 3 from fever + 3 from cough
        assert_eq!(score_of(&ranked, "flu"), Some(6));
        assert_eq!(ranked[0].name, "flu");
        // covid-19 ties with flu and was encountered later
        assert_eq!(ranked[1].name, "covid-19");
    }

    #[test]
    fn test_ties_keep_first_encounter_order() {
        let kb = KnowledgeBase::builtin();
        let inference = ConditionInference::new(&kb);

        let names = inference.infer(&["dizziness"]);
        assert_eq!(
            names,
            vec!["vertigo", "low blood pressure", "dehydration", "inner ear infection"]
        );
    }

    #[test]
    fn test_top_five_only() {
        let kb = KnowledgeBase::builtin();
        let inference = ConditionInference::new(&kb);

        let symptoms = ["fever", "cough", "headache", "nausea", "rash"];
        assert!(inference.rank(&symptoms).len() > MAX_CONDITIONS);
        assert_eq!(inference.infer(&symptoms).len(), MAX_CONDITIONS);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let kb = KnowledgeBase::builtin();
        let inference = ConditionInference::new(&kb);

        assert!(inference.infer(&["tingling toes"]).is_empty());
        assert!(inference.infer::<&str>(&[]).is_empty());
        assert!(inference.infer(&["", "   "]).is_empty());
    }
}
