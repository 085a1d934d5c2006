//! Red-flag detection on raw symptom text.

use crate::knowledge::KnowledgeBase;

/// Scans raw symptom strings for emergency indicators.
///
/// Matches against the lowercased original text, not the normalized form:
/// normalization strips qualifiers such as "severe" that are themselves
/// emergency keywords.
pub struct RedFlagDetector<'a> {
    emergency_keywords: &'a [String],
    red_flag_symptoms: &'a [String],
}

impl<'a> RedFlagDetector<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self {
            emergency_keywords: &kb.emergency_keywords,
            red_flag_symptoms: &kb.red_flag_symptoms,
        }
    }

    /// Triggered flags, deduplicated, in first-detection order.
    pub fn detect<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<String> {
        let mut flags: Vec<String> = Vec::new();
        let mut push = |flag: String| {
            if !flags.contains(&flag) {
                flags.push(flag);
            }
        };

        for symptom in symptoms {
            let lower = symptom.as_ref().to_lowercase();

            for keyword in self.emergency_keywords {
                if lower.contains(keyword.as_str()) {
                    push(format!("Emergency keyword detected: {keyword}"));
                }
            }

            for phrase in self.red_flag_symptoms {
                if lower.contains(phrase.as_str()) {
                    push(format!("Critical symptom: {phrase}"));
                }
            }
        }

        if !flags.is_empty() {
            tracing::debug!(count = flags.len(), "Red flags detected");
        }

        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_and_phrase_hits() {
        let kb = KnowledgeBase::builtin();
        let detector = RedFlagDetector::new(&kb);

        let flags = detector.detect(&["Severe chest pain"]);
        assert_eq!(
            flags,
            vec![
                "Emergency keyword detected: severe",
                "Emergency keyword detected: chest pain",
                "Critical symptom: severe chest pain",
            ]
        );
    }

    #[test]
    fn test_duplicates_removed() {
        let kb = KnowledgeBase::builtin();
        let detector = RedFlagDetector::new(&kb);

        let flags = detector.detect(&["sudden dizziness", "sudden weakness"]);
        assert_eq!(flags, vec!["Emergency keyword detected: sudden"]);
    }

    #[test]
    fn test_benign_symptoms_have_no_flags() {
        let kb = KnowledgeBase::builtin();
        let detector = RedFlagDetector::new(&kb);

        assert!(detector.detect(&["runny nose", "mild ache", "sore throat"]).is_empty());
        assert!(detector.detect::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_blood_in_stool() {
        let kb = KnowledgeBase::builtin();
        let detector = RedFlagDetector::new(&kb);

        let flags = detector.detect(&["blood in stool"]);
        assert!(flags.contains(&"Emergency keyword detected: blood".to_string()));
        assert!(flags.contains(&"Critical symptom: blood in stool".to_string()));
    }
}
