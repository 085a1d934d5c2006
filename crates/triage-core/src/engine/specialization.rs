//! Maps symptoms and conditions to medical specializations.

use std::collections::BTreeSet;

use crate::knowledge::{KeywordSpecializations, KnowledgeBase};

pub struct SpecializationMapper<'a> {
    by_symptom: &'a [KeywordSpecializations],
    by_condition: &'a [KeywordSpecializations],
    default: &'a str,
}

impl<'a> SpecializationMapper<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self {
            by_symptom: &kb.symptom_specializations,
            by_condition: &kb.condition_specializations,
            default: &kb.default_specialization,
        }
    }

    /// Specializations for normalized symptoms and candidate conditions,
    /// sorted and deduplicated. Falls back to the default when nothing matches.
    pub fn recommend<S: AsRef<str>, C: AsRef<str>>(
        &self,
        symptoms: &[S],
        conditions: &[C],
    ) -> Vec<String> {
        let mut specializations = BTreeSet::new();

        for symptom in symptoms {
            collect(self.by_symptom, symptom.as_ref(), &mut specializations);
        }
        for condition in conditions {
            collect(
                self.by_condition,
                &condition.as_ref().to_lowercase(),
                &mut specializations,
            );
        }

        if specializations.is_empty() {
            specializations.insert(self.default.to_string());
        }

        specializations.into_iter().collect()
    }
}

fn collect(table: &[KeywordSpecializations], text: &str, out: &mut BTreeSet<String>) {
    for entry in table {
        if text.contains(entry.keyword.as_str()) {
            out.extend(entry.specializations.iter().cloned());
        }
    }
}
