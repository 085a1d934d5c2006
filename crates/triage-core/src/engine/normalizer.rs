//! Term normalizer.
//!
//! Handles:
//! - Case folding and whitespace cleanup
//! - Dosage/form suffix stripping for drugs ("warfarin 5mg tablets" → "warfarin")
//! - Filler stripping for symptoms and conditions ("i have severe headache" → "headache")
//! - Alias expansion (tylenol → acetaminophen, renal failure → kidney_disease_severe)

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::knowledge::{AliasTables, KnowledgeBase};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static DOSAGE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(?:\d+(?:\.\d+)?\s*)?(?:mg|mcg|g|ml|tablets?|capsules?|injection)\b.*$")
        .unwrap()
});

static LEADING_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:i have|experiencing|feeling|severe|mild|chronic)\s+").unwrap()
});

static TRAILING_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(?:pain|ache|aches|symptoms?)$").unwrap());

/// What a string names; selects the stripping rules and alias table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    Symptom,
    Drug,
    Condition,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TermKind::Symptom => "symptom",
            TermKind::Drug => "drug",
            TermKind::Condition => "condition",
        })
    }
}

/// Normalizer for symptom, drug and condition strings.
///
/// Total: every input yields a string, unmapped input passes through
/// case-folded. Idempotent as long as alias targets are in normal form,
/// which [`KnowledgeBase::validate`] enforces.
pub struct Normalizer<'a> {
    aliases: &'a AliasTables,
}

impl<'a> Normalizer<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self {
            aliases: &kb.aliases,
        }
    }

    /// Canonicalize `raw` as a term of the given kind.
    pub fn normalize(&self, raw: &str, kind: TermKind) -> String {
        let cleaned = clean(raw);

        let stripped = match kind {
            TermKind::Drug => join_words(&DOSAGE_SUFFIX.replace(&cleaned, "")),
            TermKind::Symptom => strip_fillers(cleaned),
            TermKind::Condition => join_words(&strip_fillers(cleaned)),
        };

        self.aliases
            .for_kind(kind)
            .get(&stripped)
            .cloned()
            .unwrap_or(stripped)
    }

    pub fn normalize_symptom(&self, raw: &str) -> String {
        self.normalize(raw, TermKind::Symptom)
    }

    pub fn normalize_drug(&self, raw: &str) -> String {
        self.normalize(raw, TermKind::Drug)
    }

    pub fn normalize_condition(&self, raw: &str) -> String {
        self.normalize(raw, TermKind::Condition)
    }

    /// Lookup keys for a condition: the joined phrase as written, then the
    /// filler-stripped form. "severe liver disease" must still reach
    /// `severe_liver_disease` even though "severe" is a filler.
    pub fn condition_keys(&self, raw: &str) -> Vec<String> {
        let aliases = self.aliases.for_kind(TermKind::Condition);
        let verbatim = join_words(&clean(raw));
        let verbatim = aliases.get(&verbatim).cloned().unwrap_or(verbatim);
        let stripped = self.normalize_condition(raw);

        if stripped == verbatim {
            vec![verbatim]
        } else {
            vec![verbatim, stripped]
        }
    }

    /// Normalize every entry of a list, keeping order.
    pub fn normalize_all<S: AsRef<str>>(&self, raw: &[S], kind: TermKind) -> Vec<String> {
        raw.iter().map(|s| self.normalize(s.as_ref(), kind)).collect()
    }
}

/// Lowercase, trim, and collapse whitespace runs to a single space.
fn clean(raw: &str) -> String {
    let lower = raw.to_lowercase();
    WHITESPACE.replace_all(lower.trim(), " ").into_owned()
}

/// Strip leading fillers and trailing suffixes until nothing changes, so
/// stacked qualifiers ("i have severe chronic back pain") all come off.
fn strip_fillers(mut term: String) -> String {
    loop {
        let without_prefix = LEADING_FILLER.replace(&term, "");
        let next = TRAILING_SUFFIX.replace(&without_prefix, "").into_owned();
        if next == term {
            return term;
        }
        term = next;
    }
}

fn join_words(term: &str) -> String {
    WHITESPACE.replace_all(term.trim(), "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin()
    }

    #[test]
    fn test_drug_alias_expansion() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        assert_eq!(normalizer.normalize_drug("tylenol"), "acetaminophen");
        assert_eq!(normalizer.normalize_drug("Tylenol"), "acetaminophen");
        assert_eq!(normalizer.normalize_drug("COUMADIN"), "warfarin");
        assert_eq!(normalizer.normalize_drug("advil"), "ibuprofen");

        // Unknown names pass through lowercase
        assert_eq!(normalizer.normalize_drug("SomeNewDrug"), "somenewdrug");
    }

    #[test]
    fn test_drug_dosage_stripping() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        assert_eq!(normalizer.normalize_drug("Warfarin 5mg"), "warfarin");
        assert_eq!(normalizer.normalize_drug("warfarin 5 mg tablets"), "warfarin");
        assert_eq!(normalizer.normalize_drug("  Metformin 500 mg  "), "metformin");
        assert_eq!(normalizer.normalize_drug("Tylenol 325mg capsules"), "acetaminophen");
        assert_eq!(normalizer.normalize_drug("insulin injection"), "insulin");

        // Alias lookup happens after stripping
        assert_eq!(normalizer.normalize_drug("zocor 20mg"), "simvastatin");
    }

    #[test]
    fn test_drug_words_joined() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        assert_eq!(normalizer.normalize_drug("Contrast  Dye"), "contrast_dye");
        assert_eq!(
            normalizer.normalize_drug("potassium supplements"),
            "potassium_supplements"
        );
        // "g" only counts as a unit when it stands alone
        assert_eq!(normalizer.normalize_drug("aspirin gel"), "aspirin_gel");
    }

    #[test]
    fn test_symptom_filler_stripping() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        assert_eq!(normalizer.normalize_symptom("I have a cough"), "a cough");
        assert_eq!(normalizer.normalize_symptom("Experiencing nausea"), "nausea");
        assert_eq!(normalizer.normalize_symptom("severe chest pain"), "chest");
        assert_eq!(normalizer.normalize_symptom("mild back aches"), "back");
        assert_eq!(normalizer.normalize_symptom("flu symptoms"), "flu");
        assert_eq!(normalizer.normalize_symptom("headache"), "headache");
        // Stacked qualifiers all come off
        assert_eq!(
            normalizer.normalize_symptom("i have severe chronic joint pain"),
            "joint"
        );
    }

    #[test]
    fn test_symptom_aliases() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        assert_eq!(normalizer.normalize_symptom("SOB"), "shortness of breath");
        assert_eq!(normalizer.normalize_symptom("severe dyspnea"), "shortness of breath");
    }

    #[test]
    fn test_condition_normalization() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        assert_eq!(normalizer.normalize_condition("Kidney Failure"), "kidney_disease_severe");
        assert_eq!(normalizer.normalize_condition("hemorrhage"), "active_bleeding");
        assert_eq!(normalizer.normalize_condition("Pregnancy"), "pregnancy");
        assert_eq!(
            normalizer.normalize_condition("chronic kidney disease"),
            "kidney_disease"
        );
    }

    #[test]
    fn test_condition_keys_keep_qualified_form() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        assert_eq!(
            normalizer.condition_keys("Severe Liver Disease"),
            vec!["severe_liver_disease", "liver_disease"]
        );
        assert_eq!(normalizer.condition_keys("Kidney Failure"), vec!["kidney_disease_severe"]);
        assert_eq!(normalizer.condition_keys("pregnancy"), vec!["pregnancy"]);
    }

    #[test]
    fn test_total_on_odd_input() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        assert_eq!(normalizer.normalize_symptom(""), "");
        assert_eq!(normalizer.normalize_drug("   "), "");
        assert_eq!(normalizer.normalize_symptom("pain"), "pain");
        assert_eq!(normalizer.normalize_drug("mg"), "mg");
    }

    #[test]
    fn test_idempotent_on_known_terms() {
        let kb = kb();
        let normalizer = Normalizer::new(&kb);

        let cases = [
            ("Severe Chest Pain", TermKind::Symptom),
            ("i have sob", TermKind::Symptom),
            ("Tylenol 500mg", TermKind::Drug),
            ("Contrast dye", TermKind::Drug),
            ("renal failure", TermKind::Condition),
            ("chronic liver disease", TermKind::Condition),
        ];

        for (raw, kind) in cases {
            let once = normalizer.normalize(raw, kind);
            let twice = normalizer.normalize(&once, kind);
            assert_eq!(once, twice, "{kind} '{raw}' not idempotent");
        }
    }
}
