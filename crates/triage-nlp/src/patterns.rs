//! Extraction rules for clinical free text.
//!
//! Regexes run on preprocessed text (lowercased, whitespace collapsed,
//! abbreviations expanded) and capture the entity in group 1.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::{EntityKind, EntitySource, SeverityCategory, TemporalKind};

/// Shorthand expanded before any rule runs.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("bp", "blood pressure"),
    ("hr", "heart rate"),
    ("temp", "temperature"),
    ("wt", "weight"),
    ("ht", "height"),
    ("sob", "shortness of breath"),
    ("cp", "chest pain"),
    ("n/v", "nausea and vomiting"),
    ("h/a", "headache"),
];

pub const SYMPTOM_TERMS: &[&str] = &[
    "headache",
    "fever",
    "cough",
    "nausea",
    "vomiting",
    "diarrhea",
    "fatigue",
    "dizziness",
    "chest pain",
    "shortness of breath",
    "abdominal pain",
    "back pain",
    "joint pain",
    "muscle pain",
    "rash",
    "itching",
    "swelling",
    "bleeding",
    "bruising",
    "insomnia",
    "anxiety",
    "depression",
    "confusion",
];

pub const BODY_PART_TERMS: &[&str] = &[
    "head", "neck", "chest", "abdomen", "back", "arm", "leg", "hand", "foot", "eye", "ear",
    "nose", "throat", "heart", "lung", "stomach", "liver", "kidney", "brain", "skin",
];

pub const MEDICATION_TERMS: &[&str] = &[
    "aspirin",
    "ibuprofen",
    "acetaminophen",
    "metformin",
    "lisinopril",
    "simvastatin",
    "warfarin",
    "prednisone",
    "amoxicillin",
    "omeprazole",
];

pub const CONDITION_TERMS: &[&str] = &[
    "diabetes",
    "hypertension",
    "asthma",
    "copd",
    "heart disease",
    "kidney disease",
    "liver disease",
    "cancer",
    "arthritis",
    "depression",
    "anxiety",
    "migraine",
    "pneumonia",
    "bronchitis",
];

/// Dictionary for an entity kind.
pub fn terms_for(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Symptom => SYMPTOM_TERMS,
        EntityKind::Medication => MEDICATION_TERMS,
        EntityKind::Condition => CONDITION_TERMS,
        EntityKind::BodyPart => BODY_PART_TERMS,
    }
}

/// Captures that are never entities on their own.
pub const FILLER_WORDS: &[&str] = &[
    "the", "and", "or", "but", "with", "for", "from", "very", "really", "some", "any",
];

/// Dropped from captured phrases before comparison.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "my", "of", "in", "on", "at", "to", "and", "or", "is", "am", "are", "was",
    "been", "be", "some", "very", "really", "this", "that", "it", "i", "me", "feeling", "having",
];

pub const MEDICATION_SUFFIXES: &[&str] = &["in", "ol", "ide", "ate", "ine"];

pub const CONDITION_SUFFIXES: &[&str] = &["itis", "osis", "emia", "pathy", "oma"];

pub const SEVERITY_KEYWORDS: &[(SeverityCategory, &[&str])] = &[
    (
        SeverityCategory::Severe,
        &["severe", "excruciating", "unbearable", "intense", "extreme"],
    ),
    (
        SeverityCategory::Moderate,
        &["moderate", "noticeable", "significant", "considerable"],
    ),
    (
        SeverityCategory::Mild,
        &["mild", "slight", "minor", "little", "small"],
    ),
    (
        SeverityCategory::Urgent,
        &["urgent", "emergency", "immediate", "critical", "acute"],
    ),
    (
        SeverityCategory::Chronic,
        &["chronic", "persistent", "ongoing", "continuous", "constant"],
    ),
];

/// Keywords trusted more than the rest of their category.
pub const STRONG_SEVERITY_KEYWORDS: &[&str] = &["severe", "urgent", "emergency"];

/// A capture rule for one entity kind.
pub struct PatternRule {
    pub kind: EntityKind,
    pub source: EntitySource,
    pub regex: Regex,
}

fn rule(kind: EntityKind, source: EntitySource, pattern: &str) -> PatternRule {
    PatternRule {
        kind,
        source,
        regex: Regex::new(pattern).unwrap(),
    }
}

pub static ENTITY_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    use EntityKind::*;
    use EntitySource::*;

    vec![
        rule(
            Symptom,
            DirectSymptom,
            r"\b(?:i have|experiencing|suffering from|feeling)\s+(.+?)(?:\.|,|$)",
        ),
        rule(
            Symptom,
            PainLocation,
            r"\b(?:pain in|ache in|hurts in)\s+(?:my\s+)?(.+?)(?:\.|,|$)",
        ),
        rule(
            Symptom,
            DurationSymptom,
            r"\b(?:been|feeling|getting)\s+(.+?)\s+(?:for|since)",
        ),
        rule(
            Symptom,
            SeveritySymptom,
            r"\b(?:severe|mild|moderate|chronic|acute)\s+(.+?)(?:\.|,|$)",
        ),
        rule(
            Medication,
            CurrentMedication,
            r"\b(?:taking|on|prescribed|using)\s+(.+?)\s+(?:\d+(?:\.\d+)?\s*)?(?:mg|mcg|tablets?|capsules?)\b",
        ),
        rule(
            Medication,
            MedicationAllergy,
            r"\b(?:allergic to|allergy to|cannot take)\s+(.+?)(?:\.|,|$)",
        ),
        rule(
            Medication,
            DiscontinuedMedication,
            r"\b(?:stopped|discontinued|quit)\s+(.+?)\s+(?:because|due to)",
        ),
        rule(
            Condition,
            MedicalCondition,
            r"\b(?:diagnosed with|have|history of)\s+(.+?)(?:\.|,|$)",
        ),
        rule(
            Condition,
            FamilyHistory,
            r"\b(?:family history of|runs in family)\s+(.+?)(?:\.|,|$)",
        ),
        rule(
            Condition,
            SurgicalHistory,
            r"\b(?:surgery for|operation for|procedure for)\s+(.+?)(?:\.|,|$)",
        ),
    ]
});

/// Temporal rules. Group 1 is the value; a unit, when present, is group 2.
pub static TEMPORAL_RULES: LazyLock<Vec<(TemporalKind, Regex)>> = LazyLock::new(|| {
    vec![
        (
            TemporalKind::Duration,
            Regex::new(r"\b(?:for|since|over|about)\s+(\d+)\s+(days?|weeks?|months?|years?)").unwrap(),
        ),
        (
            TemporalKind::Frequency,
            Regex::new(r"(\d+)\s+times?\s+(?:a|per)\s+(day|week|month)").unwrap(),
        ),
        (
            TemporalKind::Onset,
            Regex::new(r"\b(?:started|began|onset)\s+(.+?)(?:\.|,|$)").unwrap(),
        ),
        (
            TemporalKind::Interval,
            Regex::new(r"\b(?:every|each)\s+(\d+)\s+(hours?|days?)").unwrap(),
        ),
    ]
});

pub static ABBREVIATION_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(short, full)| {
            let pattern = format!(r"\b{}\b", regex::escape(short));
            (Regex::new(&pattern).unwrap(), *full)
        })
        .collect()
});

pub static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9][a-z0-9/'-]*").unwrap());

pub static DOSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?\s*(?:mg|mcg|g|ml)\b").unwrap());

pub static CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(?:and|or)\s+|\s*;\s*").unwrap());

/// A trailing "for 3 days" style tail on a captured phrase.
pub static TRAILING_TEMPORAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(?:for|since|over|about)\s+\d+.*$").unwrap());

pub static AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3})[- ]?(?:years?|yrs?)[- ]old\b|\baged?\s+(\d{1,3})\b").unwrap()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_compile() {
        assert_eq!(ENTITY_RULES.len(), 10);
        assert_eq!(TEMPORAL_RULES.len(), 4);
        assert_eq!(ABBREVIATION_RULES.len(), ABBREVIATIONS.len());
    }

    #[test]
    fn test_direct_symptom_capture() {
        let rule = &ENTITY_RULES[0];
        let caps = rule.regex.captures("i have a bad cough, and a fever").unwrap();
        assert_eq!(&caps[1], "a bad cough");
    }

    #[test]
    fn test_medication_capture_with_dose() {
        let rule = ENTITY_RULES
            .iter()
            .find(|r| r.source == EntitySource::CurrentMedication)
            .unwrap();
        let caps = rule.regex.captures("currently taking warfarin 5 mg daily").unwrap();
        assert_eq!(&caps[1], "warfarin");
    }

    #[test]
    fn test_abbreviation_word_boundaries() {
        let (regex, full) = &ABBREVIATION_RULES[0];
        assert_eq!(*full, "blood pressure");
        assert!(regex.is_match("high bp today"));
        assert!(!regex.is_match("bpm"));
    }

    #[test]
    fn test_every_kind_has_terms() {
        for kind in [
            EntityKind::Symptom,
            EntityKind::Medication,
            EntityKind::Condition,
            EntityKind::BodyPart,
        ] {
            assert!(!terms_for(kind).is_empty());
        }
    }
}
