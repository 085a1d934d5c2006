//! Rule-based annotator.
//!
//! Text is lowercased, whitespace-collapsed and abbreviation-expanded, then
//! three passes run over it: capture rules, dictionary matching with typo
//! tolerance, and severity/temporal indicators.

use std::collections::HashSet;

use strsim::jaro_winkler;
use tracing::debug;

use crate::extraction::{
    Annotation, Entity, EntityKind, EntitySource, SeverityCategory, SeverityInfo, SeverityKeyword,
    TemporalMention,
};
use crate::patterns::{
    terms_for, ABBREVIATION_RULES, AGE, CONDITION_SUFFIXES, CONJUNCTION, DOSAGE, ENTITY_RULES,
    FILLER_WORDS, MEDICATION_SUFFIXES, SEVERITY_KEYWORDS, STOP_WORDS, STRONG_SEVERITY_KEYWORDS,
    TEMPORAL_RULES, TRAILING_TEMPORAL, WHITESPACE, WORD,
};

/// Minimum Jaro-Winkler similarity for a typo to count as a dictionary hit.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.92;

/// Shorter words are only matched exactly.
const FUZZY_MIN_LEN: usize = 6;

const ENTITY_KINDS: [EntityKind; 4] = [
    EntityKind::Symptom,
    EntityKind::Medication,
    EntityKind::Condition,
    EntityKind::BodyPart,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAnnotator;

impl RuleAnnotator {
    pub fn new() -> Self {
        Self
    }

    pub fn annotate(&self, text: &str) -> Annotation {
        let processed = preprocess(text);
        let tokens = tokenize(&processed);

        let mut entities = capture_entities(&processed);
        entities.extend(dictionary_entities(&tokens));

        // Highest confidence wins the (normalized, kind) slot; sort is stable.
        entities.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        let mut seen = HashSet::new();
        entities.retain(|e| seen.insert((e.normalized.clone(), e.kind)));

        let of_kind = |kind: EntityKind| -> Vec<Entity> {
            entities.iter().filter(|e| e.kind == kind).cloned().collect()
        };

        let annotation = Annotation {
            symptoms: of_kind(EntityKind::Symptom),
            medications: of_kind(EntityKind::Medication),
            conditions: of_kind(EntityKind::Condition),
            body_parts: of_kind(EntityKind::BodyPart),
            temporal: temporal_mentions(&processed),
            severity: detect_severity(&tokens),
            age: detect_age(&processed),
            original_text: text.to_string(),
            processed_text: processed.clone(),
            annotated_at: chrono::Utc::now().to_rfc3339(),
        };

        debug!(
            symptoms = annotation.symptoms.len(),
            medications = annotation.medications.len(),
            conditions = annotation.conditions.len(),
            body_parts = annotation.body_parts.len(),
            "Annotated text"
        );

        annotation
    }
}

/// Lowercase, collapse whitespace and expand abbreviations.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = WHITESPACE.replace_all(lowered.trim(), " ").into_owned();

    ABBREVIATION_RULES
        .iter()
        .fold(collapsed, |acc, (regex, full)| {
            regex.replace_all(&acc, *full).into_owned()
        })
}

fn tokenize(text: &str) -> Vec<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

/// Whether `normalized` is a dictionary term of `kind`, allowing typos.
pub fn is_known_term(normalized: &str, kind: EntityKind) -> bool {
    lookup_term(normalized, kind).is_some()
}

fn lookup_term(phrase: &str, kind: EntityKind) -> Option<&'static str> {
    let terms = terms_for(kind);
    if let Some(term) = terms.iter().find(|t| **t == phrase) {
        return Some(*term);
    }
    if phrase.contains(' ') || phrase.len() < FUZZY_MIN_LEN {
        return None;
    }
    fuzzy_term(phrase, terms)
}

fn fuzzy_term(word: &str, terms: &[&'static str]) -> Option<&'static str> {
    terms
        .iter()
        .filter(|t| t.len() >= FUZZY_MIN_LEN && !t.contains(' '))
        .map(|t| (*t, jaro_winkler(word, t)))
        .filter(|(_, similarity)| *similarity >= FUZZY_MATCH_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(t, _)| t)
}

fn clean_phrase(raw: &str, kind: EntityKind) -> String {
    let trimmed = TRAILING_TEMPORAL.replace(raw, "");
    let stripped = match kind {
        EntityKind::Medication => DOSAGE.replace_all(&trimmed, " ").into_owned(),
        _ => trimmed.into_owned(),
    };

    tokenize(&stripped)
        .into_iter()
        .filter(|w| !STOP_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_valid(normalized: &str, kind: EntityKind) -> bool {
    let min_len = match kind {
        EntityKind::Medication => 2,
        _ => 3,
    };

    normalized.len() >= min_len
        && !FILLER_WORDS.contains(&normalized)
        && normalized.chars().any(|c| c.is_ascii_alphabetic())
}

/// Confidence for a capture, in tenths to keep the sums exact.
fn capture_confidence(normalized: &str, kind: EntityKind, known: bool) -> f64 {
    let mut tenths: u8 = 6;
    if known {
        tenths += 3;
    }
    let bonus = match kind {
        EntityKind::Symptom => normalized.contains(' '),
        EntityKind::Medication => MEDICATION_SUFFIXES.iter().any(|s| normalized.ends_with(s)),
        EntityKind::Condition => CONDITION_SUFFIXES.iter().any(|s| normalized.ends_with(s)),
        EntityKind::BodyPart => false,
    };
    if bonus {
        tenths += 1;
    }
    f64::from(tenths.min(10)) / 10.0
}

fn capture_entities(processed: &str) -> Vec<Entity> {
    let mut entities = Vec::new();

    for rule in ENTITY_RULES.iter() {
        for caps in rule.regex.captures_iter(processed) {
            let (Some(whole), Some(captured)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            // "family history of" also satisfies the plain history rule
            if rule.source == EntitySource::MedicalCondition
                && processed[..whole.start()].ends_with("family ")
            {
                continue;
            }

            let qualifier = processed[whole.start()..captured.start()].trim();

            for part in CONJUNCTION.split(captured.as_str()) {
                let part = part.trim();
                let phrase = match rule.source {
                    EntitySource::PainLocation => format!("{part} pain"),
                    EntitySource::SeveritySymptom => format!("{qualifier} {part}"),
                    _ => part.to_string(),
                };

                let cleaned = clean_phrase(&phrase, rule.kind);
                if !is_valid(&cleaned, rule.kind) {
                    continue;
                }

                let canonical = lookup_term(&cleaned, rule.kind);
                let normalized = canonical.map_or(cleaned, str::to_string);
                let confidence = capture_confidence(&normalized, rule.kind, canonical.is_some());

                entities.push(Entity {
                    text: phrase,
                    kind: rule.kind,
                    source: rule.source,
                    confidence,
                    normalized,
                });
            }
        }
    }

    entities
}

fn dictionary_entities(tokens: &[&str]) -> Vec<Entity> {
    let mut entities = Vec::new();

    for kind in ENTITY_KINDS {
        let exact_confidence = match kind {
            EntityKind::BodyPart => 0.9,
            _ => 0.8,
        };

        for term in terms_for(kind) {
            let words: Vec<&str> = term.split(' ').collect();
            if tokens.windows(words.len()).any(|w| w == words.as_slice()) {
                entities.push(Entity {
                    text: term.to_string(),
                    kind,
                    source: EntitySource::Dictionary,
                    confidence: exact_confidence,
                    normalized: term.to_string(),
                });
                continue;
            }

            if words.len() > 1 || term.len() < FUZZY_MIN_LEN {
                continue;
            }
            let typo = tokens.iter().find(|token| {
                token.len() >= FUZZY_MIN_LEN
                    && jaro_winkler(token, term) >= FUZZY_MATCH_THRESHOLD
            });
            if let Some(token) = typo {
                entities.push(Entity {
                    text: token.to_string(),
                    kind,
                    source: EntitySource::FuzzyDictionary,
                    confidence: 0.7,
                    normalized: term.to_string(),
                });
            }
        }
    }

    entities
}

fn detect_severity(tokens: &[&str]) -> SeverityInfo {
    let mut keywords = Vec::new();
    for (category, words) in SEVERITY_KEYWORDS {
        for word in words.iter().filter(|w| tokens.contains(*w)) {
            let confidence = if STRONG_SEVERITY_KEYWORDS.contains(word) {
                0.9
            } else {
                0.7
            };
            keywords.push(SeverityKeyword {
                keyword: word.to_string(),
                category: *category,
                confidence,
            });
        }
    }

    let strongest = |intensity: bool| -> Option<SeverityCategory> {
        keywords
            .iter()
            .filter(|k| k.category.is_intensity() == intensity)
            .fold(None::<&SeverityKeyword>, |best, k| match best {
                Some(b) if b.confidence >= k.confidence => Some(b),
                _ => Some(k),
            })
            .map(|k| k.category)
    };

    SeverityInfo {
        severity_level: strongest(true),
        urgency_level: strongest(false),
        keywords,
    }
}

fn temporal_mentions(processed: &str) -> Vec<TemporalMention> {
    TEMPORAL_RULES
        .iter()
        .flat_map(|(kind, regex)| {
            regex.captures_iter(processed).filter_map(move |caps| {
                let whole = caps.get(0)?;
                let value = caps.get(1)?;
                Some(TemporalMention {
                    kind: *kind,
                    text: whole.as_str().trim_end_matches(['.', ',']).to_string(),
                    value: value.as_str().to_string(),
                    unit: caps.get(2).map(|m| m.as_str().to_string()),
                })
            })
        })
        .collect()
}

fn detect_age(processed: &str) -> Option<u32> {
    AGE.captures_iter(processed)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .find(|age| *age <= 130)
}
