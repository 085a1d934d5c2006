use crate::engine::{recommendations, Normalizer, TermKind};
use crate::knowledge::KnowledgeBase;
use crate::models::{InteractionRecord, InteractionReport, RiskLevel};

/// Pairwise interaction checks over the directed interaction table.
pub struct InteractionChecker<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> InteractionChecker<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Check every unordered pair of a medication list.
    ///
    /// For a pair (a, b) the table entry of `a` is probed first, then the
    /// entry of `b`; the first hit is the only one recorded.
    pub fn check<S: AsRef<str>>(&self, medications: &[S]) -> InteractionReport {
        let drugs = Normalizer::new(self.kb).normalize_all(medications, TermKind::Drug);

        let mut interactions = Vec::new();
        for (i, first) in drugs.iter().enumerate() {
            for second in &drugs[i + 1..] {
                if let Some(record) = self
                    .probe(first, second)
                    .or_else(|| self.probe(second, first))
                {
                    interactions.push(record);
                }
            }
        }

        let points: u32 = interactions.iter().map(|i| i.severity.score()).sum();
        let risk_score = points.min(100) as u8;

        tracing::debug!(
            medications = drugs.len(),
            interactions = interactions.len(),
            risk_score,
            "Drug interactions checked"
        );

        InteractionReport {
            risk_level: RiskLevel::from_medication_score(risk_score),
            recommendations: recommendations::for_interactions(&interactions),
            interactions,
            risk_score,
            total_medications: medications.len(),
            checked_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn probe(&self, drug: &str, partner: &str) -> Option<InteractionRecord> {
        let profile = self.kb.interactions.get(drug)?;
        let severity = profile.severity_with(partner)?;

        Some(InteractionRecord {
            drug_a: drug.to_string(),
            drug_b: partner.to_string(),
            severity,
            effect: profile
                .effect_with(partner)
                .unwrap_or(severity.default_effect())
                .to_string(),
            recommendation: severity.recommendation().to_string(),
        })
    }
}
