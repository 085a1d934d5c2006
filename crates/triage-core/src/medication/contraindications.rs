use crate::engine::{recommendations, Normalizer};
use crate::knowledge::{ContraindicationProfile, KnowledgeBase};
use crate::models::{
    ContraindicationRecord, ContraindicationReport, ContraindicationSeverity, RiskLevel,
};

/// Checks a single medication against a patient's conditions.
pub struct ContraindicationChecker<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> ContraindicationChecker<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Match the drug's own profile, then its class profile.
    ///
    /// Within a profile every absolute hit comes before any relative hit. A
    /// condition listed in both tiers is reported twice.
    pub fn check<C: AsRef<str>>(&self, medication: &str, conditions: &[C]) -> ContraindicationReport {
        let normalizer = Normalizer::new(self.kb);
        let drug = normalizer.normalize_drug(medication);
        let conditions: Vec<Vec<String>> = conditions
            .iter()
            .map(|c| normalizer.condition_keys(c.as_ref()))
            .collect();

        let mut contraindications = Vec::new();
        if let Some(profile) = self.kb.contraindications.get(&drug) {
            collect(&drug, profile, &conditions, &mut contraindications);
        }
        if let Some(class) = self.kb.drug_class(&drug) {
            if let Some(profile) = self.kb.contraindications.get(class) {
                collect(class, profile, &conditions, &mut contraindications);
            }
        }

        let points: u32 = contraindications.iter().map(|c| c.severity.score()).sum();
        let risk_score = points.min(100) as u8;
        let is_safe = !contraindications
            .iter()
            .any(|c| c.severity == ContraindicationSeverity::Absolute);

        tracing::debug!(
            drug = %drug,
            matches = contraindications.len(),
            risk_score,
            is_safe,
            "Contraindications checked"
        );

        ContraindicationReport {
            medication: medication.to_string(),
            risk_level: RiskLevel::from_medication_score(risk_score),
            recommendations: recommendations::for_contraindications(&contraindications),
            contraindications,
            risk_score,
            is_safe,
            checked_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn collect(
    owner: &str,
    profile: &ContraindicationProfile,
    conditions: &[Vec<String>],
    out: &mut Vec<ContraindicationRecord>,
) {
    let tiers = [
        (&profile.absolute, ContraindicationSeverity::Absolute),
        (&profile.relative, ContraindicationSeverity::Relative),
    ];

    for (listed, severity) in tiers {
        // First key of each condition that the tier lists
        let hits = conditions
            .iter()
            .filter_map(|keys| keys.iter().find(|k| listed.contains(*k)));
        for condition in hits {
            out.push(ContraindicationRecord {
                drug_or_class: owner.to_string(),
                condition: condition.clone(),
                severity,
                recommendation: severity.recommendation().to_string(),
                risk_description: severity.risk_description().to_string(),
            });
        }
    }
}
