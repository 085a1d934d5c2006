use crate::engine::Normalizer;
use crate::knowledge::KnowledgeBase;
use crate::models::DrugInfo;

const UNKNOWN: &str = "Unknown";
const DEFAULT_SIDE_EFFECTS: &str = "consult_prescribing_information";
const DEFAULT_MONITORING: &str = "routine_monitoring";
const DEFAULT_FOOD_INTERACTIONS: &str = "no_known_food_interactions";

/// Reference lookups against the drug monographs.
pub struct DrugInfoLookup<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> DrugInfoLookup<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Information for `name`. Unknown drugs get placeholder entries rather
    /// than an error.
    pub fn lookup(&self, name: &str) -> DrugInfo {
        let normalized = Normalizer::new(self.kb).normalize_drug(name);
        let monograph = self.kb.monographs.get(&normalized);

        let or_default = |list: Option<&Vec<String>>, default: &str| match list {
            Some(items) if !items.is_empty() => items.clone(),
            _ => vec![default.to_string()],
        };

        DrugInfo {
            name: name.to_string(),
            drug_class: self.kb.drug_class(&normalized).unwrap_or(UNKNOWN).to_string(),
            common_side_effects: or_default(monograph.map(|m| &m.side_effects), DEFAULT_SIDE_EFFECTS),
            monitoring_parameters: or_default(monograph.map(|m| &m.monitoring), DEFAULT_MONITORING),
            food_interactions: or_default(
                monograph.map(|m| &m.food_interactions),
                DEFAULT_FOOD_INTERACTIONS,
            ),
            pregnancy_category: monograph
                .and_then(|m| m.pregnancy_category.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            normalized_name: normalized,
        }
    }
}
