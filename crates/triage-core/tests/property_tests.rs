//! Range and idempotence properties over arbitrary input.

use proptest::prelude::*;
use triage_core::engine::{Normalizer, TermKind};
use triage_core::{Engine, KnowledgeBase, TriageRequest};

fn term_kind() -> impl Strategy<Value = TermKind> {
    prop_oneof![
        Just(TermKind::Symptom),
        Just(TermKind::Drug),
        Just(TermKind::Condition),
    ]
}

proptest! {
    #[test]
    fn risk_score_and_confidence_in_range(
        symptoms in prop::collection::vec("[a-z ]{0,30}", 0..8),
        age in prop::option::of(0u32..130),
        history in prop::collection::vec("[a-z ]{0,20}", 0..4),
    ) {
        let engine = Engine::builtin();
        let request = TriageRequest {
            symptoms,
            age,
            medical_history: history,
            ..Default::default()
        };

        let report = engine.triage(&request).into_value();
        prop_assert!(report.risk.score <= 100);
        prop_assert!(report.analysis.confidence >= 0.1);
        prop_assert!(report.analysis.confidence <= 0.95);
        prop_assert!(report.analysis.possible_conditions.len() <= 5);
        prop_assert!(!report.analysis.recommended_specialization.is_empty());
    }

    #[test]
    fn normalization_is_idempotent(raw in "[a-zA-Z0-9 ./]{0,40}", kind in term_kind()) {
        let kb = KnowledgeBase::builtin();
        let normalizer = Normalizer::new(&kb);

        let once = normalizer.normalize(&raw, kind);
        let twice = normalizer.normalize(&once, kind);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn interaction_score_capped(drugs in prop::collection::vec(
        prop::sample::select(vec![
            "warfarin", "aspirin", "ibuprofen", "naproxen", "lisinopril",
            "metformin", "alcohol", "simvastatin", "gemfibrozil", "tylenol",
        ]),
        0..10,
    )) {
        let engine = Engine::builtin();
        let report = engine.check_drug_interactions(&drugs);

        prop_assert!(report.risk_score <= 100);
        prop_assert_eq!(report.total_medications, drugs.len());
        prop_assert_eq!(report.interactions.is_empty(), report.risk_score == 0);
    }
}
