//! Rule-based annotation of clinical free text.
//!
//! Turns a patient's own description ("i have had a bad h/a for 3 days,
//! taking warfarin 5 mg") into entities, severity and temporal indicators,
//! and finally a [`triage_core::TriageRequest`] the engine can score. JSON
//! emitted by an external annotator can be parsed into the same request.

pub mod annotator;
pub mod extraction;
pub mod patterns;

pub use annotator::{preprocess, RuleAnnotator, FUZZY_MATCH_THRESHOLD};
pub use extraction::*;
