//! Deterministic recommendation templates.

use crate::models::{
    ContraindicationRecord, ContraindicationSeverity, InteractionRecord, InteractionSeverity,
    RiskLevel, Urgency,
};

/// Qualifiers that make a non-flagged presentation urgent.
const SEVERITY_WORDS: [&str; 4] = ["severe", "intense", "acute", "sudden"];

/// Advice for a risk assessment: an urgency block followed by a level block.
pub fn for_risk(level: RiskLevel, urgency: Urgency) -> Vec<String> {
    let mut recommendations: Vec<&str> = match urgency {
        Urgency::Emergency => vec![
            "Seek immediate emergency medical attention",
            "Call emergency services (911) if symptoms are severe",
            "Do not delay medical care",
        ],
        Urgency::Urgent => vec![
            "Schedule urgent medical consultation within 24 hours",
            "Monitor symptoms closely",
            "Seek emergency care if symptoms worsen",
        ],
        Urgency::SemiUrgent => vec![
            "Schedule medical consultation within 2-3 days",
            "Monitor symptoms and note any changes",
            "Contact healthcare provider if symptoms worsen",
        ],
        Urgency::Routine => vec![
            "Schedule routine medical consultation",
            "Monitor symptoms over the next few days",
            "Maintain symptom diary",
        ],
    };

    if level.is_elevated() {
        recommendations.extend([
            "Avoid strenuous activities",
            "Stay hydrated",
            "Have someone stay with you if possible",
        ]);
    } else {
        recommendations.extend([
            "Get adequate rest",
            "Stay hydrated",
            "Follow up if symptoms persist or worsen",
        ]);
    }

    owned(recommendations)
}

/// Immediate actions for a symptom analysis.
pub fn for_analysis<S: AsRef<str>>(
    raw_symptoms: &[S],
    has_red_flags: bool,
    age: Option<u32>,
) -> Vec<String> {
    if has_red_flags {
        return owned(vec![
            "Seek immediate emergency medical attention",
            "Call emergency services if symptoms are severe",
        ]);
    }

    let has_severe = raw_symptoms.iter().any(|s| {
        let lower = s.as_ref().to_lowercase();
        SEVERITY_WORDS.iter().any(|w| lower.contains(w))
    });

    let mut actions = vec![if has_severe {
        "Schedule urgent consultation within 24 hours"
    } else {
        "Schedule consultation with healthcare provider"
    }];

    match age {
        Some(age) if age > 65 => actions.push("Consider comprehensive geriatric assessment"),
        Some(age) if age < 18 => actions.push("Consult pediatric healthcare provider"),
        _ => {}
    }

    actions.extend([
        "Monitor symptoms and note any changes",
        "Maintain symptom diary",
        "Stay hydrated and get adequate rest",
    ]);

    owned(actions)
}

pub fn for_interactions(interactions: &[InteractionRecord]) -> Vec<String> {
    let has = |severity| interactions.iter().any(|i| i.severity == severity);
    let mut recommendations = Vec::new();

    if has(InteractionSeverity::Major) {
        recommendations.push("Consult healthcare provider immediately about major drug interactions");
        recommendations.push("Consider alternative medications to avoid serious interactions");
    }
    if has(InteractionSeverity::Moderate) {
        recommendations.push("Monitor closely for adverse effects from moderate interactions");
        recommendations.push("Regular follow-up appointments recommended");
    }
    if interactions.is_empty() {
        recommendations.push("No significant drug interactions detected");
    }

    owned(recommendations)
}

pub fn for_contraindications(contraindications: &[ContraindicationRecord]) -> Vec<String> {
    let has = |severity| contraindications.iter().any(|c| c.severity == severity);
    let mut recommendations = Vec::new();

    if has(ContraindicationSeverity::Absolute) {
        recommendations.push("This medication is contraindicated - do not use");
        recommendations.push("Consult healthcare provider for alternative treatments");
    }
    if has(ContraindicationSeverity::Relative) {
        recommendations.push("Use with extreme caution and close monitoring");
        recommendations.push("Benefits must outweigh risks");
        recommendations.push("Consider dose adjustment or alternative therapy");
    }
    if contraindications.is_empty() {
        recommendations.push("No contraindications detected for current conditions");
    }

    owned(recommendations)
}

fn owned(lines: Vec<&str>) -> Vec<String> {
    lines.into_iter().map(String::from).collect()
}
