//! Composite risk scoring.

use crate::knowledge::{AgeMultiplierBand, KnowledgeBase, WeightedKeyword};
use crate::models::{
    Outcome, RiskAssessment, RiskFactors, RiskLevel, RiskTrend, TrendDirection, TrendKind, Urgency,
};

use super::recommendations;
use super::{ScoringError, ScoringResult};

/// Weight for a symptom no keyword matches.
const DEFAULT_SYMPTOM_WEIGHT: f64 = 25.0;
/// Weight for a candidate condition outside the high-risk table.
const DEFAULT_CONDITION_WEIGHT: f64 = 40.0;
const RED_FLAG_POINTS: u32 = 20;
const HISTORY_STEP: f64 = 0.1;

/// Number of most recent scores a trend looks at.
const TREND_WINDOW: usize = 5;
/// Per-sample change beyond which a trend is no longer stable.
const TREND_SLOPE_THRESHOLD: f64 = 5.0;

/// Combines symptom, condition, age, history and red-flag factors into one
/// clamped 0-100 score.
pub struct RiskScorer<'a> {
    symptom_weights: &'a [WeightedKeyword],
    high_risk_conditions: &'a [WeightedKeyword],
    age_bands: &'a [AgeMultiplierBand],
    high_risk_history: &'a [String],
}

impl<'a> RiskScorer<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self {
            symptom_weights: &kb.symptom_weights,
            high_risk_conditions: &kb.high_risk_conditions,
            age_bands: &kb.age_bands,
            high_risk_history: &kb.high_risk_history,
        }
    }

    /// Score a presentation. Never fails: a numeric fault yields the fixed
    /// fallback assessment wrapped as degraded.
    pub fn score<S: AsRef<str>, C: AsRef<str>, H: AsRef<str>>(
        &self,
        symptoms: &[S],
        conditions: &[C],
        red_flags: &[String],
        age: Option<u32>,
        history: &[H],
    ) -> Outcome<RiskAssessment> {
        match self.try_score(symptoms, conditions, red_flags, age, history) {
            Ok(assessment) => {
                tracing::debug!(
                    score = assessment.score,
                    level = %assessment.level,
                    urgency = %assessment.urgency,
                    "Risk scored"
                );
                Outcome::ok(assessment)
            }
            Err(cause) => {
                tracing::warn!(error = %cause, "Risk scoring degraded to fallback");
                Outcome::degraded(RiskAssessment::fallback(), cause)
            }
        }
    }

    fn try_score<S: AsRef<str>, C: AsRef<str>, H: AsRef<str>>(
        &self,
        symptoms: &[S],
        conditions: &[C],
        red_flags: &[String],
        age: Option<u32>,
        history: &[H],
    ) -> ScoringResult<RiskAssessment> {
        let symptom_risk = finite("symptom_risk", self.symptom_risk(symptoms))?;
        let condition_risk = finite("condition_risk", self.condition_risk(conditions))?;
        let age_multiplier = finite("age_multiplier", self.age_multiplier(age))?;
        let history_multiplier = finite("history_multiplier", self.history_multiplier(history))?;
        let red_flag_bonus = RED_FLAG_POINTS * red_flags.len() as u32;

        let base = symptom_risk.max(condition_risk);
        let composite = finite(
            "composite",
            base * age_multiplier * history_multiplier + f64::from(red_flag_bonus),
        )?;

        // Truncate toward zero, then clamp
        let score = composite.trunc().clamp(0.0, 100.0) as u8;
        let level = RiskLevel::from_assessment_score(score);
        let urgency = Urgency::from_score(score, !red_flags.is_empty());

        Ok(RiskAssessment {
            score,
            level,
            urgency,
            factors: Some(RiskFactors {
                symptom_risk,
                condition_risk,
                age_multiplier,
                history_multiplier,
                red_flag_bonus,
            }),
            recommendations: recommendations::for_risk(level, urgency),
            calculated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Mean symptom weight, boosted for many symptoms and capped at 100.
    fn symptom_risk<S: AsRef<str>>(&self, symptoms: &[S]) -> f64 {
        if symptoms.is_empty() {
            return 0.0;
        }

        let total: f64 = symptoms
            .iter()
            .map(|s| {
                first_weight(self.symptom_weights, &s.as_ref().to_lowercase())
                    .unwrap_or(DEFAULT_SYMPTOM_WEIGHT)
            })
            .sum();

        let count = symptoms.len();
        let boosted = if count > 5 {
            total * 1.4
        } else if count > 3 {
            total * 1.2
        } else {
            total
        };

        (boosted / count as f64).min(100.0)
    }

    fn condition_risk<C: AsRef<str>>(&self, conditions: &[C]) -> f64 {
        conditions
            .iter()
            .map(|c| {
                first_weight(self.high_risk_conditions, &c.as_ref().to_lowercase())
                    .unwrap_or(DEFAULT_CONDITION_WEIGHT)
            })
            .fold(0.0, f64::max)
    }

    fn age_multiplier(&self, age: Option<u32>) -> f64 {
        age.and_then(|age| self.age_bands.iter().find(|b| b.contains(age)))
            .map_or(1.0, |b| b.multiplier)
    }

    /// 1.0 plus 0.1 per history entry naming a high-risk condition. An entry
    /// counts once however many keywords it contains.
    fn history_multiplier<H: AsRef<str>>(&self, history: &[H]) -> f64 {
        let risky = history
            .iter()
            .filter(|entry| {
                let lower = entry.as_ref().to_lowercase();
                self.high_risk_history
                    .iter()
                    .any(|k| lower.contains(k.as_str()))
            })
            .count();

        1.0 + risky as f64 * HISTORY_STEP
    }
}

/// Weight of the first keyword contained in `text`.
fn first_weight(table: &[WeightedKeyword], text: &str) -> Option<f64> {
    table
        .iter()
        .find(|entry| text.contains(entry.keyword.as_str()))
        .map(|entry| f64::from(entry.weight))
}

fn finite(stage: &'static str, value: f64) -> ScoringResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoringError::NonFinite { stage, value })
    }
}

/// Trend over a series of past risk scores, oldest first.
pub fn calculate_trend(scores: &[u8]) -> RiskTrend {
    if scores.len() < 2 {
        return RiskTrend {
            trend: TrendKind::InsufficientData,
            direction: TrendDirection::Stable,
            recent_scores: scores.to_vec(),
            average_score: None,
        };
    }

    let recent = &scores[scores.len().saturating_sub(TREND_WINDOW)..];
    let len = recent.len() as f64;

    let (trend, direction) = match (recent.first(), recent.last()) {
        (Some(&first), Some(&last)) if recent.len() >= 3 => {
            let slope = (f64::from(last) - f64::from(first)) / len;
            if slope > TREND_SLOPE_THRESHOLD {
                (TrendKind::Increasing, TrendDirection::Worsening)
            } else if slope < -TREND_SLOPE_THRESHOLD {
                (TrendKind::Decreasing, TrendDirection::Improving)
            } else {
                (TrendKind::Stable, TrendDirection::Stable)
            }
        }
        _ => (TrendKind::Stable, TrendDirection::Stable),
    };

    let average = recent.iter().map(|&s| f64::from(s)).sum::<f64>() / len;

    RiskTrend {
        trend,
        direction,
        recent_scores: recent.to_vec(),
        average_score: Some(average),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    fn score(
        kb: &KnowledgeBase,
        symptoms: &[&str],
        conditions: &[&str],
        red_flags: &[String],
        age: Option<u32>,
        history: &[&str],
    ) -> RiskAssessment {
        let outcome = RiskScorer::new(kb).score(symptoms, conditions, red_flags, age, history);
        assert!(!outcome.is_degraded());
        outcome.into_value()
    }

    #[test]
    fn test_single_known_symptom() {
        let kb = KnowledgeBase::builtin();
        let assessment = score(&kb, &["headache"], &NONE, &[], None, &NONE);

        assert_eq!(assessment.score, 35);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.urgency, Urgency::Routine);
        let factors = assessment.factors.unwrap();
        assert_eq!(factors.symptom_risk, 35.0);
        assert_eq!(factors.condition_risk, 0.0);
    }

    #[test]
    fn test_first_keyword_hit_wins() {
        // "severe headache" is listed before "headache"
        let kb = KnowledgeBase::builtin();
        let assessment = score(&kb, &["Severe Headache"], &NONE, &[], None, &NONE);
        assert_eq!(assessment.score, 75);
    }

    #[test]
    fn test_count_multiplier_chain() {
        let kb = KnowledgeBase::builtin();

        // Four unknown symptoms: 100 * 1.2 / 4 = 30
        let four = score(&kb, &["a", "b", "c", "d"], &NONE, &[], None, &NONE);
        assert_eq!(four.score, 30);

        // Six unknown symptoms: 150 * 1.4 / 6 = 35
        let six = score(&kb, &["a", "b", "c", "d", "e", "f"], &NONE, &[], None, &NONE);
        assert_eq!(six.score, 35);
    }

    #[test]
    fn test_condition_risk_takes_max() {
        let kb = KnowledgeBase::builtin();
        let assessment = score(&kb, &["runny nose"], &["flu", "pneumonia"], &[], None, &NONE);

        assert_eq!(assessment.score, 70);
        assert_eq!(assessment.level, RiskLevel::High);
        assert_eq!(assessment.urgency, Urgency::Urgent);
    }

    #[test]
    fn test_age_and_history_multipliers() {
        let kb = KnowledgeBase::builtin();
        let scorer = RiskScorer::new(&kb);

        assert_eq!(scorer.age_multiplier(Some(70)), 1.2);
        assert_eq!(scorer.age_multiplier(Some(10)), 1.1);
        assert_eq!(scorer.age_multiplier(Some(1)), 1.3);
        assert_eq!(scorer.age_multiplier(Some(150)), 1.0);
        assert_eq!(scorer.age_multiplier(None), 1.0);

        // Two risky entries, one ignored; a double keyword counts once
        let multiplier =
            scorer.history_multiplier(&["Type 2 Diabetes", "broken arm", "heart disease and stroke"]);
        assert!((multiplier - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_red_flags_force_emergency() {
        let kb = KnowledgeBase::builtin();
        let flags = vec!["Emergency keyword detected: severe".to_string()];
        let assessment = score(&kb, &["runny nose"], &NONE, &flags, None, &NONE);

        assert_eq!(assessment.score, 35);
        assert_eq!(assessment.urgency, Urgency::Emergency);
        assert_eq!(assessment.factors.unwrap().red_flag_bonus, 20);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let kb = KnowledgeBase::builtin();
        let flags: Vec<String> = (0..4).map(|i| format!("flag {i}")).collect();
        let assessment = score(&kb, &["chest pain"], &["heart attack"], &flags, Some(85), &["copd"]);

        assert_eq!(assessment.score, 100);
        assert_eq!(assessment.level, RiskLevel::Critical);
    }

    #[test]
    fn test_empty_symptoms_score_zero() {
        let kb = KnowledgeBase::builtin();
        let assessment = score(&kb, &NONE, &NONE, &[], None, &NONE);
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_non_finite_multiplier_degrades() {
        let mut kb = KnowledgeBase::builtin();
        kb.age_bands[4].multiplier = f64::MAX;

        let outcome = RiskScorer::new(&kb).score(&["chest pain"], &NONE, &[], Some(70), &["diabetes"]);
        assert!(outcome.is_degraded());
        assert!(matches!(
            outcome.cause(),
            Some(ScoringError::NonFinite { stage: "composite", .. })
        ));
        assert_eq!(outcome.value().score, 50);
        assert_eq!(outcome.value().level, RiskLevel::Medium);
    }

    #[test]
    fn test_trend_insufficient_data() {
        let trend = calculate_trend(&[40]);
        assert_eq!(trend.trend, TrendKind::InsufficientData);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert!(trend.average_score.is_none());
    }

    #[test]
    fn test_trend_two_points_is_stable() {
        let trend = calculate_trend(&[10, 90]);
        assert_eq!(trend.trend, TrendKind::Stable);
        assert_eq!(trend.average_score, Some(50.0));
    }

    #[test]
    fn test_trend_direction() {
        let worsening = calculate_trend(&[20, 30, 45, 60]);
        assert_eq!(worsening.trend, TrendKind::Increasing);
        assert_eq!(worsening.direction, TrendDirection::Worsening);

        let improving = calculate_trend(&[80, 60, 40]);
        assert_eq!(improving.trend, TrendKind::Decreasing);
        assert_eq!(improving.direction, TrendDirection::Improving);

        // slope (55 - 40) / 3 = 5 is not above the threshold
        let flat = calculate_trend(&[40, 70, 55]);
        assert_eq!(flat.trend, TrendKind::Stable);
    }

    #[test]
    fn test_trend_uses_last_five() {
        let trend = calculate_trend(&[100, 100, 10, 10, 10, 10, 10]);
        assert_eq!(trend.recent_scores, vec![10, 10, 10, 10, 10]);
        assert_eq!(trend.trend, TrendKind::Stable);
        assert_eq!(trend.average_score, Some(10.0));
    }
}
