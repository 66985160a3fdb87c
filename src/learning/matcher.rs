use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{ActionData, AnonymizedContext, PracticePattern};

use super::similarity::similarity;
use super::LearningConfig;

/// A pattern that qualified for suggestion in a given context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPattern {
    pub pattern: PracticePattern,
    pub score: f64,
    pub confidence: f64,
    pub explanation: String,
}

/// `min(max_confidence, frequency / frequency_scale * score)`.
pub fn confidence(frequency: u32, score: f64, config: &LearningConfig) -> f64 {
    (f64::from(frequency) / config.frequency_scale * score).min(config.max_confidence)
}

/// Score candidates against `context` and keep those worth suggesting.
///
/// Drops patterns under `min_frequency` and those with similarity not above
/// `similarity_threshold`. Sorted by confidence, then frequency, then most
/// recent use.
pub fn rank_patterns(
    candidates: &[PracticePattern],
    context: &AnonymizedContext,
    config: &LearningConfig,
) -> Vec<RankedPattern> {
    let mut ranked: Vec<RankedPattern> = candidates
        .iter()
        .filter(|p| p.frequency >= config.min_frequency)
        .filter_map(|p| {
            let score = similarity(context, &p.context);
            if score <= config.similarity_threshold {
                return None;
            }
            Some(RankedPattern {
                pattern: p.clone(),
                score,
                confidence: confidence(p.frequency, score, config),
                explanation: explain(&p.action_data, p.frequency, score),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.pattern.frequency.cmp(&a.pattern.frequency))
            .then_with(|| b.pattern.last_used.cmp(&a.pattern.last_used))
    });
    ranked
}

/// Practitioner-facing explanation, worded per action type.
pub fn explain(action: &ActionData, frequency: u32, score: f64) -> String {
    let similar = (score * 100.0).round() as u32;
    match action {
        ActionData::Prescription { medication, .. } => format!(
            "You prescribed {medication} {frequency} times in similar consultations ({similar}% match)"
        ),
        ActionData::Exam { name, .. } => format!(
            "You ordered {name} {frequency} times in similar situations ({similar}% match)"
        ),
        ActionData::Advice { topic, .. } => format!(
            "You gave advice on {topic} {frequency} times in this kind of consultation ({similar}% match)"
        ),
        ActionData::Diagnosis { label, .. } => format!(
            "You recorded {label} {frequency} times in similar situations ({similar}% match)"
        ),
        ActionData::Referral { specialty, .. } => format!(
            "You referred to {specialty} {frequency} times in similar situations ({similar}% match)"
        ),
    }
}
