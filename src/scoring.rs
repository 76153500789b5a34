use anyhow::{Result, ensure};

use crate::models::{Category, ScoreBreakdown, Severity};
use crate::settings::{CategoryWeights, SeverityWeights};

/// Accumulates defect ratios into a category score.
///
/// Each ratio is `affected / eligible`, scaled by the severity weight.
/// A ratio with no eligible units contributes nothing, so a category
/// with nothing to inspect scores 100.
pub struct Penalty<'a> {
    weights: &'a SeverityWeights,
    total: f64,
}

impl<'a> Penalty<'a> {
    pub fn new(weights: &'a SeverityWeights) -> Self {
        Self { weights, total: 0.0 }
    }

    pub fn add(&mut self, affected: usize, eligible: usize, severity: Severity) -> &mut Self {
        if eligible > 0 {
            let ratio = affected as f64 / eligible as f64;
            self.total += ratio * self.weights.weight(severity);
        }
        self
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn score(&self) -> u8 {
        let raw = ((1.0 - self.total) * 100.0).round();
        raw.clamp(0.0, 100.0) as u8
    }
}

/// Weighted mean of the category scores, divided by the actual weight sum.
///
/// Categories without a weight are ignored. A zero or negative weight sum
/// is a configuration bug and is reported as an error.
pub fn weighted_score(scores: &[(Category, u8)], weights: &CategoryWeights) -> Result<u8> {
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;

    for &(category, score) in scores {
        if let Some(weight) = weights.weight(category) {
            ensure!(
                weight.is_finite() && weight >= 0.0,
                "Invalid weight {} for category {}",
                weight,
                category.label()
            );
            weighted_sum += f64::from(score) * weight;
            weight_sum += weight;
        }
    }

    ensure!(
        weight_sum > 0.0,
        "Cannot compute overall score: category weights sum to zero"
    );

    Ok((weighted_sum / weight_sum).round().clamp(0.0, 100.0) as u8)
}

/// Counts scores into the excellent / good / needs improvement / poor bands.
pub fn score_breakdown(scores: impl IntoIterator<Item = u8>) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();
    for score in scores {
        match score {
            90.. => breakdown.excellent += 1,
            70..=89 => breakdown.good += 1,
            50..=69 => breakdown.needs_improvement += 1,
            _ => breakdown.poor += 1,
        }
    }
    breakdown
}
