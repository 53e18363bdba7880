use super::features::QualitySignals;
use super::red_flags::RedFlagCounts;

const SEVERE_WEIGHT: f64 = 0.25;
const MODERATE_WEIGHT: f64 = 0.10;
const RED_FLAG_CAP: f64 = 0.95;
const POOR_GRAMMAR_THRESHOLD: f64 = 60.0;
const POOR_GRAMMAR_BUMP: f64 = 0.15;
const HEURISTIC_CAP: f64 = 0.98;

/// Rule-based scam estimate in `[0, 0.98]`, used as a fusion input and as the
/// anchor for placeholder sub-model scores.
pub fn base_scam_probability(counts: RedFlagCounts, quality: &QualitySignals) -> f64 {
    let mut score = (f64::from(counts.severe) * SEVERE_WEIGHT
        + f64::from(counts.moderate) * MODERATE_WEIGHT)
        .min(RED_FLAG_CAP);

    if quality.grammar_quality_score < POOR_GRAMMAR_THRESHOLD {
        score = (score + POOR_GRAMMAR_BUMP).min(HEURISTIC_CAP);
    }

    score
}
