use super::features::FeatureSignals;

const VAGUE_DESCRIPTION_WEIGHT: f64 = 0.25;
const EXCESSIVE_LENGTH_WEIGHT: f64 = 0.20;
const MISSING_SALARY_WEIGHT: f64 = 0.15;
const EXCESSIVE_SENTENCE_COUNT: f64 = 50.0;
const GHOST_CAP: f64 = 0.85;

/// Probability the listing is not a genuine, fillable opening.
///
/// Reads only responsibilities clarity, sentence count, and salary mention, none
/// of which feed the scam path.
pub fn ghost_probability(signals: &FeatureSignals) -> f64 {
    let mut probability = 0.0;

    if !signals.quality.has_clear_responsibilities {
        probability += VAGUE_DESCRIPTION_WEIGHT;
    }
    if signals.text.sentence_count > EXCESSIVE_SENTENCE_COUNT {
        probability += EXCESSIVE_LENGTH_WEIGHT;
    }
    if !signals.content.mentions_salary {
        probability += MISSING_SALARY_WEIGHT;
    }

    f64::min(probability, GHOST_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_only_penalize_missing_salary() {
        let probability = ghost_probability(&FeatureSignals::default());
        assert!((probability - 0.15).abs() < 1e-9);
    }

    #[test]
    fn all_ghost_signals_accumulate() {
        let mut signals = FeatureSignals::default();
        signals.quality.has_clear_responsibilities = false;
        signals.text.sentence_count = 60.0;
        let probability = ghost_probability(&signals);
        assert!((probability - 0.60).abs() < 1e-9);
    }

    #[test]
    fn sentence_threshold_is_strict() {
        let mut signals = FeatureSignals::default();
        signals.content.mentions_salary = true;
        signals.text.sentence_count = 50.0;
        assert_eq!(ghost_probability(&signals), 0.0);
        signals.text.sentence_count = 51.0;
        assert!((ghost_probability(&signals) - 0.20).abs() < 1e-9);
    }

    #[test]
    fn scam_signals_do_not_leak_into_ghost_score() {
        let baseline = ghost_probability(&FeatureSignals::default());
        let mut signals = FeatureSignals::default();
        signals.red_flags.requests_payment = true;
        signals.red_flags.urgency_keywords = 9.0;
        signals.quality.grammar_quality_score = 10.0;
        assert_eq!(ghost_probability(&signals), baseline);
    }

    #[test]
    fn never_exceeds_cap() {
        for vague in [false, true] {
            for sentences in [0.0, 51.0, 500.0] {
                for salary in [false, true] {
                    let mut signals = FeatureSignals::default();
                    signals.quality.has_clear_responsibilities = !vague;
                    signals.text.sentence_count = sentences;
                    signals.content.mentions_salary = salary;
                    assert!(ghost_probability(&signals) <= 0.85);
                }
            }
        }
    }
}
