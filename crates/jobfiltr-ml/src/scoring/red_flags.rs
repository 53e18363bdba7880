use serde::Serialize;

use super::features::{ContentSignals, RedFlagSignals};

const URGENCY_KEYWORD_THRESHOLD: f64 = 2.0;
const PRESSURE_KEYWORD_THRESHOLD: f64 = 1.0;

/// Severe and moderate indicator tallies for one posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RedFlagCounts {
    pub severe: u8,
    pub moderate: u8,
}

impl RedFlagCounts {
    pub fn tally(red_flags: &RedFlagSignals, content: &ContentSignals) -> Self {
        let severe = [
            red_flags.requests_payment,
            red_flags.requests_ssn,
            red_flags.requests_bank_info,
            red_flags.guarantees_income,
            red_flags.too_good_to_be_true,
        ];

        // A generic sender address only counts when extraction saw it in both places.
        let moderate = [
            red_flags.has_training_fee,
            red_flags.uses_generic_email && content.uses_generic_email,
            red_flags.urgency_keywords > URGENCY_KEYWORD_THRESHOLD,
            red_flags.pressure_keywords > PRESSURE_KEYWORD_THRESHOLD,
            red_flags.requests_off_platform,
        ];

        Self {
            severe: count_true(&severe),
            moderate: count_true(&moderate),
        }
    }
}

fn count_true(conditions: &[bool]) -> u8 {
    conditions.iter().filter(|condition| **condition).count() as u8
}
