use serde::{Deserialize, Serialize};

use super::features::FeatureSignals;
use super::heuristic::base_scam_probability;
use super::red_flags::RedFlagCounts;

/// How `featureImportance` is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributionMode {
    /// Fixed ranking kept for output compatibility with existing consumers.
    #[default]
    Static,
    /// Per-request ablation over the heuristic scam signals.
    Ablation,
}

impl AttributionMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "static" => Some(Self::Static),
            "ablation" => Some(Self::Ablation),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttributionMode::Static => "static",
            AttributionMode::Ablation => "ablation",
        }
    }

    pub fn attribute(&self, signals: &FeatureSignals) -> Vec<FeatureImportance> {
        match self {
            AttributionMode::Static => static_importance(),
            AttributionMode::Ablation => ablation_importance(signals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

impl FeatureImportance {
    fn new(feature: &str, importance: f64) -> Self {
        Self {
            feature: feature.to_string(),
            importance,
        }
    }
}

pub const STATIC_IMPORTANCE: [(&str, f64); 5] = [
    ("requestsPayment", 0.25),
    ("guaranteesIncome", 0.20),
    ("usesGenericEmail", 0.15),
    ("urgencyKeywords", 0.12),
    ("grammarQualityScore", 0.10),
];

pub fn static_importance() -> Vec<FeatureImportance> {
    STATIC_IMPORTANCE
        .iter()
        .map(|(feature, importance)| FeatureImportance::new(feature, *importance))
        .collect()
}

struct Ablation {
    feature: &'static str,
    neutralize: fn(&mut FeatureSignals),
}

fn ablations() -> [Ablation; 11] {
    [
        Ablation {
            feature: "requestsPayment",
            neutralize: |s| s.red_flags.requests_payment = false,
        },
        Ablation {
            feature: "requestsSSN",
            neutralize: |s| s.red_flags.requests_ssn = false,
        },
        Ablation {
            feature: "requestsBankInfo",
            neutralize: |s| s.red_flags.requests_bank_info = false,
        },
        Ablation {
            feature: "guaranteesIncome",
            neutralize: |s| s.red_flags.guarantees_income = false,
        },
        Ablation {
            feature: "tooGoodToBeTrue",
            neutralize: |s| s.red_flags.too_good_to_be_true = false,
        },
        Ablation {
            feature: "hasTrainingFee",
            neutralize: |s| s.red_flags.has_training_fee = false,
        },
        Ablation {
            feature: "usesGenericEmail",
            neutralize: |s| s.red_flags.uses_generic_email = false,
        },
        Ablation {
            feature: "urgencyKeywords",
            neutralize: |s| s.red_flags.urgency_keywords = 0.0,
        },
        Ablation {
            feature: "pressureKeywords",
            neutralize: |s| s.red_flags.pressure_keywords = 0.0,
        },
        Ablation {
            feature: "requestsOffPlatform",
            neutralize: |s| s.red_flags.requests_off_platform = false,
        },
        Ablation {
            feature: "grammarQualityScore",
            neutralize: |s| s.quality.grammar_quality_score = 100.0,
        },
    ]
}

fn heuristic_score(signals: &FeatureSignals) -> f64 {
    let counts = RedFlagCounts::tally(&signals.red_flags, &signals.content);
    base_scam_probability(counts, &signals.quality)
}

/// Drop in the heuristic estimate when each signal is switched off, ranked
/// descending. Weights are truncated to three decimals and never sum above one.
pub fn ablation_importance(signals: &FeatureSignals) -> Vec<FeatureImportance> {
    let baseline = heuristic_score(signals);

    let mut ranked: Vec<FeatureImportance> = ablations()
        .iter()
        .filter_map(|ablation| {
            let mut counterfactual = signals.clone();
            (ablation.neutralize)(&mut counterfactual);
            let delta = baseline - heuristic_score(&counterfactual);
            (delta > 1e-12).then(|| FeatureImportance::new(ablation.feature, delta))
        })
        .collect();

    let total: f64 = ranked.iter().map(|entry| entry.importance).sum();
    let scale = if total > 1.0 { 1.0 / total } else { 1.0 };
    for entry in &mut ranked {
        entry.importance = truncate_to_millis(entry.importance * scale);
    }

    ranked.retain(|entry| entry.importance > 0.0);
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

fn truncate_to_millis(value: f64) -> f64 {
    // Nudge before flooring so 0.15 stored as 0.1499999... stays 0.15.
    ((value * 1000.0) + 1e-9).floor() / 1000.0
}
