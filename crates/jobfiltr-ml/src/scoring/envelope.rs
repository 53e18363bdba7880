use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::attribution::FeatureImportance;
use super::providers::SubModelScores;

/// Final, rounded output for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub scam_probability: f64,
    pub ghost_probability: f64,
    pub confidence: f64,
    pub model_scores: SubModelScores,
    pub feature_importance: Vec<FeatureImportance>,
    /// Milliseconds.
    pub inference_time: f64,
    pub model_version: String,
}

impl PredictionResult {
    pub fn scam_risk(&self) -> RiskLevel {
        RiskLevel::from_probability(self.scam_probability, 0.7, 0.4)
    }

    pub fn ghost_risk(&self) -> RiskLevel {
        RiskLevel::from_probability(self.ghost_probability, 0.6, 0.3)
    }
}

/// Display banding used by the CLI and downstream summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    fn from_probability(probability: f64, high: f64, moderate: f64) -> Self {
        if probability > high {
            RiskLevel::High
        } else if probability > moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrounded pieces gathered by the engine before packaging.
#[derive(Debug, Clone)]
pub struct ScoredPrediction {
    pub scam_probability: f64,
    pub ghost_probability: f64,
    pub confidence: f64,
    pub model_scores: SubModelScores,
    pub feature_importance: Vec<FeatureImportance>,
}

/// Packages scores with rounding, timing, and the deployment's version tag.
#[derive(Debug, Clone)]
pub struct PredictionEnvelope {
    model_version: String,
}

impl PredictionEnvelope {
    pub fn new(model_version: impl Into<String>) -> Self {
        Self {
            model_version: model_version.into(),
        }
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn seal(&self, scored: ScoredPrediction, elapsed: Duration) -> PredictionResult {
        PredictionResult {
            scam_probability: round_to(scored.scam_probability, 3),
            ghost_probability: round_to(scored.ghost_probability, 3),
            confidence: round_to(scored.confidence, 3),
            model_scores: scored.model_scores,
            feature_importance: scored.feature_importance,
            inference_time: round_to(elapsed.as_secs_f64() * 1000.0, 2),
            model_version: self.model_version.clone(),
        }
    }
}

/// Rounds on the exact decimal expansion of `value`, so `0.0045` stays below
/// the half-way point and becomes `0.004`.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::attribution::static_importance;
    use serde_json::json;

    fn scored() -> ScoredPrediction {
        ScoredPrediction {
            scam_probability: 0.763_000_000_4,
            ghost_probability: 0.15,
            confidence: 0.839_999_999_9,
            model_scores: SubModelScores {
                transformer: Some(0.8),
                xgboost: Some(0.72),
                anomaly: Some(0.77),
                llm: None,
            },
            feature_importance: static_importance(),
        }
    }

    #[test]
    fn seal_rounds_probabilities_and_timing() {
        let envelope = PredictionEnvelope::new("v1.0.0-dev");
        let result = envelope.seal(scored(), Duration::from_micros(1_234_567));

        assert_eq!(result.scam_probability, 0.763);
        assert_eq!(result.ghost_probability, 0.15);
        assert_eq!(result.confidence, 0.84);
        assert_eq!(result.inference_time, 1234.57);
        assert_eq!(result.model_version, "v1.0.0-dev");
    }

    #[test]
    fn rounding_follows_exact_decimal_value() {
        assert_eq!(round_to(0.0045, 3), 0.004);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(0.8375000001, 3), 0.838);
        assert_eq!(round_to(-0.03, 3), -0.03);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let envelope = PredictionEnvelope::new("v9");
        let result = envelope.seal(scored(), Duration::ZERO);
        let value = serde_json::to_value(&result).expect("serializes");

        assert_eq!(value["scamProbability"], json!(0.763));
        assert_eq!(value["modelScores"]["llm"], json!(null));
        assert_eq!(value["modelScores"]["xgboost"], json!(0.72));
        assert_eq!(value["featureImportance"][0]["feature"], json!("requestsPayment"));
        assert_eq!(value["inferenceTime"], json!(0.0));
        assert_eq!(value["modelVersion"], json!("v9"));
    }

    #[test]
    fn risk_bands_use_strict_thresholds() {
        let envelope = PredictionEnvelope::new("v1");
        let mut result = envelope.seal(scored(), Duration::ZERO);
        assert_eq!(result.scam_risk(), RiskLevel::High);
        assert_eq!(result.ghost_risk(), RiskLevel::Low);

        result.scam_probability = 0.7;
        result.ghost_probability = 0.31;
        assert_eq!(result.scam_risk(), RiskLevel::Moderate);
        assert_eq!(result.ghost_risk(), RiskLevel::Moderate);

        result.scam_probability = 0.4;
        assert_eq!(result.scam_risk(), RiskLevel::Low);
    }
}
