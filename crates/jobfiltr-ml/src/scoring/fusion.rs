use super::providers::{SubModelKind, SubModelScores};

const CONFIDENCE_FLOOR: f64 = 0.5;
const DISAGREEMENT_PENALTY: f64 = 2.0;

/// Fixed ensemble weights. The language model slot is reserved at `0.0` until
/// product decides how its score should count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    pub transformer: f64,
    pub xgboost: f64,
    pub anomaly: f64,
    pub llm: f64,
    pub heuristic: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            transformer: 0.40,
            xgboost: 0.30,
            anomaly: 0.10,
            llm: 0.0,
            heuristic: 0.20,
        }
    }
}

impl FusionWeights {
    pub fn for_model(&self, model: SubModelKind) -> f64 {
        match model {
            SubModelKind::Transformer => self.transformer,
            SubModelKind::Xgboost => self.xgboost,
            SubModelKind::Anomaly => self.anomaly,
            SubModelKind::Llm => self.llm,
        }
    }
}

/// Unrounded ensemble output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionOutcome {
    pub scam_probability: f64,
    pub confidence: f64,
}

/// Weighted-sum combiner over the heuristic estimate and whichever sub-models
/// answered.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    weights: FusionWeights,
    disagreement_pair: (SubModelKind, SubModelKind),
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new(FusionWeights::default())
    }
}

impl FusionEngine {
    pub fn new(weights: FusionWeights) -> Self {
        Self {
            weights,
            disagreement_pair: (SubModelKind::Transformer, SubModelKind::Xgboost),
        }
    }

    pub fn fuse(&self, base_scam_probability: f64, scores: &SubModelScores) -> FusionOutcome {
        FusionOutcome {
            scam_probability: self.scam_probability(base_scam_probability, scores),
            confidence: self.confidence(scores),
        }
    }

    /// With every weighted sub-model present this is exactly
    /// `0.4*transformer + 0.3*xgboost + 0.1*anomaly + 0.2*base`. Missing
    /// sub-models drop out and the remaining weights are rescaled to sum to one.
    pub fn scam_probability(&self, base_scam_probability: f64, scores: &SubModelScores) -> f64 {
        let mut weighted_sum = 0.0;
        let mut available_weight = 0.0;
        let mut missing_weight = 0.0;

        for model in SubModelKind::ALL {
            let weight = self.weights.for_model(model);
            match scores.get(model) {
                Some(value) => {
                    weighted_sum += value * weight;
                    available_weight += weight;
                }
                None => missing_weight += weight,
            }
        }

        weighted_sum += base_scam_probability * self.weights.heuristic;
        available_weight += self.weights.heuristic;

        let fused = if missing_weight > 0.0 && available_weight > 0.0 {
            weighted_sum / available_weight
        } else {
            weighted_sum
        };

        fused.clamp(0.0, 1.0)
    }

    /// Agreement between the two primary sub-models, floored at 0.5. When
    /// either is missing the disagreement is unknown and the floor applies.
    pub fn confidence(&self, scores: &SubModelScores) -> f64 {
        let (left, right) = self.disagreement_pair;
        match (scores.get(left), scores.get(right)) {
            (Some(left), Some(right)) => {
                let variance = (left - right).abs();
                f64::max(CONFIDENCE_FLOOR, 1.0 - variance * DISAGREEMENT_PENALTY).min(1.0)
            }
            _ => CONFIDENCE_FLOOR,
        }
    }
}
