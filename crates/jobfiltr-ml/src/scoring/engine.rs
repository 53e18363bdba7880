use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::attribution::AttributionMode;
use super::envelope::{PredictionEnvelope, PredictionResult, ScoredPrediction};
use super::features::{FeatureBundle, FeatureBundleError, FeatureSignals};
use super::fusion::{FusionEngine, FusionWeights};
use super::ghost::ghost_probability;
use super::heuristic::base_scam_probability;
use super::providers::{
    ProviderError, ScorerOutput, ScoringInput, SubModelKind, SubModelProvider, SubModelScores,
};
use super::red_flags::RedFlagCounts;
use crate::config::ScoringConfig;

/// Opaque internal fault. The message is for logs, not for API clients.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("prediction failed: {reason}")]
pub struct PredictionError {
    reason: String,
}

impl PredictionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Error raised by [`ScoringEngine::predict`].
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    InvalidFeatures(#[from] FeatureBundleError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Stateless ensemble scorer. Holds only immutable configuration and the
/// injected provider, so one instance can serve concurrent requests.
pub struct ScoringEngine<P> {
    provider: Arc<P>,
    fusion: FusionEngine,
    attribution: AttributionMode,
    envelope: PredictionEnvelope,
}

impl<P> ScoringEngine<P>
where
    P: SubModelProvider + 'static,
{
    pub fn new(provider: Arc<P>, config: &ScoringConfig) -> Self {
        Self {
            provider,
            fusion: FusionEngine::default(),
            attribution: config.attribution,
            envelope: PredictionEnvelope::new(config.model_version.clone()),
        }
    }

    pub fn with_weights(mut self, weights: FusionWeights) -> Self {
        self.fusion = FusionEngine::new(weights);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn model_version(&self) -> &str {
        self.envelope.model_version()
    }

    pub fn attribution(&self) -> AttributionMode {
        self.attribution
    }

    /// Score one posting.
    pub fn predict(&self, bundle: &FeatureBundle) -> Result<PredictionResult, ScoringError> {
        let started = Instant::now();

        let signals = FeatureSignals::extract(bundle)?;
        let counts = RedFlagCounts::tally(&signals.red_flags, &signals.content);
        let base = base_scam_probability(counts, &signals.quality);
        let ghost = ghost_probability(&signals);

        let input = ScoringInput {
            bundle,
            signals: &signals,
            base_scam_probability: base,
        };
        let model_scores = self.collect_scores(&input).map_err(|err| {
            error!(error = %err, "sub-model scoring aborted prediction");
            err
        })?;

        let outcome = self.fusion.fuse(base, &model_scores);
        let feature_importance = self.attribution.attribute(&signals);

        let result = self.envelope.seal(
            ScoredPrediction {
                scam_probability: outcome.scam_probability,
                ghost_probability: ghost,
                confidence: outcome.confidence,
                model_scores,
                feature_importance,
            },
            started.elapsed(),
        );

        info!(
            inference_ms = result.inference_time,
            scam_probability = result.scam_probability,
            ghost_probability = result.ghost_probability,
            confidence = result.confidence,
            severe_flags = counts.severe,
            moderate_flags = counts.moderate,
            "prediction completed"
        );

        Ok(result)
    }

    fn collect_scores(&self, input: &ScoringInput<'_>) -> Result<SubModelScores, PredictionError> {
        let mut scores = SubModelScores::default();

        for model in SubModelKind::ALL {
            let value = match self.provider.score(model, input) {
                Ok(ScorerOutput::Available(value)) if value.is_finite() => Some(value),
                Ok(ScorerOutput::Available(value)) => {
                    return Err(PredictionError::new(format!(
                        "{model} returned non-finite score {value}"
                    )));
                }
                Ok(ScorerOutput::Unavailable) => {
                    debug!(%model, "sub-model not configured, skipping");
                    None
                }
                Err(ProviderError::Unavailable(reason)) => {
                    warn!(%model, %reason, "sub-model unavailable, continuing without it");
                    None
                }
                Err(ProviderError::Fault(reason)) => {
                    return Err(PredictionError::new(format!("{model} faulted: {reason}")));
                }
            };
            scores.set(model, value);
        }

        Ok(scores)
    }
}
