use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::features::{FeatureBundle, FeatureSignals};

/// Independent scoring backends whose outputs feed the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubModelKind {
    Transformer,
    Xgboost,
    Anomaly,
    Llm,
}

impl SubModelKind {
    pub const ALL: [SubModelKind; 4] = [
        SubModelKind::Transformer,
        SubModelKind::Xgboost,
        SubModelKind::Anomaly,
        SubModelKind::Llm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SubModelKind::Transformer => "transformer",
            SubModelKind::Xgboost => "xgboost",
            SubModelKind::Anomaly => "anomaly",
            SubModelKind::Llm => "llm",
        }
    }
}

impl fmt::Display for SubModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a backend produced for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScorerOutput {
    Available(f64),
    /// Not computed for this call. Distinct from a score of `0.0`.
    Unavailable,
}

impl ScorerOutput {
    pub fn value(&self) -> Option<f64> {
        match self {
            ScorerOutput::Available(value) => Some(*value),
            ScorerOutput::Unavailable => None,
        }
    }
}

/// Everything a backend may look at when scoring a posting.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub bundle: &'a FeatureBundle,
    pub signals: &'a FeatureSignals,
    pub base_scam_probability: f64,
}

/// Backend failure, split by whether the prediction can continue without it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The backend could not answer (timeout, not loaded, queue full). The
    /// engine degrades to [`ScorerOutput::Unavailable`].
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// The backend is in a state that should not happen. Aborts the prediction.
    #[error("backend fault: {0}")]
    Fault(String),
}

/// Source of sub-model scores, constructed once at service start and shared
/// immutably across requests.
pub trait SubModelProvider: Send + Sync {
    fn score(
        &self,
        model: SubModelKind,
        input: &ScoringInput<'_>,
    ) -> Result<ScorerOutput, ProviderError>;

    /// True when real inference backends are wired in.
    fn models_loaded(&self) -> bool {
        false
    }
}

impl<P> SubModelProvider for Arc<P>
where
    P: SubModelProvider + ?Sized,
{
    fn score(
        &self,
        model: SubModelKind,
        input: &ScoringInput<'_>,
    ) -> Result<ScorerOutput, ProviderError> {
        (**self).score(model, input)
    }

    fn models_loaded(&self) -> bool {
        (**self).models_loaded()
    }
}

const TRANSFORMER_OFFSET: f64 = 0.05;
const XGBOOST_OFFSET: f64 = -0.03;
const ANOMALY_OFFSET: f64 = 0.02;

/// Default provider used when no inference backends are configured.
///
/// Scores are fixed offsets from the heuristic estimate and are not clamped, so
/// they can sit a few hundredths outside `[0, 1]` at the extremes. The language
/// model judge runs out of band and is always reported as unavailable here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProvider;

impl SubModelProvider for PlaceholderProvider {
    fn score(
        &self,
        model: SubModelKind,
        input: &ScoringInput<'_>,
    ) -> Result<ScorerOutput, ProviderError> {
        let base = input.base_scam_probability;
        let output = match model {
            SubModelKind::Transformer => ScorerOutput::Available(base + TRANSFORMER_OFFSET),
            SubModelKind::Xgboost => ScorerOutput::Available(base + XGBOOST_OFFSET),
            SubModelKind::Anomaly => ScorerOutput::Available(base + ANOMALY_OFFSET),
            SubModelKind::Llm => ScorerOutput::Unavailable,
        };
        Ok(output)
    }
}

/// Per-request record of sub-model outputs; `None` means unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SubModelScores {
    pub transformer: Option<f64>,
    pub xgboost: Option<f64>,
    pub anomaly: Option<f64>,
    pub llm: Option<f64>,
}

impl SubModelScores {
    pub fn get(&self, model: SubModelKind) -> Option<f64> {
        match model {
            SubModelKind::Transformer => self.transformer,
            SubModelKind::Xgboost => self.xgboost,
            SubModelKind::Anomaly => self.anomaly,
            SubModelKind::Llm => self.llm,
        }
    }

    pub fn set(&mut self, model: SubModelKind, value: Option<f64>) {
        let slot = match model {
            SubModelKind::Transformer => &mut self.transformer,
            SubModelKind::Xgboost => &mut self.xgboost,
            SubModelKind::Anomaly => &mut self.anomaly,
            SubModelKind::Llm => &mut self.llm,
        };
        *slot = value;
    }

    pub fn available(&self) -> impl Iterator<Item = (SubModelKind, f64)> + '_ {
        SubModelKind::ALL
            .into_iter()
            .filter_map(|model| self.get(model).map(|value| (model, value)))
    }
}
