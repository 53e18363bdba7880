use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::config::ScoringConfig;
use crate::scoring::attribution::AttributionMode;
use crate::scoring::engine::ScoringEngine;
use crate::scoring::features::{FeatureBundle, FeatureGroup};
use crate::scoring::providers::{
    PlaceholderProvider, ProviderError, ScorerOutput, ScoringInput, SubModelKind,
    SubModelProvider,
};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig {
        model_version: "v1.0.0-test".to_string(),
        attribution: AttributionMode::Static,
    }
}

pub(super) fn placeholder_engine() -> ScoringEngine<PlaceholderProvider> {
    ScoringEngine::new(Arc::new(PlaceholderProvider), &scoring_config())
}

pub(super) fn engine_with<P>(provider: P) -> ScoringEngine<P>
where
    P: SubModelProvider + 'static,
{
    ScoringEngine::new(Arc::new(provider), &scoring_config())
}

/// Bundle with every group present but empty.
pub(super) fn empty_bundle() -> FeatureBundle {
    FeatureBundle::default()
}

/// Three severe flags, clean grammar.
pub(super) fn severe_bundle(grammar: f64) -> FeatureBundle {
    FeatureBundle {
        quality_features: FeatureGroup::new().with("grammarQualityScore", grammar),
        red_flag_features: FeatureGroup::new()
            .with("requestsPayment", true)
            .with("guaranteesIncome", true)
            .with("tooGoodToBeTrue", true)
            .with("requestsSSN", false),
        ..FeatureBundle::default()
    }
}

/// Every moderate indicator tripped, no severe ones.
pub(super) fn moderate_bundle() -> FeatureBundle {
    FeatureBundle {
        quality_features: FeatureGroup::new().with("grammarQualityScore", 80),
        content_features: FeatureGroup::new().with("usesGenericEmail", true),
        red_flag_features: FeatureGroup::new()
            .with("hasTrainingFee", true)
            .with("usesGenericEmail", true)
            .with("urgencyKeywords", 3)
            .with("pressureKeywords", 2)
            .with("requestsOffPlatform", true),
        ..FeatureBundle::default()
    }
}

pub(super) fn ghost_bundle() -> FeatureBundle {
    let mut metadata = BTreeMap::new();
    metadata.insert("company".to_string(), Value::from("Northwind"));
    FeatureBundle {
        text_features: FeatureGroup::new().with("sentenceCount", 60),
        quality_features: FeatureGroup::new()
            .with("hasClearResponsibilities", false)
            .with("grammarQualityScore", 88),
        content_features: FeatureGroup::new().with("mentionsSalary", false),
        metadata: Some(metadata),
        job_content: Some("Exciting opportunity, apply now".to_string()),
        ..FeatureBundle::default()
    }
}

/// Provider answering from a fixed table; kinds missing from the table are
/// reported unavailable.
#[derive(Debug, Clone, Default)]
pub(super) struct FixedProvider {
    outputs: BTreeMap<SubModelKind, ScorerOutput>,
    loaded: bool,
}

impl FixedProvider {
    pub(super) fn new(transformer: f64, xgboost: f64, anomaly: f64) -> Self {
        Self::default()
            .with(SubModelKind::Transformer, ScorerOutput::Available(transformer))
            .with(SubModelKind::Xgboost, ScorerOutput::Available(xgboost))
            .with(SubModelKind::Anomaly, ScorerOutput::Available(anomaly))
    }

    pub(super) fn with(mut self, model: SubModelKind, output: ScorerOutput) -> Self {
        self.outputs.insert(model, output);
        self
    }

    pub(super) fn without(mut self, model: SubModelKind) -> Self {
        self.outputs.remove(&model);
        self
    }

    pub(super) fn loaded(mut self) -> Self {
        self.loaded = true;
        self
    }
}

impl SubModelProvider for FixedProvider {
    fn score(
        &self,
        model: SubModelKind,
        _input: &ScoringInput<'_>,
    ) -> Result<ScorerOutput, ProviderError> {
        Ok(self
            .outputs
            .get(&model)
            .copied()
            .unwrap_or(ScorerOutput::Unavailable))
    }

    fn models_loaded(&self) -> bool {
        self.loaded
    }
}

/// Provider whose backends error out for the listed kinds.
pub(super) struct ErroringProvider {
    pub(super) inner: FixedProvider,
    pub(super) failing: Vec<SubModelKind>,
    pub(super) error: ProviderError,
}

impl SubModelProvider for ErroringProvider {
    fn score(
        &self,
        model: SubModelKind,
        input: &ScoringInput<'_>,
    ) -> Result<ScorerOutput, ProviderError> {
        if self.failing.contains(&model) {
            return Err(self.error.clone());
        }
        self.inner.score(model, input)
    }
}

pub(super) fn read_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("valid json body")
}

pub(super) async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    (status, read_json(&bytes))
}
