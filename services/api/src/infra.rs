use jobfiltr_ml::config::ScoringConfig;
use jobfiltr_ml::scoring::{FeatureBundle, PlaceholderProvider, PredictionRequest, ScoringEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) const SERVICE_NAME: &str = "Job Scam Detection ML Service";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) model_version: String,
    pub(crate) models_loaded: bool,
}

/// No inference backends are wired in yet, so every engine runs on the
/// placeholder provider.
pub(crate) fn build_engine(config: &ScoringConfig) -> Arc<ScoringEngine<PlaceholderProvider>> {
    Arc::new(ScoringEngine::new(Arc::new(PlaceholderProvider), config))
}

/// Accepts either a full `/predict` request body or a bare feature bundle.
pub(crate) fn parse_bundle(raw: &str) -> Result<FeatureBundle, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    if value.get("features").is_some() {
        let request: PredictionRequest = serde_json::from_value(value)?;
        Ok(request.into_bundle())
    } else {
        serde_json::from_value(value)
    }
}
