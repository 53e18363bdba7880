use crate::infra::{AppState, SERVICE_NAME};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use jobfiltr_ml::scoring::{scoring_router, ScoringEngine, SubModelProvider};
use serde::Serialize;
use std::sync::Arc;

pub(crate) fn with_service_routes<P>(engine: Arc<ScoringEngine<P>>) -> axum::Router
where
    P: SubModelProvider + 'static,
{
    scoring_router(engine)
        .route("/", axum::routing::get(service_info))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

#[derive(Debug, Serialize)]
pub(crate) struct ServiceInfo {
    pub(crate) service: &'static str,
    pub(crate) status: &'static str,
    pub(crate) version: String,
    pub(crate) timestamp: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthStatus {
    pub(crate) status: &'static str,
    pub(crate) models_loaded: bool,
    pub(crate) model_version: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReadinessStatus {
    pub(crate) status: &'static str,
}

pub(crate) async fn service_info(Extension(state): Extension<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        status: "healthy",
        version: state.model_version,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        models_loaded: state.models_loaded,
        model_version: state.model_version,
    })
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    };

    (status, Json(ReadinessStatus { status: label }))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
