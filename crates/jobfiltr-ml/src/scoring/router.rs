use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use super::engine::{ScoringEngine, ScoringError};
use super::features::PredictionRequest;
use super::providers::SubModelProvider;

/// Router builder exposing the prediction endpoint.
pub fn scoring_router<P>(engine: Arc<ScoringEngine<P>>) -> Router
where
    P: SubModelProvider + 'static,
{
    Router::new()
        .route("/predict", post(predict_handler::<P>))
        .with_state(engine)
}

pub(crate) async fn predict_handler<P>(
    State(engine): State<Arc<ScoringEngine<P>>>,
    axum::Json(request): axum::Json<PredictionRequest>,
) -> Response
where
    P: SubModelProvider + 'static,
{
    let bundle = request.into_bundle();

    // Real backends may block on inference, keep them off the async workers.
    let outcome = tokio::task::spawn_blocking(move || engine.predict(&bundle)).await;

    match outcome {
        Ok(Ok(result)) => (StatusCode::OK, axum::Json(result)).into_response(),
        Ok(Err(ScoringError::InvalidFeatures(error))) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        // Already logged by the engine with its reason.
        Ok(Err(ScoringError::Prediction(_))) => internal_error(),
        Err(join_error) => {
            error!(error = %join_error, "prediction task did not complete");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    let payload = json!({
        "error": "prediction failed",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
