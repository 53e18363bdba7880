use crate::cli::ServeArgs;
use crate::infra::{build_engine, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jobfiltr_ml::config::AppConfig;
use jobfiltr_ml::error::AppError;
use jobfiltr_ml::scoring::SubModelProvider;
use jobfiltr_ml::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let engine = build_engine(&config.scoring);
    let models_loaded = engine.provider().models_loaded();
    info!(
        model_version = engine.model_version(),
        attribution = engine.attribution().label(),
        models_loaded,
        "scoring engine initialized"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        model_version: engine.model_version().to_string(),
        models_loaded,
    };

    let app = with_service_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "scam scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
