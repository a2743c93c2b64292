//! HTTP surface for news reports, audio summaries and power forecasts.

pub mod config;
pub mod power_routes;
pub mod report_routes;
pub mod request_id;

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ml_client::{MLClient, MLConfig};
use news_analysis::{AnalysisConfig, AnalysisPipeline, AudioSynthesisCoordinator, ReportBuilder};
use news_client::NewsApiClient;
use power_forecast::{LinearPowerModel, PowerForecaster, PowerModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

pub use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
    pub forecaster: Arc<PowerForecaster>,
}

/// Envelope shared by every JSON endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error: any `anyhow`-compatible error, 500 unless a status is given.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: impl Into<anyhow::Error>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "Request failed: {:#}", self.error);
        } else {
            tracing::debug!(status = %self.status, "Request rejected: {}", self.error);
        }
        let body = Json(ApiResponse::<()>::error(self.error.to_string()));
        (self.status, body).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    audio_enabled: bool,
    power_model: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        audio_enabled: state.pipeline.audio().is_some(),
        power_model: state.forecaster.model_name().to_string(),
    })
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(report_routes::report_routes())
        .merge(power_routes::power_routes())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Wire the collaborators described by the environment into an [`AppState`].
pub fn build_state(analysis: &AnalysisConfig, ml: MLConfig, server: &ServerConfig) -> anyhow::Result<AppState> {
    let ml = MLClient::new(ml);
    let news = NewsApiClient::new(analysis.news_api_url.clone(), analysis.page_size);

    let audio = AudioSynthesisCoordinator::new(Arc::new(ml.speech.clone()), analysis.audio_cache_dir.clone())
        .with_summary_chars(analysis.summary_chars);

    let pipeline = AnalysisPipeline::new(Arc::new(news), Arc::new(ml.annotator.clone()))
        .with_builder(ReportBuilder::new(analysis.max_comparisons))
        .with_audio(audio)
        .with_default_api_key(analysis.news_api_key.clone());

    let model: Arc<dyn PowerModel> = match &server.power_model_path {
        Some(path) => Arc::new(
            LinearPowerModel::load(path)
                .with_context(|| format!("failed to load power model from {}", path.display()))?,
        ),
        None => Arc::new(ml.power.clone()),
    };
    let forecaster = PowerForecaster::new(model).with_capacity(server.plant_capacity_mw);

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        forecaster: Arc::new(forecaster),
    })
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let server = ServerConfig::from_env()?;
    let analysis = AnalysisConfig::from_env()?;
    let state = build_state(&analysis, MLConfig::default(), &server)?;

    if analysis.news_api_key.is_none() {
        tracing::warn!("NEWSAPI_KEY not set; report requests must supply api_key");
    }

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", server.bind_addr))?;
    tracing::info!("API server listening on http://{}", server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
