use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use news_analysis::AnalysisRequest;
use report_core::{audio_file_name, AnalysisError, Report};
use serde::Serialize;

use crate::request_id::RequestId;
use crate::{ApiResponse, AppError, AppState};

/// Map AnalysisError to AppError with appropriate status codes.
fn analysis_err(e: AnalysisError) -> AppError {
    let status = match &e {
        AnalysisError::InputValidation(_) | AnalysisError::EmptyInput => StatusCode::BAD_REQUEST,
        AnalysisError::EmptyResult(_) => StatusCode::NOT_FOUND,
        AnalysisError::Synthesis(_) | AnalysisError::ApiError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    AppError::with_status(status, anyhow::anyhow!(e.user_message()))
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: Report,
    /// Set when audio was requested but could not be produced
    pub audio_error: Option<String>,
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/api/reports", post(create_report))
        .route("/api/reports/audio", post(attach_audio))
        .route("/api/audio/:company", get(download_audio))
}

async fn create_report(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<ApiResponse<ReportResponse>>, AppError> {
    tracing::info!(request_id = %request_id.0, company = %request.company.trim(), "Report requested");

    let outcome = state.pipeline.run(&request).await.map_err(analysis_err)?;

    Ok(Json(ApiResponse::success(ReportResponse {
        report: outcome.report,
        audio_error: outcome.audio_error.map(|e| e.user_message()),
    })))
}

/// Generate (or reuse) the spoken summary for a report the client already holds.
async fn attach_audio(
    State(state): State<AppState>,
    Json(mut report): Json<Report>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let coordinator = state
        .pipeline
        .audio()
        .ok_or_else(|| analysis_err(AnalysisError::Synthesis("no speech backend configured".to_string())))?;

    if report.company.trim().is_empty() {
        return Err(analysis_err(AnalysisError::InputValidation(
            "Please enter a company name".to_string(),
        )));
    }
    check_report_shape(&report).map_err(analysis_err)?;

    // Only the server's own cache directory is trusted.
    report.audio_path = None;
    coordinator.ensure_audio(&mut report).await.map_err(analysis_err)?;

    Ok(Json(ApiResponse::success(report)))
}

/// A submitted report must describe at least one article and count each exactly once.
fn check_report_shape(report: &Report) -> Result<(), AnalysisError> {
    if report.articles.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    let counted = report.sentiment_distribution.total();
    if counted != report.articles.len() {
        return Err(AnalysisError::InputValidation(format!(
            "Sentiment distribution counts {} articles but the report has {}",
            counted,
            report.articles.len()
        )));
    }
    Ok(())
}

async fn download_audio(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Result<Response, AppError> {
    let coordinator = state
        .pipeline
        .audio()
        .ok_or_else(|| analysis_err(AnalysisError::Synthesis("no speech backend configured".to_string())))?;

    let path = coordinator.cache_path(&company);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::with_status(
                StatusCode::NOT_FOUND,
                anyhow::anyhow!("No audio summary for {}", company.trim()),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let disposition = format!("attachment; filename=\"{}\"", audio_file_name(&company));
    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
