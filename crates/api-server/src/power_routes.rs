use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use power_forecast::{ForecastError, PowerPrediction, SolarConditions, SolarConditionsInput};

use crate::{ApiResponse, AppError, AppState};

fn forecast_err(e: ForecastError) -> AppError {
    let status = match &e {
        ForecastError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
        ForecastError::ModelUnavailable(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    AppError::with_status(status, e)
}

pub fn power_routes() -> Router<AppState> {
    Router::new().route("/api/power/predict", post(predict_power))
}

async fn predict_power(
    State(state): State<AppState>,
    Json(input): Json<SolarConditionsInput>,
) -> Result<Json<ApiResponse<PowerPrediction>>, AppError> {
    let conditions = SolarConditions::try_from(input).map_err(forecast_err)?;
    let prediction = state.forecaster.forecast(&conditions).await.map_err(forecast_err)?;
    Ok(Json(ApiResponse::success(prediction)))
}
