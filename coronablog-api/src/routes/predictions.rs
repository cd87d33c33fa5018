/// Forecast endpoints
///
/// - `GET /` - forecast for the next 7 days
/// - `POST /api/predictions` - forecast for 7, 14 or 30 days
///
/// Forecasts never fail: when the dataset is missing or cannot be fitted the
/// predictor returns synthetic data and `source` reads `"mock"`.
///
/// # Response
///
/// ```json
/// {
///   "status": "success",
///   "data": {
///     "days": 7,
///     "dates": ["2020-06-02", "..."],
///     "cases": [1012, "..."],
///     "deaths": [48, "..."],
///     "source": "model"
///   },
///   "timestamp": "..."
/// }
/// ```

use super::Envelope;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use coronablog_shared::{
    dates::{format_date, upcoming_from_today},
    prediction::{ForecastSource, DEFAULT_HORIZON},
    validation::is_allowed_horizon,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub days: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub days: usize,

    /// `YYYY-MM-DD`, starting tomorrow
    pub dates: Vec<String>,

    pub cases: Vec<u64>,
    pub deaths: Vec<u64>,
    pub source: ForecastSource,
}

async fn forecast(state: &AppState, days: usize) -> ApiResult<PredictionResponse> {
    let predictor = state.predictor.clone();
    let forecast = tokio::task::spawn_blocking(move || predictor.generate(days))
        .await
        .map_err(|e| ApiError::InternalError(format!("Prediction task failed: {}", e)))?;

    let dates = upcoming_from_today(days).into_iter().map(format_date).collect();

    Ok(PredictionResponse {
        days,
        dates,
        cases: forecast.cases,
        deaths: forecast.deaths,
        source: forecast.source,
    })
}

/// Home page forecast
pub async fn index(State(state): State<AppState>) -> ApiResult<Envelope<PredictionResponse>> {
    Ok(Envelope::new(forecast(&state, DEFAULT_HORIZON).await?))
}

/// Forecast for a chosen horizon
///
/// # Errors
///
/// - `400 Bad Request`: `days` is not 7, 14 or 30
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> ApiResult<Envelope<PredictionResponse>> {
    if !is_allowed_horizon(req.days) {
        tracing::debug!(days = req.days, "Rejected forecast horizon");
        return Err(ApiError::BadRequest("Invalid form data".to_string()));
    }

    Ok(Envelope::new(forecast(&state, req.days).await?))
}
