/// Statistics and news pages backed by the remote statistics service
///
/// `/information` and `/news` are cached for the configured TTL (300 s by
/// default) under `corona_info` and `corona_news`. Remote failures degrade
/// to empty values and are not cached, so the next request retries.

use super::Envelope;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::extract::{Path, State};
use coronablog_shared::remote::RemoteFallback;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

pub const INFO_CACHE_KEY: &str = "corona_info";
pub const NEWS_CACHE_KEY: &str = "corona_news";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InformationResponse {
    /// World totals
    pub total: Map<String, Value>,

    /// One entry per country
    pub countries: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub news: Vec<Value>,
    pub count: usize,
}

fn cached<T: serde::de::DeserializeOwned>(state: &AppState, key: &str) -> ApiResult<Option<T>> {
    let hit = state
        .cache
        .lock()
        .map_err(|_| ApiError::InternalError("cache lock poisoned".to_string()))?
        .get(key);

    Ok(hit.and_then(|value| serde_json::from_value(value).ok()))
}

fn store<T: Serialize>(state: &AppState, key: &str, value: &T) -> ApiResult<()> {
    let value = serde_json::to_value(value)
        .map_err(|e| ApiError::InternalError(format!("cache encode failed: {}", e)))?;

    state
        .cache
        .lock()
        .map_err(|_| ApiError::InternalError("cache lock poisoned".to_string()))?
        .set(key, value, None);
    Ok(())
}

/// World totals and per-country figures
pub async fn information(State(state): State<AppState>) -> ApiResult<Envelope<InformationResponse>> {
    if let Some(info) = cached::<InformationResponse>(&state, INFO_CACHE_KEY)? {
        debug!(key = INFO_CACHE_KEY, "Cache hit");
        return Ok(Envelope::new(info));
    }

    let (total, countries) = tokio::join!(state.stats.total_data(), state.stats.countries_data());
    let cacheable = total.is_ok() && countries.is_ok();

    let info = InformationResponse {
        total: total.recover("total data"),
        countries: countries.recover("countries data"),
    };
    if cacheable {
        store(&state, INFO_CACHE_KEY, &info)?;
    }

    Ok(Envelope::new(info))
}

/// Figures for one country
pub async fn country_by_name(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> ApiResult<Envelope<Value>> {
    let data = state
        .stats
        .country_by_name(&country)
        .await
        .recover_with("country data", json!({}));
    Ok(Envelope::new(data))
}

/// Latest news items
pub async fn news(State(state): State<AppState>) -> ApiResult<Envelope<NewsResponse>> {
    if let Some(news) = cached::<NewsResponse>(&state, NEWS_CACHE_KEY)? {
        debug!(key = NEWS_CACHE_KEY, "Cache hit");
        return Ok(Envelope::new(news));
    }

    let fetched = state.stats.corona_news().await;
    let cacheable = matches!(&fetched, Ok(items) if !items.is_empty());

    let items = fetched.recover("news");
    let news = NewsResponse {
        count: items.len(),
        news: items,
    };
    if cacheable {
        store(&state, NEWS_CACHE_KEY, &news)?;
    }

    Ok(Envelope::new(news))
}
