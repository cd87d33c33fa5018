use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use super::RemoteServiceError;

/// Production endpoint of the statistics service
pub const DEFAULT_STATS_URL: &str = "https://api.collectapi.com";

const TOTAL_DATA: &str = "/corona/totalData";
const COUNTRIES_DATA: &str = "/corona/countriesData";
const CORONA_NEWS: &str = "/corona/coronaNews";

#[derive(Clone)]
pub struct StatsConfig {
    /// Scheme and host, without a trailing path
    pub base_url: String,

    /// Sent as `authorization: apikey <key>`
    pub api_key: String,

    pub timeout: Duration,
}

impl StatsConfig {
    /// Production endpoint with a 10 second timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_STATS_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for StatsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &format_args!("[REDACTED, {} chars]", self.api_key.len()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the statistics service
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct StatsClient {
    client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for StatsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StatsClient {
    /// Builds a client with the auth headers baked in
    ///
    /// # Errors
    ///
    /// Fails if the API key is not a valid header value or the TLS backend
    /// cannot be initialized.
    pub fn new(config: StatsConfig) -> Result<Self, RemoteServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("apikey {}", config.api_key))
            .map_err(|_| RemoteServiceError::Malformed("API key is not a valid header".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `endpoint` and parses the body as JSON
    ///
    /// # Errors
    ///
    /// - [`RemoteServiceError::Transport`] if the request could not complete
    /// - [`RemoteServiceError::Status`] for any status other than 200
    /// - [`RemoteServiceError::Malformed`] if the body is not JSON
    pub async fn fetch(
        &self,
        endpoint: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<Value, RemoteServiceError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Requesting statistics");

        let mut request = self.client.get(&url);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(RemoteServiceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| RemoteServiceError::Malformed(e.to_string()))
    }

    /// Global totals, returned as the raw top-level object
    pub async fn total_data(&self) -> Result<Map<String, Value>, RemoteServiceError> {
        match self.fetch(TOTAL_DATA, None).await? {
            Value::Object(map) => Ok(map),
            other => Err(unexpected("object", &other)),
        }
    }

    /// Per-country statistics (`result` array; absent means empty)
    pub async fn countries_data(&self) -> Result<Vec<Value>, RemoteServiceError> {
        let body = self.fetch(COUNTRIES_DATA, None).await?;
        result_array(body)
    }

    /// Statistics for a single country (`result`; absent means `{}`)
    pub async fn country_by_name(&self, country: &str) -> Result<Value, RemoteServiceError> {
        let body = self
            .fetch(COUNTRIES_DATA, Some(&[("country", country)]))
            .await?;

        match body {
            Value::Object(mut map) => Ok(map
                .remove("result")
                .unwrap_or_else(|| Value::Object(Map::new()))),
            other => Err(unexpected("object", &other)),
        }
    }

    /// Latest news items (`result` array; absent means empty)
    pub async fn corona_news(&self) -> Result<Vec<Value>, RemoteServiceError> {
        let body = self.fetch(CORONA_NEWS, None).await?;
        result_array(body)
    }
}

fn result_array(body: Value) -> Result<Vec<Value>, RemoteServiceError> {
    let Value::Object(mut map) = body else {
        return Err(unexpected("object", &body));
    };

    match map.remove("result") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(unexpected("array in `result`", &other)),
    }
}

fn unexpected(expected: &str, got: &Value) -> RemoteServiceError {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    RemoteServiceError::Malformed(format!("expected {expected}, got {kind}"))
}
