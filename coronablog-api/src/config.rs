/// Configuration management for the API server
///
/// Configuration is read from environment variables (a `.env` file is loaded
/// first when present). Every setting has a default except the statistics
/// API key, which defaults to empty and makes remote calls fail softly.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 5000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `APP_ENV`: `development`, `production` or `testing` (default: development)
/// - `DATABASE_URL`: PostgreSQL connection string; unset means an in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `COLLECTAPI_URL`: Statistics service base URL
/// - `COLLECTAPI_KEY`: Statistics service API key
/// - `COLLECTAPI_TIMEOUT_SECS`: Request timeout (default: 10)
/// - `DATASET_PATH`: Historical dataset for forecasts
/// - `PREDICTION_BASE_OFFSET`: First forecast time index (default: derived from the data)
/// - `SESSION_LIFETIME_SECS`: Login session lifetime (default: 7200)
/// - `CACHE_TTL_SECS`: Statistics cache lifetime (default: 300)
/// - `RUST_LOG`: Log filter (default: `coronablog_api=debug,tower_http=debug`)
///
/// # Example
///
/// ```no_run
/// use coronablog_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use coronablog_shared::prediction::{PredictionConfig, DEFAULT_DATASET_PATH};
use coronablog_shared::remote::{StatsConfig, DEFAULT_STATS_URL};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub stats: StatsSettings,
    pub prediction: PredictionSettings,
    pub session: SessionSettings,
    pub cache: CacheSettings,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "testing" | "test" => Ok(Environment::Testing),
            other => anyhow::bail!("unknown APP_ENV '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,

    pub environment: Environment,
}

impl ApiConfig {
    /// HSTS and other production-only behavior
    pub fn production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `None` runs the server against an in-memory store
    pub url: Option<String>,

    pub max_connections: u32,
}

#[derive(Clone)]
pub struct StatsSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for StatsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PredictionSettings {
    pub dataset_path: PathBuf,
    pub base_offset: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                cors_origins: vec!["*".to_string()],
                environment: Environment::Development,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
            stats: StatsSettings {
                base_url: DEFAULT_STATS_URL.to_string(),
                api_key: String::new(),
                timeout_secs: 10,
            },
            prediction: PredictionSettings {
                dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
                base_offset: None,
            },
            session: SessionSettings {
                lifetime_secs: 7200,
            },
            cache: CacheSettings { ttl_secs: 300 },
        }
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse
    /// (a non-numeric port, an unknown `APP_ENV`, ...).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(&get, "API_PORT", defaults.api.port)?;
        let environment = parse_or(&get, "APP_ENV", defaults.api.environment)?;
        let cors_origins = match get("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => defaults.api.cors_origins,
        };

        let base_offset = match get("PREDICTION_BASE_OFFSET") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u32>()
                    .with_context(|| format!("PREDICTION_BASE_OFFSET must be a number, got '{raw}'"))?,
            ),
            None => None,
        };

        Ok(Self {
            api: ApiConfig {
                host: get("API_HOST").unwrap_or(defaults.api.host),
                port,
                cors_origins,
                environment,
            },
            database: DatabaseConfig {
                url: get("DATABASE_URL"),
                max_connections: parse_or(
                    &get,
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
            },
            stats: StatsSettings {
                base_url: get("COLLECTAPI_URL").unwrap_or(defaults.stats.base_url),
                api_key: get("COLLECTAPI_KEY").unwrap_or_default(),
                timeout_secs: parse_or(&get, "COLLECTAPI_TIMEOUT_SECS", defaults.stats.timeout_secs)?,
            },
            prediction: PredictionSettings {
                dataset_path: get("DATASET_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.prediction.dataset_path),
                base_offset,
            },
            session: SessionSettings {
                lifetime_secs: parse_or(
                    &get,
                    "SESSION_LIFETIME_SECS",
                    defaults.session.lifetime_secs,
                )?,
            },
            cache: CacheSettings {
                ttl_secs: parse_or(&get, "CACHE_TTL_SECS", defaults.cache.ttl_secs)?,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn stats_config(&self) -> StatsConfig {
        StatsConfig {
            base_url: self.stats.base_url.clone(),
            api_key: self.stats.api_key.clone(),
            timeout: Duration::from_secs(self.stats.timeout_secs),
        }
    }

    pub fn prediction_config(&self) -> PredictionConfig {
        PredictionConfig {
            dataset_path: self.prediction.dataset_path.clone(),
            base_offset: self.prediction.base_offset,
        }
    }

    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session.lifetime_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {key} ('{raw}'): {e}")),
        None => Ok(default),
    }
}
