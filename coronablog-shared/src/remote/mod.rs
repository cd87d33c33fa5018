/// Client for the third-party Corona statistics service
///
/// Every call returns a `Result`; nothing is swallowed inside the client.
/// Pages that must render even when the service is down opt into an empty
/// value explicitly through [`RemoteFallback`]:
///
/// ```no_run
/// use coronablog_shared::remote::{RemoteFallback, StatsClient, StatsConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = StatsClient::new(StatsConfig::new("my-api-key"))?;
///
/// // Empty list (and a warning in the log) if the service misbehaves
/// let news = client.corona_news().await.recover("corona news");
/// println!("{} news items", news.len());
/// # Ok(())
/// # }
/// ```

use tracing::warn;

pub mod client;

pub use client::{StatsClient, StatsConfig, DEFAULT_STATS_URL};

/// Failure talking to the statistics service
#[derive(Debug, thiserror::Error)]
pub enum RemoteServiceError {
    /// Connection, TLS or timeout failure
    #[error("request to statistics service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with something other than 200
    #[error("statistics service returned status {0}")]
    Status(u16),

    /// The body was not the JSON shape we expected
    #[error("malformed response from statistics service: {0}")]
    Malformed(String),
}

/// Turns a remote failure into an explicit default value
pub trait RemoteFallback<T> {
    /// Falls back to `T::default()`, logging the error
    fn recover(self, context: &str) -> T
    where
        T: Default;

    /// Falls back to `fallback`, logging the error
    fn recover_with(self, context: &str, fallback: T) -> T;
}

impl<T> RemoteFallback<T> for Result<T, RemoteServiceError> {
    fn recover(self, context: &str) -> T
    where
        T: Default,
    {
        self.recover_with(context, T::default())
    }

    fn recover_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                warn!(context, error = %e, "Statistics service unavailable, using empty value");
                fallback
            }
        }
    }
}
