/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `predictions`: Case and death forecasts
/// - `corona`: Statistics and news from the remote service
/// - `auth`: Registration, login and logout
/// - `articles`: Blog feed and article management
/// - `users`: Account administration
/// - `contact`: Contact form and inbox
///
/// Successful responses share one envelope:
///
/// ```json
/// {
///   "status": "success",
///   "data": { ... },
///   "notice": { "level": "success", "message": "..." },
///   "timestamp": "2020-06-01T12:00:00Z"
/// }
/// ```

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use coronablog_shared::auth::Notice;
use serde::{Deserialize, Serialize};

pub mod articles;
pub mod auth;
pub mod contact;
pub mod corona;
pub mod health;
pub mod predictions;
pub mod users;

/// Success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Always `"success"`
    pub status: String,

    pub data: T,

    /// Flash message for the client to display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,

    pub timestamp: DateTime<Utc>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data,
            notice: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
