/// Contact form (public) and inbox (admin)

use super::Envelope;
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use coronablog_shared::{
    auth::Notice,
    models::{ContactMessage, NewContactMessage},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 50, message = "Last name must be between 2 and 50 characters"))]
    pub surname: String,

    #[validate(
        email(message = "Please enter a valid email address"),
        length(max = 120, message = "Email must be less than 120 characters")
    )]
    pub email: String,

    #[validate(length(min = 10, max = 1000, message = "Message must be between 10 and 1000 characters"))]
    pub message: String,
}

pub async fn create_contact(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Envelope<ContactMessage>)> {
    req.validate()?;

    let message = state
        .store
        .create_contact(NewContactMessage {
            email: req.email,
            name: req.name,
            surname: req.surname,
            message: req.message,
        })
        .await?;

    info!(contact_id = message.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Envelope::new(message).with_notice(Notice::success(
            "Message sent successfully! We'll get back to you soon.",
        )),
    ))
}

/// All messages, newest first
pub async fn contact_messages(
    State(state): State<AppState>,
) -> ApiResult<Envelope<Vec<ContactMessage>>> {
    Ok(Envelope::new(state.store.list_contacts().await?))
}
