/// Account administration (admin only)
///
/// Status changes are written to the store and pushed into every open
/// session of the account, so a ban takes effect on the user's next request.

use super::Envelope;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::extract::{Path, State};
use coronablog_shared::{
    auth::{AccountStatus, Notice},
    models::Account,
};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusChange {
    pub id: i64,
    pub status: AccountStatus,

    /// Open sessions that picked up the new status
    pub sessions_updated: usize,
}

/// All accounts; password hashes are never serialized
pub async fn user_settings(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Account>>> {
    Ok(Envelope::new(state.store.list_accounts().await?))
}

async fn set_status(
    state: &AppState,
    id: i64,
    status: AccountStatus,
    message: &str,
) -> ApiResult<Envelope<StatusChange>> {
    if !state.store.update_account_status(id, status).await? {
        return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
    }

    let sessions_updated = state.sessions.update_status(id, status);
    info!(account_id = id, %status, sessions_updated, "Account status changed");

    Ok(Envelope::new(StatusChange {
        id,
        status,
        sessions_updated,
    })
    .with_notice(Notice::success(message)))
}

pub async fn ban_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<StatusChange>> {
    set_status(&state, id, AccountStatus::Banned, "User successfully banned").await
}

pub async fn remove_ban(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<StatusChange>> {
    set_status(&state, id, AccountStatus::Active, "User ban successfully removed").await
}

pub async fn make_admin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<StatusChange>> {
    set_status(&state, id, AccountStatus::Admin, "User successfully made admin").await
}
