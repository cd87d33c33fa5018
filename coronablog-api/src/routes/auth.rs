/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Create an account (status active)
/// - `POST /login` - Open a session and get its bearer token
/// - `POST /logout` - Destroy the current session (login required)
///
/// Login failures are uniform: an unknown handle and a wrong password both
/// answer `401` with "Invalid username or password". A banned account with
/// the right password answers `403` and gets no session.

use super::Envelope;
use crate::{
    app::AppState,
    error::ApiResult,
    middleware::guard::CurrentSession,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use coronablog_shared::{
    auth::{authenticate, password, AccountStatus, Notice, Redirect},
    models::{Account, NewAccount},
    validation::{validate_handle, validate_password},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(
        length(min = 3, max = 20, message = "Username must be between 3 and 20 characters"),
        custom(function = "validate_handle")
    )]
    pub handle: String,

    #[validate(
        email(message = "Please enter a valid email address"),
        length(max = 120, message = "Email must be less than 120 characters")
    )]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be between 3 and 20 characters"))]
    pub handle: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,

    pub handle: String,
    pub status: AccountStatus,
    pub expires_at: DateTime<Utc>,

    /// Where the client should go next (`/dashboard` for admins)
    pub redirect: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub redirect: String,
}

/// Register a new account
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Handle already taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Envelope<Account>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let account = state
        .store
        .create_account(NewAccount {
            name: req.name,
            email: req.email,
            handle: req.handle,
            password_hash,
        })
        .await?;

    info!(account_id = account.id, handle = %account.handle, "Account registered");

    Ok((
        StatusCode::CREATED,
        Envelope::new(account)
            .with_notice(Notice::success("Registration successful! You can now login.")),
    ))
}

/// Log in and open a session
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Unknown handle or wrong password
/// - `403 Forbidden`: Account is suspended
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Envelope<LoginResponse>> {
    req.validate()?;

    let account = authenticate(state.store.as_ref(), &req.handle, &req.password).await?;
    let (token, session) = state
        .sessions
        .create(account.id, &account.handle, account.status);

    let redirect = if account.status.is_admin() {
        "/dashboard"
    } else {
        Redirect::Feed.path()
    };

    info!(account_id = account.id, handle = %account.handle, "Logged in");

    Ok(Envelope::new(LoginResponse {
        token,
        handle: session.handle,
        status: session.status,
        expires_at: session.expires_at,
        redirect: redirect.to_string(),
    })
    .with_notice(Notice::success(format!("Welcome back, {}!", account.name))))
}

/// Destroy the current session
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentSession,
) -> ApiResult<Envelope<LogoutResponse>> {
    state.sessions.destroy(&current.token);
    info!(handle = %current.session.handle, "Logged out");

    Ok(Envelope::new(LogoutResponse {
        redirect: Redirect::Feed.path().to_string(),
    })
    .with_notice(Notice::success(format!(
        "Goodbye, {}! You have been logged out.",
        current.session.handle
    ))))
}
