/// Session lookup and route guards
///
/// [`load_session`] runs on every request: it resolves the
/// `Authorization: Bearer <token>` header against the session store and, if
/// the token names a live session, puts a [`CurrentSession`] into the request
/// extensions. A missing, malformed or expired token simply leaves the
/// request anonymous.
///
/// The guard layers are applied per route group and delegate the decision to
/// [`Guard::check`]:
///
/// - [`login_required`]: any logged-in session
/// - [`admin_required`]: session status is admin
/// - [`active_user_required`]: session is not banned (a banned session is
///   destroyed before the redirect)
///
/// Denials become `303 See Other` responses through [`ApiError::Denied`].

use crate::{app::AppState, error::ApiError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use coronablog_shared::auth::{policy::LOGIN_REQUIRED_MESSAGE, Guard, Session};
use tracing::{debug, info};

/// The session attached to the current request
#[derive(Debug, Clone)]
pub struct CurrentSession {
    /// Plaintext token the client presented
    pub token: String,

    pub session: Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(LOGIN_REQUIRED_MESSAGE.to_string()))
    }
}

/// Extracts the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the bearer token into a [`CurrentSession`] extension
pub async fn load_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let current = bearer_token(req.headers()).and_then(|token| {
        state.sessions.get(token).map(|session| CurrentSession {
            token: token.to_string(),
            session,
        })
    });

    if let Some(current) = current {
        req.extensions_mut().insert(current);
    }

    next.run(req).await
}

async fn enforce(
    guard: Guard,
    state: &AppState,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = req.extensions().get::<CurrentSession>();

    if let Err(denial) = guard.check(current.map(|c| &c.session)) {
        if let Some(current) = current {
            if denial.clear_session {
                state.sessions.destroy(&current.token);
                info!(handle = %current.session.handle, "Session cleared for suspended account");
            }
        }

        debug!(
            ?guard,
            path = %req.uri().path(),
            redirect = denial.redirect.path(),
            "Request denied"
        );
        return Err(denial.into());
    }

    Ok(next.run(req).await)
}

pub async fn login_required(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    enforce(Guard::LoginRequired, &state, req, next).await
}

pub async fn admin_required(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    enforce(Guard::AdminRequired, &state, req, next).await
}

pub async fn active_user_required(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    enforce(Guard::ActiveUserRequired, &state, req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
