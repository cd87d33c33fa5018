/// Error handling for the API server
///
/// Handlers return `Result<T, ApiError>`; every variant maps to an HTTP
/// status and a JSON body of the form
/// `{"status": "error", "error": "...", "message": "...", "details": [...]}`.
///
/// Guard denials are not failures in the usual sense: [`ApiError::Denied`]
/// renders as `303 See Other` with a `Location` header and the notice the
/// client should display.
///
/// # Example
///
/// ```
/// use coronablog_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(found: bool) -> ApiResult<Json<Value>> {
///     if !found {
///         return Err(ApiError::NotFound("Article not found".to_string()));
///     }
///     Ok(Json(json!({ "status": "success" })))
/// }
/// ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use coronablog_shared::auth::password::PasswordError;
use coronablog_shared::auth::policy::SUSPENDED_MESSAGE;
use coronablog_shared::auth::{Denial, LoginError, Notice};
use coronablog_shared::store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

pub const DATABASE_ERROR_MESSAGE: &str = "A database error occurred. Please try again later.";
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid username or password";
pub const DUPLICATE_HANDLE_MESSAGE: &str = "Username already exists";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. a taken handle
    Conflict(String),

    /// Unprocessable entity (422)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),

    /// A route guard refused the request (303)
    Denied(Denial),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `"error"`
    pub status: String,

    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

/// Body of a guard redirect
#[derive(Debug, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub status: String,
    pub redirect: String,
    pub notice: Notice,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::Denied(denial) => {
                write!(f, "Redirect to {}: {}", denial.redirect.path(), denial.notice.message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
            ApiError::Denied(denial) => return redirect_response(denial),
        };

        let body = Json(ErrorResponse {
            status: "error".to_string(),
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

fn redirect_response(denial: Denial) -> Response {
    let location = denial.redirect.path();
    let body = Json(RedirectResponse {
        status: "redirect".to_string(),
        redirect: location.to_string(),
        notice: denial.notice,
    });

    let mut response = (StatusCode::SEE_OTHER, body).into_response();
    response
        .headers_mut()
        .insert(header::LOCATION, HeaderValue::from_static(location));
    response
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        ApiError::Denied(denial)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateHandle(_) => ApiError::Conflict(DUPLICATE_HANDLE_MESSAGE.to_string()),
            StoreError::Database(e) => {
                tracing::error!(error = %e, "Store operation failed");
                ApiError::ServiceUnavailable(DATABASE_ERROR_MESSAGE.to_string())
            }
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => ApiError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string()),
            LoginError::Suspended => ApiError::Forbidden(SUSPENDED_MESSAGE.to_string()),
            LoginError::Store(e) => e.into(),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password hashing failed: {}", err))
    }
}

/// Convert validator errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coronablog_shared::auth::Guard;
    use validator::Validate;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::ValidationError(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::InternalError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_denial_redirects() {
        let denial = Guard::AdminRequired.check(None).unwrap_err();
        let response = ApiError::from(denial).into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[test]
    fn test_store_errors() {
        let conflict = ApiError::from(StoreError::DuplicateHandle("alice".into()));
        assert!(matches!(conflict, ApiError::Conflict(ref m) if m == DUPLICATE_HANDLE_MESSAGE));

        let unavailable = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(unavailable, ApiError::ServiceUnavailable(ref m) if m == DATABASE_ERROR_MESSAGE));
    }

    #[test]
    fn test_login_errors() {
        assert!(matches!(
            ApiError::from(LoginError::InvalidCredentials),
            ApiError::Unauthorized(ref m) if m == INVALID_LOGIN_MESSAGE
        ));
        assert!(matches!(
            ApiError::from(LoginError::Suspended),
            ApiError::Forbidden(ref m) if m == SUSPENDED_MESSAGE
        ));
    }

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 3, message = "too short"))]
        title: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_validation_details_are_sorted_by_field() {
        let form = Form {
            title: "a".into(),
            email: "nope".into(),
        };
        let error = ApiError::from(form.validate().unwrap_err());

        match error {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[0].field, "email");
                assert_eq!(details[0].message, "Invalid value for email");
                assert_eq!(details[1].field, "title");
                assert_eq!(details[1].message, "too short");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
