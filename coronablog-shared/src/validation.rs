/// Input rules shared by the registration, article and prediction forms
///
/// The functions returning `ValidationError` plug into
/// `#[validate(custom(function = "..."))]` on request structs.

use std::borrow::Cow;
use validator::ValidationError;

use crate::auth::password::validate_password_strength;

/// Forecast lengths the prediction form offers
pub const ALLOWED_HORIZONS: [usize; 3] = [7, 14, 30];

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Handles may only contain ASCII letters, digits and underscores
pub fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    if !handle.is_empty() && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(error(
            "handle",
            "Username can only contain letters, numbers, and underscores",
        ))
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    validate_password_strength(password).map_err(|message| error("password_strength", message))
}

pub fn is_allowed_horizon(days: usize) -> bool {
    ALLOWED_HORIZONS.contains(&days)
}

/// Escapes HTML special characters so stored text renders literally
pub fn sanitize_html(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
