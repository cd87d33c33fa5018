/// Credential checks for the login form
///
/// An unknown handle and a wrong password are indistinguishable to the
/// caller: both return [`LoginError::InvalidCredentials`], and an unknown
/// handle still pays for one Argon2 verification against a throwaway hash.
///
/// Banned accounts are only reported as suspended once the password has been
/// verified, so the suspension notice never confirms that a handle exists to
/// someone who does not know its password.

use std::sync::OnceLock;
use tracing::{debug, error, warn};

use super::password::{hash_password, verify_password};
use crate::models::Account;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid handle or password")]
    InvalidCredentials,

    /// Correct credentials for a banned account
    #[error("Your account has been suspended")]
    Suspended,

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("coronablog-dummy-password").ok())
        .as_deref()
}

/// Verifies `handle` / `password` and returns the account on success
///
/// Handles are matched exactly. No session is created here; the caller opens
/// one only for an `Ok` result.
///
/// # Errors
///
/// - [`LoginError::InvalidCredentials`] for an unknown handle or wrong password
/// - [`LoginError::Suspended`] for a banned account with the right password
/// - [`LoginError::Store`] if the account lookup fails
pub async fn authenticate(
    store: &dyn RecordStore,
    handle: &str,
    password: &str,
) -> Result<Account, LoginError> {
    let Some(account) = store.account_by_handle(handle).await? else {
        if let Some(hash) = dummy_hash() {
            let _ = verify_password(password, hash);
        }
        debug!(handle, "Login attempt for unknown handle");
        return Err(LoginError::InvalidCredentials);
    };

    match verify_password(password, &account.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            debug!(handle, "Login attempt with wrong password");
            return Err(LoginError::InvalidCredentials);
        }
        Err(e) => {
            error!(account_id = account.id, error = %e, "Stored password hash is unusable");
            return Err(LoginError::InvalidCredentials);
        }
    }

    if account.status.is_banned() {
        warn!(account_id = account.id, handle, "Banned account attempted to log in");
        return Err(LoginError::Suspended);
    }

    Ok(account)
}
