/// Account status model and route guards
///
/// Every account carries one of three statuses. Route access is decided by
/// three guard tiers that look only at the current session (or its absence):
///
/// | Guard | No session | Wrong status |
/// |---|---|---|
/// | `LoginRequired` | redirect to login | - |
/// | `AdminRequired` | redirect to login | status ≠ admin ⇒ redirect to the feed |
/// | `ActiveUserRequired` | redirect to login | banned ⇒ clear session, redirect to the feed |
///
/// Guards are pure; applying the denial (redirecting, clearing the session) is
/// left to the HTTP layer.
///
/// # Example
///
/// ```
/// use coronablog_shared::auth::policy::{AccountStatus, Guard, Redirect};
///
/// assert!(AccountStatus::Admin.is_admin());
///
/// let denial = Guard::AdminRequired.check(None).unwrap_err();
/// assert_eq!(denial.redirect, Redirect::Login);
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::session::Session;

/// Tri-state account flag, stored as a small integer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(try_from = "i16", into = "i16")]
pub enum AccountStatus {
    /// Regular account (0)
    #[default]
    Active = 0,

    /// May curate articles and manage accounts (1)
    Admin = 1,

    /// Suspended; cannot log in (2)
    Banned = 2,
}

impl AccountStatus {
    /// Raw stored value
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn is_admin(self) -> bool {
        self == AccountStatus::Admin
    }

    pub fn is_banned(self) -> bool {
        self == AccountStatus::Banned
    }

    pub fn is_active(self) -> bool {
        self == AccountStatus::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Admin => "admin",
            AccountStatus::Banned => "banned",
        }
    }
}

impl TryFrom<i16> for AccountStatus {
    type Error = InvalidStatus;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountStatus::Active),
            1 => Ok(AccountStatus::Admin),
            2 => Ok(AccountStatus::Banned),
            other => Err(InvalidStatus(other)),
        }
    }
}

impl From<AccountStatus> for i16 {
    fn from(status: AccountStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid account status: {0}")]
pub struct InvalidStatus(pub i16);

/// `status == 1`
pub fn is_admin(status: AccountStatus) -> bool {
    status.is_admin()
}

/// `status == 2`
pub fn is_banned(status: AccountStatus) -> bool {
    status.is_banned()
}

/// `status == 0`
pub fn is_active(status: AccountStatus) -> bool {
    status.is_active()
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// One-shot message shown to the user alongside a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }
}

/// Where a denied request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Redirect {
    /// The login form
    Login,

    /// The public article feed
    Feed,
}

impl Redirect {
    pub fn path(self) -> &'static str {
        match self {
            Redirect::Login => "/login",
            Redirect::Feed => "/blog",
        }
    }
}

/// Outcome of a failed guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub redirect: Redirect,
    pub notice: Notice,

    /// The caller must destroy the current session before redirecting
    pub clear_session: bool,
}

pub const LOGIN_REQUIRED_MESSAGE: &str = "You need to login to access this page";
pub const PERMISSION_DENIED_MESSAGE: &str = "You don't have permission to access this page";
pub const SUSPENDED_MESSAGE: &str = "Your account has been suspended";

impl Denial {
    fn login_required() -> Self {
        Self {
            redirect: Redirect::Login,
            notice: Notice::warning(LOGIN_REQUIRED_MESSAGE),
            clear_session: false,
        }
    }

    fn permission_denied() -> Self {
        Self {
            redirect: Redirect::Feed,
            notice: Notice::danger(PERMISSION_DENIED_MESSAGE),
            clear_session: false,
        }
    }

    fn suspended() -> Self {
        Self {
            redirect: Redirect::Feed,
            notice: Notice::danger(SUSPENDED_MESSAGE),
            clear_session: true,
        }
    }
}

/// Route access tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    LoginRequired,
    AdminRequired,
    ActiveUserRequired,
}

impl Guard {
    /// Decides whether a request carrying `session` may proceed
    pub fn check(self, session: Option<&Session>) -> Result<(), Denial> {
        let session = match session {
            Some(session) if session.logged_in => session,
            _ => return Err(Denial::login_required()),
        };

        match self {
            Guard::LoginRequired => Ok(()),
            Guard::AdminRequired if !session.status.is_admin() => {
                Err(Denial::permission_denied())
            }
            Guard::AdminRequired => Ok(()),
            Guard::ActiveUserRequired if session.status.is_banned() => Err(Denial::suspended()),
            Guard::ActiveUserRequired => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session_with(status: AccountStatus) -> Session {
        Session {
            logged_in: true,
            handle: "alice".to_string(),
            status,
            account_id: 1,
            expires_at: Utc::now() + chrono::Duration::hours(2),
        }
    }

    #[test]
    fn test_status_predicates() {
        assert!(is_admin(AccountStatus::Admin));
        assert!(!is_admin(AccountStatus::Active));
        assert!(!is_admin(AccountStatus::Banned));

        assert!(is_banned(AccountStatus::Banned));
        assert!(!is_banned(AccountStatus::Active));
        assert!(!is_banned(AccountStatus::Admin));

        assert!(is_active(AccountStatus::Active));
    }

    #[test]
    fn test_statuses_are_mutually_exclusive() {
        for status in [AccountStatus::Active, AccountStatus::Admin, AccountStatus::Banned] {
            let flags = [status.is_active(), status.is_admin(), status.is_banned()];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{status}");
        }
    }

    #[test]
    fn test_status_codes_roundtrip_and_reject_unknown() {
        for code in 0..=2 {
            let status = AccountStatus::try_from(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert_eq!(AccountStatus::try_from(3), Err(InvalidStatus(3)));
        assert_eq!(AccountStatus::try_from(-1), Err(InvalidStatus(-1)));
    }

    #[test]
    fn test_status_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&AccountStatus::Banned).unwrap(), "2");
        let parsed: AccountStatus = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, AccountStatus::Admin);
        assert!(serde_json::from_str::<AccountStatus>("7").is_err());
    }

    #[test]
    fn test_every_guard_requires_a_session() {
        for guard in [Guard::LoginRequired, Guard::AdminRequired, Guard::ActiveUserRequired] {
            let denial = guard.check(None).unwrap_err();
            assert_eq!(denial.redirect, Redirect::Login);
            assert_eq!(denial.notice.level, NoticeLevel::Warning);
            assert!(!denial.clear_session);
        }
    }

    #[test]
    fn test_logged_out_session_is_treated_as_absent() {
        let mut session = session_with(AccountStatus::Admin);
        session.logged_in = false;
        let denial = Guard::LoginRequired.check(Some(&session)).unwrap_err();
        assert_eq!(denial.redirect, Redirect::Login);
    }

    #[test]
    fn test_admin_required() {
        assert!(Guard::AdminRequired
            .check(Some(&session_with(AccountStatus::Admin)))
            .is_ok());

        for status in [AccountStatus::Active, AccountStatus::Banned] {
            let denial = Guard::AdminRequired
                .check(Some(&session_with(status)))
                .unwrap_err();
            assert_eq!(denial.redirect, Redirect::Feed);
            assert_eq!(denial.notice.message, PERMISSION_DENIED_MESSAGE);
            assert!(!denial.clear_session);
        }
    }

    #[test]
    fn test_active_user_required() {
        assert!(Guard::ActiveUserRequired
            .check(Some(&session_with(AccountStatus::Active)))
            .is_ok());
        assert!(Guard::ActiveUserRequired
            .check(Some(&session_with(AccountStatus::Admin)))
            .is_ok());

        let denial = Guard::ActiveUserRequired
            .check(Some(&session_with(AccountStatus::Banned)))
            .unwrap_err();
        assert_eq!(denial.redirect, Redirect::Feed);
        assert_eq!(denial.notice.message, SUSPENDED_MESSAGE);
        assert!(denial.clear_session);
    }

    #[test]
    fn test_login_required_accepts_any_status() {
        for status in [AccountStatus::Active, AccountStatus::Admin, AccountStatus::Banned] {
            assert!(Guard::LoginRequired.check(Some(&session_with(status))).is_ok());
        }
    }

    #[test]
    fn test_redirect_paths() {
        assert_eq!(Redirect::Login.path(), "/login");
        assert_eq!(Redirect::Feed.path(), "/blog");
    }
}
