/// Authentication and access control
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and registration password rules
/// - [`login`]: credential verification against the record store
/// - [`session`]: server-side sessions addressed by opaque tokens
/// - [`policy`]: account status model and route guards
///
/// # Example
///
/// ```no_run
/// use coronablog_shared::auth::{login, session::SessionStore};
/// use coronablog_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let sessions = SessionStore::default();
///
/// let account = login::authenticate(&store, "alice", "Secret123").await?;
/// let (token, _session) = sessions.create(account.id, &account.handle, account.status);
/// # Ok(())
/// # }
/// ```

pub mod login;
pub mod password;
pub mod policy;
pub mod session;

pub use login::{authenticate, LoginError};
pub use policy::{AccountStatus, Denial, Guard, Notice, NoticeLevel, Redirect};
pub use session::{Session, SessionStore};
