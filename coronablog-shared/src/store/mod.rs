/// Persistence seam for accounts, articles and contact messages
///
/// Handlers depend on `dyn RecordStore`, never on a concrete backend:
///
/// - [`PgStore`]: PostgreSQL through sqlx (production)
/// - [`MemoryStore`]: mutex-guarded vectors (tests, and runs without a database)
///
/// Both backends share the same observable semantics. Every write is a single
/// statement; the last write wins and nothing spans entities.
///
/// # Example
///
/// ```
/// use coronablog_shared::store::{MemoryStore, RecordStore, StoreError};
/// use coronablog_shared::models::NewAccount;
///
/// # async fn example() -> Result<(), StoreError> {
/// let store = MemoryStore::new();
/// let alice = NewAccount {
///     name: "Alice".into(),
///     email: "alice@example.com".into(),
///     handle: "alice".into(),
///     password_hash: "$argon2id$...".into(),
/// };
///
/// store.create_account(alice.clone()).await?;
/// assert!(matches!(
///     store.create_account(alice).await,
///     Err(StoreError::DuplicateHandle(_))
/// ));
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

use crate::auth::policy::AccountStatus;
use crate::models::{
    Account, Article, ContactMessage, NewAccount, NewArticle, NewContactMessage, UpdateArticle,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors returned by record stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An account with this handle already exists
    #[error("handle '{0}' is already taken")]
    DuplicateHandle(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts an account with status `Active`
    ///
    /// Fails with [`StoreError::DuplicateHandle`] and writes nothing if the
    /// handle is taken.
    async fn create_account(&self, data: NewAccount) -> Result<Account, StoreError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn account_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

    async fn account_by_handle(&self, handle: &str) -> Result<Option<Account>, StoreError>;

    async fn handle_exists(&self, handle: &str) -> Result<bool, StoreError>;

    /// Returns whether an account with this ID existed
    async fn update_account_status(
        &self,
        id: i64,
        status: AccountStatus,
    ) -> Result<bool, StoreError>;

    async fn create_article(&self, data: NewArticle) -> Result<Article, StoreError>;

    /// Newest first
    async fn list_articles(&self) -> Result<Vec<Article>, StoreError>;

    async fn article_by_id(&self, id: i64) -> Result<Option<Article>, StoreError>;

    async fn update_article(
        &self,
        id: i64,
        data: UpdateArticle,
    ) -> Result<Option<Article>, StoreError>;

    async fn delete_article(&self, id: i64) -> Result<bool, StoreError>;

    async fn create_contact(&self, data: NewContactMessage) -> Result<ContactMessage, StoreError>;

    /// Newest first
    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError>;

    /// Cheap liveness probe used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}
