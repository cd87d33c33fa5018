use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{RecordStore, StoreError};
use crate::auth::policy::AccountStatus;
use crate::db::pool::health_check;
use crate::models::{
    Account, Article, ContactMessage, NewAccount, NewArticle, NewContactMessage, UpdateArticle,
};

/// PostgreSQL-backed record store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn create_account(&self, data: NewAccount) -> Result<Account, StoreError> {
        let handle = data.handle.clone();
        match Account::create(&self.pool, data).await? {
            Some(account) => Ok(account),
            None => {
                debug!(handle = %handle, "Rejected duplicate handle");
                Err(StoreError::DuplicateHandle(handle))
            }
        }
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(Account::list(&self.pool).await?)
    }

    async fn account_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(Account::find_by_id(&self.pool, id).await?)
    }

    async fn account_by_handle(&self, handle: &str) -> Result<Option<Account>, StoreError> {
        Ok(Account::find_by_handle(&self.pool, handle).await?)
    }

    async fn handle_exists(&self, handle: &str) -> Result<bool, StoreError> {
        Ok(Account::handle_exists(&self.pool, handle).await?)
    }

    async fn update_account_status(
        &self,
        id: i64,
        status: AccountStatus,
    ) -> Result<bool, StoreError> {
        Ok(Account::update_status(&self.pool, id, status).await?)
    }

    async fn create_article(&self, data: NewArticle) -> Result<Article, StoreError> {
        Ok(Article::create(&self.pool, data).await?)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        Ok(Article::list(&self.pool).await?)
    }

    async fn article_by_id(&self, id: i64) -> Result<Option<Article>, StoreError> {
        Ok(Article::find_by_id(&self.pool, id).await?)
    }

    async fn update_article(
        &self,
        id: i64,
        data: UpdateArticle,
    ) -> Result<Option<Article>, StoreError> {
        Ok(Article::update(&self.pool, id, data).await?)
    }

    async fn delete_article(&self, id: i64) -> Result<bool, StoreError> {
        Ok(Article::delete(&self.pool, id).await?)
    }

    async fn create_contact(&self, data: NewContactMessage) -> Result<ContactMessage, StoreError> {
        Ok(ContactMessage::create(&self.pool, data).await?)
    }

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        Ok(ContactMessage::list(&self.pool).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
