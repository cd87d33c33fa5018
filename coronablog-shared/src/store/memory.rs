/// In-process record store
///
/// Behaves like [`super::PgStore`] (unique handles, newest-first listings,
/// `bool`/`Option` results for missing rows) without a database. IDs start at
/// 1 and are never reused.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{RecordStore, StoreError};
use crate::auth::policy::AccountStatus;
use crate::models::{
    Account, Article, ContactMessage, NewAccount, NewArticle, NewContactMessage, UpdateArticle,
};

#[derive(Debug, Default)]
struct Tables {
    accounts: Vec<Account>,
    articles: Vec<Article>,
    contacts: Vec<ContactMessage>,
    next_account_id: i64,
    next_article_id: i64,
    next_contact_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_account(&self, data: NewAccount) -> Result<Account, StoreError> {
        let mut tables = self.tables();
        if tables.accounts.iter().any(|a| a.handle == data.handle) {
            return Err(StoreError::DuplicateHandle(data.handle));
        }

        let account = Account {
            id: next_id(&mut tables.next_account_id),
            name: data.name,
            email: data.email,
            handle: data.handle,
            password_hash: data.password_hash,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        };
        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.tables().accounts.clone())
    }

    async fn account_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.tables().accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn account_by_handle(&self, handle: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .tables()
            .accounts
            .iter()
            .find(|a| a.handle == handle)
            .cloned())
    }

    async fn handle_exists(&self, handle: &str) -> Result<bool, StoreError> {
        Ok(self.tables().accounts.iter().any(|a| a.handle == handle))
    }

    async fn update_account_status(
        &self,
        id: i64,
        status: AccountStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        match tables.accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_article(&self, data: NewArticle) -> Result<Article, StoreError> {
        let mut tables = self.tables();
        let article = Article {
            id: next_id(&mut tables.next_article_id),
            title: data.title,
            author: data.author,
            content: data.content,
            keywords: data.keywords,
            created_at: Utc::now(),
        };
        tables.articles.push(article.clone());
        Ok(article)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        let mut articles = self.tables().articles.clone();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(articles)
    }

    async fn article_by_id(&self, id: i64) -> Result<Option<Article>, StoreError> {
        Ok(self.tables().articles.iter().find(|a| a.id == id).cloned())
    }

    async fn update_article(
        &self,
        id: i64,
        data: UpdateArticle,
    ) -> Result<Option<Article>, StoreError> {
        let mut tables = self.tables();
        Ok(tables.articles.iter_mut().find(|a| a.id == id).map(|article| {
            article.title = data.title;
            article.content = data.content;
            article.keywords = data.keywords;
            article.clone()
        }))
    }

    async fn delete_article(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let before = tables.articles.len();
        tables.articles.retain(|a| a.id != id);
        Ok(tables.articles.len() < before)
    }

    async fn create_contact(&self, data: NewContactMessage) -> Result<ContactMessage, StoreError> {
        let mut tables = self.tables();
        let message = ContactMessage {
            id: next_id(&mut tables.next_contact_id),
            email: data.email,
            name: data.name,
            surname: data.surname,
            message: data.message,
            created_at: Utc::now(),
        };
        tables.contacts.push(message.clone());
        Ok(message)
    }

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let mut contacts = self.tables().contacts.clone();
        contacts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(contacts)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
