/// Account model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE accounts (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(120) NOT NULL,
///     handle VARCHAR(20) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     status SMALLINT NOT NULL DEFAULT 0 CHECK (status IN (0, 1, 2)),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use coronablog_shared::models::account::{Account, NewAccount};
/// use coronablog_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_account = NewAccount {
///     name: "Alice Doe".to_string(),
///     email: "alice@example.com".to_string(),
///     handle: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// match Account::create(&pool, new_account).await? {
///     Some(account) => println!("Created account {}", account.id),
///     None => println!("Handle already taken"),
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::policy::AccountStatus;

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,

    /// Display name
    pub name: String,

    pub email: String,

    /// Unique login name
    pub handle: String,

    /// Argon2id PHC string; never serialized into responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub status: AccountStatus,

    pub created_at: DateTime<Utc>,
}

/// Input for registering an account
///
/// New accounts always start as [`AccountStatus::Active`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub handle: String,

    /// Already-hashed password (NOT plaintext)
    pub password_hash: String,
}

impl Account {
    /// Inserts a new account
    ///
    /// # Returns
    ///
    /// `None` when the handle is already taken; nothing is written in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable or the insert fails
    /// for any reason other than a duplicate handle.
    pub async fn create(pool: &PgPool, data: NewAccount) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, email, handle, password_hash, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (handle) DO NOTHING
            RETURNING id, name, email, handle, password_hash, status, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.handle)
        .bind(data.password_hash)
        .bind(AccountStatus::Active)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Lists every account in registration order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, handle, password_hash, status, created_at
            FROM accounts
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, handle, password_hash, status, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds an account by its exact handle (case-sensitive)
    pub async fn find_by_handle(pool: &PgPool, handle: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, handle, password_hash, status, created_at
            FROM accounts
            WHERE handle = $1
            "#,
        )
        .bind(handle)
        .fetch_optional(pool)
        .await
    }

    pub async fn handle_exists(pool: &PgPool, handle: &str) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE handle = $1)")
                .bind(handle)
                .fetch_one(pool)
                .await?;

        Ok(exists.0)
    }

    /// Sets an account's status
    ///
    /// # Returns
    ///
    /// `true` if an account with this ID existed and was updated
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: AccountStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        Account {
            id: 1,
            name: "Alice Doe".to_string(),
            email: "alice@example.com".to_string(),
            handle: "alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            status: AccountStatus::Admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["handle"], "alice");
        assert_eq!(json["status"], 1);
    }
}
