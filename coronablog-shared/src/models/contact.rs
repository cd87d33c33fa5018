/// Messages submitted through the public contact form
///
/// # Schema
///
/// ```sql
/// CREATE TABLE contact_messages (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(120) NOT NULL,
///     name VARCHAR(50) NOT NULL,
///     surname VARCHAR(50) NOT NULL,
///     message TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContactMessage {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub message: String,
}

impl ContactMessage {
    pub async fn create(pool: &PgPool, data: NewContactMessage) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (email, name, surname, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, surname, message, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.surname)
        .bind(data.message)
        .fetch_one(pool)
        .await
    }

    /// Lists all messages, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT id, email, name, surname, message, created_at
            FROM contact_messages
            ORDER BY id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
