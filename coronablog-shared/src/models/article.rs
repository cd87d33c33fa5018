/// Blog articles
///
/// # Schema
///
/// ```sql
/// CREATE TABLE articles (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(200) NOT NULL,
///     author VARCHAR(20) NOT NULL,
///     content TEXT NOT NULL,
///     keywords VARCHAR(200) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,

    /// Handle of the admin who wrote the article
    pub author: String,

    /// HTML-escaped body
    pub content: String,

    pub keywords: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub author: String,
    pub content: String,
    pub keywords: String,
}

/// Editable article fields; the author and creation time are fixed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateArticle {
    pub title: String,
    pub content: String,
    pub keywords: String,
}

impl Article {
    pub async fn create(pool: &PgPool, data: NewArticle) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, author, content, keywords)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, author, content, keywords, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.author)
        .bind(data.content)
        .bind(data.keywords)
        .fetch_one(pool)
        .await
    }

    /// Lists all articles, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, author, content, keywords, created_at
            FROM articles
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, author, content, keywords, created_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Overwrites title, content and keywords
    ///
    /// Returns the updated article, or `None` if no article has this ID.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateArticle,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET title = $1, content = $2, keywords = $3
            WHERE id = $4
            RETURNING id, title, author, content, keywords, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.keywords)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes an article; `true` if a row was removed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
