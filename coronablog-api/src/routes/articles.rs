/// Blog feed and article management
///
/// # Endpoints
///
/// - `GET /blog` - All articles, newest first
/// - `GET /blog/:id` - One article
/// - `GET /dashboard` - Admin view of all articles
/// - `POST /articles` - Create (admin)
/// - `PUT /articles/:id` - Update (admin)
/// - `DELETE /articles/:id` - Delete (admin)
///
/// Article bodies are HTML-escaped before they are stored. The author is
/// always the handle of the session that created the article.

use super::Envelope;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::guard::CurrentSession,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use coronablog_shared::{
    auth::Notice,
    models::{Article, NewArticle, UpdateArticle},
    validation::sanitize_html,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

pub const ARTICLE_NOT_FOUND: &str = "Article not found";

/// Create and update payload
#[derive(Debug, Deserialize, Validate)]
pub struct ArticleRequest {
    #[validate(length(min = 5, max = 200, message = "Title must be between 5 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 50, message = "Content must be at least 50 characters long"))]
    pub content: String,

    #[validate(length(min = 3, max = 200, message = "Keywords must be between 3 and 200 characters"))]
    pub keywords: String,
}

pub async fn blog(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Article>>> {
    Ok(Envelope::new(state.store.list_articles().await?))
}

/// # Errors
///
/// - `404 Not Found`: No article with this ID
pub async fn article_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<Article>> {
    let article = state
        .store
        .article_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(ARTICLE_NOT_FOUND.to_string()))?;

    Ok(Envelope::new(article))
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Article>>> {
    Ok(Envelope::new(state.store.list_articles().await?))
}

pub async fn create_article(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(req): Json<ArticleRequest>,
) -> ApiResult<(StatusCode, Envelope<Article>)> {
    req.validate()?;

    let article = state
        .store
        .create_article(NewArticle {
            title: req.title,
            author: current.session.handle,
            content: sanitize_html(&req.content),
            keywords: req.keywords,
        })
        .await?;

    info!(article_id = article.id, author = %article.author, "Article created");

    Ok((
        StatusCode::CREATED,
        Envelope::new(article).with_notice(Notice::success("Article successfully added")),
    ))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ArticleRequest>,
) -> ApiResult<Envelope<Article>> {
    req.validate()?;

    let article = state
        .store
        .update_article(
            id,
            UpdateArticle {
                title: req.title,
                content: sanitize_html(&req.content),
                keywords: req.keywords,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(ARTICLE_NOT_FOUND.to_string()))?;

    info!(article_id = id, "Article updated");

    Ok(Envelope::new(article).with_notice(Notice::success("Article successfully updated")))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<i64>> {
    if !state.store.delete_article(id).await? {
        return Err(ApiError::NotFound(ARTICLE_NOT_FOUND.to_string()));
    }

    info!(article_id = id, "Article deleted");

    Ok(Envelope::new(id).with_notice(Notice::success("Article successfully deleted")))
}
