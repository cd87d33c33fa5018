/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use coronablog_api::{app::{build_router, AppState}, config::Config};
/// use coronablog_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config)?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{guard, security::SecurityHeadersLayer},
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use coronablog_shared::{
    auth::SessionStore,
    cache::TtlCache,
    prediction::Predictor,
    remote::{RemoteServiceError, StatsClient},
    store::RecordStore,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Accounts, articles and contact messages
    pub store: Arc<dyn RecordStore>,

    /// Logged-in clients keyed by token
    pub sessions: Arc<SessionStore>,

    /// Statistics responses (`corona_info`, `corona_news`)
    pub cache: Arc<Mutex<TtlCache<Value>>>,

    pub stats: StatsClient,

    pub predictor: Arc<Predictor>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    ///
    /// # Errors
    ///
    /// Fails if the statistics client cannot be built (e.g. the API key
    /// contains characters not allowed in a header).
    pub fn new(store: Arc<dyn RecordStore>, config: Config) -> Result<Self, RemoteServiceError> {
        let stats = StatsClient::new(config.stats_config())?;

        Ok(Self {
            store,
            sessions: Arc::new(SessionStore::new(config.session_lifetime())),
            cache: Arc::new(Mutex::new(TtlCache::new(config.cache_ttl()))),
            stats,
            predictor: Arc::new(Predictor::new(config.prediction_config())),
            config: Arc::new(config),
        })
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health
/// ├── GET  /                              # 7-day forecast
/// ├── POST /api/predictions               # forecast for 7, 14 or 30 days
/// ├── GET  /information                   # totals + countries (cached)
/// ├── GET  /information/countrybyname/:c
/// ├── GET  /news                          # news (cached)
/// ├── POST /register
/// ├── POST /login
/// ├── POST /logout                        # login required
/// ├── GET  /blog, /blog/:id
/// ├── POST /contact
/// └── admin (active admin session required)
///     ├── GET    /dashboard, /usersettings, /contactmessages
///     ├── POST   /articles
///     ├── PUT    /articles/:id
///     ├── DELETE /articles/:id
///     └── POST   /users/:id/{ban,removeban,makeadmin}
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Session lookup (Bearer token to [`guard::CurrentSession`])
/// 5. Route guards (per route group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", get(routes::predictions::index))
        .route("/api/predictions", post(routes::predictions::predict))
        .route("/information", get(routes::corona::information))
        .route(
            "/information/countrybyname/:country",
            get(routes::corona::country_by_name),
        )
        .route("/news", get(routes::corona::news))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/blog", get(routes::articles::blog))
        .route("/blog/:id", get(routes::articles::article_detail))
        .route("/contact", post(routes::contact::create_contact));

    let member_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route_layer(from_fn_with_state(state.clone(), guard::login_required));

    // Route layers wrap in reverse: the suspension check runs first.
    let admin_routes = Router::new()
        .route("/dashboard", get(routes::articles::dashboard))
        .route("/articles", post(routes::articles::create_article))
        .route(
            "/articles/:id",
            axum::routing::put(routes::articles::update_article)
                .delete(routes::articles::delete_article),
        )
        .route("/usersettings", get(routes::users::user_settings))
        .route("/users/:id/ban", post(routes::users::ban_user))
        .route("/users/:id/removeban", post(routes::users::remove_ban))
        .route("/users/:id/makeadmin", post(routes::users::make_admin))
        .route("/contactmessages", get(routes::contact::contact_messages))
        .route_layer(from_fn_with_state(state.clone(), guard::admin_required))
        .route_layer(from_fn_with_state(state.clone(), guard::active_user_required));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .layer(from_fn_with_state(state.clone(), guard::load_session))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production()))
        .with_state(state)
}
