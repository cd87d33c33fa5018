/// Integration tests for the Corona Blog API
///
/// These drive the full router (session lookup, guards, handlers, error
/// mapping) against an in-memory store:
/// - registration, login, logout and session status
/// - admin and suspension guards
/// - article and contact workflows
/// - remote fallbacks and forecasts

mod common;

use axum::http::{header, Method, StatusCode};
use common::{article, TestContext, PASSWORD};
use coronablog_shared::auth::AccountStatus;
use coronablog_shared::store::RecordStore;
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_admin_guard() {
    let ctx = TestContext::new();

    let alice = ctx.register("alice").await;
    let login = ctx.login("alice").await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["data"]["status"], 0);
    assert_eq!(login.body["data"]["handle"], "alice");
    assert_eq!(login.body["data"]["redirect"], "/blog");
    assert_eq!(login.body["notice"]["message"], "Welcome back, alice Tester!");
    let token = login.body["data"]["token"].as_str().unwrap().to_string();

    // Status 0 may not enter admin routes
    let denied = ctx.get("/dashboard", Some(&token)).await;
    assert_eq!(denied.status, StatusCode::SEE_OTHER);
    assert_eq!(denied.headers.get(header::LOCATION).unwrap(), "/blog");
    assert_eq!(
        denied.body["notice"]["message"],
        "You don't have permission to access this page"
    );

    // Promote through an existing admin; the open session follows
    let admin = ctx.admin_token("root").await;
    let promoted = ctx
        .post(&format!("/users/{}/makeadmin", alice), Some(&admin), json!({}))
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["data"]["status"], 1);
    assert_eq!(promoted.body["data"]["sessions_updated"], 1);
    assert_eq!(
        promoted.body["notice"]["message"],
        "User successfully made admin"
    );

    let allowed = ctx.get("/dashboard", Some(&token)).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert!(allowed.body["data"].is_array());

    // A fresh login now lands on the dashboard
    let relogin = ctx.login("alice").await;
    assert_eq!(relogin.body["data"]["status"], 1);
    assert_eq!(relogin.body["data"]["redirect"], "/dashboard");
}

#[tokio::test]
async fn test_guarded_routes_require_login() {
    let ctx = TestContext::new();

    for uri in ["/dashboard", "/usersettings", "/contactmessages"] {
        let response = ctx.get(uri, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(response.headers.get(header::LOCATION).unwrap(), "/login");
        assert_eq!(
            response.body["notice"]["message"],
            "You need to login to access this page"
        );
    }

    let logout = ctx.post("/logout", None, json!({})).await;
    assert_eq!(logout.status, StatusCode::SEE_OTHER);

    let bogus = ctx.get("/dashboard", Some("not-a-session")).await;
    assert_eq!(bogus.headers.get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn test_banned_account_cannot_log_in() {
    let ctx = TestContext::new();
    let id = ctx.register("mallory").await;
    ctx.store
        .update_account_status(id, AccountStatus::Banned)
        .await
        .unwrap();

    let response = ctx.login("mallory").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "Your account has been suspended");
    assert!(response.body["data"]["token"].is_null());
    assert!(ctx.state.sessions.is_empty());
}

#[tokio::test]
async fn test_ban_clears_open_admin_session() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token("root").await;
    let victim_token = ctx.admin_token("deputy").await;
    let deputy = ctx
        .state
        .store
        .account_by_handle("deputy")
        .await
        .unwrap()
        .unwrap();

    let banned = ctx
        .post(&format!("/users/{}/ban", deputy.id), Some(&admin), json!({}))
        .await;
    assert_eq!(banned.status, StatusCode::OK);
    assert_eq!(banned.body["notice"]["message"], "User successfully banned");

    let sessions_before = ctx.state.sessions.len();
    let response = ctx.get("/dashboard", Some(&victim_token)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.headers.get(header::LOCATION).unwrap(), "/blog");
    assert_eq!(
        response.body["notice"]["message"],
        "Your account has been suspended"
    );
    assert_eq!(ctx.state.sessions.len(), sessions_before - 1);

    // The token is gone for good
    let again = ctx.get("/dashboard", Some(&victim_token)).await;
    assert_eq!(again.headers.get(header::LOCATION).unwrap(), "/login");

    let lifted = ctx
        .post(&format!("/users/{}/removeban", deputy.id), Some(&admin), json!({}))
        .await;
    assert_eq!(lifted.body["data"]["status"], 0);
    assert_eq!(
        lifted.body["notice"]["message"],
        "User ban successfully removed"
    );
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let wrong_password = ctx
        .post(
            "/login",
            None,
            json!({ "handle": "alice", "password": "Wrong2020" }),
        )
        .await;
    let unknown_handle = ctx
        .post(
            "/login",
            None,
            json!({ "handle": "nobody", "password": PASSWORD }),
        )
        .await;

    for response in [wrong_password, unknown_handle] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_duplicate_handle_is_rejected() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let response = ctx
        .post(
            "/register",
            None,
            json!({
                "name": "Another Alice",
                "handle": "alice",
                "email": "alice2@example.com",
                "password": PASSWORD,
                "confirm_password": PASSWORD,
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "Username already exists");
    assert_eq!(ctx.state.store.list_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_registration_validation() {
    let ctx = TestContext::new();

    let response = ctx
        .post(
            "/register",
            None,
            json!({
                "name": "A",
                "handle": "bad handle",
                "email": "not-an-email",
                "password": "weak",
                "confirm_password": "different",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = response.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    for field in ["confirm_password", "email", "handle", "name", "password"] {
        assert!(fields.contains(&field), "missing {field} in {fields:?}");
    }
    assert!(ctx.state.store.list_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let ctx = TestContext::new();
    ctx.register("alice").await;
    let token = ctx.token("alice").await;

    let response = ctx.post("/logout", Some(&token), json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["notice"]["message"],
        "Goodbye, alice! You have been logged out."
    );
    assert!(ctx.state.sessions.get(&token).is_none());

    let again = ctx.post("/logout", Some(&token), json!({})).await;
    assert_eq!(again.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_article_lifecycle() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token("editor").await;

    let created = ctx
        .post("/articles", Some(&admin), article("Vaccines arrive"))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["author"], "editor");
    assert_eq!(
        created.body["notice"]["message"],
        "Article successfully added"
    );
    let content = created.body["data"]["content"].as_str().unwrap();
    assert!(content.contains("&lt;b&gt;and&lt;/b&gt;"));
    let id = created.body["data"]["id"].as_i64().unwrap();

    let feed = ctx.get("/blog", None).await;
    assert_eq!(feed.body["data"].as_array().unwrap().len(), 1);

    let detail = ctx.get(&format!("/blog/{}", id), None).await;
    assert_eq!(detail.body["data"]["title"], "Vaccines arrive");

    let updated = ctx
        .send(
            Method::PUT,
            &format!("/articles/{}", id),
            Some(&admin),
            Some(article("Vaccines arrived")),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["title"], "Vaccines arrived");
    assert_eq!(updated.body["data"]["author"], "editor");

    let deleted = ctx
        .send(Method::DELETE, &format!("/articles/{}", id), Some(&admin), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(
        deleted.body["notice"]["message"],
        "Article successfully deleted"
    );

    let missing = ctx.get(&format!("/blog/{}", id), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "Article not found");

    let gone = ctx
        .send(Method::DELETE, &format!("/articles/{}", id), Some(&admin), None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_article_validation_and_non_admin() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token("editor").await;

    let short = ctx
        .post(
            "/articles",
            Some(&admin),
            json!({ "title": "Hi", "content": "too short", "keywords": "x" }),
        )
        .await;
    assert_eq!(short.status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.register("reader").await;
    let reader = ctx.token("reader").await;
    let denied = ctx.post("/articles", Some(&reader), article("Sneaky post")).await;
    assert_eq!(denied.status, StatusCode::SEE_OTHER);
    assert!(ctx.state.store.list_articles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_user_admin_on_unknown_id() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token("root").await;

    let response = ctx.post("/users/999/ban", Some(&admin), json!({})).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "User not found");

    let users = ctx.get("/usersettings", Some(&admin)).await;
    let users = users.body["data"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_contact_flow() {
    let ctx = TestContext::new();

    let sent = ctx
        .post(
            "/contact",
            None,
            json!({
                "name": "Ayse",
                "surname": "Yilmaz",
                "email": "ayse@example.com",
                "message": "Could you add vaccination statistics?",
            }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED);
    assert_eq!(
        sent.body["notice"]["message"],
        "Message sent successfully! We'll get back to you soon."
    );

    let invalid = ctx
        .post(
            "/contact",
            None,
            json!({ "name": "A", "surname": "B", "email": "x", "message": "short" }),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);

    let admin = ctx.admin_token("root").await;
    let inbox = ctx.get("/contactmessages", Some(&admin)).await;
    let messages = inbox.body["data"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["name"], "Ayse");
}

#[tokio::test]
async fn test_remote_failures_degrade_to_empty_values() {
    let ctx = TestContext::new();

    let info = ctx.get("/information", None).await;
    assert_eq!(info.status, StatusCode::OK);
    assert_eq!(info.body["data"]["total"], json!({}));
    assert_eq!(info.body["data"]["countries"], json!([]));

    let country = ctx.get("/information/countrybyname/Turkey", None).await;
    assert_eq!(country.status, StatusCode::OK);
    assert_eq!(country.body["data"], json!({}));

    let news = ctx.get("/news", None).await;
    assert_eq!(news.status, StatusCode::OK);
    assert_eq!(news.body["data"]["news"], json!([]));
    assert_eq!(news.body["data"]["count"], 0);

    // Failures are not cached
    assert!(ctx.state.cache.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_forecasts() {
    let ctx = TestContext::new();

    let home = ctx.get("/", None).await;
    assert_eq!(home.status, StatusCode::OK);
    assert_eq!(home.body["data"]["days"], 7);
    assert_eq!(home.body["data"]["source"], "model");

    for days in [7, 14, 30] {
        let response = ctx
            .post("/api/predictions", None, json!({ "days": days }))
            .await;
        assert_eq!(response.status, StatusCode::OK);

        let data = &response.body["data"];
        assert_eq!(data["cases"].as_array().unwrap().len(), days);
        assert_eq!(data["deaths"].as_array().unwrap().len(), days);
        let dates = data["dates"].as_array().unwrap();
        assert_eq!(dates.len(), days);
        assert_eq!(dates[0].as_str().unwrap().len(), "2020-06-02".len());
    }

    let rejected = ctx
        .post("/api/predictions", None, json!({ "days": 10 }))
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["message"], "Invalid form data");
}

#[tokio::test]
async fn test_forecast_falls_back_to_mock_without_dataset() {
    let mut ctx = TestContext::new();
    let mut config = (*ctx.state.config).clone();
    config.prediction.dataset_path = "/nonexistent/turkey.csv".into();
    let store = ctx.state.store.clone();
    ctx.state = coronablog_api::app::AppState::new(store, config).unwrap();
    ctx.app = coronablog_api::app::build_router(ctx.state.clone());

    let response = ctx.get("/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["source"], "mock");
    assert_eq!(response.body["data"]["cases"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let ctx = TestContext::new();
    ctx.register("alice").await;
    ctx.token("alice").await;

    let response = ctx.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["data"]["status"], "healthy");
    assert_eq!(response.body["data"]["sessions"], 1);
    assert_eq!(
        response.headers.get("x-content-type-options").unwrap(),
        "nosniff"
    );
}
