use axum::http::StatusCode;
use axum_test::TestServer;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use weekplan_api::build_router;
use weekplan_core::models::settings::SiteSettings;

use crate::test_utils::{ADMIN_TOKEN, REPORTER_TOKEN, TestContext, bearer};

#[tokio::test]
async fn test_settings_fall_back_to_defaults() {
    let mut ctx = TestContext::new();
    ctx.settings
        .expect_fetch()
        .returning(|| Err(eyre::eyre!("permission denied for table site_stats")));
    let server = ctx.server().await;

    let response = server.get("/api/settings").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["registration_enabled"], false);
    assert_eq!(body["theme_color"], "#1e3a8a");
    assert_eq!(body["theme_presets"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_admin_updates_theme() {
    let mut ctx = TestContext::with_members();
    ctx.settings
        .expect_update_theme_color()
        .with(predicate::eq("#991b1b"))
        .times(1)
        .returning(|_| Ok(0));
    ctx.settings
        .expect_insert()
        .withf(|s: &SiteSettings| s.theme_color == "#991b1b")
        .times(1)
        .returning(|_| Ok(()));
    let server = ctx.server().await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .put("/api/settings/theme")
        .add_header(name, value)
        .json(&json!({ "color": "#991B1B" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["theme_color"], "#991b1b");
}

#[tokio::test]
async fn test_invalid_theme_color() {
    let server = TestContext::with_members().server().await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .put("/api/settings/theme")
        .add_header(name, value)
        .json(&json!({ "color": "navy" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_toggle_is_admin_only() {
    let mut ctx = TestContext::with_members();
    ctx.settings
        .expect_update_registration()
        .with(predicate::eq(true))
        .times(1)
        .returning(|_| Ok(1));
    ctx.settings.expect_fetch().returning(|| {
        Ok(Some(SiteSettings {
            registration_enabled: true,
            theme_color: "#991b1b".to_string(),
        }))
    });
    let state = ctx.build_state().await;
    let mut settings_rx = state.settings.subscribe();
    let server = TestServer::new(build_router(state.clone())).unwrap();

    let (name, value) = bearer(REPORTER_TOKEN);
    let response = server
        .put("/api/settings/registration")
        .add_header(name, value)
        .json(&json!({ "enabled": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let (name, value) = bearer(ADMIN_TOKEN);
    let response = server
        .put("/api/settings/registration")
        .add_header(name, value)
        .json(&json!({ "enabled": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // The published settings keep the stored theme rather than the default.
    settings_rx.changed().await.unwrap();
    assert_eq!(settings_rx.borrow().theme_color, "#991b1b");
    assert!(state.settings.current().registration_enabled);
}

#[tokio::test]
async fn test_view_counter() {
    let mut ctx = TestContext::new();
    ctx.views.expect_increment().times(1).returning(|| Ok(1024));
    let server = ctx.server().await;

    let body: Value = server.post("/api/views").await.json();
    assert_eq!(body["count"], 1024);
}

#[tokio::test]
async fn test_view_counter_degrades_to_zero() {
    let mut ctx = TestContext::new();
    ctx.views.expect_increment().returning(|| Err(eyre::eyre!("offline")));
    ctx.views.expect_current().returning(|| Err(eyre::eyre!("offline")));
    let server = ctx.server().await;

    let response = server.post("/api/views").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["count"], 0);
}
