use axum::http::StatusCode;
use chrono::{Duration, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use weekplan_core::{
    models::{
        profile::{Identity, PasswordReset, Role, SessionGrant},
        settings::SiteSettings,
    },
    ports::MockMailer,
};

use crate::test_utils::{ADMIN_TOKEN, REPORTER_TOKEN, RESET_PAGE, TestContext, bearer};

fn grant_for(ctx: &mut TestContext, token: &str, email: &str, role: Role) -> SessionGrant {
    let profile = ctx.add_member(token, email, role);
    SessionGrant {
        token: token.to_string(),
        expires_at: Utc::now() + Duration::days(30),
        identity: Identity {
            id: profile.id,
            email: profile.email,
            full_name: Some(profile.full_name),
            email_confirmed: true,
        },
    }
}

#[tokio::test]
async fn test_login_with_bare_name() {
    let mut ctx = TestContext::new();
    let grant = grant_for(&mut ctx, "fresh-token", "vanthu@example.com", Role::Admin);
    ctx.identity
        .expect_sign_in()
        .with(predicate::eq("vanthu@example.com"), predicate::eq("matkhau123"), predicate::eq(true))
        .returning(move |_, _, _| Ok(Some(grant.clone())));
    let server = ctx.server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "identifier": "vanthu", "password": "matkhau123", "remember": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["token"], "fresh-token");
    assert_eq!(body["profile"]["role"], "admin");
}

#[tokio::test]
async fn test_login_failure_is_unauthorized() {
    let mut ctx = TestContext::new();
    ctx.identity.expect_sign_in().returning(|_, _, _| Ok(None));
    let server = ctx.server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "identifier": "admin@example.com", "password": "wrong" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_up_closed_by_default() {
    let mut ctx = TestContext::new();
    ctx.settings.expect_fetch().returning(|| Ok(None));
    let server = ctx.server().await;

    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "identifier": "moi", "password": "matkhau123", "full_name": "Người mới" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sign_up_when_open() {
    let mut ctx = TestContext::new();
    ctx.settings.expect_fetch().returning(|| {
        Ok(Some(SiteSettings {
            registration_enabled: true,
            ..SiteSettings::default()
        }))
    });
    let grant = grant_for(&mut ctx, "signup-token", "moi@example.com", Role::Reporter);
    ctx.identity
        .expect_sign_up()
        .with(
            predicate::eq("moi@example.com"),
            predicate::eq("matkhau123"),
            predicate::eq("Người mới"),
        )
        .returning(move |_, _, _| Ok(Some(grant.clone())));
    let server = ctx.server().await;

    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "identifier": "moi", "password": "matkhau123", "full_name": "Người mới" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["profile"]["role"], "reporter");
}

#[tokio::test]
async fn test_status_and_logout() {
    let mut ctx = TestContext::with_members();
    ctx.identity
        .expect_sign_out()
        .with(predicate::eq(ADMIN_TOKEN))
        .times(1)
        .returning(|_| Ok(()));
    let server = ctx.server().await;

    let (name, value) = bearer(ADMIN_TOKEN);
    let body: Value = server.get("/api/auth/status").add_header(name, value).await.json();
    assert_eq!(body["authenticated"], true);

    let body: Value = server.get("/api/auth/status").await.json();
    assert_eq!(body["authenticated"], false);

    let (name, value) = bearer(ADMIN_TOKEN);
    let response = server.post("/api/auth/logout").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // Without a token there is nothing to end.
    let response = server.post("/api/auth/logout").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_current_profile() {
    let server = TestContext::with_members().server().await;

    let (name, value) = bearer(REPORTER_TOKEN);
    let body: Value = server.get("/api/profiles/me").add_header(name, value).await.json();
    assert_eq!(body["email"], "phongvien@example.com");

    assert_eq!(server.get("/api/profiles/me").await.status_code(), StatusCode::UNAUTHORIZED);

    let (name, value) = bearer("expired");
    let response = server.get("/api/profiles/me").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_list_is_admin_only() {
    let mut ctx = TestContext::with_members();
    ctx.profiles.expect_list_all().returning(|| Ok(vec![]));
    let server = ctx.server().await;

    let (name, value) = bearer(ADMIN_TOKEN);
    assert_eq!(server.get("/api/profiles").add_header(name, value).await.status_code(), StatusCode::OK);

    let (name, value) = bearer(REPORTER_TOKEN);
    assert_eq!(
        server.get("/api/profiles").add_header(name, value).await.status_code(),
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_sections_per_role() {
    let server = TestContext::with_members().server().await;

    let (name, value) = bearer(REPORTER_TOKEN);
    let body: Value = server.get("/api/sections").add_header(name, value).await.json();
    assert_eq!(body["sections"], json!(["reports"]));
    assert_eq!(body["landing"], "reports");

    let (name, value) = bearer(ADMIN_TOKEN);
    let body: Value = server.get("/api/sections").add_header(name, value).await.json();
    assert_eq!(body["sections"], json!(["events", "users", "reports", "config"]));
    assert_eq!(body["landing"], "events");

    let body: Value = server.get("/api/sections").await.json();
    assert_eq!(body["sections"], json!([]));
    assert_eq!(body["landing"], Value::Null);
}

#[tokio::test]
async fn test_login_identifier_is_case_insensitive() {
    let mut ctx = TestContext::new();
    let grant = grant_for(&mut ctx, "fresh-token", "vanthu@example.com", Role::Admin);
    ctx.identity
        .expect_sign_in()
        .with(predicate::eq("vanthu@example.com"), predicate::always(), predicate::always())
        .times(1)
        .returning(move |_, _, _| Ok(Some(grant.clone())));
    let server = ctx.server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "identifier": " VanThu@Example.com ", "password": "matkhau123" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_request_sends_mail() {
    let mut ctx = TestContext::new();
    ctx.identity
        .expect_issue_password_reset()
        .with(predicate::eq("vanthu@example.com"))
        .times(1)
        .returning(|email| {
            Ok(Some(PasswordReset {
                token: "reset-abc".to_string(),
                email: email.to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            }))
        });
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|to, _, body| {
            to == "vanthu@example.com" && body.contains(&format!("{}?reset_token=reset-abc", RESET_PAGE))
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    ctx.mailer = Some(mailer);
    let server = ctx.server().await;

    let response = server
        .post("/api/auth/reset")
        .json(&json!({ "identifier": "vanthu" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_password_reset_request_for_unknown_account() {
    let mut ctx = TestContext::new();
    ctx.identity.expect_issue_password_reset().returning(|_| Ok(None));
    let mut mailer = MockMailer::new();
    mailer.expect_send().never();
    ctx.mailer = Some(mailer);
    let server = ctx.server().await;

    let response = server
        .post("/api/auth/reset")
        .json(&json!({ "identifier": "khongco@example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_password_reset_without_mail_relay() {
    let server = TestContext::new().server().await;

    let response = server
        .post("/api/auth/reset")
        .json(&json!({ "identifier": "vanthu" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_password_reset_confirm() {
    let mut ctx = TestContext::new();
    let profile = ctx.add_member("old-token", "vanthu@example.com", Role::Admin);
    let identity = Identity {
        id: profile.id,
        email: profile.email,
        full_name: None,
        email_confirmed: true,
    };
    ctx.identity
        .expect_redeem_password_reset()
        .with(predicate::eq("reset-abc"), predicate::eq("matkhaumoi"))
        .times(1)
        .returning(move |_, _| Ok(Some(identity.clone())));
    ctx.identity
        .expect_redeem_password_reset()
        .with(predicate::eq("reset-used"), predicate::always())
        .times(1)
        .returning(|_, _| Ok(None));
    let server = ctx.server().await;

    let response = server
        .post("/api/auth/reset/confirm")
        .json(&json!({ "token": "reset-abc", "password": "matkhaumoi" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .post("/api/auth/reset/confirm")
        .json(&json!({ "token": "reset-used", "password": "matkhaumoi" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/auth/reset/confirm")
        .json(&json!({ "token": "reset-abc", "password": "123" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
