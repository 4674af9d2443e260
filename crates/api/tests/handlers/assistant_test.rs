use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use weekplan_core::{models::event::Category, ports::MockLanguageModel};

use crate::test_utils::{ADMIN_TOKEN, REPORTER_TOKEN, TestContext, bearer, event};

#[tokio::test]
async fn test_ask_uses_agenda_snapshot() {
    let mut model = MockLanguageModel::new();
    model
        .expect_generate()
        .withf(|req| req.prompt.contains("Lịch e1") && req.prompt.contains("Sáng thứ hai?"))
        .returning(|_| Ok("Họp lúc 08:00.".to_string()));
    let mut ctx = TestContext::new().with_events(vec![event("e1", "2024-05-20", "08:00", Category::Meeting)]);
    ctx.model = Some(model);
    let server = ctx.server().await;

    let response = server
        .post("/api/assistant/ask")
        .json(&json!({ "question": "Sáng thứ hai?" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["answer"], "Họp lúc 08:00.");
}

#[tokio::test]
async fn test_ask_reports_connection_failure_as_answer() {
    let mut model = MockLanguageModel::new();
    model.expect_generate().returning(|_| Err(eyre::eyre!("503")));
    let mut ctx = TestContext::new();
    ctx.model = Some(model);
    let server = ctx.server().await;

    let body: Value = server
        .post("/api/assistant/ask")
        .json(&json!({ "question": "Hôm nay có gì?" }))
        .await
        .json();

    assert_eq!(body["answer"], "Lỗi kết nối AI.");
}

#[tokio::test]
async fn test_assistant_disabled_without_model() {
    let server = TestContext::new().server().await;

    let response = server
        .post("/api/assistant/ask")
        .json(&json!({ "question": "?" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_extract_keeps_editing_id() {
    let mut model = MockLanguageModel::new();
    model.expect_generate().returning(|_| {
        Ok(r#"{"title":"Tiếp công dân","date":"2024-05-24","start_time":"08:00","category":"Tiếp dân"}"#.to_string())
    });
    let mut ctx = TestContext::with_members();
    ctx.model = Some(model);
    let server = ctx.server().await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .post("/api/assistant/extract")
        .add_header(name, value)
        .json(&json!({ "text": "Sáng thứ sáu tiếp công dân", "editing_id": "e7" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["draft"]["id"], "e7");
    assert_eq!(body["draft"]["category"], "Tiếp dân");
}

#[tokio::test]
async fn test_extract_is_admin_only() {
    let mut ctx = TestContext::with_members();
    ctx.model = Some(MockLanguageModel::new());
    let server = ctx.server().await;
    let (name, value) = bearer(REPORTER_TOKEN);

    let response = server
        .post("/api/assistant/extract")
        .add_header(name, value)
        .json(&json!({ "text": "họp" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
