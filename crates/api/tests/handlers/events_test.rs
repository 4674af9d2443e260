use axum::http::StatusCode;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use weekplan_core::models::event::Category;

use crate::test_utils::{ADMIN_TOKEN, REPORTER_TOKEN, TestContext, bearer, event};

#[tokio::test]
async fn test_admin_creates_event_and_agenda_refreshes() {
    let mut ctx = TestContext::with_members();
    ctx.events
        .expect_insert()
        .withf(|e| e.id.is_none() && e.title == "Họp giao ban" && e.category == Category::Meeting)
        .times(1)
        .returning(|e| {
            let mut saved = e.clone();
            saved.id = Some("new-id".to_string());
            Ok(saved)
        });
    ctx.events
        .expect_list()
        .returning(|| Ok(vec![event("new-id", "2024-05-20", "08:00", Category::Meeting)]));
    let server = ctx.server().await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .post("/api/events")
        .add_header(name, value)
        .json(&json!({
            "title": "Họp giao ban",
            "date": "2024-05-20",
            "start_time": "08:00",
            "category": "Họp"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["id"], "new-id");

    let agenda: Value = server.get("/api/agenda").add_query_param("date", "2024-05-20").await.json();
    assert_eq!(agenda["days"]["2024-05-20"][0]["id"], "new-id");
}

#[tokio::test]
async fn test_missing_title_is_rejected() {
    let server = TestContext::with_members().server().await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .post("/api/events")
        .add_header(name, value)
        .json(&json!({ "date": "2024-05-20", "start_time": "08:00" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reporter_and_anonymous_cannot_edit() {
    let server = TestContext::with_members().server().await;
    let (name, value) = bearer(REPORTER_TOKEN);

    let response = server.delete("/api/events/e1").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server
        .post("/api/events")
        .json(&json!({ "title": "x", "date": "2024-05-20", "start_time": "08:00" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server.get("/api/events").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_event() {
    let mut ctx = TestContext::with_members();
    ctx.events
        .expect_delete()
        .with(predicate::eq("e1"))
        .returning(|_| Ok(true));
    ctx.events
        .expect_delete()
        .with(predicate::eq("missing"))
        .returning(|_| Ok(false));
    ctx.events.expect_list().returning(|| Ok(vec![]));
    let server = ctx.server().await;

    let (name, value) = bearer(ADMIN_TOKEN);
    let response = server.delete("/api/events/e1").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let (name, value) = bearer(ADMIN_TOKEN);
    let response = server.delete("/api/events/missing").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_lists_events_sorted() {
    let server = TestContext::with_members()
        .with_events(vec![
            event("b", "2024-05-21", "08:00", Category::Other),
            event("a", "2024-05-20", "09:00", Category::Meeting),
        ])
        .server()
        .await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let body: Value = server.get("/api/events").add_header(name, value).await.json();

    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}
