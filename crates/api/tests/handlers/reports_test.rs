use axum::http::{StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::Value;
use weekplan_core::models::event::Category;

use crate::test_utils::{ADMIN_TOKEN, REPORTER_TOKEN, TestContext, bearer, event};

fn ctx() -> TestContext {
    let mut e = event("b", "2024-05-21", "14:00", Category::CitizenReception);
    e.title = "Tiếp dân \"định kỳ\"".to_string();
    e.end_time = Some("16:00".to_string());
    TestContext::with_members().with_events(vec![
        e,
        event("a", "2024-05-20", "08:00", Category::Meeting),
        event("c", "2024-06-02", "08:00", Category::Other),
    ])
}

#[tokio::test]
async fn test_reporter_sees_report() {
    let server = ctx().server().await;
    let (name, value) = bearer(REPORTER_TOKEN);

    let response = server
        .get("/api/reports")
        .add_query_param("from", "2024-05-20")
        .add_query_param("to", "2024-05-31")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let ids: Vec<&str> = body["events"].as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_inverted_range_is_empty() {
    let server = ctx().server().await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let body: Value = server
        .get("/api/reports")
        .add_query_param("from", "2024-06-30")
        .add_query_param("to", "2024-05-01")
        .add_header(name, value)
        .await
        .json();

    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_csv() {
    let server = ctx().server().await;
    let (name, value) = bearer(REPORTER_TOKEN);

    let response = server
        .get("/api/reports/export")
        .add_query_param("from", "2024-05-21")
        .add_query_param("to", "2024-05-21")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "text/csv; charset=utf-8");
    assert!(
        response
            .header(header::CONTENT_DISPOSITION)
            .to_str()
            .unwrap()
            .contains("Bao_cao_lich_cong_tac.csv")
    );

    let text = response.text();
    let lines: Vec<&str> = text.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(lines[0], "Ngày,Thời gian,Nội dung công tác,Địa điểm,Phân loại,Ghi chú");
    assert_eq!(
        lines[1],
        "21/05/2024,14:00 - 16:00,\"Tiếp dân \"\"định kỳ\"\"\",\"\",Tiếp dân,\"\""
    );
}

#[tokio::test]
async fn test_anonymous_cannot_read_reports() {
    let server = ctx().server().await;

    assert_eq!(server.get("/api/reports").await.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(server.get("/api/reports/export").await.status_code(), StatusCode::FORBIDDEN);
}
