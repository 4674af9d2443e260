use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;
use weekplan_core::models::event::Category;

use crate::test_utils::{TestContext, event};

fn week_events() -> Vec<weekplan_core::models::event::ScheduleEvent> {
    vec![
        event("tue", "2024-05-21", "14:00", Category::CitizenReception),
        event("mon-late", "2024-05-20", "15:00", Category::Meeting),
        event("mon-early", "2024-05-20", "07:30", Category::FieldWork),
        event("next-week", "2024-05-27", "08:00", Category::Meeting),
    ]
}

fn ids(day: &Value) -> Vec<&str> {
    day.as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_weekly_agenda_groups_and_sorts() {
    let server = TestContext::new().with_events(week_events()).server().await;

    let response = server.get("/api/agenda").add_query_param("date", "2024-05-23").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["range"]["start"], "2024-05-20");
    assert_eq!(body["range"]["end"], "2024-05-26");
    assert_eq!(body["range"]["week_number"], 21);

    let days = body["days"].as_object().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(ids(&days["2024-05-20"]), vec!["mon-early", "mon-late"]);
    assert_eq!(ids(&days["2024-05-21"]), vec!["tue"]);
    assert!(days["2024-05-26"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_agenda_filters() {
    let server = TestContext::new().with_events(week_events()).server().await;

    let response = server
        .get("/api/agenda")
        .add_query_param("date", "2024-05-20")
        .add_query_param("categories", "Họp,Tiếp dân")
        .add_query_param("q", "LỊCH MON")
        .await;

    let body: Value = response.json();
    assert_eq!(ids(&body["days"]["2024-05-20"]), vec!["mon-late"]);
    assert!(body["days"]["2024-05-21"].as_array().unwrap().is_empty());
    assert_eq!(body["day_counts"]["2024-05-20"], 2);
    assert_eq!(body["day_counts"]["2024-05-21"], 1);
}

#[tokio::test]
async fn test_agenda_rejects_bad_date() {
    let server = TestContext::new().server().await;

    let response = server.get("/api/agenda").add_query_param("date", "23/05/2024").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
}
