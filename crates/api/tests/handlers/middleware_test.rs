use axum::http::StatusCode;
use rstest::rstest;
use serde_json::Value;
use weekplan_api::middleware::error_handling::map_error;
use weekplan_core::errors::PlanError;

use crate::test_utils::TestContext;

#[rstest]
#[case(PlanError::NotFound("Event with ID e1 not found".to_string()), StatusCode::NOT_FOUND)]
#[case(PlanError::Validation("Missing required field: title".to_string()), StatusCode::BAD_REQUEST)]
#[case(PlanError::Authentication("Invalid login credentials".to_string()), StatusCode::UNAUTHORIZED)]
#[case(PlanError::Authorization("Not permitted".to_string()), StatusCode::FORBIDDEN)]
#[case(PlanError::Upstream("Assistant is not configured".to_string()), StatusCode::BAD_GATEWAY)]
#[case(PlanError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: PlanError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_health_and_version() {
    let server = TestContext::new().server().await;

    let body: Value = server.get("/health").await.json();
    assert_eq!(body["status"], "ok");

    let body: Value = server.get("/version").await.json();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
