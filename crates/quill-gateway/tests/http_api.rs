// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request/response behavior of the HTTP boundary, driven through the router
//! with mock adapters.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use quill_core::{DraftRecord, DraftStatus, Role};
use quill_gateway::{GatewayState, router};
use quill_test_utils::{TestHarness, self_belief_params};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app_with(harness: &TestHarness) -> Router {
    router(GatewayState::new(harness.controller.clone()), true)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_reports_liveness() {
    let harness = TestHarness::builder().build().await.unwrap();
    let app = app_with(&harness);

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("running"));
}

#[tokio::test]
async fn generate_returns_draft_record() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["Believe in yourself.".to_string()])
        .build()
        .await
        .unwrap();
    let app = app_with(&harness);

    let body = json!({
        "id": 123,
        "date": "2025-07-06",
        "time": "14:30:00",
        "topic": "Self Belief",
        "context": "Why believing in yourself matters",
        "tone": "Encouraging",
        "cta": "Share your story below"
    });
    let response = app.oneshot(post_json("/generate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["output_text"], "Believe in yourself.");
    assert_eq!(json["status"], "awaiting_feedback");
    assert_eq!(json["topic"], "Self Belief");
    assert_eq!(json["approved"], false);
    assert_eq!(harness.mock_provider.invocation_count().await, 1);
}

#[tokio::test]
async fn generate_with_missing_fields_is_unprocessable() {
    let harness = TestHarness::builder().build().await.unwrap();
    let app = app_with(&harness);

    let body = json!({ "topic": "Self Belief" });
    let response = app.oneshot(post_json("/generate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["kind"], "validation");
    assert!(json["error"].as_str().unwrap().contains("context"));
    assert_eq!(harness.mock_provider.invocation_count().await, 0);
}

#[tokio::test]
async fn malformed_json_is_rejected_with_error_body() {
    let harness = TestHarness::builder().build().await.unwrap();
    let app = app_with(&harness);

    let request = Request::builder()
        .method("POST")
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
    let json = body_json(response).await;
    assert_eq!(json["kind"], "validation");
}

#[tokio::test]
async fn provider_failure_maps_to_bad_gateway() {
    let harness = TestHarness::builder()
        .with_failing_provider("upstream timed out")
        .build()
        .await
        .unwrap();
    let app = app_with(&harness);

    let body = serde_json::to_value(self_belief_params()).unwrap();
    let response = app.oneshot(post_json("/generate", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["kind"], "generation");
    assert!(json["error"].as_str().unwrap().contains("upstream timed out"));
}

#[tokio::test]
async fn feedback_refines_and_extends_history() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["First draft.".to_string(), "Shorter draft.".to_string()])
        .build()
        .await
        .unwrap();
    let app = app_with(&harness);

    let generated = harness.start(&self_belief_params()).await.unwrap();
    let mut body = serde_json::to_value(&generated).unwrap();
    body["feedback"] = json!("Make it shorter");

    let response = app.oneshot(post_json("/feedback", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let record: DraftRecord = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(record.draft_text(), "Shorter draft.");
    let roles: Vec<Role> = record.conversation_history.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [Role::System, Role::Assistant, Role::Human, Role::Assistant]
    );
    assert_eq!(record.conversation_history[1].content, "First draft.");
    assert_eq!(record.conversation_history[2].content, "Make it shorter");
    assert_eq!(harness.mock_storage.append_count().await, 0);
}

#[tokio::test]
async fn approved_feedback_persists_once_and_echoes_record() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["Final post.".to_string()])
        .build()
        .await
        .unwrap();
    let app = app_with(&harness);

    let mut generated = harness.start(&self_belief_params()).await.unwrap();
    generated.approved = true;
    generated.status = DraftStatus::Queued;
    let body = serde_json::to_value(&generated).unwrap();

    let response = app.oneshot(post_json("/feedback", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let record: DraftRecord = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(record, generated);

    let appended = harness.mock_storage.appended().await;
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].post, "Final post.");
    assert_eq!(appended[0].status, DraftStatus::Queued);
    assert_eq!(harness.mock_provider.invocation_count().await, 1);
}

#[tokio::test]
async fn storage_failure_maps_to_bad_gateway() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["Final post.".to_string()])
        .with_failing_storage("table not found")
        .build()
        .await
        .unwrap();
    let app = app_with(&harness);

    let mut generated = harness.start(&self_belief_params()).await.unwrap();
    generated.approved = true;
    let body = serde_json::to_value(&generated).unwrap();

    let response = app.oneshot(post_json("/feedback", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["kind"], "persistence");
}

#[tokio::test]
async fn health_reports_adapter_status() {
    let harness = TestHarness::builder().build().await.unwrap();
    let app = app_with(&harness);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["provider"]["status"], "healthy");
    assert_eq!(json["storage"]["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn health_is_degraded_when_storage_fails() {
    let harness = TestHarness::builder()
        .with_failing_storage("unreachable")
        .build()
        .await
        .unwrap();
    let app = app_with(&harness);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["storage"]["status"], "degraded");
    assert_eq!(json["storage"]["detail"], "unreachable");
}

#[tokio::test]
async fn cors_preflight_is_answered_when_permissive() {
    let harness = TestHarness::builder().build().await.unwrap();
    let app = app_with(&harness);

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/generate")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
