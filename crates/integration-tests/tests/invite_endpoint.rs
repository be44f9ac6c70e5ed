//! Integration tests for the team invitation endpoint.
//!
//! The full router is driven in-process while the notifier talks to a stub
//! provider over real HTTP.

#![allow(clippy::unwrap_used)]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use storedesk_integration_tests::{StubProvider, config_with_provider, empty_config, test_app};
use storedesk_server::db::ExpenseRepository;
use storedesk_server::routes::invites::SEND_INVITE_PATH;

fn invite() -> Value {
    json!({
        "email": "ana@example.com",
        "name": "Ana",
        "link": "https://app.storedesk.app/activate?token=abc123",
        "storeName": "Auto Center Sul",
        "ownerName": "Carlos"
    })
}

async fn post_invite(app: axum::Router, body: String) -> (StatusCode, header::HeaderMap, Value) {
    let response = app
        .oneshot(
            Request::post(SEND_INVITE_PATH)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::ORIGIN, "https://app.storedesk.app")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_invite_is_rendered_and_sent() {
    let provider = StubProvider::start(StatusCode::OK, json!({ "id": "email_1" })).await;
    let app = test_app(
        config_with_provider(&provider, "re_live_key_Zx81kQ"),
        ExpenseRepository::unavailable(),
    );

    let (status, headers, body) = post_invite(app, invite().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body, json!({ "id": "email_1" }));

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0].body;
    assert_eq!(sent["to"], json!(["ana@example.com"]));
    assert_eq!(sent["from"], "StoreDesk <convites@storedesk.app>");
    assert!(sent["subject"].as_str().unwrap().contains("Auto Center Sul"));
    let html = sent["html"].as_str().unwrap();
    assert!(html.contains("Ana"));
    assert!(html.contains("Carlos"));
    assert!(html.contains("activate?token=abc123"));
}

#[tokio::test]
async fn test_provider_rejection_is_500_with_message() {
    let provider = StubProvider::start(
        StatusCode::FORBIDDEN,
        json!({ "statusCode": 403, "message": "API key is invalid", "name": "invalid_api_key" }),
    )
    .await;
    let app = test_app(
        config_with_provider(&provider, "re_live_key_Zx81kQ"),
        ExpenseRepository::unavailable(),
    );

    let (status, _, body) = post_invite(app, invite().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "API key is invalid" }));
}

#[tokio::test]
async fn test_missing_key_is_500_without_calling_provider() {
    let app = test_app(empty_config(), ExpenseRepository::unavailable());

    let (status, headers, body) = post_invite(app, invite().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(body["error"].as_str().unwrap().contains("RESEND_API_KEY"));
}

#[tokio::test]
async fn test_malformed_body_is_500() {
    let provider = StubProvider::start(StatusCode::OK, json!({})).await;
    let app = test_app(
        config_with_provider(&provider, "re_live_key_Zx81kQ"),
        ExpenseRepository::unavailable(),
    );

    let (status, _, body) = post_invite(app, "{not json".to_owned()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_preflight_does_not_reach_provider() {
    let provider = StubProvider::start(StatusCode::OK, json!({})).await;
    let app = test_app(
        config_with_provider(&provider, "re_live_key_Zx81kQ"),
        ExpenseRepository::unavailable(),
    );

    let response = app
        .oneshot(
            Request::options(SEND_INVITE_PATH)
                .header(header::ORIGIN, "https://app.storedesk.app")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(
                    header::ACCESS_CONTROL_REQUEST_HEADERS,
                    "authorization, content-type",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert!(provider.requests().is_empty());
}
