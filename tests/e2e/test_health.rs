use crate::e2e::helpers;

use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_on_health(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header_exists("x-request-id");
    assert_eq!(response.body_bytes, b"OK".to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_ready_when_configured(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!({ "status": "ready", "tts": "configured" }))
    );
}

#[tokio::test]
async fn it_should_report_not_ready_without_credentials() {
    let ctx = TestContext::with_options(TestOptions {
        with_credentials: false,
        ..Default::default()
    })
    .await
    .unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.body,
        Some(json!({ "status": "not_ready", "tts": "missing_credentials" }))
    );
    assert_eq!(ctx.provider.request_count(), 0);
}
