use crate::e2e::helpers;

use chrono::{DateTime, Utc};
use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

fn last_refresh(body: &serde_json::Value) -> DateTime<Utc> {
    body["last_refresh"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("Missing last_refresh")
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refresh_on_every_manual_request(ctx: &TestContext) {
    ctx.news_api
        .respond_with_articles(&[("Markets rally", "Stocks hit record highs")]);

    let first = ctx.client.post("/api/dashboard/refresh").await.unwrap();
    let second = ctx.client.post("/api/dashboard/refresh").await.unwrap();

    first.assert_status(StatusCode::OK);
    assert_eq!(first.refresh_outcome(), "refreshed");
    assert_eq!(second.refresh_outcome(), "refreshed");
    assert!(last_refresh(second.json()) >= last_refresh(first.json()));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_repeat_fetches_from_cache(ctx: &TestContext) {
    ctx.news_api
        .respond_with_articles(&[("Markets rally", "Stocks hit record highs")]);

    ctx.client.post("/api/dashboard/refresh").await.unwrap();
    let response = ctx.client.post("/api/dashboard/refresh").await.unwrap();

    assert_eq!(response.titles(), vec!["Markets rally".to_string()]);
    assert_eq!(ctx.news_api.hits(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_invalid_api_key(ctx: &TestContext) {
    ctx.news_api.respond_with_error(
        StatusCode::UNAUTHORIZED,
        "apiKeyInvalid",
        "Your API key is invalid or incorrect.",
    );
    let before = ctx.refresh_service.last_refresh().await;

    let response = ctx.client.post("/api/dashboard/refresh").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json();
    assert_eq!(response.refresh_outcome(), "failed");
    assert_eq!(body["total"], 0);
    assert_eq!(body["error"]["kind"], "configuration");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("check your API key"));
    assert!(last_refresh(body) > before);

    // Credential failures are not retried
    assert_eq!(ctx.news_api.hits(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_retry_when_provider_is_unavailable(ctx: &TestContext) {
    ctx.news_api.respond_with_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "unexpectedError",
        "Try again later",
    );

    let response = ctx.client.post("/api/dashboard/refresh").await.unwrap();

    assert_eq!(response.refresh_outcome(), "failed");
    assert_eq!(response.json()["error"]["kind"], "unavailable");
    assert_eq!(ctx.news_api.hits(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_provider_error_code(ctx: &TestContext) {
    ctx.news_api.respond_with_error(
        StatusCode::BAD_REQUEST,
        "parametersMissing",
        "Required parameters are missing.",
    );

    let response = ctx.client.get("/api/dashboard").await.unwrap();
    let body = response.json();

    assert_eq!(response.refresh_outcome(), "failed");
    assert_eq!(body["error"]["kind"], "provider");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("parametersMissing"));
    assert_eq!(body["total"], 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_cache_failed_fetches(ctx: &TestContext) {
    ctx.news_api.respond_with_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "unexpectedError",
        "Try again later",
    );
    ctx.client.post("/api/dashboard/refresh").await.unwrap();

    ctx.news_api
        .respond_with_articles(&[("Markets rally", "Stocks hit record highs")]);
    let response = ctx.client.post("/api/dashboard/refresh").await.unwrap();

    assert_eq!(response.refresh_outcome(), "refreshed");
    assert!(response.json().get("error").is_none());
    assert_eq!(response.titles(), vec!["Markets rally".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_failure_notice_until_next_refresh(ctx: &TestContext) {
    ctx.news_api.respond_with_error(
        StatusCode::UNAUTHORIZED,
        "apiKeyInvalid",
        "Your API key is invalid or incorrect.",
    );
    ctx.client.post("/api/dashboard/refresh").await.unwrap();

    let response = ctx.client.get("/api/dashboard").await.unwrap();

    assert_eq!(response.refresh_outcome(), "not_due");
    assert_eq!(response.json()["error"]["kind"], "configuration");
    assert_eq!(ctx.news_api.hits(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_filters_from_refresh_body(ctx: &TestContext) {
    ctx.news_api.respond_with_articles(&[
        ("Markets rally", "Stocks hit record highs"),
        ("Storm hits coast", "Residents brace for damage"),
    ]);

    let response = ctx
        .client
        .post_json(
            "/api/dashboard/refresh",
            &serde_json::json!({ "sentiment": "Negative", "keyword": "COAST" }),
        )
        .await
        .unwrap();

    assert_eq!(response.refresh_outcome(), "refreshed");
    assert_eq!(response.titles(), vec!["Storm hits coast".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_refresh_body(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/api/dashboard/refresh", "{\"threshold\": ")
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.news_api.hits(), 0);
}
