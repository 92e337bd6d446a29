use crate::mock::MockTransport;
use crate::unit_tests::{summary, FieldSummary, ENDPOINT};
use crate::{HttpClient, HttpClientError, HttpMethod, TransportError};
use serde_json::json;
use std::sync::Arc;

fn client() -> (Arc<MockTransport>, HttpClient) {
    let transport = Arc::new(MockTransport::new());
    let client = HttpClient::new(transport.clone());
    (transport, client)
}

#[tokio::test]
async fn test_get_decodes_content() {
    let (transport, client) = client();
    transport.respond_json(
        HttpMethod::Get,
        ENDPOINT,
        200,
        json!([{ "id": "1", "label": "A" }]),
    );

    let content: Vec<FieldSummary> = client.get(ENDPOINT).await.expect("request failed");
    assert_eq!(content, vec![summary("1", "A")]);
}

#[tokio::test]
async fn test_status_failure_message_and_detail() {
    let (transport, client) = client();
    let url = format!("{ENDPOINT}/abc");
    transport.respond(HttpMethod::Get, url.clone(), 404, "not here");

    let error = client.get::<FieldSummary>(&url).await.unwrap_err();
    assert!(matches!(error, HttpClientError::Status { status: 404, .. }));

    let api_error = error.api_error().expect("status failures are api errors");
    assert_eq!(api_error.error_message, "Request failed with status code 404.");
    assert_eq!(api_error.error_detail["status"], 404);
    assert_eq!(api_error.error_detail["url"], url.as_str());
    assert_eq!(api_error.error_detail["body"], "not here");
}

#[tokio::test]
async fn test_no_response_failure() {
    let (transport, client) = client();
    transport.unreachable(HttpMethod::Get, ENDPOINT);

    let error = client.get::<Vec<FieldSummary>>(ENDPOINT).await.unwrap_err();
    let api_error = error.api_error().expect("no response is an api error");
    assert_eq!(api_error.error_message, "No response received.");
    assert_eq!(api_error.error_detail["message"], "connection refused");
    assert_eq!(api_error.error_detail["method"], "GET");
}

#[tokio::test]
async fn test_setup_failure_carries_only_message() {
    let (transport, client) = client();
    transport.fail(
        HttpMethod::Post,
        ENDPOINT,
        TransportError::Setup {
            url: ENDPOINT.to_string(),
            message: "relative URL without a base".to_string(),
        },
    );

    let error = client.post(ENDPOINT, &summary("1", "A")).await.unwrap_err();
    let api_error = error.api_error().expect("setup failure is an api error");
    assert_eq!(api_error.error_message, "Error setting up request.");
    assert_eq!(
        api_error.error_detail,
        json!({ "message": "relative URL without a base" })
    );
}

#[tokio::test]
async fn test_undecodable_body_is_unexpected() {
    let (transport, client) = client();
    transport.respond(HttpMethod::Get, ENDPOINT, 200, "<html>");

    let error = client.get::<Vec<FieldSummary>>(ENDPOINT).await.unwrap_err();
    assert!(matches!(error, HttpClientError::Decode { .. }));
    assert!(error.is_unexpected());
    assert!(error.api_error().is_none());
}

#[tokio::test]
async fn test_post_sends_json_body_and_ignores_response() {
    let (transport, client) = client();
    transport.respond(HttpMethod::Post, ENDPOINT, 201, "");

    let response = client
        .post(ENDPOINT, &summary("9", "Nine"))
        .await
        .expect("post failed");
    assert_eq!(response.status, 201);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value =
        serde_json::from_slice(requests[0].body.as_deref().unwrap_or_default()).unwrap();
    assert_eq!(body, json!({ "id": "9", "label": "Nine" }));
}

#[test]
fn test_api_error_serializes_camel_case() {
    let error = HttpClientError::Setup {
        message: "bad".to_string(),
    };
    let value = serde_json::to_value(error.api_error().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({ "errorMessage": "Error setting up request.", "errorDetail": { "message": "bad" } })
    );
}

#[tokio::test]
async fn test_mock_history_can_be_cleared() {
    let (transport, client) = client();
    transport.always_json(HttpMethod::Get, ENDPOINT, 200, json!([]));

    let _ = client.get::<Vec<FieldSummary>>(ENDPOINT).await;
    assert_eq!(transport.request_count(HttpMethod::Get, ENDPOINT), 1);

    transport.clear_requests();
    assert!(transport.requests().is_empty());

    let _ = client.get::<Vec<FieldSummary>>(ENDPOINT).await;
    assert_eq!(transport.request_count(HttpMethod::Get, ENDPOINT), 1);
}
