use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use slack_relay::errors::SlackError;
use slack_relay::slack::SlackClient;

async fn body_json(err: SlackError) -> (StatusCode, Value) {
    let resp = err.into_response();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_slack_error_display() {
    let error = SlackError::ParseError("chat.delete returned a non-JSON body".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to parse Slack response: chat.delete returned a non-JSON body"
    );

    let error = SlackError::HttpError("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );

    let error = SlackError::ConfigError("invalid Slack API URL".to_string());
    assert_eq!(
        format!("{error}"),
        "Invalid configuration: invalid Slack API URL"
    );
}

#[tokio::test]
async fn test_reqwest_error_becomes_http_error() {
    // A relative URL fails while building the request, no network needed
    let err = reqwest::Client::new()
        .get("not-a-url")
        .send()
        .await
        .unwrap_err();

    match SlackError::from(err) {
        SlackError::HttpError(msg) => assert!(!msg.is_empty()),
        other => panic!("Expected HttpError, got: {other:?}"),
    }
}

#[test]
fn test_bad_base_url_is_config_error() {
    let err = SlackClient::with_base_url("xoxb".to_string(), "::not a url::").unwrap_err();
    assert!(matches!(err, SlackError::ConfigError(_)));
    assert!(err.to_string().contains("invalid Slack API URL"));
}

#[tokio::test]
async fn test_every_variant_is_a_server_error_with_bare_message() {
    for (err, message) in [
        (SlackError::HttpError("connection refused".into()), "connection refused"),
        (SlackError::ParseError("not json".into()), "not json"),
        (SlackError::ConfigError("bad url".into()), "bad url"),
    ] {
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], message);
    }
}
