//! Slack Web API client module
//!
//! Thin wrappers over the Web API methods the relay exposes. Every call returns
//! Slack's JSON body untouched, including `"ok": false` bodies; deciding what
//! a Slack-level error means is left to the caller.

use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::core::config::DEFAULT_SLACK_API_BASE_URL;
use crate::errors::SlackError;

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Build the JSON payload for `chat.postMessage`.
#[must_use]
pub fn build_post_message_payload(channel: Option<&str>, text: Option<&str>) -> Value {
    let mut payload = json!({});
    insert_present(&mut payload, "channel", channel);
    insert_present(&mut payload, "text", text);
    payload
}

/// Build the JSON payload for `chat.scheduleMessage`.
#[must_use]
pub fn build_schedule_message_payload(
    channel: Option<&str>,
    text: Option<&str>,
    post_at: i64,
) -> Value {
    let mut payload = build_post_message_payload(channel, text);
    payload["post_at"] = json!(post_at);
    payload
}

/// Build the JSON payload for `chat.update`.
#[must_use]
pub fn build_update_message_payload(
    channel: Option<&str>,
    ts: Option<&str>,
    text: Option<&str>,
) -> Value {
    let mut payload = build_delete_message_payload(channel, ts);
    insert_present(&mut payload, "text", text);
    payload
}

/// Build the JSON payload for `chat.delete`.
#[must_use]
pub fn build_delete_message_payload(channel: Option<&str>, ts: Option<&str>) -> Value {
    let mut payload = json!({});
    insert_present(&mut payload, "channel", channel);
    insert_present(&mut payload, "ts", ts);
    payload
}

// Absent request fields are left out so Slack reports them, rather than
// sending an explicit null.
fn insert_present(payload: &mut Value, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        payload[key] = Value::String(v.to_string());
    }
}

/// Slack Web API client authenticated with a bot token.
#[derive(Debug, Clone)]
pub struct SlackClient {
    token: String,
    base_url: Url,
}

impl SlackClient {
    /// Client against the public `https://slack.com/api/` endpoint.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the default base URL is a valid constant.
    pub fn new(token: String) -> Result<Self, SlackError> {
        Self::with_base_url(token, DEFAULT_SLACK_API_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns `SlackError::ConfigError` if `base_url` is not a valid URL.
    pub fn with_base_url(token: String, base_url: &str) -> Result<Self, SlackError> {
        // Without the trailing slash `Url::join` would replace the last segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Ok(Self {
            token,
            base_url: Url::parse(&normalized)?,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn method_url(&self, method: &str) -> Result<Url, SlackError> {
        Ok(self.base_url.join(method)?)
    }

    async fn read_body(method: &str, resp: reqwest::Response) -> Result<Value, SlackError> {
        let status = resp.status();
        let body: Value = resp.json().await.map_err(|e| {
            warn!(method, %status, "Slack returned a non-JSON body");
            SlackError::ParseError(format!("{method} returned a non-JSON body: {e}"))
        })?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            debug!(
                method,
                error = body.get("error").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
                "Slack reported an API error"
            );
        }

        Ok(body)
    }

    async fn post_json(&self, method: &str, payload: &Value) -> Result<Value, SlackError> {
        let resp = HTTP_CLIENT
            .post(self.method_url(method)?)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .inspect_err(|e| warn!(method, error = %e, "Slack request failed"))?;

        Self::read_body(method, resp).await
    }

    async fn get_query(&self, method: &str, query: &[(&str, &str)]) -> Result<Value, SlackError> {
        let resp = HTTP_CLIENT
            .get(self.method_url(method)?)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .inspect_err(|e| warn!(method, error = %e, "Slack request failed"))?;

        Self::read_body(method, resp).await
    }

    /// Post a message via `chat.postMessage`.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::HttpError` if the request fails, or
    /// `SlackError::ParseError` if the body is not JSON.
    pub async fn post_message(
        &self,
        channel: Option<&str>,
        text: Option<&str>,
    ) -> Result<Value, SlackError> {
        self.post_json(
            "chat.postMessage",
            &build_post_message_payload(channel, text),
        )
        .await
    }

    /// Schedule a message via `chat.scheduleMessage`; `post_at` is epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::HttpError` if the request fails, or
    /// `SlackError::ParseError` if the body is not JSON.
    pub async fn schedule_message(
        &self,
        channel: Option<&str>,
        text: Option<&str>,
        post_at: i64,
    ) -> Result<Value, SlackError> {
        self.post_json(
            "chat.scheduleMessage",
            &build_schedule_message_payload(channel, text, post_at),
        )
        .await
    }

    /// Replace a message's text via `chat.update`.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::HttpError` if the request fails, or
    /// `SlackError::ParseError` if the body is not JSON.
    pub async fn update_message(
        &self,
        channel: Option<&str>,
        ts: Option<&str>,
        text: Option<&str>,
    ) -> Result<Value, SlackError> {
        self.post_json(
            "chat.update",
            &build_update_message_payload(channel, ts, text),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `SlackError::HttpError` if the request fails, or
    /// `SlackError::ParseError` if the body is not JSON.
    pub async fn delete_message(
        &self,
        channel: Option<&str>,
        ts: Option<&str>,
    ) -> Result<Value, SlackError> {
        self.post_json("chat.delete", &build_delete_message_payload(channel, ts))
            .await
    }

    /// Fetch the first page of `conversations.history`, newest message first.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::HttpError` if the request fails, or
    /// `SlackError::ParseError` if the body is not JSON.
    pub async fn conversation_history(&self, channel: &str) -> Result<Value, SlackError> {
        self.get_query("conversations.history", &[("channel", channel)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_post_message_payload() {
        let payload = build_post_message_payload(Some("C123"), Some("hello"));
        assert_eq!(payload, json!({"channel": "C123", "text": "hello"}));
    }

    #[test]
    fn test_build_payload_omits_missing_fields() {
        let payload = build_update_message_payload(Some("C123"), None, Some("edited"));
        assert_eq!(payload["channel"], "C123");
        assert_eq!(payload["text"], "edited");
        assert!(payload.get("ts").is_none());

        let payload = build_delete_message_payload(None, None);
        assert_eq!(payload, json!({}));
    }

    #[test]
    fn test_build_schedule_message_payload() {
        let payload = build_schedule_message_payload(Some("C1"), Some("later"), 1_900_000_000);
        assert_eq!(payload["post_at"], 1_900_000_000);
        assert_eq!(payload["channel"], "C1");
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = SlackClient::with_base_url("xoxb".into(), "http://localhost:9999/api").unwrap();
        assert_eq!(
            client.method_url("chat.delete").unwrap().as_str(),
            "http://localhost:9999/api/chat.delete"
        );

        let client = SlackClient::new("xoxb".into()).unwrap();
        assert_eq!(
            client.method_url("conversations.history").unwrap().as_str(),
            "https://slack.com/api/conversations.history"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = SlackClient::with_base_url("xoxb".into(), "not a url").unwrap_err();
        assert!(matches!(err, SlackError::ConfigError(_)));
    }
}
