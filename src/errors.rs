use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlackError {
    /// Slack answered with something other than a JSON body.
    #[error("Failed to parse Slack response: {0}")]
    ParseError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for SlackError {
    fn from(error: reqwest::Error) -> Self {
        SlackError::HttpError(error.to_string())
    }
}

impl From<url::ParseError> for SlackError {
    fn from(error: url::ParseError) -> Self {
        SlackError::ConfigError(format!("invalid Slack API URL: {error}"))
    }
}

// Every failure reaching a handler is upstream-side; handlers surface the bare
// message, not the Display prefix.
impl IntoResponse for SlackError {
    fn into_response(self) -> Response {
        let message = match self {
            SlackError::ParseError(m) | SlackError::HttpError(m) | SlackError::ConfigError(m) => m,
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}
