//! Common response builders for the route handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Returns a 200 OK response with the given JSON body.
#[must_use]
pub fn ok_json<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Returns a 400 carrying Slack's own `error` code.
///
/// When Slack sent no code the body is `{}`; `null` is never sent.
#[must_use]
pub fn slack_error_response(body: &Value) -> Response {
    let mut out = Map::new();
    if let Some(code) = body.get("error").filter(|v| !v.is_null()) {
        out.insert("error".to_string(), code.clone());
    }
    (StatusCode::BAD_REQUEST, Json(Value::Object(out))).into_response()
}
