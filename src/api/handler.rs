//! HTTP routes - thin relay between JSON clients and the Slack Web API.
//!
//! Routes:
//! - `POST /message/send` → `chat.postMessage`
//! - `POST /message/schedule` → `chat.scheduleMessage`
//! - `GET /messages/{channel}` → `conversations.history`, normalized
//! - `POST /message/edit` → `chat.update`
//! - `POST /message/delete` → `chat.delete`
//! - `GET /health`

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::helpers::{err_response, ok_json, slack_error_response};
use super::parsing::{parse_schedule_time, v_array};
use crate::core::config::AppConfig;
use crate::core::models::{
    DeleteMessageRequest, EditMessageRequest, HistoryResponse, ScheduleMessageRequest,
    SendMessageRequest,
};
use crate::errors::SlackError;
use crate::slack::client::SlackClient;
use crate::slack::history::{RawMessage, normalize_history_in};
use crate::utils::timestamp::DisplayZone;

pub const INVALID_SCHEDULE_MESSAGE: &str = "Invalid date or time format";
pub const PAST_SCHEDULE_MESSAGE: &str = "Scheduled time must be in the future";

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub slack: Arc<SlackClient>,
    pub display_zone: DisplayZone,
}

impl AppState {
    #[must_use]
    pub fn new(slack: SlackClient, display_zone: DisplayZone) -> Self {
        Self {
            slack: Arc::new(slack),
            display_zone,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the configured Slack API base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, SlackError> {
        let slack = SlackClient::with_base_url(
            config.slack_bot_token.clone(),
            &config.slack_api_base_url,
        )?;
        Ok(Self::new(slack, config.display_zone))
    }
}

/// Build the relay router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/message/send", post(send_message_handler))
        .route("/message/schedule", post(schedule_message_handler))
        .route("/messages/{channel}", get(history_handler))
        .route("/message/edit", post(edit_message_handler))
        .route("/message/delete", post(delete_message_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Forwards Slack's body on success, otherwise a 500 with the transport error.
fn relay(method: &str, result: Result<Value, SlackError>) -> Response {
    match result {
        Ok(body) => ok_json(body),
        Err(e) => {
            error!("{} failed: {}", method, e);
            e.into_response()
        }
    }
}

// A request without a JSON content type is treated as an empty object.
#[tracing::instrument(level = "info", skip(state, body), fields(request_id = %Uuid::new_v4()))]
async fn send_message_handler(
    State(state): State<AppState>,
    body: Option<Json<SendMessageRequest>>,
) -> Response {
    let Json(req) = body.unwrap_or_default();
    info!(channel = ?req.channel, "Sending message");

    let result = state
        .slack
        .post_message(req.channel.as_deref(), req.text.as_deref())
        .await;
    relay("chat.postMessage", result)
}

#[tracing::instrument(level = "info", skip(state, body), fields(request_id = %Uuid::new_v4()))]
async fn schedule_message_handler(
    State(state): State<AppState>,
    body: Option<Json<ScheduleMessageRequest>>,
) -> Response {
    let Json(req) = body.unwrap_or_default();

    let Some(post_at) =
        parse_schedule_time(req.date.as_deref(), req.time.as_deref(), state.display_zone)
    else {
        warn!(date = ?req.date, time = ?req.time, "Rejected unparseable schedule time");
        return err_response(StatusCode::BAD_REQUEST, INVALID_SCHEDULE_MESSAGE);
    };

    if post_at <= chrono::Utc::now().timestamp() {
        warn!(post_at, "Rejected schedule time in the past");
        return err_response(StatusCode::BAD_REQUEST, PAST_SCHEDULE_MESSAGE);
    }

    info!(channel = ?req.channel, post_at, "Scheduling message");
    let result = state
        .slack
        .schedule_message(req.channel.as_deref(), req.text.as_deref(), post_at)
        .await;
    relay("chat.scheduleMessage", result)
}

#[tracing::instrument(level = "info", skip(state), fields(request_id = %Uuid::new_v4()))]
async fn history_handler(State(state): State<AppState>, Path(channel): Path<String>) -> Response {
    info!("Fetching conversation history");

    let body = match state.slack.conversation_history(&channel).await {
        Ok(body) => body,
        Err(e) => {
            error!("conversations.history failed: {}", e);
            return e.into_response();
        }
    };

    if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        warn!(error = ?body.get("error"), "Slack rejected conversations.history");
        return slack_error_response(&body);
    }

    let raw: Vec<RawMessage> = v_array(&body, &["messages"])
        .map(|messages| messages.iter().map(RawMessage::from_value).collect())
        .unwrap_or_default();
    let messages = normalize_history_in(&raw, state.display_zone);

    info!(message_count = messages.len(), "Returning normalized history");
    ok_json(HistoryResponse::new(channel, messages))
}

#[tracing::instrument(level = "info", skip(state, body), fields(request_id = %Uuid::new_v4()))]
async fn edit_message_handler(
    State(state): State<AppState>,
    body: Option<Json<EditMessageRequest>>,
) -> Response {
    let Json(req) = body.unwrap_or_default();
    info!(channel = ?req.channel, ts = ?req.ts, "Editing message");

    let result = state
        .slack
        .update_message(
            req.channel.as_deref(),
            req.ts.as_deref(),
            req.text.as_deref(),
        )
        .await;
    relay("chat.update", result)
}

#[tracing::instrument(level = "info", skip(state, body), fields(request_id = %Uuid::new_v4()))]
async fn delete_message_handler(
    State(state): State<AppState>,
    body: Option<Json<DeleteMessageRequest>>,
) -> Response {
    let Json(req) = body.unwrap_or_default();
    info!(channel = ?req.channel, ts = ?req.ts, "Deleting message");

    let result = state
        .slack
        .delete_message(req.channel.as_deref(), req.ts.as_deref())
        .await;
    relay("chat.delete", result)
}

/// GET /health
async fn health_handler() -> Response {
    ok_json(json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid, the port can't be bound, or
/// the server stops with an I/O error.
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Slack relay listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
