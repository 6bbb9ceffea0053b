use serde::{Deserialize, Serialize};

use crate::slack::history::NormalizedMessage;

// Every field is optional: the relay forwards what it was given and lets Slack
// report missing arguments.

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub channel: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScheduleMessageRequest {
    pub channel: Option<String>,
    pub text: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM`, 24-hour
    pub time: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EditMessageRequest {
    pub channel: Option<String>,
    pub ts: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteMessageRequest {
    pub channel: Option<String>,
    pub ts: Option<String>,
}

/// Body of a successful `GET /messages/{channel}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub channel: String,
    pub message_count: usize,
    pub messages: Vec<NormalizedMessage>,
}

impl HistoryResponse {
    #[must_use]
    pub fn new(channel: String, messages: Vec<NormalizedMessage>) -> Self {
        Self {
            success: true,
            channel,
            message_count: messages.len(),
            messages,
        }
    }
}
