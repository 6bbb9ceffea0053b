//! Flattening of `conversations.history` payloads.
//!
//! Slack returns history newest-first with nested `bot_profile` and `edited`
//! objects. [`normalize_history`] turns that into a flat, oldest-first list
//! where optional keys are omitted entirely rather than sent as `null`. The
//! exception is `text` and `type`, which keep an upstream `null` as-is.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::parsing::{v_path, v_str};
use crate::utils::timestamp::{DisplayZone, format_slack_timestamp_in};

/// Accepts a JSON string or number; anything else counts as missing.
fn lenient_ts<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ts_from_value(&Value::deserialize(deserializer)?))
}

/// Keeps an explicit `null` apart from a missing key: the outer `Option` is
/// key presence, the inner one the value.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn nullable_from_value(value: Option<&Value>) -> Option<Option<String>> {
    match value? {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

fn ts_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotProfile {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditInfo {
    #[serde(default, deserialize_with = "lenient_ts")]
    pub ts: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// One entry of a `conversations.history` response, reduced to the fields the
/// normalizer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default, deserialize_with = "lenient_ts")]
    pub ts: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub text: Option<Option<String>>,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub message_type: Option<Option<String>>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub bot_profile: Option<BotProfile>,
    #[serde(default)]
    pub edited: Option<EditInfo>,
    #[serde(default)]
    pub inviter: Option<String>,
}

impl RawMessage {
    /// Reads a message out of arbitrary JSON without failing.
    ///
    /// Fields of the wrong JSON type are treated as absent, so one odd record
    /// can't reject a whole history page the way strict deserialization would.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let owned = |path: &[&str]| v_str(value, path).map(ToString::to_string);

        Self {
            ts: value.get("ts").and_then(ts_from_value),
            text: nullable_from_value(value.get("text")),
            message_type: nullable_from_value(value.get("type")),
            user: owned(&["user"]),
            subtype: owned(&["subtype"]),
            bot_id: owned(&["bot_id"]),
            bot_profile: v_path(value, &["bot_profile"])
                .filter(|v| v.is_object())
                .map(|_| BotProfile {
                    name: owned(&["bot_profile", "name"]),
                }),
            edited: v_path(value, &["edited"])
                .filter(|v| v.is_object())
                .map(|edited| EditInfo {
                    ts: edited.get("ts").and_then(ts_from_value),
                    user: owned(&["edited", "user"]),
                }),
            inviter: owned(&["inviter"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub timestamp: String,
    /// `Some(None)` is sent as `null`; `None` omits the key.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<Option<String>>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub message_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter: Option<String>,
}

// Slack sends "" for some fields it means as unset.
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

#[must_use]
pub fn normalize_message(msg: &RawMessage, zone: DisplayZone) -> NormalizedMessage {
    let bot_id = non_empty(msg.bot_id.as_ref());
    let bot_name = bot_id
        .as_ref()
        .and(msg.bot_profile.as_ref())
        .and_then(|profile| profile.name.clone());

    let (edited_at, edited_by) = match &msg.edited {
        Some(edited) => (
            Some(format_slack_timestamp_in(edited.ts.as_deref(), zone)),
            edited.user.clone(),
        ),
        None => (None, None),
    };

    NormalizedMessage {
        timestamp: format_slack_timestamp_in(msg.ts.as_deref(), zone),
        text: msg.text.clone(),
        message_type: msg.message_type.clone(),
        user_id: non_empty(msg.user.as_ref()),
        subtype: non_empty(msg.subtype.as_ref()),
        bot_id,
        bot_name,
        edited_at,
        edited_by,
        inviter: non_empty(msg.inviter.as_ref()),
    }
}

/// Normalizes a history page and returns it oldest-first.
///
/// Assumes the input is newest-first, which is how `conversations.history`
/// orders results. The order is reversed as-is, never sorted by `ts`.
#[must_use]
pub fn normalize_history_in(messages: &[RawMessage], zone: DisplayZone) -> Vec<NormalizedMessage> {
    let mut normalized: Vec<NormalizedMessage> = messages
        .iter()
        .map(|msg| normalize_message(msg, zone))
        .collect();
    normalized.reverse();
    normalized
}

/// [`normalize_history_in`] using the process-local timezone.
#[must_use]
pub fn normalize_history(messages: &[RawMessage]) -> Vec<NormalizedMessage> {
    normalize_history_in(messages, DisplayZone::Local)
}
