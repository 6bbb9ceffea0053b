//! All Slack-specific functionality

pub mod client;
pub mod history;

// Re-export main types for convenience
pub use client::SlackClient;
pub use history::{NormalizedMessage, RawMessage};
