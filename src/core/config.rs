use std::collections::HashMap;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use chrono_tz::Tz;
use tracing::{info, warn};

use crate::utils::timestamp::DisplayZone;

pub const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api/";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_api_base_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub display_zone: DisplayZone,
}

impl AppConfig {
    /// Loads a `.env` file from the working directory or its parents into the
    /// process environment, then reads the config from it.
    ///
    /// Variables already set win over the file. A missing file is fine; an
    /// unreadable one is logged and skipped.
    pub fn load() -> Result<Self, String> {
        match dotenvy::dotenv() {
            Ok(path) => info!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring .env file: {}", e),
        }
        Self::from_env()
    }

    /// Reads the config from a dotenv file without touching the process
    /// environment. Variables already set in the process take precedence.
    pub fn from_env_file(path: &Path) -> Result<Self, String> {
        let file: HashMap<String, String> = dotenvy::from_path_iter(path)
            .and_then(|iter| iter.collect::<Result<HashMap<_, _>, _>>())
            .map_err(|e| format!("{}: {}", path.display(), e))?;

        Self::from_lookup(|key| env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let slack_bot_token = lookup("SLACK_BOT_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| "SLACK_BOT_TOKEN: environment variable not found".to_string())?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| format!("PORT: {}", e))?,
            None => DEFAULT_PORT,
        };

        let display_zone = match lookup("DISPLAY_TIMEZONE").filter(|v| !v.is_empty()) {
            Some(name) => DisplayZone::Named(
                name.parse::<Tz>()
                    .map_err(|e| format!("DISPLAY_TIMEZONE: {}", e))?,
            ),
            None => DisplayZone::Local,
        };

        Ok(Self {
            slack_bot_token,
            slack_api_base_url: lookup("SLACK_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE_URL.to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port,
            display_zone,
        })
    }

    /// # Errors
    ///
    /// Returns an error if `bind_addr` is not an IPv4 or IPv6 address.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.bind_addr
            .parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.port))
            .map_err(|e| format!("BIND_ADDR: {}", e))
    }
}
