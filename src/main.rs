use slack_relay::api;
use slack_relay::core::config::AppConfig;
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    slack_relay::setup_logging();

    let config = AppConfig::load().map_err(|e| {
        error!("Config error: {}", e);
        anyhow::Error::msg(e)
    })?;

    api::serve(&config).await
}
