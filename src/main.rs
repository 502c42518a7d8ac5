use std::error::Error;
use std::sync::Arc;

use ai_llm_service::telemetry;
use api::core::app_state::{ApiConfig, AppState};
use tracing::{Level, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("warn", Level::INFO))
        .with(telemetry::layer())
        .try_init()?;

    if let Err(err) = dotenv {
        info!(reason = %err, "no .env file loaded");
    }

    let config = ApiConfig::from_env();
    let state = AppState::from_env(&config).await?;

    api::start(&config, Arc::new(state)).await?;

    Ok(())
}
