use std::sync::Arc;

use ubot_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), ubot_core::Error> {
    ubot_core::logging::init("utility-bot")?;

    let cfg = Arc::new(Config::load()?);
    tracing::info!("Starting service");

    ubot_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| ubot_core::Error::External(format!("telegram bot failed: {e}")))?;

    tracing::info!("Service stopped");
    Ok(())
}
