use dotenvy::dotenv;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use common::config::BotConfig;
use common::logger;
use executor::run_once;
use executor::services::TelegramService;
use market_data::BinanceClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let config = BotConfig::from_env()?;
    debug!("Configuration: {:?}", config.universe);

    let client = BinanceClient::new(&config.broker)?;

    let (notify_tx, notifier) = match &config.telegram {
        Some(telegram) => {
            let (tx, rx) = broadcast::channel::<String>(64);
            let handle = tokio::spawn(TelegramService::new(telegram).start(rx));
            (Some(tx), Some(handle))
        }
        None => (None, None),
    };

    let report = run_once(&config, &client, notify_tx).await?;
    info!(
        "Run {} complete: selected={:?}",
        report.run_id,
        report.selection.top.as_ref().map(|c| c.symbol())
    );

    // The run dropped its sender; the notifier drains and stops.
    if let Some(handle) = notifier {
        if let Err(e) = handle.await {
            warn!("Notifier task ended abnormally: {}", e);
        }
    }

    Ok(())
}
