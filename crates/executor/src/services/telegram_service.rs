use common::config::TelegramConfig;
use teloxide::prelude::*;
use tokio::sync::broadcast;
use tracing::{error, info};

pub struct TelegramService {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramService {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            bot: Bot::new(&config.token),
            chat_id: ChatId(config.chat_id),
        }
    }

    /// Forwards every message until all senders are dropped.
    pub async fn start(self, mut rx: broadcast::Receiver<String>) {
        info!("Starting Telegram Notification Service");

        loop {
            match rx.recv().await {
                Ok(msg) => {
                    // Send message and log error if it fails, but don't crash
                    if let Err(e) = self.bot.send_message(self.chat_id, msg).await {
                        error!("Failed to send Telegram message: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    error!("Telegram service lagged behind. Missed {} messages.", n);
                }
                Err(_) => {
                    info!("Telegram notification channel closed. Stopping service.");
                    break;
                }
            }
        }
    }
}
