use common::models::{Candidate, OrderIntent};
use market_data::Brokerage;
use strategy::funds::available_funds_or_zero;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Submitted(OrderIntent),
    InsufficientFunds { funds: f64, required: f64 },
    /// The brokerage declined the order or could not be reached.
    Rejected(String),
}

pub struct ExecutionService<'a, B: Brokerage + ?Sized> {
    broker: &'a B,
    quantity: u32,
    notification_tx: Option<broadcast::Sender<String>>,
}

impl<'a, B: Brokerage + ?Sized> ExecutionService<'a, B> {
    pub fn new(broker: &'a B, quantity: u32) -> Self {
        Self {
            broker,
            quantity,
            notification_tx: None,
        }
    }

    pub fn with_notifier(mut self, tx: broadcast::Sender<String>) -> Self {
        self.notification_tx = Some(tx);
        self
    }

    /// Buys the fixed quantity of `candidate` if current funds cover the full
    /// cost. Funds are looked up again here; the figure seen during
    /// selection may be out of date.
    pub async fn execute(&self, candidate: &Candidate) -> ExecutionOutcome {
        let funds = available_funds_or_zero(self.broker).await;
        let required = candidate.price() * f64::from(self.quantity);

        if funds < required {
            let msg = format!(
                "Not enough buying power (${:.2}) to buy {} x{} at ${:.2}",
                funds,
                candidate.symbol(),
                self.quantity,
                candidate.price()
            );
            warn!("{}", msg);
            self.notify(&msg);
            return ExecutionOutcome::InsufficientFunds { funds, required };
        }

        let intent = OrderIntent::market_buy(candidate.symbol(), self.quantity);
        info!("Placing BUY order for {}...", intent.symbol);

        match self.broker.submit_order(&intent).await {
            Ok(()) => {
                let msg = format!(
                    "BUY {} x{} submitted (confidence {:.2}, last ${:.2})",
                    intent.symbol,
                    intent.quantity,
                    candidate.probability(),
                    candidate.price()
                );
                info!("{}", msg);
                self.notify(&msg);
                ExecutionOutcome::Submitted(intent)
            }
            Err(e) => {
                let msg = format!("Failed to place order for {}: {}", intent.symbol, e);
                error!("{}", msg);
                self.notify(&msg);
                ExecutionOutcome::Rejected(e.to_string())
            }
        }
    }

    fn notify(&self, msg: &str) {
        if let Some(ref tx) = self.notification_tx {
            let _ = tx.send(msg.to_string());
        }
    }
}
