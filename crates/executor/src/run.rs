use anyhow::anyhow;
use common::config::BotConfig;
use market_data::Brokerage;
use strategy::services::{SelectionReport, SelectionService};
use tokio::sync::broadcast;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::services::{ExecutionOutcome, ExecutionService};

#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub universe: Vec<String>,
    pub selection: SelectionReport,
    /// `None` when no candidate was selected.
    pub execution: Option<ExecutionOutcome>,
}

/// One full pass: resolve the universe, pick the best candidate, try to buy it.
///
/// Per-symbol failures, a missing candidate and a rejected order all end in
/// an `Ok` report.
pub async fn run_once<B>(
    config: &BotConfig,
    broker: &B,
    notification_tx: Option<broadcast::Sender<String>>,
) -> anyhow::Result<RunReport>
where
    B: Brokerage + ?Sized,
{
    let run_id = Uuid::new_v4();
    let span = info_span!("run", id = %run_id);

    async move {
        let selector = SelectionService::new(broker, config)
            .map_err(|e| anyhow!("invalid RSI window {}: {:?}", config.model.rsi_window, e))?;

        let universe = selector.resolve_universe().await;
        info!("Evaluating {} symbols", universe.len());

        let selection = selector.select(&universe).await;

        let execution = match &selection.top {
            Some(top) => {
                notify(
                    &notification_tx,
                    format!(
                        "Top pick: {} (Confidence: {:.2}) at ${:.2}",
                        top.symbol(),
                        top.probability(),
                        top.price()
                    ),
                );

                let mut executor = ExecutionService::new(broker, config.quantity);
                if let Some(tx) = &notification_tx {
                    executor = executor.with_notifier(tx.clone());
                }
                Some(executor.execute(top).await)
            }
            None => {
                notify(&notification_tx, "No strong buy candidates found today.".to_string());
                None
            }
        };

        info!(
            "Run finished: {} candidates, {} skipped, order: {:?}",
            selection.candidates.len(),
            selection.skipped.len(),
            execution
        );

        Ok::<_, anyhow::Error>(RunReport {
            run_id,
            universe,
            selection,
            execution,
        })
    }
    .instrument(span)
    .await
}

fn notify(tx: &Option<broadcast::Sender<String>>, msg: String) {
    if let Some(tx) = tx {
        let _ = tx.send(msg);
    }
}
