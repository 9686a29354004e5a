use std::collections::HashSet;

use common::config::{BotConfig, Universe};
use common::models::Candidate;
use market_data::{BrokerError, Brokerage};
use tracing::{info, warn};

use crate::dataset::SymbolFrame;
use crate::error::SkipReason;
use crate::evaluator::{LatestQuote, evaluate_candidate};
use crate::funds::available_funds_or_zero;
use crate::indicators::{RsiCalculator, TaError};
use crate::ranker::select_top;
use crate::trainer::ModelTrainer;

#[derive(Debug)]
pub enum SymbolOutcome {
    Candidate(Candidate),
    /// Evaluated, but the model said "not up" or the price was out of reach.
    NotSelected,
    Skipped(SkipReason),
}

#[derive(Debug, Default)]
pub struct SelectionReport {
    pub top: Option<Candidate>,
    /// Every candidate proposed during the run, in universe order.
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Runs the per-symbol pipeline over the universe and ranks the results.
///
/// Symbols are processed one after another; each gets its own model and
/// nothing is carried from one symbol to the next.
pub struct SelectionService<'a, B: Brokerage + ?Sized> {
    broker: &'a B,
    config: &'a BotConfig,
    calculator: RsiCalculator,
    trainer: ModelTrainer,
}

impl<'a, B: Brokerage + ?Sized> SelectionService<'a, B> {
    pub fn new(broker: &'a B, config: &'a BotConfig) -> Result<Self, TaError> {
        Ok(Self {
            broker,
            config,
            calculator: RsiCalculator::new(config.model.rsi_window)?,
            trainer: ModelTrainer::new(&config.model),
        })
    }

    pub async fn resolve_universe(&self) -> Vec<String> {
        let symbols = match &self.config.universe {
            Universe::Static(symbols) => symbols.clone(),
            Universe::TopMovers { limit, fallback } => {
                match self.broker.fetch_top_movers(*limit).await {
                    Ok(movers) if !movers.is_empty() => {
                        info!("Dynamically selected tickers: {:?}", movers);
                        movers
                    }
                    Ok(_) => {
                        warn!("Top movers list was empty; using {:?}", fallback);
                        fallback.clone()
                    }
                    Err(e) => {
                        warn!("Error fetching top movers ({}); using {:?}", e, fallback);
                        fallback.clone()
                    }
                }
            }
        };

        let mut seen = HashSet::new();
        symbols
            .into_iter()
            .filter(|symbol| seen.insert(symbol.clone()))
            .collect()
    }

    pub async fn evaluate_symbol(&self, symbol: &str) -> SymbolOutcome {
        let series = match self
            .broker
            .fetch_bars(symbol, &self.config.bar_interval, self.config.bar_count)
            .await
        {
            Ok(series) if series.is_empty() => {
                return SymbolOutcome::Skipped(SkipReason::DataUnavailable(
                    BrokerError::EmptyResponse(symbol.to_string()),
                ));
            }
            Ok(series) => series,
            Err(e) => return SymbolOutcome::Skipped(SkipReason::DataUnavailable(e)),
        };

        let frame = SymbolFrame::build(&series, &self.calculator);
        let model = match self.trainer.train(&frame) {
            Ok(model) => model,
            Err(reason) => return SymbolOutcome::Skipped(reason),
        };

        let (Some(signal), Some(price)) = (frame.latest_signal, frame.latest_price) else {
            return SymbolOutcome::Skipped(SkipReason::InsufficientHistory {
                rows: frame.usable_rows(),
                required: self.trainer.min_rows(),
            });
        };

        let funds = available_funds_or_zero(self.broker).await;
        match evaluate_candidate(symbol, Some(model), LatestQuote { signal, price }, funds) {
            Some(candidate) => SymbolOutcome::Candidate(candidate),
            None => SymbolOutcome::NotSelected,
        }
    }

    pub async fn select(&self, universe: &[String]) -> SelectionReport {
        let mut report = SelectionReport::default();

        for symbol in universe {
            match self.evaluate_symbol(symbol).await {
                SymbolOutcome::Candidate(candidate) => report.candidates.push(candidate),
                SymbolOutcome::NotSelected => {}
                SymbolOutcome::Skipped(reason) => {
                    warn!("Skipping {}: {}", symbol, reason);
                    report.skipped.push((symbol.clone(), reason));
                }
            }
        }

        report.top = select_top(report.candidates.clone());
        match &report.top {
            Some(top) => info!(
                "Top pick: {} (Confidence: {:.2}) at ${:.2}",
                top.symbol(),
                top.probability(),
                top.price()
            ),
            None => info!("No strong buy candidates found today."),
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::models::{PriceBar, PriceSeries};
    use market_data::MockBrokerage;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                time: Utc.timestamp_opt(86_400 * i as i64, 0).unwrap(),
                close,
            })
            .collect();
        PriceSeries::new(symbol, bars)
    }

    fn rising(last: f64, len: usize) -> Vec<f64> {
        (0..len).map(|i| last - (len - 1 - i) as f64 * 0.25).collect()
    }

    fn config(universe: Universe) -> BotConfig {
        BotConfig {
            universe,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn static_universe_is_deduplicated_in_order() {
        let broker = MockBrokerage::new();
        let cfg = config(Universe::Static(vec!["A".into(), "B".into(), "A".into()]));
        let service = SelectionService::new(&broker, &cfg).unwrap();

        assert_eq!(service.resolve_universe().await, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn top_movers_failure_falls_back() {
        let mut broker = MockBrokerage::new();
        broker
            .expect_fetch_top_movers()
            .returning(|_| Err(BrokerError::EmptyResponse("ticker/24hr".into())));
        let cfg = config(Universe::TopMovers {
            limit: 5,
            fallback: vec!["BTCUSDT".into()],
        });
        let service = SelectionService::new(&broker, &cfg).unwrap();

        assert_eq!(service.resolve_universe().await, vec!["BTCUSDT"]);
    }

    #[tokio::test]
    async fn top_movers_replace_static_list() {
        let mut broker = MockBrokerage::new();
        broker
            .expect_fetch_top_movers()
            .withf(|limit| *limit == 3)
            .returning(|_| Ok(vec!["X".into(), "Y".into(), "Z".into()]));
        let cfg = config(Universe::TopMovers {
            limit: 3,
            fallback: vec!["BTCUSDT".into()],
        });
        let service = SelectionService::new(&broker, &cfg).unwrap();

        assert_eq!(service.resolve_universe().await, vec!["X", "Y", "Z"]);
    }

    #[tokio::test]
    async fn short_history_is_skipped_without_funds_lookup() {
        let mut broker = MockBrokerage::new();
        // 20 bars, window 14: 5 usable rows, below the minimum of 10.
        broker
            .expect_fetch_bars()
            .returning(|symbol, _, _| Ok(series(symbol, &rising(50.0, 20))));
        broker.expect_fetch_available_funds().never();
        let cfg = BotConfig::default();
        let service = SelectionService::new(&broker, &cfg).unwrap();

        let outcome = service.evaluate_symbol("X").await;
        assert!(matches!(
            outcome,
            SymbolOutcome::Skipped(SkipReason::InsufficientHistory {
                rows: 5,
                required: 10
            })
        ));
    }

    #[tokio::test]
    async fn empty_series_is_data_unavailable() {
        let mut broker = MockBrokerage::new();
        broker
            .expect_fetch_bars()
            .returning(|symbol, _, _| Ok(PriceSeries::new(symbol, Vec::new())));
        let cfg = BotConfig::default();
        let service = SelectionService::new(&broker, &cfg).unwrap();

        assert!(matches!(
            service.evaluate_symbol("X").await,
            SymbolOutcome::Skipped(SkipReason::DataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn bars_are_requested_with_configured_interval_and_count() {
        let mut broker = MockBrokerage::new();
        broker
            .expect_fetch_bars()
            .withf(|symbol, interval, count| symbol == "X" && interval == "1h" && *count == 60)
            .times(1)
            .returning(|symbol, _, _| Ok(series(symbol, &rising(50.0, 60))));
        broker.expect_fetch_available_funds().returning(|| Ok(100.0));
        let cfg = BotConfig {
            bar_interval: "1h".into(),
            bar_count: 60,
            ..Default::default()
        };
        let service = SelectionService::new(&broker, &cfg).unwrap();

        assert!(matches!(
            service.evaluate_symbol("X").await,
            SymbolOutcome::Candidate(_)
        ));
    }
}
