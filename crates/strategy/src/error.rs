use market_data::BrokerError;
use thiserror::Error;

/// Why a symbol dropped out of a run. Never fatal to the run itself.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("market data unavailable: {0}")]
    DataUnavailable(#[from] BrokerError),
    #[error("insufficient history: {rows} usable rows, {required} required")]
    InsufficientHistory { rows: usize, required: usize },
}
