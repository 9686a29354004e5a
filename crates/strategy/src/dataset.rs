use common::models::PriceSeries;

use crate::indicators::RsiCalculator;
use crate::labels::next_step_labels;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRow {
    pub signal: f64,
    pub label: u8,
}

/// Everything the model stage needs from one symbol's price history.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFrame {
    pub symbol: String,
    /// Rows where both the signal and the label are defined.
    pub rows: Vec<TrainingRow>,
    pub latest_signal: Option<f64>,
    pub latest_price: Option<f64>,
}

impl SymbolFrame {
    pub fn build(series: &PriceSeries, calculator: &RsiCalculator) -> Self {
        let closes = series.closes();
        let signals = calculator.compute(&closes);
        let labels = next_step_labels(&closes);

        let rows = signals
            .iter()
            .zip(labels.iter())
            .filter_map(|(signal, label)| match (signal, label) {
                (Some(signal), Some(label)) => Some(TrainingRow {
                    signal: *signal,
                    label: *label,
                }),
                _ => None,
            })
            .collect();

        Self {
            symbol: series.symbol().to_string(),
            rows,
            latest_signal: signals.last().copied().flatten(),
            latest_price: series.last_close(),
        }
    }

    pub fn usable_rows(&self) -> usize {
        self.rows.len()
    }
}
