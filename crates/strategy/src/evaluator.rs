use common::models::Candidate;
use tracing::{debug, info};

use crate::trainer::SignalModel;

/// Latest observations for one symbol, as seen by the evaluator.
#[derive(Debug, Clone, Copy)]
pub struct LatestQuote {
    pub signal: f64,
    pub price: f64,
}

/// Proposes `symbol` when its model predicts "up" and a single unit costs no
/// more than `funds`. Without a model there is never a candidate.
pub fn evaluate_candidate(
    symbol: &str,
    model: Option<SignalModel>,
    quote: LatestQuote,
    funds: f64,
) -> Option<Candidate> {
    let model = model?;
    let prediction = model.predict(quote.signal);

    info!(
        "Prediction for {}: up={} p={:.4} (RSI={:.1}, Price={:.2}, Funds={:.2})",
        symbol, prediction.up, prediction.up_probability, quote.signal, quote.price, funds
    );

    if !prediction.up {
        return None;
    }
    if quote.price > funds {
        debug!("{} unaffordable: {:.2} > {:.2}", symbol, quote.price, funds);
        return None;
    }

    Some(Candidate::new(symbol, prediction.up_probability, quote.price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{SymbolFrame, TrainingRow};
    use crate::trainer::ModelTrainer;
    use common::config::ModelConfig;

    fn model(label: u8) -> SignalModel {
        let frame = SymbolFrame {
            symbol: "AMD".to_string(),
            rows: (0..30)
                .map(|i| TrainingRow {
                    signal: 30.0 + i as f64,
                    label,
                })
                .collect(),
            latest_signal: Some(50.0),
            latest_price: Some(50.0),
        };
        ModelTrainer::new(&ModelConfig::default())
            .train(&frame)
            .unwrap()
    }

    const QUOTE: LatestQuote = LatestQuote {
        signal: 50.0,
        price: 50.0,
    };

    #[test]
    fn affordable_up_prediction_is_a_candidate() {
        let candidate = evaluate_candidate("AMD", Some(model(1)), QUOTE, 100.0).unwrap();
        assert_eq!(candidate.symbol(), "AMD");
        assert_eq!(candidate.probability(), 1.0);
        assert_eq!(candidate.price(), 50.0);
    }

    #[test]
    fn price_equal_to_funds_is_affordable() {
        assert!(evaluate_candidate("AMD", Some(model(1)), QUOTE, 50.0).is_some());
    }

    #[test]
    fn certain_up_is_still_rejected_when_unaffordable() {
        assert!(evaluate_candidate("AMD", Some(model(1)), QUOTE, 49.99).is_none());
    }

    #[test]
    fn down_prediction_is_never_a_candidate() {
        assert!(evaluate_candidate("AMD", Some(model(0)), QUOTE, 1_000.0).is_none());
    }

    #[test]
    fn missing_model_is_never_a_candidate() {
        assert!(evaluate_candidate("AMD", None, QUOTE, 1_000.0).is_none());
    }
}
