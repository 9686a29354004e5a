use chrono::{DateTime, Utc};
use common::config::ModelConfig;
use tracing::debug;

use crate::dataset::SymbolFrame;
use crate::error::SkipReason;
use crate::model::{ForestConfig, RandomForest};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub up: bool,
    pub up_probability: f64,
}

/// A classifier fitted on one symbol's own history at one point in time.
///
/// Not `Clone`: it is handed to the evaluator by value and dropped there.
#[derive(Debug)]
pub struct SignalModel {
    symbol: String,
    trained_at: DateTime<Utc>,
    forest: RandomForest,
    training_accuracy: f64,
}

impl SignalModel {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn training_accuracy(&self) -> f64 {
        self.training_accuracy
    }

    pub fn predict(&self, signal: f64) -> Prediction {
        let up_probability = self.forest.predict_proba(signal);
        Prediction {
            up: self.forest.predict(signal),
            up_probability,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelTrainer {
    forest: ForestConfig,
    min_rows: usize,
}

impl ModelTrainer {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            forest: ForestConfig {
                n_trees: config.n_trees,
                seed: config.seed,
                ..Default::default()
            },
            min_rows: config.min_training_rows,
        }
    }

    pub fn min_rows(&self) -> usize {
        self.min_rows
    }

    /// Fits a fresh forest on the frame's rows, or reports that there is too
    /// little history to try.
    pub fn train(&self, frame: &SymbolFrame) -> Result<SignalModel, SkipReason> {
        let rows = frame.usable_rows();
        if rows < self.min_rows {
            return Err(SkipReason::InsufficientHistory {
                rows,
                required: self.min_rows,
            });
        }

        let mut forest = RandomForest::new(self.forest.clone());
        forest.fit(&frame.rows);
        let training_accuracy = forest.accuracy(&frame.rows);

        debug!(
            "Trained {} trees for {} on {} rows (train acc {:.2})",
            forest.n_trees(),
            frame.symbol,
            rows,
            training_accuracy
        );

        Ok(SignalModel {
            symbol: frame.symbol.clone(),
            trained_at: Utc::now(),
            forest,
            training_accuracy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TrainingRow;

    fn frame(rows: usize, label: u8) -> SymbolFrame {
        SymbolFrame {
            symbol: "ETHUSDT".to_string(),
            rows: (0..rows)
                .map(|i| TrainingRow {
                    signal: 40.0 + i as f64,
                    label,
                })
                .collect(),
            latest_signal: Some(55.0),
            latest_price: Some(10.0),
        }
    }

    #[test]
    fn too_few_rows_is_insufficient_history() {
        let trainer = ModelTrainer::new(&ModelConfig::default());
        let err = trainer.train(&frame(9, 1)).unwrap_err();

        assert!(matches!(
            err,
            SkipReason::InsufficientHistory {
                rows: 9,
                required: 10
            }
        ));
    }

    #[test]
    fn model_is_bound_to_its_symbol() {
        let trainer = ModelTrainer::new(&ModelConfig::default());
        let model = trainer.train(&frame(10, 1)).unwrap();

        assert_eq!(model.symbol(), "ETHUSDT");
        assert_eq!(model.training_accuracy(), 1.0);
        assert!(model.trained_at() <= Utc::now());
    }

    #[test]
    fn prediction_agrees_with_probability() {
        let trainer = ModelTrainer::new(&ModelConfig::default());

        let up = trainer.train(&frame(20, 1)).unwrap().predict(50.0);
        assert!(up.up);
        assert_eq!(up.up_probability, 1.0);

        let down = trainer.train(&frame(20, 0)).unwrap().predict(50.0);
        assert!(!down.up);
        assert_eq!(down.up_probability, 0.0);
    }
}
