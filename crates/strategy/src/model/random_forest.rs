//! Bagged ensemble of decision trees

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::decision_tree::{DecisionTree, TreeConfig};
use crate::dataset::TrainingRow;

/// Random Forest configuration
#[derive(Debug, Clone)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
    pub tree: TreeConfig,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            bootstrap: true,
            seed: 42,
            tree: TreeConfig::default(),
        }
    }
}

/// Random Forest classifier
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    /// Train the forest. Tree `i` draws its bootstrap sample from an RNG
    /// seeded with `seed + i`, so a fit is reproducible for a given input.
    pub fn fit(&mut self, rows: &[TrainingRow]) {
        self.trees = (0..self.config.n_trees)
            .map(|i| {
                let mut tree = DecisionTree::new(self.config.tree.clone());
                if self.config.bootstrap {
                    let sample = bootstrap_sample(rows, self.config.seed.wrapping_add(i as u64));
                    tree.fit(&sample);
                } else {
                    tree.fit(rows);
                }
                tree
            })
            .collect();
    }

    /// Mean of the per-tree leaf class frequencies for the "up" class.
    pub fn predict_proba(&self, signal: f64) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }

        let total: f64 = self.trees.iter().map(|t| t.predict_proba(signal)).sum();
        total / self.trees.len() as f64
    }

    /// "Up" only when the ensemble leans strictly above even odds.
    pub fn predict(&self, signal: f64) -> bool {
        self.predict_proba(signal) > 0.5
    }

    /// Calculate accuracy
    pub fn accuracy(&self, rows: &[TrainingRow]) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }

        let correct = rows
            .iter()
            .filter(|row| self.predict(row.signal) == (row.label == 1))
            .count();
        correct as f64 / rows.len() as f64
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn bootstrap_sample(rows: &[TrainingRow], seed: u64) -> Vec<TrainingRow> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..rows.len())
        .map(|_| rows[rng.gen_range(0..rows.len())])
        .collect()
}
