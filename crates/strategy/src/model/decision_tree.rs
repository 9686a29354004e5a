//! Single-feature CART classifier

use crate::dataset::TrainingRow;

/// Decision tree configuration
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Maximum depth of tree (None = grow until pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        up_probability: f64,
    },
    Split {
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

struct SplitCandidate {
    position: usize,
    threshold: f64,
    impurity: f64,
}

/// Binary classifier over the signal value, splitting on Gini impurity.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    /// Train the tree. An empty sample leaves the tree unfitted.
    pub fn fit(&mut self, samples: &[TrainingRow]) {
        if samples.is_empty() {
            self.root = None;
            return;
        }

        // One feature: sorting once makes every node a contiguous slice.
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.signal.total_cmp(&b.signal));

        self.root = Some(self.build_tree(&sorted, 0));
    }

    fn build_tree(&self, samples: &[TrainingRow], depth: usize) -> TreeNode {
        let n = samples.len();
        let ups = count_ups(samples);
        let impurity = gini(ups, n);

        let depth_exhausted = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_exhausted || n < self.config.min_samples_split || impurity < 1e-12 {
            return Self::leaf(ups, n);
        }

        match self.find_best_split(samples, impurity) {
            Some(split) => {
                let (left, right) = samples.split_at(split.position);
                TreeNode::Split {
                    threshold: split.threshold,
                    left: Box::new(self.build_tree(left, depth + 1)),
                    right: Box::new(self.build_tree(right, depth + 1)),
                }
            }
            None => Self::leaf(ups, n),
        }
    }

    fn leaf(ups: usize, n: usize) -> TreeNode {
        TreeNode::Leaf {
            up_probability: ups as f64 / n as f64,
        }
    }

    /// Scan every boundary between distinct signal values.
    fn find_best_split(&self, samples: &[TrainingRow], parent: f64) -> Option<SplitCandidate> {
        let n = samples.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        if n < 2 * min_leaf {
            return None;
        }

        let total_ups = count_ups(samples);
        let mut left_ups = count_ups(&samples[..min_leaf - 1]);
        let mut best: Option<SplitCandidate> = None;

        for position in min_leaf..=(n - min_leaf) {
            left_ups += usize::from(samples[position - 1].label == 1);

            let lower = samples[position - 1].signal;
            let upper = samples[position].signal;
            if lower >= upper {
                continue;
            }

            let n_left = position;
            let n_right = n - position;
            let weighted = (n_left as f64 * gini(left_ups, n_left)
                + n_right as f64 * gini(total_ups - left_ups, n_right))
                / n as f64;

            let improves = parent - weighted > 1e-12;
            let beats_best = best.as_ref().is_none_or(|b| weighted < b.impurity);
            if improves && beats_best {
                best = Some(SplitCandidate {
                    position,
                    threshold: lower + (upper - lower) / 2.0,
                    impurity: weighted,
                });
            }
        }

        best
    }

    /// Fraction of "up" training samples in the leaf `signal` falls into.
    pub fn predict_proba(&self, signal: f64) -> f64 {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0.5,
        };

        loop {
            match node {
                TreeNode::Leaf { up_probability } => return *up_probability,
                TreeNode::Split {
                    threshold,
                    left,
                    right,
                } => {
                    node = if signal <= *threshold { left } else { right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::depth)
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }
}

fn count_ups(samples: &[TrainingRow]) -> usize {
    samples.iter().filter(|row| row.label == 1).count()
}

fn gini(ups: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = ups as f64 / n as f64;
    2.0 * p * (1.0 - p)
}
