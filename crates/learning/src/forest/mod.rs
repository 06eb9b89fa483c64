//! Bagged regression forest used to estimate unseen action values

mod tree;

use log::debug;
use qtrader_ports::{ConfigError, ConfigResult, Regressor};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use tree::{RegressionTree, TreeParams};

/// Random forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Features considered at each split
    pub max_features: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Maximum tree depth (None = grow until leaves are pure or too small)
    pub max_depth: Option<usize>,
    /// Train each tree on a bootstrap resample
    pub bootstrap: bool,
    /// Random seed (for reproducibility)
    pub seed: Option<u64>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 30,
            max_features: 2,
            min_samples_leaf: 5,
            max_depth: None,
            bootstrap: true,
            seed: None,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidEstimator(
                "n_trees must be at least 1".to_string(),
            ));
        }
        if self.max_features == 0 {
            return Err(ConfigError::InvalidEstimator(
                "max_features must be at least 1".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ConfigError::InvalidEstimator(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::InvalidEstimator(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Random forest regressor
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
    rng: StdRng,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> ConfigResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            trees: Vec::new(),
            rng,
        })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForest {
    fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) {
        let n = features.len().min(targets.len());
        if n == 0 {
            self.trees.clear();
            return;
        }

        let params = TreeParams {
            max_features: self.config.max_features,
            min_samples_leaf: self.config.min_samples_leaf,
            max_depth: self.config.max_depth,
        };

        let mut trees = Vec::with_capacity(self.config.n_trees);
        for _ in 0..self.config.n_trees {
            let indices: Vec<usize> = if self.config.bootstrap {
                (0..n).map(|_| self.rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            trees.push(RegressionTree::fit(
                features,
                targets,
                indices,
                params,
                &mut self.rng,
            ));
        }

        let leaves: usize = trees.iter().map(RegressionTree::n_leaves).sum();
        debug!(
            "Fitted random forest: samples={}, trees={}, avg_leaves={:.1}",
            n,
            trees.len(),
            leaves as f64 / trees.len() as f64
        );

        self.trees = trees;
    }

    fn predict(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict(features)).sum::<f64>() / self.trees.len() as f64
    }
}
