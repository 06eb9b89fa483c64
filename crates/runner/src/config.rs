//! Simulation configuration
//!
//! Loaded from JSON. Every section has defaults reproducing the reference
//! experiment, so a partial file (or none at all) is enough:
//!
//! ```json
//! {
//!   "seed": 7,
//!   "exchange": { "tick": 0.1 },
//!   "traders": [
//!     { "name": "q", "learner": { "kind": "tabular_q_learning" } },
//!     { "name": "rf", "learner": { "kind": "forest_sarsa", "epsilon": 0.2 } }
//!   ]
//! }
//! ```

use qtrader_exchange::{ExchangeConfig, StockConfig};
use qtrader_learning::{ForestConfig, LearnerConfig, UpdateRule};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RunnerError, RunnerResult};

/// Root configuration of a training + test run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub stock: StockConfig,
    pub exchange: ExchangeConfig,
    pub traders: Vec<TraderSpec>,
    /// Steps of the training episode
    pub train_steps: usize,
    /// Steps of the reported test episode
    pub test_steps: usize,
    /// Seed from which component seeds are derived when they have none
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stock: StockConfig::default(),
            exchange: ExchangeConfig::default(),
            traders: vec![
                TraderSpec::new("tabular q-learning", LearnerKind::TabularQLearning),
                TraderSpec::new("tabular sarsa", LearnerKind::TabularSarsa),
                TraderSpec::new("random forest sarsa", LearnerKind::ForestSarsa),
            ],
            train_steps: 1000,
            test_steps: 500,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> RunnerResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| RunnerError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> RunnerResult<Self> {
        serde_json::from_str(json).map_err(|e| RunnerError::Parse(e.to_string()))
    }
}

/// One trader and the learner driving it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraderSpec {
    pub name: String,
    /// Risk-aversion constant of the reward
    pub utility: f64,
    pub learner: LearnerSpec,
    /// Only used by forest-backed learners
    pub forest: ForestConfig,
}

impl TraderSpec {
    pub fn new(name: &str, kind: LearnerKind) -> Self {
        Self {
            name: name.to_string(),
            learner: LearnerSpec {
                kind,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl Default for TraderSpec {
    fn default() -> Self {
        Self {
            name: "trader".to_string(),
            utility: 1e-3,
            learner: LearnerSpec::default(),
            forest: ForestConfig::default(),
        }
    }
}

/// Learner kind plus its hyperparameters, flattened into one JSON object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerSpec {
    pub kind: LearnerKind,
    #[serde(flatten)]
    pub config: LearnerConfig,
}

/// Update rule and value-store backend of a learner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerKind {
    #[default]
    TabularQLearning,
    TabularSarsa,
    ForestQLearning,
    ForestSarsa,
}

impl LearnerKind {
    pub fn rule(&self) -> UpdateRule {
        match self {
            LearnerKind::TabularQLearning | LearnerKind::ForestQLearning => UpdateRule::OffPolicy,
            LearnerKind::TabularSarsa | LearnerKind::ForestSarsa => UpdateRule::OnPolicy,
        }
    }

    /// Whether unseen values are estimated by a random forest
    pub fn uses_forest(&self) -> bool {
        matches!(self, LearnerKind::ForestQLearning | LearnerKind::ForestSarsa)
    }
}
