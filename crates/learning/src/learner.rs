//! Epsilon-greedy temporal-difference learner
//!
//! A [`Learner`] composes an [`UpdateRule`] with any [`ValueStore`]:
//!
//! - **OffPolicy** (Q-learning): update toward `reward + gamma * max_a Q(s', a)`,
//!   then pick the next action epsilon-greedily.
//! - **OnPolicy** (Sarsa): pick the next action epsilon-greedily first, then
//!   update toward `reward + gamma * Q(s', a')` for the action actually chosen.
//!
//! The first call after construction or [`Learner::reset_episode`] has no
//! prior transition, so it only chooses an action.

use log::trace;
use qtrader_core::{Action, State};
use qtrader_ports::{ConfigError, ConfigResult, ValueStore};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::estimated::EstimatedStore;
use crate::forest::ForestConfig;
use crate::policy::EpsilonSchedule;
use crate::tabular::TabularStore;

/// Temporal-difference update rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Q-learning: target uses the best next action
    OffPolicy,
    /// Sarsa: target uses the next action actually chosen
    OnPolicy,
}

/// Configuration for a learner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Discrete order sizes the learner may choose from
    pub actions: Vec<Action>,
    /// Initial exploration probability (0-1)
    pub epsilon: f64,
    /// Step size of each value update (0-1)
    pub learning_rate: f64,
    /// Discount of future rewards (0-1)
    pub discount_factor: f64,
    /// Random seed (for reproducibility)
    pub seed: Option<u64>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            actions: (-5..=5).map(|lots| lots * 10).collect(),
            epsilon: 0.1,
            learning_rate: 0.5,
            discount_factor: 0.999,
            seed: None,
        }
    }
}

impl LearnerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.actions.is_empty() {
            return Err(ConfigError::EmptyActionSet);
        }
        let mut seen = HashSet::with_capacity(self.actions.len());
        for &action in &self.actions {
            if !seen.insert(action) {
                return Err(ConfigError::DuplicateAction(action));
            }
        }
        ConfigError::check_unit_range("epsilon", self.epsilon)?;
        ConfigError::check_unit_range("learning_rate", self.learning_rate)?;
        ConfigError::check_unit_range("discount_factor", self.discount_factor)?;
        Ok(())
    }
}

/// Online learner choosing order sizes from rewards and observed states
pub struct Learner {
    rule: UpdateRule,
    actions: Vec<Action>,
    schedule: EpsilonSchedule,
    learning_rate: f64,
    discount_factor: f64,
    /// Previous (state, action); None until the first `learn` of an episode
    last: Option<(State, Action)>,
    store: Box<dyn ValueStore>,
    rng: StdRng,
}

impl Learner {
    /// Create a learner over an arbitrary value store
    pub fn new(
        rule: UpdateRule,
        config: LearnerConfig,
        store: Box<dyn ValueStore>,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            rule,
            actions: config.actions,
            schedule: EpsilonSchedule::new(config.epsilon),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            last: None,
            store,
            rng,
        })
    }

    /// Off-policy learner over an exact table
    pub fn tabular_q_learning(config: LearnerConfig) -> ConfigResult<Self> {
        Self::new(UpdateRule::OffPolicy, config, Box::new(TabularStore::new()))
    }

    /// On-policy learner over an exact table
    pub fn tabular_sarsa(config: LearnerConfig) -> ConfigResult<Self> {
        Self::new(UpdateRule::OnPolicy, config, Box::new(TabularStore::new()))
    }

    /// Off-policy learner estimating unseen values with a random forest
    pub fn forest_q_learning(config: LearnerConfig, forest: ForestConfig) -> ConfigResult<Self> {
        let store = EstimatedStore::with_forest(forest)?;
        Self::new(UpdateRule::OffPolicy, config, Box::new(store))
    }

    /// On-policy learner estimating unseen values with a random forest
    pub fn forest_sarsa(config: LearnerConfig, forest: ForestConfig) -> ConfigResult<Self> {
        let store = EstimatedStore::with_forest(forest)?;
        Self::new(UpdateRule::OnPolicy, config, Box::new(store))
    }

    /// Consume the reward for the previous action and the state it led to,
    /// train on that transition if there is one, and return the next action.
    pub fn learn(&mut self, reward: f64, new_state: State) -> Action {
        let action = match self.rule {
            UpdateRule::OffPolicy => {
                if let Some((state, action)) = self.last {
                    let (_, max_q) = self.choose_action(&new_state, false);
                    self.update(state, action, reward, max_q);
                }
                self.choose_action(&new_state, true).0
            }
            UpdateRule::OnPolicy => {
                let (next_action, next_q) = self.choose_action(&new_state, true);
                if let Some((state, action)) = self.last {
                    self.update(state, action, reward, next_q);
                }
                next_action
            }
        };

        self.last = Some((new_state, action));
        self.schedule.advance();
        action
    }

    /// Epsilon-greedy choice for `state`, with the value backing it.
    ///
    /// When exploring, the value is that of the random action. When greedy,
    /// it is the maximum value; ties go to the first action in the action set,
    /// except that a maximum of exactly 0 is broken uniformly at random among
    /// the zero-valued actions, so unvisited states do not always get the
    /// first action.
    pub fn choose_action(&mut self, state: &State, explore: bool) -> (Action, f64) {
        if explore && self.rng.r#gen::<f64>() < self.schedule.epsilon() {
            let action = self.actions[self.rng.gen_range(0..self.actions.len())];
            let value = self.store.value(state, action);
            trace!("Explore {} -> action={} q={:.4}", state, action, value);
            return (action, value);
        }

        let values: Vec<(Action, f64)> = self
            .actions
            .iter()
            .map(|&action| (action, self.store.value(state, action)))
            .collect();

        let (mut best_action, max_q) = values
            .iter()
            .skip(1)
            .fold(values[0], |best, &candidate| {
                if candidate.1 > best.1 { candidate } else { best }
            });

        if max_q == 0.0 {
            let zeros: Vec<Action> = values
                .iter()
                .filter(|(_, value)| *value == 0.0)
                .map(|(action, _)| *action)
                .collect();
            best_action = zeros[self.rng.gen_range(0..zeros.len())];
        }

        trace!("Exploit {} -> action={} q={:.4}", state, best_action, max_q);
        (best_action, max_q)
    }

    fn update(&mut self, state: State, action: Action, reward: f64, next_q: f64) {
        let old_q = self.store.value(&state, action);
        let target = reward + self.discount_factor * next_q;
        let new_q = old_q + self.learning_rate * (target - old_q);
        self.store.set_value(state, action, new_q);
        trace!(
            "Update Q{} action={}: {:.4} -> {:.4} (target {:.4})",
            state, action, old_q, new_q, target
        );
    }

    /// Forget the previous transition; values and epsilon carry over
    pub fn reset_episode(&mut self) {
        self.last = None;
    }

    /// Stored or estimated value of (`state`, `action`)
    pub fn value(&mut self, state: &State, action: Action) -> f64 {
        self.store.value(state, action)
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn epsilon(&self) -> f64 {
        self.schedule.epsilon()
    }

    pub fn step_count(&self) -> u64 {
        self.schedule.count()
    }

    /// Whether a previous transition exists to train on
    pub fn is_warmed(&self) -> bool {
        self.last.is_some()
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last.map(|(_, action)| action)
    }

    pub fn store(&self) -> &dyn ValueStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for Learner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Learner")
            .field("rule", &self.rule)
            .field("store", &self.store.name())
            .field("actions", &self.actions)
            .field("epsilon", &self.schedule.epsilon())
            .field("step_count", &self.schedule.count())
            .field("last", &self.last)
            .finish()
    }
}
