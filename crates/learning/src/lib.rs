//! qtrader Learning - Online reinforcement learning for trading agents
//!
//! Provides the decision/update engine a trader consults every step:
//!
//! - **Value stores**: exact table, or a table backed by a periodically
//!   refit regression forest for unseen (state, action) pairs
//! - **Learner**: epsilon-greedy action selection composed with an update
//!   rule (off-policy Q-learning or on-policy Sarsa) over any value store
//!
//! ## Architecture
//!
//! ```text
//!            reward, new state
//!                   │
//!                   ▼
//!   ┌───────────────────────────────┐
//!   │            Learner            │
//!   │  UpdateRule: OffPolicy|OnPolicy│
//!   │  epsilon-greedy + decay       │
//!   └───────────────┬───────────────┘
//!                   │ value / set_value
//!                   ▼
//!   ┌───────────────────────────────┐
//!   │       dyn ValueStore          │
//!   │  TabularStore | EstimatedStore│──► RandomForest (Regressor)
//!   └───────────────────────────────┘
//! ```

pub mod estimated;
pub mod forest;
pub mod learner;
pub mod policy;
pub mod tabular;

// Re-export main types
pub use estimated::{EstimatedStore, REFIT_CADENCE};
pub use forest::{ForestConfig, RandomForest};
pub use learner::{Learner, LearnerConfig, UpdateRule};
pub use policy::EpsilonSchedule;
pub use tabular::TabularStore;

// Re-export the ports for convenience
pub use qtrader_ports::{ConfigError, ConfigResult, Regressor, ValueStore};
