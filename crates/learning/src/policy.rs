//! Exploration schedule for epsilon-greedy selection

/// Exploration probability with logarithmic decay.
///
/// The step counter starts at 2 so that `log2(count)` is positive from the
/// first decay. After each decision epsilon becomes
/// `min(epsilon, 1 / log2(count))`: it never increases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonSchedule {
    epsilon: f64,
    count: u64,
}

impl EpsilonSchedule {
    pub const INITIAL_COUNT: u64 = 2;

    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            count: Self::INITIAL_COUNT,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Record one decision and shrink epsilon
    pub fn advance(&mut self) -> f64 {
        self.count += 1;
        self.epsilon = self.epsilon.min(1.0 / (self.count as f64).log2());
        self.epsilon
    }
}
