//! Episode results

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{RunnerError, RunnerResult};

/// Wealth per trader at the end of an episode, and optionally its path
#[derive(Debug, Clone, Default, Serialize)]
pub struct EpisodeReport {
    steps: usize,
    final_wealth: BTreeMap<String, f64>,
    /// Cumulative wealth after each step, starting at 0; empty unless
    /// the episode was reported
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    wealth_paths: BTreeMap<String, Vec<f64>>,
}

impl EpisodeReport {
    pub(crate) fn new(names: &[String], with_paths: bool) -> Self {
        let wealth_paths = if with_paths {
            names.iter().map(|name| (name.clone(), vec![0.0])).collect()
        } else {
            BTreeMap::new()
        };

        Self {
            steps: 0,
            final_wealth: BTreeMap::new(),
            wealth_paths,
        }
    }

    pub(crate) fn record(&mut self, name: &str, wealth: f64) {
        if let Some(path) = self.wealth_paths.get_mut(name) {
            path.push(wealth);
        }
    }

    pub(crate) fn finish(&mut self, name: &str, wealth: f64) {
        self.final_wealth.insert(name.to_string(), wealth);
    }

    pub(crate) fn set_steps(&mut self, steps: usize) {
        self.steps = steps;
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn final_wealth(&self, name: &str) -> Option<f64> {
        self.final_wealth.get(name).copied()
    }

    pub fn wealth_path(&self, name: &str) -> Option<&[f64]> {
        self.wealth_paths.get(name).map(Vec::as_slice)
    }

    /// Trader names, sorted
    pub fn trader_names(&self) -> impl Iterator<Item = &str> {
        self.final_wealth.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> RunnerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RunnerError::Serialize(e.to_string()))
    }

    /// Write the report as pretty JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> RunnerResult<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).map_err(|e| RunnerError::Output {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })
    }
}
