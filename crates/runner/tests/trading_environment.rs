//! Full runs built from configuration: training then a reported test episode.

use approx::assert_relative_eq;
use qtrader_runner::{LearnerKind, SimulationConfig, TraderSpec, bootstrap};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn small_config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig {
        seed: Some(seed),
        train_steps: 300,
        test_steps: 100,
        ..Default::default()
    };
    for trader in &mut config.traders {
        trader.forest.n_trees = 5;
    }
    config
}

#[test]
fn test_reported_episode_paths() {
    init_logging();
    let config = small_config(1);
    let mut environment = bootstrap::build(&config).unwrap();

    let training = environment.run(config.train_steps, false);
    assert_eq!(training.steps(), 300);
    assert_eq!(training.wealth_path("tabular sarsa"), None);

    let report = environment.run(config.test_steps, true);
    assert_eq!(report.steps(), 100);
    assert_eq!(report.trader_names().count(), 3);

    for trader in environment.traders() {
        let trader = trader.borrow();
        let path = report.wealth_path(trader.name()).unwrap();
        assert_eq!(path.len(), 101);
        assert_eq!(path[0], 0.0);
        assert_relative_eq!(*path.last().unwrap(), trader.wealth());
        assert_eq!(report.final_wealth(trader.name()), Some(trader.wealth()));
        assert_eq!(trader.step_count(), 100);
    }
}

#[test]
fn test_learning_carries_over_to_test_episode() {
    init_logging();
    let config = small_config(2);
    let mut environment = bootstrap::build(&config).unwrap();

    environment.run(config.train_steps, false);
    let learned: Vec<usize> = environment
        .traders()
        .iter()
        .map(|t| t.borrow().learner().store().len())
        .collect();
    assert!(learned.iter().all(|&n| n > 0));

    environment.run(config.test_steps, true);
    for (trader, before) in environment.traders().iter().zip(learned) {
        assert!(trader.borrow().learner().store().len() >= before);
    }
}

#[test]
fn test_seeded_runs_repeat() {
    init_logging();
    let config = small_config(42);

    let run = || {
        let mut environment = bootstrap::build(&config).unwrap();
        environment.run(config.train_steps, false);
        environment.run(config.test_steps, true)
    };
    let first = run();
    let second = run();

    for name in ["tabular q-learning", "tabular sarsa", "random forest sarsa"] {
        assert_eq!(first.wealth_path(name), second.wealth_path(name));
    }
}

#[test]
fn test_config_from_json_runs() {
    init_logging();
    let json = r#"{
        "seed": 5,
        "exchange": { "tick": 0.01, "max_holding": 40 },
        "traders": [
            { "name": "q", "learner": { "kind": "forest_q_learning" }, "forest": { "n_trees": 3 } },
            { "name": "s", "learner": { "kind": "tabular_sarsa", "actions": [-20, 0, 20] } }
        ]
    }"#;
    let config = SimulationConfig::from_json(json).unwrap();
    let mut environment = bootstrap::build(&config).unwrap();

    let report = environment.run(200, true);

    for trader in environment.traders() {
        assert!(trader.borrow().holding().abs() <= 40);
    }
    assert!(report.final_wealth("q").is_some_and(f64::is_finite));
    assert!(report.final_wealth("s").is_some_and(f64::is_finite));
    let price = environment.exchange().current_price();
    assert_eq!(price.round_dp(2), price);
}

#[test]
fn test_single_custom_trader() {
    init_logging();
    let config = SimulationConfig {
        seed: Some(9),
        traders: vec![TraderSpec::new("solo", LearnerKind::ForestQLearning)],
        ..Default::default()
    };
    let mut environment = bootstrap::build(&config).unwrap();
    assert!(environment.trader("solo").is_some());
    assert!(environment.trader("missing").is_none());

    let report = environment.run(10, true);
    assert_eq!(report.wealth_path("solo").map(<[f64]>::len), Some(11));
}
