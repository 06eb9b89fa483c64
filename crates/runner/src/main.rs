use qtrader_runner::{SimulationConfig, bootstrap};

fn print_help() {
    eprintln!(
        r#"qtrader - Learning traders on a simulated stock exchange

USAGE:
    qtrader [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --output <PATH>     Write the test episode report as JSON
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Train and test the three reference traders
    qtrader

    # Run with config file and keep the wealth paths
    qtrader --config run.json --output report.json
"#
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--output" | "-o" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a path argument");
                    std::process::exit(1);
                }
                output_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            SimulationConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            SimulationConfig::default()
        }
    };
    log::info!(
        "Traders: {}, training steps: {}, test steps: {}",
        config.traders.len(),
        config.train_steps,
        config.test_steps
    );

    let mut environment = bootstrap::build(&config)?;

    log::info!("Training for {} steps", config.train_steps);
    environment.run(config.train_steps, false);

    log::info!("Testing for {} steps", config.test_steps);
    let report = environment.run(config.test_steps, true);

    for name in report.trader_names() {
        log::info!(
            "{}: final wealth {:.2}",
            name,
            report.final_wealth(name).unwrap_or_default()
        );
    }

    if let Some(path) = output_path {
        report.write_json(&path)?;
        log::info!("Report written to {}", path);
    }

    Ok(())
}
