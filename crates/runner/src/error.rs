use qtrader_ports::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(String),

    #[error("Failed to write report '{path}': {error}")]
    Output { path: String, error: String },
}

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
