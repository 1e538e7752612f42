mod app_config;
mod config;
pub mod mode;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use mode::{LookupKey, ScoreMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("unknown score type '{0}': expected 'domain' or 'email'")]
    UnknownScoreMode(String),
}
