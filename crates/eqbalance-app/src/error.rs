//! Error types for the application shell.

use eqbalance_core::{ConfigError, EquationError};
use thiserror::Error;

/// Errors that can occur while running the app.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Equation error: {0}")]
    Equation(#[from] EquationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Script error: {0}")]
    Script(String),
}

/// Result type for app operations.
pub type AppResult<T> = Result<T, AppError>;
