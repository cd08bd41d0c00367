//! Error types for the client.

use oxide_morm_core::Engine;

/// Errors that can occur while compiling or executing statements.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Compiling a statement failed.
    #[error(transparent)]
    Compile(#[from] oxide_morm_core::Error),

    /// Database error during execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The configuration is incomplete or invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// There is no executor for the configured engine.
    #[error("No executor available for engine '{0}'")]
    NoExecutor(Engine),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
