use thiserror::Error;

/// Main error type for the resup supervisor
#[derive(Debug, Error)]
pub enum ResupError {
    // Child process errors
    #[error("Failed to launch child process: {0}")]
    LaunchError(String),

    #[error("Failed to retrieve child exit status: {0}")]
    WaitError(String),

    // Metrics server errors
    #[error("Metrics server error: {0}")]
    MetricsServerError(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for resup operations
pub type Result<T> = std::result::Result<T, ResupError>;
