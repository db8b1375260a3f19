//! Error types for the Report Portal adapter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ReportError
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors surfaced to the runner by the lifecycle adapter
#[derive(Debug, Error)]
pub enum ReportError {
    /// Adapter construction failed on configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A call to the reporting service failed
    #[error("Report Portal call failed: {0:#}")]
    Remote(#[from] anyhow::Error),

    /// Shipping a log record failed while the abort policy was active
    #[error("Failed to forward log record to Report Portal: {0}")]
    Forwarding(String),

    /// The runner issued callbacks in an order the adapter cannot follow
    #[error("Callback out of sequence: {0}")]
    OutOfSequence(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found
    #[error("No configuration file found searching from {0}")]
    NotFound(PathBuf),

    /// The file exists but has no reporting section
    #[error(
        "No 'reportportal' key is defined in {}. Instead, found the following content:\n{content}",
        .path.display()
    )]
    MissingSection { path: PathBuf, content: String },

    /// The token environment variable is unset
    #[error(
        "You need to define the environment variable {variable} in order to access Report Portal"
    )]
    MissingToken { variable: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
