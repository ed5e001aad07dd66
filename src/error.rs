//! Error types for npbkit
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is [`NpbError`].

use thiserror::Error;

/// Errors produced while loading, modelling or reporting profiling data
#[derive(Debug, Error)]
pub enum NpbError {
    /// Filesystem or process I/O failed
    #[error("I/O error: {message}")]
    IoError {
        /// Description including the path or command involved
        message: String,
    },

    /// Input did not match the expected CSV/TOML/JSON layout
    #[error("Format error: {reason}")]
    FormatError {
        /// What was malformed and where
        reason: String,
    },

    /// Energy-model parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Requested operation is not supported
    #[error("Unsupported operation '{operation}': {reason}")]
    UnsupportedOperation {
        /// Operation name
        operation: String,
        /// Why it cannot be performed
        reason: String,
    },

    /// An aggregate was requested over no samples
    #[error("No samples for '{metric}'")]
    EmptySample {
        /// Metric being aggregated
        metric: String,
    },

    /// A value is outside the domain of the computation
    #[error("Invalid value for '{metric}': {value}")]
    InvalidValue {
        /// Metric or column name
        metric: String,
        /// Offending value
        value: f64,
    },

    /// A benchmark command could not be run
    #[error("Command '{command}' failed: {reason}")]
    CommandFailed {
        /// Shell command line
        command: String,
        /// Failure description
        reason: String,
    },
}

/// Result type alias for npbkit operations
pub type Result<T> = std::result::Result<T, NpbError>;

impl From<std::io::Error> for NpbError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
        }
    }
}
