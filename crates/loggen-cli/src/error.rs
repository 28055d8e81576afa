//! Error types for the log generator binary.
//!
//! [`CliError`] is the top-level error type that wraps every failure mode
//! between loading the configuration and finishing the output file.

use std::path::PathBuf;

/// Top-level error for the log generator binary.
///
/// Each variant wraps a specific stage's error, providing a single error
/// type that the run can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: loggen_core::config::ConfigError,
    },

    /// The generation run failed.
    #[error("generation error: {source}")]
    Generate {
        /// The underlying generation error.
        #[from]
        source: loggen_core::strategy::GenerateError,
    },

    /// The generated sequence failed the causality check.
    #[error("causality check failed: {source}")]
    Causality {
        /// The first violated property.
        #[from]
        source: loggen_core::causality::CausalityError,
    },

    /// Writing the log file failed. A partially written file has been removed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
