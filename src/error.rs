//! # Error Handling
//!
//! This module defines the centralized error type for the `manifest-pipeline`
//! library. It uses `thiserror` to build a single `Error` enum covering every
//! failure the generator can surface, each with a descriptive message.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes: configuration problems,
//!   repository access, template parsing and rendering, malformed manifest
//!   paths (when the caller asked for them to be fatal) and wrapped I/O and
//!   YAML errors.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Paths that match no manifest directory are not errors at all; they are
//! reported as `Classification::Unmatched` and skipped by the driver.

use thiserror::Error;

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

/// Main error type for manifest-pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be parsed or failed validation.
    #[error("Configuration parsing error: {message}{}", hint_suffix(hint))]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Opening the repository, resolving a revision or diffing failed.
    #[error("Git error: {message}{}", hint_suffix(hint))]
    Git {
        message: String,
        /// Optional hint for how to resolve the repository issue
        hint: Option<String>,
    },

    /// A template could not be parsed, or a value could not be substituted.
    ///
    /// May include the name of the placeholder involved.
    #[error("Template processing error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The placeholder that caused the error, if applicable
        variable: Option<String>,
    },

    /// A changed path sits in a manifest directory but cannot be turned into
    /// a resource, and the malformed-path policy is `fail`.
    #[error("Malformed manifest path {path}: {reason}")]
    MalformedPath { path: String, reason: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        let hint = match err.code() {
            git2::ErrorCode::NotFound if err.class() == git2::ErrorClass::Repository => {
                Some("Run the command inside a git repository or pass --repo <DIR>".to_string())
            }
            git2::ErrorCode::UnbornBranch => {
                Some("The repository has no commits yet; commit something first".to_string())
            }
            _ => None,
        };
        Error::Git {
            message: err.message().to_string(),
            hint,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
