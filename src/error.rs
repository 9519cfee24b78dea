//! Error taxonomy for `distship`.
//!
//! Every failure is raised where it happens and propagated unhandled to the
//! binary, which prints it once and exits non-zero. Nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the fetch and ship flows.
#[derive(Error, Debug)]
pub enum Error {
    /// A local package manifest is missing, unreadable or malformed.
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// A dist-tag query or mutation against the registry failed.
    #[error("Registry error for {package}: {message}")]
    Registry { package: String, message: String },

    /// Local state and registry state disagree, or there is nothing to ship.
    #[error("{0}")]
    Validation(String),

    /// The next release name could not be determined.
    #[error("Release name error: {0}")]
    Name(String),

    /// Writing the manifest or recording it in git failed.
    #[error("Publish error: {0}")]
    Publish(String),

    /// The external download process failed.
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// `distship.toml` or the release-name list could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
