//! Error types for the registration wizard.

use std::path::PathBuf;

use crate::registration::WizardStep;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Photo error: {0}")]
    Photo(#[from] PhotoError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while acquiring a profile photo.
#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("Failed to read photo {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Photo file {0} is empty")]
    Empty(PathBuf),

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("Photo read cancelled")]
    Cancelled,
}

/// Errors from posting the record to the backend.
///
/// The wizard collapses all of these into one user-facing message; the
/// variants exist for the diagnostic log.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Backend rejected registration with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Submission cancelled")]
    Cancelled,
}

/// Wizard state-machine errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Please fill out all required fields")]
    MissingFields,

    #[error("Cannot advance from step {0}")]
    NoAdvance(WizardStep),

    #[error("Operation not available on step {0}")]
    WrongStep(WizardStep),

    #[error("A submission is already in flight")]
    SubmissionInProgress,

    #[error("Question not offered for this slot: {0}")]
    QuestionUnavailable(String),

    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Photo must be set through capture, not edited directly")]
    PhotoNotEditable,

    #[error("Registration already submitted")]
    AlreadySubmitted,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
