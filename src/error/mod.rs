use std::path::PathBuf;

use thiserror::Error;

use crate::outcome::OutcomeLogError;
use crate::recipients::RecipientError;
use crate::template::TemplateError;

/// Fatal errors. Anything surfacing as an `AppError` aborts the run;
/// per-recipient delivery failures never do and are recorded in the log instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Provide a bot token via --token, WEBEX_BOT_TOKEN env var, or the settings file")]
    MissingToken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No valid recipient emails found in {}", .0.display())]
    NoRecipients(PathBuf),

    #[error(transparent)]
    Recipients(#[from] RecipientError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Log(#[from] OutcomeLogError),
}

pub type Result<T> = std::result::Result<T, AppError>;
