//! Gradient hosted fine-tuning service
//!
//! Thin client over the Gradient REST API: create a model adapter from a
//! base model, fine-tune it on instruction/response samples, generate a
//! completion, delete the adapter. Used by the one-shot `finetune` binary.

pub mod client;
pub mod run;

use thiserror::Error;

/// Gradient API errors
#[derive(Debug, Error)]
pub enum GradientError {
    /// A required environment variable is absent or empty
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
    /// The service rejected the credentials
    #[error("unauthorized")]
    Unauthorized,
    /// No base model with the requested slug exists in the workspace
    #[error("unknown base model: {0}")]
    UnknownBaseModel(String),
    /// The service answered with a non-success status
    #[error("Gradient API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The HTTP call itself failed
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}
