//! Question answering
//!
//! This module provides the question-answering capability behind the
//! `qa-stdio` binary: a backend trait, the hosted pipeline implementation,
//! and the line-delimited serve loop.

pub mod pipeline;
pub mod server;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::QaAnswer;

/// QA errors
///
/// All variants render to the same `{"error": ...}` line on the wire; the
/// taxonomy exists for callers and logs, not for the protocol.
#[derive(Debug, Error)]
pub enum QaError {
    /// The input line was not a valid request object
    #[error("{0}")]
    BadRequest(String),
    /// The HTTP call to the model service failed
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The model service answered with an error
    #[error("{0}")]
    Backend(String),
}

/// A question-answering capability: maps (context, question) to an answer.
///
/// Acquisition may be slow (hosted model load); implementations are
/// constructed once before the serve loop starts and reused for every
/// request.
#[async_trait]
pub trait QaBackend: Send + Sync {
    async fn answer(&self, context: &str, question: &str) -> Result<QaAnswer, QaError>;
}
