//! QA wire types
//!
//! One JSON object per line in each direction: a request carries a
//! context/question pair, a response is either the model's native answer
//! shape or a uniform error payload.

use serde::{Deserialize, Serialize};

/// One question asked against one context, parsed from a single input line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRequest {
    /// Passage the answer is extracted from
    pub context: String,
    /// Question to answer
    pub question: String,
}

/// Native result shape of the extractive question-answering task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaAnswer {
    /// Model confidence in the answer (0.0 - 1.0)
    pub score: f64,
    /// Byte offset of the answer start within the context
    pub start: usize,
    /// Byte offset of the answer end within the context
    pub end: usize,
    /// The extracted answer text
    pub answer: String,
}

/// Uniform failure payload. Malformed input and model failures share this
/// shape; consumers only check for the `error` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
