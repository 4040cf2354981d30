//! Error types for the tender summarization pipeline.
//!
//! `LlmError` covers the extraction service boundary only; `SummarizeError`
//! is what the merger and the batch runner return.

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Extraction service is unreachable at {0}")]
    Connection(String),

    #[error("Extraction service returned error (status {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Prompt was blocked by the service: {0}")]
    Blocked(String),

    #[error("Extraction service returned an empty response")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Tender text is empty after normalization")]
    EmptyInput,

    #[error("Configuration error: {0}")]
    Config(String),
}
