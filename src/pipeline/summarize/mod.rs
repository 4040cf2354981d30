//! Tender summarization pipeline
//!
//! Turns a tender's raw text into summary, email, phone and requirement
//! fields through a generative-AI extraction service:
//! ```text
//! normalize → chunk → extract per chunk → merge → final extract → parse → store
//! ```
//! Texts that fit in one chunk skip the merge and go straight to a single
//! extraction call. Every call is followed by the configured pacing delay.

pub mod error;
pub mod types;
pub mod traits;
pub mod normalize;
pub mod chunker;
pub mod prompt;
pub mod client;
pub mod gemini;
pub mod parser;
pub mod pacing;
pub mod merger;
pub mod store;
#[cfg(feature = "redis-store")]
pub mod redis_store;
pub mod runner;

pub use error::{LlmError, SummarizeError};
pub use types::*;
pub use traits::*;
pub use normalize::normalize_text;
pub use chunker::{chunk_text, DEFAULT_CHUNK_CHARS};
pub use client::{extract, strip_code_fences, MockLlmClient};
pub use gemini::{GeminiClient, DEFAULT_GEMINI_BASE_URL};
pub use parser::{extract_fields, parse_chunk_result};
pub use pacing::{FixedDelay, NoDelay};
pub use merger::summarize_tender;
pub use store::SqliteTenderStore;
#[cfg(feature = "redis-store")]
pub use redis_store::RedisTenderStore;
pub use runner::run_batch;
