use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::chunker::DEFAULT_CHUNK_CHARS;

// ═══════════════════════════════════════════
// Field values
// ═══════════════════════════════════════════

/// A response field that the service may emit as a string or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Read a JSON value leniently.
    ///
    /// Strings and numbers become `Single`; arrays become `List` with null,
    /// non-scalar and blank entries dropped. Anything that ends up empty is
    /// `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let field = match value {
            serde_json::Value::String(s) => Self::Single(s.trim().to_string()),
            serde_json::Value::Number(n) => Self::Single(n.to_string()),
            serde_json::Value::Array(items) => Self::List(
                items
                    .iter()
                    .filter_map(scalar_text)
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            _ => return None,
        };
        (!field.is_empty()).then_some(field)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Flatten to text; a single value collapses to itself.
    pub fn join(&self, separator: &str) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::List(items) => items.join(separator),
        }
    }
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ═══════════════════════════════════════════
// Per-chunk and merged results
// ═══════════════════════════════════════════

/// Parsed extraction response for one chunk. Absent or empty keys are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkResult {
    pub summary: Option<FieldValue>,
    pub email: Option<FieldValue>,
    pub phone: Option<FieldValue>,
    pub requirements: Option<FieldValue>,
}

/// Append-only accumulation of every chunk's contribution for one tender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedResult {
    pub summary: String,
    pub email: String,
    pub phone: String,
    pub requirements: String,
    pub chunks_merged: usize,
}

impl MergedResult {
    pub fn absorb(&mut self, chunk: &ChunkResult) {
        append_line(&mut self.summary, chunk.summary.as_ref(), "\n");
        append_line(&mut self.email, chunk.email.as_ref(), "\n");
        append_line(&mut self.phone, chunk.phone.as_ref(), ",");
        append_line(&mut self.requirements, chunk.requirements.as_ref(), "\n");
        self.chunks_merged += 1;
    }

    /// Text block handed to the final consolidation call.
    pub fn consolidated_text(&self) -> String {
        format!(
            "Summaries after chunking:\n{}\n\n\
             Emails after chunking:\n{}\n\n\
             Phone numbers after chunking:\n{}\n\n\
             Requirements after chunking:\n{}",
            self.summary, self.email, self.phone, self.requirements
        )
    }
}

fn append_line(buffer: &mut String, value: Option<&FieldValue>, inner_separator: &str) {
    let Some(value) = value else { return };
    let text = value.join(inner_separator);
    if text.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(&text);
}

// ═══════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════

/// Knobs for one summarization run.
#[derive(Debug, Clone)]
pub struct SummarizeConfig {
    /// Model name passed to the extraction service.
    pub model_name: String,
    /// Maximum chunk size in characters.
    pub max_chunk_chars: usize,
    /// Wait after every extraction call.
    pub pacing: Duration,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            model_name: "gemini-pro".to_string(),
            max_chunk_chars: DEFAULT_CHUNK_CHARS,
            pacing: Duration::from_secs(30),
        }
    }
}

// ═══════════════════════════════════════════
// Batch results
// ═══════════════════════════════════════════

/// Outcome of one full batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub run_id: String,
    pub tenders_found: u32,
    pub tenders_processed: u32,
    pub tenders_failed: u32,
    pub llm_calls: u32,
    pub duration_ms: u64,
    pub errors: Vec<String>,
}

impl BatchResult {
    pub fn empty(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            ..Default::default()
        }
    }
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchStatusEvent {
    Started { tender_count: u32 },
    Progress { completed: u32, total: u32, current_tender: String },
    Completed { processed: u32, failed: u32, duration_ms: u64 },
}
