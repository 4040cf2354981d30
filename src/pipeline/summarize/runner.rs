//! Batch driver: fetch unprocessed tenders, summarize each, write back.
//!
//! Runs strictly sequentially. Only a failed fetch aborts the run; every
//! per-tender failure is logged, counted and left for the next run.

use std::cell::Cell;
use std::time::Instant;

use uuid::Uuid;

use super::error::{LlmError, SummarizeError};
use super::merger::summarize_tender;
use super::parser::extract_fields;
use super::traits::{LlmClient, Pacer, TenderStore};
use super::types::*;

/// Wraps a client to count every call, failed ones included.
struct CountingClient<'a> {
    inner: &'a dyn LlmClient,
    calls: Cell<u32>,
}

impl LlmClient for CountingClient<'_> {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.generate(model, prompt)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError> {
        self.inner.is_model_available(model)
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        self.inner.list_models()
    }
}

/// Run one batch over every unprocessed tender in `store`.
pub fn run_batch(
    store: &dyn TenderStore,
    llm: &dyn LlmClient,
    pacer: &dyn Pacer,
    config: &SummarizeConfig,
    progress_fn: Option<&dyn Fn(BatchStatusEvent)>,
) -> Result<BatchResult, SummarizeError> {
    let start = Instant::now();
    let run_id = Uuid::new_v4().to_string();

    let tenders = store.fetch_unprocessed()?;
    let total = tenders.len() as u32;
    let mut result = BatchResult::empty(&run_id);
    result.tenders_found = total;

    tracing::info!(run_id = %run_id, tenders = total, "Found unprocessed tenders");

    if let Some(progress) = progress_fn {
        progress(BatchStatusEvent::Started { tender_count: total });
    }

    let counting = CountingClient {
        inner: llm,
        calls: Cell::new(0),
    };

    for (i, tender) in tenders.iter().enumerate() {
        if let Some(progress) = progress_fn {
            progress(BatchStatusEvent::Progress {
                completed: i as u32,
                total,
                current_tender: tender.tender_id.clone(),
            });
        }

        tracing::info!(tender_id = %tender.tender_id, "Processing tender");

        let response = match summarize_tender(&tender.raw_description, &counting, pacer, config) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(tender_id = %tender.tender_id, error = %e, "No summary produced, tender left unprocessed");
                result.tenders_failed += 1;
                result.errors.push(format!("Tender {}: {e}", tender.tender_id));
                continue;
            }
        };

        let fields = extract_fields(&response);
        match store.save_summary(&tender.tender_id, &fields, &response) {
            Ok(()) => {
                tracing::info!(tender_id = %tender.tender_id, "Tender summarized");
                result.tenders_processed += 1;
            }
            Err(e) => {
                tracing::error!(tender_id = %tender.tender_id, error = %e, "Failed to update tender");
                result.tenders_failed += 1;
                result.errors.push(format!("Tender {}: {e}", tender.tender_id));
            }
        }
    }

    result.llm_calls = counting.calls.get();
    result.duration_ms = start.elapsed().as_millis() as u64;

    if let Some(progress) = progress_fn {
        progress(BatchStatusEvent::Completed {
            processed: result.tenders_processed,
            failed: result.tenders_failed,
            duration_ms: result.duration_ms,
        });
    }

    tracing::info!(
        run_id = %run_id,
        processed = result.tenders_processed,
        failed = result.tenders_failed,
        llm_calls = result.llm_calls,
        duration_ms = result.duration_ms,
        "Batch finished"
    );

    Ok(result)
}
