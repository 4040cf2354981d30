//! Seams of the summarization pipeline.
//!
//! - LlmClient: the external extraction service
//! - Pacer: delay policy applied after every service call
//! - TenderStore: where tenders come from and where results go

use super::error::LlmError;
use crate::db::DatabaseError;
use crate::models::{DerivedFields, PendingTender};

/// Generative-AI text service abstraction (allows mocking).
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError>;

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError>;

    fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

/// Wait policy between extraction calls.
pub trait Pacer {
    fn pace(&self);
}

/// Record store backing a batch run.
pub trait TenderStore {
    /// Every tender whose status is still unprocessed.
    fn fetch_unprocessed(&self) -> Result<Vec<PendingTender>, DatabaseError>;

    /// Persist derived fields and mark the tender processed.
    fn save_summary(
        &self,
        tender_id: &str,
        fields: &DerivedFields,
        ai_response: &str,
    ) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_are_object_safe() {
        fn _assert_llm(_: &dyn LlmClient) {}
        fn _assert_pacer(_: &dyn Pacer) {}
        fn _assert_store(_: &dyn TenderStore) {}
    }
}
