use std::cell::RefCell;
use std::collections::VecDeque;

use super::error::LlmError;
use super::prompt::build_extraction_prompt;
use super::traits::LlmClient;

/// Send one payload to the extraction service and return its cleaned reply.
///
/// Single attempt, no retry. Surrounding code fences are removed; a reply
/// that is blank afterwards is `LlmError::EmptyResponse`.
pub fn extract(llm: &dyn LlmClient, model: &str, payload: &str) -> Result<String, LlmError> {
    let prompt = build_extraction_prompt(payload);
    let raw = llm.generate(model, &prompt)?;
    let cleaned = strip_code_fences(&raw);
    if cleaned.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(cleaned.to_string())
}

/// Remove a leading ```` ```json ```` / ```` ``` ```` marker and a trailing
/// ```` ``` ```` marker. Text without fences is only trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").or_else(|| rest.strip_prefix("JSON")).unwrap_or(rest);
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Scripted LLM client for tests: replies are served in order, then the
/// fallback reply repeats. Every prompt is recorded.
pub struct MockLlmClient {
    replies: RefCell<VecDeque<Result<String, String>>>,
    fallback: String,
    prompts: RefCell<Vec<String>>,
    available_models: Vec<String>,
}

impl MockLlmClient {
    pub fn new(fallback: &str) -> Self {
        Self {
            replies: RefCell::new(VecDeque::new()),
            fallback: fallback.to_string(),
            prompts: RefCell::new(Vec::new()),
            available_models: vec!["gemini-pro".to_string()],
        }
    }

    /// Queue a successful reply.
    pub fn then_reply(self, reply: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(reply.to_string()));
        self
    }

    /// Queue a failed call.
    pub fn then_fail(self, message: &str) -> Self {
        self.replies.borrow_mut().push_back(Err(message.to_string()));
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.borrow().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, prompt: &str) -> Result<String, LlmError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match self.replies.borrow_mut().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(LlmError::HttpClient(message)),
            None => Ok(self.fallback.clone()),
        }
    }

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError> {
        Ok(self.available_models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(self.available_models.clone())
    }
}
