use serde::{Deserialize, Serialize};

use super::error::LlmError;
use super::traits::LlmClient;

/// Public endpoint of the Generative Language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Blocking HTTP client for Google's Gemini `generateContent` API.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_connect() {
            LlmError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            LlmError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            LlmError::HttpClient(e.to_string())
        }
    }

    fn read_body(response: reqwest::blocking::Response) -> Result<String, LlmError> {
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response body from `models/{model}:generateContent`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Response body from `GET models`
#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

#[derive(Deserialize)]
struct GeminiModel {
    name: String,
}

/// Pull the text of the first candidate out of a `generateContent` body.
fn parse_generate_response(body: &str) -> Result<String, LlmError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::Blocked(reason));
    }

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

fn parse_models_response(body: &str) -> Result<Vec<String>, LlmError> {
    let parsed: ModelsResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParsing(e.to_string()))?;
    Ok(parsed
        .models
        .into_iter()
        .map(|m| m.name.trim_start_matches("models/").to_string())
        .collect())
}

impl LlmClient for GeminiClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let body = Self::read_body(response)?;
        parse_generate_response(&body)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/v1beta/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let body = Self::read_body(response)?;
        parse_models_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = GeminiClient::new("https://example.test/", "key", 60).unwrap();
        assert_eq!(client.base_url, "https://example.test");
        assert_eq!(client.timeout_secs, 60);
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn parses_candidate_text() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "```json\n{\"summary\":"}, {"text": " \"S\"}\n```"}], "role": "model"},
                "finishReason": "STOP"
            }]
        }"#;
        let text = parse_generate_response(body).unwrap();
        assert_eq!(text, "```json\n{\"summary\": \"S\"}\n```");
    }

    #[test]
    fn blocked_prompt_is_error() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(parse_generate_response(body), Err(LlmError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        assert!(matches!(parse_generate_response("{}"), Err(LlmError::EmptyResponse)));
        let body = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        assert!(matches!(parse_generate_response(body), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn garbage_body_is_parse_error() {
        assert!(matches!(
            parse_generate_response("<html>"),
            Err(LlmError::ResponseParsing(_))
        ));
    }

    #[test]
    fn model_names_lose_prefix() {
        let body = r#"{"models": [{"name": "models/gemini-pro"}, {"name": "models/gemini-1.5-flash"}]}"#;
        let models = parse_models_response(body).unwrap();
        assert_eq!(models, vec!["gemini-pro", "gemini-1.5-flash"]);
    }

    #[test]
    fn unreachable_host_maps_to_connection_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let client = GeminiClient::new("http://127.0.0.1:9", "key", 2).unwrap();
        let err = client.generate("gemini-pro", "hi").unwrap_err();
        assert!(
            matches!(err, LlmError::Connection(_) | LlmError::HttpClient(_)),
            "unexpected error: {err}"
        );
    }
}
