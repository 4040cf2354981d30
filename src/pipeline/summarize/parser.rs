use serde_json::{Map, Value};

use super::client::strip_code_fences;
use super::error::SummarizeError;
use super::types::{ChunkResult, FieldValue};
use crate::models::DerivedFields;

/// Parse one extraction response into its optional fields.
///
/// Fails only when the text is not a JSON object; missing or oddly typed
/// keys simply come back as `None`.
pub fn parse_chunk_result(response: &str) -> Result<ChunkResult, SummarizeError> {
    let object = parse_object(response)?;
    Ok(ChunkResult {
        summary: field(&object, "summary"),
        email: field(&object, "email"),
        phone: field(&object, "phone"),
        requirements: field(&object, "requirements"),
    })
}

/// Turn the final response into the four persisted text fields.
///
/// Never fails: unparseable input yields empty fields so the write can
/// still go ahead.
pub fn extract_fields(response: &str) -> DerivedFields {
    let chunk = match parse_chunk_result(response) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::warn!(error = %e, "Final response is not a JSON object, storing empty fields");
            return DerivedFields::default();
        }
    };

    let join = |value: Option<FieldValue>, separator: &str| {
        value.map(|v| v.join(separator)).unwrap_or_default()
    };

    DerivedFields {
        summary: join(chunk.summary, "\n"),
        email: join(chunk.email, "\n"),
        phone: join(chunk.phone, ","),
        requirements: join(chunk.requirements, "\n"),
    }
}

fn parse_object(response: &str) -> Result<Map<String, Value>, SummarizeError> {
    let json = strip_code_fences(response);
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(SummarizeError::JsonParsing(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(SummarizeError::JsonParsing(e.to_string())),
    }
}

fn field(object: &Map<String, Value>, key: &str) -> Option<FieldValue> {
    object.get(key).and_then(FieldValue::from_json)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
