/// JSON shape the service is asked to fill in.
pub const TENDER_JSON_FORMAT: &str = r#"{
    "summary": "text here",
    "email": "email here",
    "phone": ["number1", "number2"],
    "requirements": ["req1", "req2"]
}"#;

/// Build the extraction prompt for one payload (a chunk or merged results).
///
/// The payload is embedded verbatim after the instructions.
pub fn build_extraction_prompt(payload: &str) -> String {
    format!(
        r#"Analyze this tender document and extract the following information in a valid JSON format:
1. Brief summary of requirements
2. Email
3. Phone
4. Key Requirements

Return ONLY the JSON object with no additional text or markdown formatting.
Use this exact format:
{TENDER_JSON_FORMAT}

Tender text:
{payload}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_payload_verbatim() {
        let payload = "Line one\n\n  indented {braces} ```json```";
        let prompt = build_extraction_prompt(payload);
        assert!(prompt.contains(payload));
        assert!(prompt.trim_end().ends_with(payload.trim_end()));
    }

    #[test]
    fn prompt_lists_all_keys() {
        let prompt = build_extraction_prompt("x");
        for key in ["\"summary\"", "\"email\"", "\"phone\"", "\"requirements\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("Return ONLY the JSON object"));
    }

    #[test]
    fn json_format_is_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(TENDER_JSON_FORMAT).unwrap();
        assert!(parsed["phone"].is_array());
        assert!(parsed["requirements"].is_array());
    }
}
