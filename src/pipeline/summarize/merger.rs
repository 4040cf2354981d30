//! Chunked summarization: normalize, split, extract per chunk, merge, and
//! consolidate with one final extraction call.

use super::chunker::chunk_text;
use super::client::extract;
use super::error::SummarizeError;
use super::normalize::normalize_text;
use super::parser::parse_chunk_result;
use super::traits::{LlmClient, Pacer};
use super::types::{MergedResult, SummarizeConfig};

/// Produce the final extraction response for one tender's raw text.
///
/// Every service call is followed by `pacer.pace()`, whether it succeeded
/// or not. With a single chunk the reply is returned as is; with several,
/// failed or unparseable chunks are skipped and the rest are merged and
/// sent back for a consolidating pass. The consolidating call is made even
/// when no chunk contributed anything.
pub fn summarize_tender(
    raw_text: &str,
    llm: &dyn LlmClient,
    pacer: &dyn Pacer,
    config: &SummarizeConfig,
) -> Result<String, SummarizeError> {
    let text = normalize_text(raw_text);
    let chunks = chunk_text(&text, config.max_chunk_chars);

    match chunks.as_slice() {
        [] => Err(SummarizeError::EmptyInput),
        [only] => {
            let reply = extract(llm, &config.model_name, only);
            pacer.pace();
            Ok(reply?)
        }
        _ => {
            let merged = merge_chunks(&chunks, llm, pacer, config);
            tracing::info!(
                chunks = chunks.len(),
                merged = merged.chunks_merged,
                "Consolidating chunk extractions"
            );

            let reply = extract(llm, &config.model_name, &merged.consolidated_text());
            pacer.pace();
            Ok(reply?)
        }
    }
}

fn merge_chunks(
    chunks: &[&str],
    llm: &dyn LlmClient,
    pacer: &dyn Pacer,
    config: &SummarizeConfig,
) -> MergedResult {
    let mut merged = MergedResult::default();
    let total = chunks.len();

    for (index, chunk) in chunks.iter().enumerate() {
        let reply = extract(llm, &config.model_name, chunk);
        pacer.pace();

        let response = match reply {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(chunk = index + 1, total, error = %e, "Extraction call failed, skipping chunk");
                continue;
            }
        };

        match parse_chunk_result(&response) {
            Ok(result) => merged.absorb(&result),
            Err(e) => {
                tracing::warn!(chunk = index + 1, total, error = %e, "Unparseable chunk response, skipping chunk");
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::summarize::client::MockLlmClient;
    use crate::pipeline::summarize::error::LlmError;
    use crate::pipeline::summarize::pacing::CountingPacer;

    const CHUNK_REPLY: &str =
        r#"{"summary":"part","email":"p@x.org","phone":["1","2"],"requirements":["r"]}"#;
    const FINAL_REPLY: &str =
        r#"{"summary":"whole","email":"p@x.org","phone":["1","2"],"requirements":["r"]}"#;

    fn config(max_chunk_chars: usize) -> SummarizeConfig {
        SummarizeConfig {
            max_chunk_chars,
            ..Default::default()
        }
    }

    #[test]
    fn short_text_makes_one_call_and_returns_reply_unmodified() {
        let llm = MockLlmClient::new(FINAL_REPLY);
        let pacer = CountingPacer::default();
        let text = "t".repeat(10_000);

        let result = summarize_tender(&text, &llm, &pacer, &config(50_000)).unwrap();

        assert_eq!(result, FINAL_REPLY);
        assert_eq!(llm.call_count(), 1);
        assert_eq!(pacer.count(), 1);
    }

    #[test]
    fn long_text_makes_three_chunk_calls_plus_final() {
        let llm = MockLlmClient::new(FINAL_REPLY)
            .then_reply(CHUNK_REPLY)
            .then_reply(CHUNK_REPLY)
            .then_reply(CHUNK_REPLY);
        let pacer = CountingPacer::default();
        let text = "t".repeat(120_000);

        let result = summarize_tender(&text, &llm, &pacer, &config(50_000)).unwrap();

        assert_eq!(result, FINAL_REPLY);
        assert_eq!(llm.call_count(), 4);
        assert_eq!(pacer.count(), 4);

        let final_prompt = &llm.prompts()[3];
        assert!(final_prompt.contains("Summaries after chunking:\npart\npart\npart"));
        assert!(final_prompt.contains("Phone numbers after chunking:\n1,2\n1,2\n1,2"));
    }

    #[test]
    fn chunks_are_sent_in_order() {
        let llm = MockLlmClient::new(CHUNK_REPLY);
        let pacer = CountingPacer::default();
        let text = format!("{}{}", "a".repeat(10), "b".repeat(5));

        summarize_tender(&text, &llm, &pacer, &config(10)).unwrap();

        let prompts = llm.prompts();
        assert!(prompts[0].contains(&"a".repeat(10)));
        assert!(prompts[1].ends_with("bbbbb\n"));
    }

    #[test]
    fn failed_chunk_call_is_skipped_but_still_paced() {
        let llm = MockLlmClient::new(FINAL_REPLY)
            .then_reply(r#"{"summary":"one"}"#)
            .then_fail("503")
            .then_reply(r#"{"summary":"three"}"#);
        let pacer = CountingPacer::default();

        let result = summarize_tender(&"x".repeat(30), &llm, &pacer, &config(10)).unwrap();

        assert_eq!(result, FINAL_REPLY);
        assert_eq!(pacer.count(), 4);
        assert!(llm.prompts()[3].contains("Summaries after chunking:\none\nthree\n"));
    }

    #[test]
    fn malformed_chunk_contributes_nothing() {
        let llm = MockLlmClient::new(FINAL_REPLY)
            .then_reply("I could not find any tender details.")
            .then_reply(r#"{"email":"only@x.org"}"#);
        let pacer = CountingPacer::default();

        summarize_tender(&"x".repeat(20), &llm, &pacer, &config(10)).unwrap();

        let final_prompt = &llm.prompts()[2];
        assert!(final_prompt.contains("Summaries after chunking:\n\n"));
        assert!(final_prompt.contains("Emails after chunking:\nonly@x.org"));
    }

    #[test]
    fn unusable_chunks_still_get_final_call() {
        let llm = MockLlmClient::new(r#"{"summary":"final"}"#)
            .then_reply("garbage")
            .then_reply("garbage");
        let pacer = CountingPacer::default();

        let result = summarize_tender(&"x".repeat(20), &llm, &pacer, &config(10)).unwrap();

        assert_eq!(result, r#"{"summary":"final"}"#);
        assert_eq!(llm.call_count(), 3);
        assert_eq!(pacer.count(), 3);
        assert!(llm.prompts()[2].contains("Summaries after chunking:\n\n\nEmails after chunking:"));
    }

    #[test]
    fn final_call_failure_fails_tender() {
        let llm = MockLlmClient::new(CHUNK_REPLY)
            .then_reply(CHUNK_REPLY)
            .then_reply(CHUNK_REPLY)
            .then_fail("quota exceeded");
        let pacer = CountingPacer::default();

        let err = summarize_tender(&"x".repeat(20), &llm, &pacer, &config(10)).unwrap_err();

        assert!(matches!(err, SummarizeError::Llm(LlmError::HttpClient(_))));
        assert_eq!(pacer.count(), 3);
    }

    #[test]
    fn single_chunk_failure_is_paced_and_returned() {
        let llm = MockLlmClient::new(FINAL_REPLY).then_fail("timeout");
        let pacer = CountingPacer::default();

        let err = summarize_tender("short tender", &llm, &pacer, &config(50_000)).unwrap_err();

        assert!(matches!(err, SummarizeError::Llm(_)));
        assert_eq!(pacer.count(), 1);
    }

    #[test]
    fn empty_text_makes_no_calls() {
        let llm = MockLlmClient::new(FINAL_REPLY);
        let pacer = CountingPacer::default();

        let err = summarize_tender(" \r\n \n ", &llm, &pacer, &config(50_000)).unwrap_err();

        assert!(matches!(err, SummarizeError::EmptyInput));
        assert_eq!(llm.call_count(), 0);
        assert_eq!(pacer.count(), 0);
    }

    #[test]
    fn text_is_normalized_before_chunking() {
        let llm = MockLlmClient::new(FINAL_REPLY);
        let pacer = CountingPacer::default();

        summarize_tender("  Tender  \r\n\r\n\r\n\r\nDue soon ", &llm, &pacer, &config(50_000)).unwrap();

        assert!(llm.prompts()[0].contains("Tender text:\nTender\n\nDue soon\n"));
    }
}
