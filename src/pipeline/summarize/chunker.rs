/// Default upper bound on chunk size, in characters.
pub const DEFAULT_CHUNK_CHARS: usize = 50_000;

/// Split text into contiguous chunks of at most `max_chars` characters.
///
/// Boundaries always fall on `char` boundaries. Empty input yields no
/// chunks; a `max_chars` of zero is treated as one.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
