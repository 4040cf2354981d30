use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Normalize raw tender text before it is chunked.
///
/// CRLF and lone CR become `\n`, every line is trimmed, runs of three or
/// more newlines collapse to one blank line, and the result is trimmed.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let trimmed_lines = unified
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_RUN_RE
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \r\n\t\r "), "");
    }

    #[test]
    fn converts_all_line_endings() {
        let out = normalize_text("a\r\nb\rc\nd");
        assert_eq!(out, "a\nb\nc\nd");
        assert!(!out.contains('\r'));
    }

    #[test]
    fn trims_each_line() {
        assert_eq!(normalize_text("  Tender No. 42  \n\t Due: 18-02-2025 "), "Tender No. 42\nDue: 18-02-2025");
    }

    #[test]
    fn collapses_blank_runs_to_one_blank_line() {
        assert_eq!(normalize_text("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_text("a\r\n\r\n\r\nb"), "a\n\nb");
        // Whitespace-only lines count as blank once trimmed
        assert_eq!(normalize_text("a\n   \n \t \n\nb"), "a\n\nb");
    }

    #[test]
    fn keeps_single_blank_line() {
        assert_eq!(normalize_text("para one\n\npara two"), "para one\n\npara two");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "",
            "plain",
            "  a \r\n\r\n\r\n b\r c  ",
            "\n\n\nlead\n\n\n\ntrail\n\n\n",
            "x\u{a0}\n\u{3000}y",
        ];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once, "not idempotent for {input:?}");
        }
    }
}
