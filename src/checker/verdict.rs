//! Verdict normalization and citation formatting
//!
//! Model output is free text; everything that keys off its formatting
//! lives here so the rules can be tested against captured fixtures
//! without touching the network.

/// Marker opening a negative verdict
pub const NEGATIVE_MARKER: &str = "NG";

/// Marker opening a positive, indeterminate or not-applicable verdict
pub const POSITIVE_MARKER: &str = "OK";

/// Heading of the collapsible evidence section
pub const CITATION_SUMMARY: &str = "📚 出典";

/// True when the first line of the trimmed body starts with the negative
/// marker, ignoring ASCII case
pub fn is_negative_verdict(body: &str) -> bool {
    body.trim_start()
        .get(..NEGATIVE_MARKER.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(NEGATIVE_MARKER))
}

/// Looser rule used for workflow answers: the marker anywhere in the text
pub fn contains_negative_marker(answer: &str) -> bool {
    answer.contains(NEGATIVE_MARKER)
}

/// Format one retrieval hit as a self-contained citation entry
///
/// Returns `None` when the snippet is missing or blank.
pub fn format_citation(
    filename: Option<&str>,
    file_id: &str,
    snippet: Option<&str>,
) -> Option<String> {
    let text = snippet.map(str::trim).filter(|t| !t.is_empty())?;
    let label = filename.filter(|f| !f.is_empty()).unwrap_or(file_id);
    Some(format!("- **{}**\n  > {}", label, text))
}

/// Append the evidence section to the verdict body when citations exist
pub fn compose_answer(body: &str, citations: &[String]) -> String {
    if citations.is_empty() {
        return body.to_string();
    }

    format!(
        "{}\n\n---\n\n<details>\n<summary>{}</summary>\n\n{}\n\n</details>",
        body,
        CITATION_SUMMARY,
        citations.join("\n\n")
    )
}
