//! Search directive detection in assistant output
//!
//! The chat capability asks for research by writing `search: <query>`
//! somewhere in its reply. This is a best-effort signal, not a protocol:
//! anything ambiguous degrades to "search for what the user said".

/// Marker the chat capability embeds to request a web search
pub const DIRECTIVE_MARKER: &str = "search:";

/// Characters trimmed from around an extracted query
const QUOTE_CHARS: &[char] = &['"', '\'', '`', '“', '”'];

/// Find the query requested by a search directive.
///
/// Returns `None` when the marker is absent. When present, the query is the
/// rest of the line after the first occurrence, trimmed. An empty remainder
/// yields `Some("")`; the caller decides the fallback.
pub fn find_directive(text: &str) -> Option<&str> {
    // ASCII lowering keeps byte offsets aligned with the original text
    let lowered = text.to_ascii_lowercase();
    let start = lowered.find(DIRECTIVE_MARKER)? + DIRECTIVE_MARKER.len();
    let rest = text.get(start..).unwrap_or_default();
    let line = rest.lines().next().unwrap_or_default();
    Some(line.trim().trim_matches(QUOTE_CHARS).trim())
}

/// Resolve the query to search for, falling back to the user's own message.
///
/// Returns `None` only when the reply carries no directive.
pub fn search_query(reply: &str, user_message: &str) -> Option<String> {
    let found = find_directive(reply)?;
    if found.is_empty() {
        Some(user_message.trim().to_string())
    } else {
        Some(found.to_string())
    }
}
