//! Prompt construction for the chat and summarizer capabilities

use crate::search::SearchResult;
use std::fmt::Write;

/// System prompt for the conversational assistant
pub const CHAT_SYSTEM_PROMPT: &str = r"You are a research assistant that helps users prepare slide decks.

Answer ordinary questions directly and concisely.

When answering well requires fresh information from the web, do not guess. Instead, reply with a single line of the form:

search: <query>

where <query> is a short web search query. The user will review the results before anything is summarized.";

/// System prompt for the summarizer
pub const SUMMARIZER_SYSTEM_PROMPT: &str =
    "You condense web search results into short, factual summaries suitable for presentation slides.";

/// Build the summarization prompt for a query and its results
pub fn summarize_prompt(query: &str, results: &[SearchResult]) -> String {
    let mut prompt = format!(
        "Summarize the following search results for '{query}' into a concise summary (bullet points or short paragraphs):\n\n"
    );
    for result in results {
        let _ = writeln!(prompt, "{}: {} ({})\n", result.title, result.snippet, result.link);
    }
    prompt
}
