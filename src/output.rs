//! Rendering of result sets for display.

use crate::{ResultSet, Suggestions};

/// Printed in place of results when a search yields nothing usable.
pub const NO_RESULTS_MESSAGE: &str = "No results found or API error";

/// Renders `"<rank>. <title> - <link>"` lines, ranks starting at 1.
///
/// An empty set renders [`NO_RESULTS_MESSAGE`].
pub fn render_text(results: &ResultSet) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    results
        .items()
        .iter()
        .enumerate()
        .map(|(i, result)| format!("{}. {} - {}", i + 1, result.title, result.link))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `"<title>\t<link>"` lines.
pub fn render_compact(results: &ResultSet) -> String {
    results
        .items()
        .iter()
        .map(|result| format!("{}\t{}", result.title, result.link))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the results and response metadata as pretty-printed JSON.
pub fn render_json(results: &ResultSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

/// Renders one suggestion per line.
pub fn render_suggestions(suggestions: &Suggestions) -> String {
    suggestions.suggestions.join("\n")
}
