//! Example: Search with credentials from the config file or environment.
//!
//! Set `CSE_API_KEY` and `CSE_ENGINE_ID` (or write them to the config file),
//! then run: `cargo run --example basic_search -- "rust programming language"`

use cse_search::{SearchClient, SearchConfig, SearchQuery, SuggestClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "rust programming language".to_string());

    // Credentials, endpoint and timeout come from the usual config layers
    let config = SearchConfig::load(None)?;
    let client = SearchClient::from_config(&config)?;

    let query = SearchQuery::new(text);
    println!("Searching for: {}", query.query);
    println!();

    let results = client.search(&query).await?;

    match results.total_results {
        Some(total) => println!("Showing {} of about {} results", results.len(), total),
        None => println!("Showing {} results", results.len()),
    }
    println!();

    for (i, result) in results.items().iter().enumerate() {
        println!("{}. {}", i + 1, result.title);
        println!("   URL: {}", result.link);
        if let Some(snippet) = &result.snippet {
            let snippet = if snippet.chars().count() > 100 {
                format!("{}...", snippet.chars().take(100).collect::<String>())
            } else {
                snippet.clone()
            };
            println!("   {}", snippet);
        }
        println!();
    }

    // Related queries from the suggestion endpoint
    let suggestions = SuggestClient::from_config(&config)?.suggest(&query.query).await?;
    if !suggestions.is_empty() {
        println!("Related searches:");
        for suggestion in &suggestions.suggestions {
            println!("   {}", suggestion);
        }
    }

    Ok(())
}
