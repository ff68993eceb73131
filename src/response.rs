//! Conversion of raw API responses into [`ResultSet`]s.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::result::MAX_RESULTS;
use crate::transport::HttpResponse;
use crate::{Result, ResultSet, SearchError, SearchResult};

/// Longest error body kept in a [`SearchError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    display_link: Option<String>,
}

impl From<RawItem> for SearchResult {
    fn from(item: RawItem) -> Self {
        Self {
            title: item.title,
            link: item.link,
            snippet: item.snippet,
            display_link: item.display_link,
        }
    }
}

/// Parses a response body into at most `limit` results.
///
/// An absent `items` field yields an empty set. An `error` object in the
/// body, or a non-success status, yields an error even when the body also
/// lacks `items`.
pub fn parse_response(response: &HttpResponse, limit: usize) -> Result<ResultSet> {
    let status = response.status;
    let body = response.body.as_str();
    let success = response.is_success();

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !success => return Err(status_error(status, body)),
        Err(e) => return Err(SearchError::Parse(format!("invalid JSON: {}", e))),
    };

    let object = match value {
        Value::Object(object) => object,
        _ if !success => return Err(status_error(status, body)),
        other => {
            return Err(SearchError::Parse(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            )))
        }
    };

    if let Some(error) = object.get("error").filter(|e| !e.is_null()) {
        return Err(api_error(error, status));
    }

    if !success {
        return Err(status_error(status, body));
    }

    let results = match object.get("items") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => parse_items(items, limit)?,
        Some(other) => {
            return Err(SearchError::Parse(format!(
                "`items` is not an array, found {}",
                json_type(other)
            )))
        }
    };
    debug!("Parsed {} results", results.len());

    Ok(with_metadata(ResultSet::from_results(results), &object))
}

/// Converts the first `limit` entries. Entries past the cut are never inspected.
fn parse_items(items: &[Value], limit: usize) -> Result<Vec<SearchResult>> {
    items
        .iter()
        .take(limit.min(MAX_RESULTS))
        .enumerate()
        .map(|(i, item)| {
            RawItem::deserialize(item)
                .map(SearchResult::from)
                .map_err(|e| SearchError::MalformedEntry {
                    rank: i + 1,
                    reason: e.to_string(),
                })
        })
        .collect()
}

fn with_metadata(mut set: ResultSet, object: &Map<String, Value>) -> ResultSet {
    if let Some(info) = object.get("searchInformation") {
        set.total_results = match info.get("totalResults") {
            Some(Value::String(s)) => s.parse().ok(),
            Some(Value::Number(n)) => n.as_u64(),
            _ => None,
        };
        set.search_time = info.get("searchTime").and_then(Value::as_f64);
    }

    set.next_start = object
        .get("queries")
        .and_then(|q| q.get("nextPage"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("startIndex"))
        .and_then(Value::as_u64)
        .and_then(|start| u32::try_from(start).ok());

    set
}

/// Reads `code` and `message` independently so a bad field never hides the other.
fn api_error(error: &Value, status: u16) -> SearchError {
    if let Value::String(message) = error {
        return SearchError::Api {
            code: status,
            message: message.clone(),
        };
    }

    let code = match error.get("code") {
        Some(Value::Number(n)) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    let message = error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.get("status").and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or("unspecified error");

    SearchError::Api {
        code: code.unwrap_or(status),
        message: message.to_string(),
    }
}

pub(crate) fn status_error(status: u16, body: &str) -> SearchError {
    let trimmed = body.trim();
    let mut body: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
    if trimmed.chars().count() > MAX_ERROR_BODY {
        body.push_str("...");
    }
    SearchError::Status { status, body }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
