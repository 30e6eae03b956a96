use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

#[derive(Debug, thiserror::Error)]
pub enum JsonExtractionError {
    #[error("No JSON object found in model output")]
    NotFound,

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

fn json_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("json block regex is valid"))
}

/// Returns the span from the first `{` to the last `}`.
///
/// Models often wrap the object in prose or a markdown fence, so the match is
/// greedy and spans newlines.
pub fn find_json_object(text: &str) -> Option<&str> {
    json_block_regex().find(text).map(|m| m.as_str())
}

pub fn parse_embedded_json<T: DeserializeOwned>(text: &str) -> Result<T, JsonExtractionError> {
    let block = find_json_object(text).ok_or(JsonExtractionError::NotFound)?;
    Ok(serde_json::from_str(block)?)
}
