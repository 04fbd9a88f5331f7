// suggestion acceptance - AI output goes through the exact pipeline manual
// titles do: reverse-parse, normalize, length gate

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::Config;
use crate::format::{normalize_commit_title, valid_title, FormatError};

lazy_static! {
    // the providers are told to answer with a bare array, but some wrap it
    // in prose or code fences anyway
    static ref JSON_ARRAY: Regex = Regex::new(r"(?s)\[.*\]").unwrap();
}

/// pull the JSON array of titles out of a raw provider response
pub fn extract_suggestions(response: &str) -> Result<Vec<String>> {
    let raw = JSON_ARRAY
        .find(response)
        .ok_or_else(|| anyhow!("no JSON array found in AI response"))?;
    let suggestions: Vec<String> = serde_json::from_str(raw.as_str())
        .context("AI response is not a valid JSON array of strings")?;
    if suggestions.len() != 4 {
        return Err(anyhow!(
            "expected exactly 4 suggestions, got {}",
            suggestions.len()
        ));
    }
    Ok(suggestions)
}

/// run one title through the shared acceptance path, returning the
/// normalized form
pub fn accept_suggestion(title: &str, config: &Config) -> Result<String, FormatError> {
    let normalized = normalize_commit_title(title, config)?;
    valid_title(&normalized, config.min_length, config.max_length)?;
    Ok(normalized)
}

/// keep only the suggestions that pass the acceptance path, normalized
pub fn filter_valid_suggestions(suggestions: &[String], config: &Config) -> Vec<String> {
    suggestions
        .iter()
        .filter_map(|s| accept_suggestion(s, config).ok())
        .collect()
}
