// ai module - commit title suggestions from a text-generation service

pub mod api;
pub mod prompts;
pub mod validation;

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::env::get_env_key;
use crate::git;
use crate::logger;

pub use validation::{accept_suggestion, extract_suggestions, filter_valid_suggestions};

// diff lines beyond this add cost without improving suggestions
const MAX_DIFF_LINES: usize = 500;

/// generate commit title suggestions for the staged changes
///
/// returns an empty list when there is nothing staged or the user declines a
/// large diff; suggestions that fail the shared acceptance path are dropped,
/// and a partially valid batch is discarded entirely.
pub async fn generate_suggestions(repo_path: &str, config: &Config) -> Result<Vec<String>> {
    let ai = config
        .ai
        .as_ref()
        .ok_or_else(|| anyhow!("no AI configuration defined"))?;

    let Some(diff) = git::staged_diff(repo_path, MAX_DIFF_LINES)? else {
        return Ok(Vec::new());
    };

    let api_key = get_env_key(Path::new(&ai.env_path), &ai.env_key_name).ok_or_else(|| {
        anyhow!(
            "AI api key \"{}\" not found in {}",
            ai.env_key_name,
            ai.env_path
        )
    })?;

    let prompt = prompts::build_prompt(&diff, config);

    // rough token estimate, enough to warn before an expensive call
    let estimated_tokens = prompt.len().div_ceil(4);
    if estimated_tokens > ai.large_diff_token_threshold {
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "large diff detected (~{estimated_tokens} tokens). generate AI suggestions?"
            ))
            .default(false)
            .interact()?;
        if !proceed {
            return Ok(Vec::new());
        }
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("asking {} for title suggestions...", ai.provider.label()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let response = api::request_suggestions(ai, &api_key, &prompt).await;
    spinner.finish_and_clear();

    let suggestions = extract_suggestions(&response?)?;
    let valid = filter_valid_suggestions(&suggestions, config);
    if valid.len() < suggestions.len() {
        logger::warn("some AI suggestions were invalid");
        return Ok(Vec::new());
    }

    Ok(valid)
}
