// prompt construction for the suggestion request

use crate::config::{Config, FormatChoice, TypeOption};
use crate::format::{example_title, CommitFormat};
use crate::git::StagedDiff;

/// system prompt shared by all providers
pub const SYSTEM_PROMPT: &str = "You are a commit message generator. You MUST respond with ONLY a \
JSON array. NO explanations. NO markdown. NO additional text whatsoever.";

/// build the strict JSON-array prompt for the staged changes
pub fn build_prompt(diff: &StagedDiff, config: &Config) -> String {
    let types = describe_options(&config.types);
    let scopes = config.scopes.as_deref().map(describe_options);

    let format_instruction = match config.format {
        FormatChoice::Numbered(number) => CommitFormat::from_number(number)
            .map(|f| format!("Format: {}", f.describe()))
            .unwrap_or_default(),
        FormatChoice::Custom => {
            let pattern = config.custom_format.as_deref().unwrap_or_default();
            format!(
                "Format pattern: \"{pattern}\" where type, scope and description are replaced \
by their values and {{Field}} placeholders keep the literal text shown in the example"
            )
        }
    };

    let scope_line = match scopes {
        Some(scopes) => format!("- Available scopes: {scopes}"),
        None => "- No scopes - DO NOT include a scope in the output".to_string(),
    };

    format!(
        "You must analyze git changes and return ONLY a valid JSON array. NO explanations, \
NO markdown, NO additional text.\n\n\
Git diff stats:\n{stats}\n\n\
Git diff:\n{diff}\n\n\
STRICT REQUIREMENTS:\n\
- {format_instruction}\n\
- Example format: \"{example}\"\n\
- Available types: {types}\n\
{scope_line}\n\
- Length: {min}-{max} characters per title\n\
- Return exactly 4 different commit titles\n\
- Output MUST be a raw JSON array with NO text before or after\n\n\
YOUR RESPONSE MUST BE EXACTLY THIS FORMAT (no other text):\n\
[\"title 1\", \"title 2\", \"title 3\", \"title 4\"]",
        stats = diff.stats.trim_end(),
        diff = diff.diff,
        example = example_title(config),
        min = config.min_length,
        max = config.max_length,
    )
}

fn describe_options(options: &[TypeOption]) -> String {
    options
        .iter()
        .map(|o| {
            if o.description.is_empty() {
                o.value.clone()
            } else {
                format!("{} ({})", o.value, o.description)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FormatChoice, TypeOption};

    fn config() -> Config {
        serde_json::from_str(
            r#"{
                "format": 7,
                "types": [{"value": "feat", "description": "a new feature"}],
                "scopes": [{"value": "api", "description": "the http api"}],
                "minLength": 10,
                "maxLength": 72
            }"#,
        )
        .unwrap()
    }

    fn diff() -> StagedDiff {
        StagedDiff {
            stats: " src/api.rs | 4 ++--\n".to_string(),
            diff: "+fn handler() {}".to_string(),
        }
    }

    #[test]
    fn prompt_names_format_example_and_vocabulary() {
        let prompt = build_prompt(&diff(), &config());
        assert!(prompt.contains("type(scope): Title"), "{prompt}");
        assert!(prompt.contains("feat(api): Example description"), "{prompt}");
        assert!(prompt.contains("feat (a new feature)"), "{prompt}");
        assert!(prompt.contains("api (the http api)"), "{prompt}");
        assert!(prompt.contains("10-72 characters"), "{prompt}");
    }

    #[test]
    fn prompt_forbids_scope_when_none_configured() {
        let mut config = config();
        config.format = FormatChoice::Numbered(4);
        config.scopes = None;
        config.types.push(TypeOption::new("fix", ""));
        let prompt = build_prompt(&diff(), &config);
        assert!(prompt.contains("DO NOT include a scope"), "{prompt}");
        assert!(prompt.contains("feat (a new feature), fix"), "{prompt}");
    }
}
