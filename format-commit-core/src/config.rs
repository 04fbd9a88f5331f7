// configuration - loaded from format-commit.json at the consumer repo root

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::format::segment::{compile, has_scope_keyword};
use crate::format::{BranchFormat, CommitFormat, Segment};

/// name of the configuration file, without extension
pub const CONFIG_FILE: &str = "format-commit";

/// default title length bounds
pub const DEFAULT_MIN_LENGTH: usize = 10;
pub const DEFAULT_MAX_LENGTH: usize = 72;

/// an enumerated vocabulary entry (commit/branch type or scope)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeOption {
    pub value: String,
    #[serde(default)]
    pub description: String,
}

impl TypeOption {
    pub fn new(value: &str, description: &str) -> TypeOption {
        TypeOption {
            value: value.to_string(),
            description: description.to_string(),
        }
    }
}

/// a format selection: one of the built-in numbered formats, or "custom"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatChoice {
    Numbered(u8),
    Custom,
}

// persisted as a bare number or the string "custom", matching the JSON the
// tool has always written
impl Serialize for FormatChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormatChoice::Numbered(n) => serializer.serialize_u8(*n),
            FormatChoice::Custom => serializer.serialize_str("custom"),
        }
    }
}

impl<'de> Deserialize<'de> for FormatChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChoiceVisitor;

        impl<'de> Visitor<'de> for ChoiceVisitor {
            type Value = FormatChoice;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a format number or the string \"custom\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<FormatChoice, E> {
                let n = u8::try_from(v).map_err(|_| E::custom("format number out of range"))?;
                Ok(FormatChoice::Numbered(n))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<FormatChoice, E> {
                let n = u8::try_from(v).map_err(|_| E::custom("format number out of range"))?;
                Ok(FormatChoice::Numbered(n))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FormatChoice, E> {
                if v == "custom" {
                    Ok(FormatChoice::Custom)
                } else {
                    Err(E::custom(format!(
                        "expected a format number or \"custom\", got \"{v}\""
                    )))
                }
            }
        }

        deserializer.deserialize_any(ChoiceVisitor)
    }
}

/// when to offer a package version bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeVersion {
    Always,
    ReleaseBranch,
    #[default]
    Never,
}

/// which text-generation service backs the AI suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Anthropic,
    OpenAi,
    Google,
}

impl AiProvider {
    pub fn label(self) -> &'static str {
        match self {
            AiProvider::Anthropic => "anthropic",
            AiProvider::OpenAi => "openai",
            AiProvider::Google => "google",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            AiProvider::Anthropic => "claude-3-5-haiku-latest",
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::Google => "gemini-2.0-flash",
        }
    }

    pub fn default_env_key_name(self) -> &'static str {
        match self {
            AiProvider::Anthropic => "ANTHROPIC_API_KEY",
            AiProvider::OpenAi => "OPENAI_API_KEY",
            AiProvider::Google => "GEMINI_API_KEY",
        }
    }
}

fn default_env_path() -> String {
    ".env".to_string()
}

fn default_token_threshold() -> usize {
    20_000
}

/// AI suggestion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    pub provider: AiProvider,
    pub model: String,
    #[serde(default = "default_env_path")]
    pub env_path: String,
    pub env_key_name: String,
    #[serde(default = "default_token_threshold")]
    pub large_diff_token_threshold: usize,
}

fn default_main_branch() -> String {
    "main".to_string()
}

/// the persisted tool configuration
///
/// the pattern engine treats a loaded configuration as read-only: every core
/// function receives it (or slices of it) as an explicit parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub format: FormatChoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_format: Option<FormatChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_branch_format: Option<String>,
    pub types: Vec<TypeOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<TypeOption>>,
    pub min_length: usize,
    pub max_length: usize,
    #[serde(default)]
    pub stage_all_changes: bool,
    #[serde(default)]
    pub change_version: ChangeVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_branch: Option<String>,
    #[serde(default = "default_main_branch")]
    pub main_branch: String,
    #[serde(default)]
    pub show_all_version_types: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiConfig>,
}

impl Config {
    /// path of the config file inside a repository
    pub fn file_name() -> String {
        format!("{CONFIG_FILE}.json")
    }

    pub fn exists(dir: &Path) -> bool {
        dir.join(Self::file_name()).exists()
    }

    pub fn load(dir: &Path) -> Result<Config> {
        let path = dir.join(Self::file_name());
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(Self::file_name());
        let mut raw = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        raw.push('\n');
        fs::write(&path, raw).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// configured scopes, or an empty slice when none are defined
    pub fn scope_options(&self) -> &[TypeOption] {
        self.scopes.as_deref().unwrap_or(&[])
    }

    pub fn has_scopes(&self) -> bool {
        !self.scope_options().is_empty()
    }

    /// compiled segments of the custom commit pattern, if one is configured
    pub fn commit_segments(&self) -> Option<Vec<Segment>> {
        match self.format {
            FormatChoice::Custom => self.custom_format.as_deref().map(compile),
            FormatChoice::Numbered(_) => None,
        }
    }

    /// compiled segments of the custom branch pattern, if one is configured
    pub fn branch_segments(&self) -> Option<Vec<Segment>> {
        match self.branch_format {
            Some(FormatChoice::Custom) => self.custom_branch_format.as_deref().map(compile),
            _ => None,
        }
    }

    /// whether the active commit format needs a scope value
    pub fn commit_requires_scope(&self) -> bool {
        match self.format {
            FormatChoice::Numbered(n) => CommitFormat::from_number(n)
                .map(|f| f.requires_scope())
                .unwrap_or(false),
            FormatChoice::Custom => self
                .commit_segments()
                .map(|s| has_scope_keyword(&s))
                .unwrap_or(false),
        }
    }

    /// whether the active branch format needs a scope value
    pub fn branch_requires_scope(&self) -> bool {
        match self.branch_format {
            Some(FormatChoice::Numbered(n)) => BranchFormat::from_number(n)
                .map(|f| f.requires_scope())
                .unwrap_or(false),
            Some(FormatChoice::Custom) => self
                .branch_segments()
                .map(|s| has_scope_keyword(&s))
                .unwrap_or(false),
            None => false,
        }
    }
}

/// the default type vocabulary written by the setup wizard
pub fn default_types() -> Vec<TypeOption> {
    vec![
        TypeOption::new("feat", "a new feature"),
        TypeOption::new("fix", "a bug fix"),
        TypeOption::new("docs", "documentation changes"),
        TypeOption::new("style", "formatting, no code change"),
        TypeOption::new("refactor", "code change that neither fixes a bug nor adds a feature"),
        TypeOption::new("test", "adding or fixing tests"),
        TypeOption::new("chore", "maintenance tasks"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(format: &str) -> String {
        format!(
            r#"{{
                "format": {format},
                "types": [{{"value": "feat", "description": "a new feature"}}],
                "minLength": 10,
                "maxLength": 72
            }}"#
        )
    }

    #[test]
    fn numbered_format_round_trips_as_a_number() {
        let config: Config = serde_json::from_str(&minimal("7")).unwrap();
        assert_eq!(config.format, FormatChoice::Numbered(7));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"format\":7"), "got: {json}");
    }

    #[test]
    fn custom_format_round_trips_as_a_string() {
        let config: Config = serde_json::from_str(&minimal("\"custom\"")).unwrap();
        assert_eq!(config.format, FormatChoice::Custom);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"format\":\"custom\""), "got: {json}");
    }

    #[test]
    fn unknown_format_string_is_rejected() {
        assert!(serde_json::from_str::<Config>(&minimal("\"freeform\"")).is_err());
    }

    #[test]
    fn optional_fields_take_defaults() {
        let config: Config = serde_json::from_str(&minimal("1")).unwrap();
        assert_eq!(config.change_version, ChangeVersion::Never);
        assert_eq!(config.main_branch, "main");
        assert!(!config.stage_all_changes);
        assert!(config.scopes.is_none());
        assert!(config.ai.is_none());
        assert!(config.branch_format.is_none());
    }

    #[test]
    fn scope_requirement_follows_the_format() {
        let mut config: Config = serde_json::from_str(&minimal("4")).unwrap();
        assert!(!config.commit_requires_scope());

        config.format = FormatChoice::Numbered(5);
        assert!(config.commit_requires_scope());

        config.format = FormatChoice::Custom;
        config.custom_format = Some("{Issue} - type - scope - description".to_string());
        assert!(config.commit_requires_scope());

        config.custom_format = Some("{Issue} - type - description".to_string());
        assert!(!config.commit_requires_scope());
    }

    #[test]
    fn ai_config_defaults() {
        let raw = r#"{"provider": "anthropic", "model": "claude-3-5-haiku-latest", "envKeyName": "ANTHROPIC_API_KEY"}"#;
        let ai: AiConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(ai.env_path, ".env");
        assert_eq!(ai.large_diff_token_threshold, 20_000);
        assert_eq!(ai.provider.default_env_key_name(), "ANTHROPIC_API_KEY");
    }
}
