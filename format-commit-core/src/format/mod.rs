// format module - the pattern engine behind commit titles and branch names

pub mod parse;
pub mod render;
pub mod segment;
pub mod validate;

use thiserror::Error;

// re-export key items for convenient access
pub use parse::{
    example_title, normalize_commit_title, normalize_custom_title, normalize_numbered_title,
    parse_custom_title, ParsedTitle,
};
pub use render::{
    render_custom, render_custom_branch, sanitize_branch_value, BranchFormat, CommitFormat,
    FieldValues, FormatGroup,
};
pub use segment::{compile, get_custom_fields, Casing, KeywordName, Segment};
pub use validate::{valid_setup_length, valid_title, validate_branch_pattern, validate_commit_pattern};

/// errors produced by the pattern engine
///
/// every variant renders to a message that is enough on its own to drive a
/// re-prompt: it names the offending value and the expected shape or the
/// valid alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// the pattern itself is illegal (empty, missing keyword, unbalanced
    /// braces, git-unsafe branch separator)
    #[error("invalid pattern: {0}")]
    PatternInvalid(String),

    /// the title does not match the configured format
    #[error("wrong format: {reason} (expected something like \"{example}\")")]
    FormatMismatch { reason: String, example: String },

    /// an extracted type or scope is not in the configured vocabulary
    #[error("unknown {kind} \"{value}\", valid values are: {valid}")]
    UnknownVocabulary {
        kind: &'static str,
        value: String,
        valid: String,
    },

    /// the final rendered title is outside the configured length bounds
    #[error("{0}")]
    LengthViolation(String),
}
