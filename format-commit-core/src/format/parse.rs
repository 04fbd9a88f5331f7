// reverse parser - recovers structured fields from a free-text title and
// re-renders it in vocabulary-canonical casing

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::{Config, FormatChoice, TypeOption};

use super::render::{render_custom, CommitFormat, FieldValues, FormatGroup};
use super::segment::{compile, KeywordName, Segment};
use super::FormatError;

/// the structured fields recovered from a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    pub commit_type: String,
    pub scope: Option<String>,
    pub description: String,
    pub fields: BTreeMap<String, String>,
}

/// build the anchored matcher for a compiled pattern
///
/// every capturing segment is lazy except the last one, which is greedy so
/// it absorbs trailing content. this asymmetry is the tie-break for short or
/// reusable literal separators and must not be flattened to all-greedy or
/// all-lazy.
fn build_matcher(segments: &[Segment]) -> Regex {
    let capture_count = segments
        .iter()
        .filter(|s| !matches!(s, Segment::Literal(_)))
        .count();

    let mut pattern = String::from("^");
    let mut seen = 0;
    for segment in segments {
        match segment {
            Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
            _ => {
                seen += 1;
                if seen == capture_count {
                    pattern.push_str("(.+)");
                } else {
                    pattern.push_str("(.+?)");
                }
            }
        }
    }
    pattern.push('$');

    // literals are escaped, so the assembled expression is always valid;
    // a failure here means a broken compile step, not user input
    Regex::new(&pattern).expect("segment-built matcher must be a valid expression")
}

/// parse a free-text title against a compiled custom pattern, validating the
/// extracted type and scope against the configured vocabulary
pub fn parse_custom_title(
    text: &str,
    segments: &[Segment],
    types: &[TypeOption],
    scopes: &[TypeOption],
) -> Result<ParsedTitle, FormatError> {
    let matcher = build_matcher(segments);
    let caps = matcher
        .captures(text)
        .ok_or_else(|| FormatError::FormatMismatch {
            reason: "title does not match the configured pattern".to_string(),
            example: custom_example(segments, types, scopes),
        })?;

    let mut commit_type = None;
    let mut scope = None;
    let mut description = None;
    let mut fields = BTreeMap::new();

    let mut group = 0;
    for segment in segments {
        if matches!(segment, Segment::Literal(_)) {
            continue;
        }
        group += 1;
        let value = caps
            .get(group)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        match segment {
            Segment::Keyword { name, .. } => match name {
                KeywordName::Type => commit_type = Some(value),
                KeywordName::Scope => scope = Some(value),
                KeywordName::Description => description = Some(value),
            },
            Segment::Field { label } => {
                fields.insert(label.clone(), value);
            }
            Segment::Literal(_) => unreachable!("literals are skipped above"),
        }
    }

    let commit_type = canonical_value(commit_type.as_deref().unwrap_or_default(), "type", types)?;
    let scope = match scope {
        Some(value) => Some(canonical_scope(&value, scopes)?),
        None => None,
    };

    Ok(ParsedTitle {
        commit_type,
        scope,
        description: description.unwrap_or_default(),
        fields,
    })
}

/// parse a title against a custom pattern and re-render it, which normalizes
/// keyword casing and replaces type/scope with their canonical vocabulary
/// spelling
pub fn normalize_custom_title(
    text: &str,
    segments: &[Segment],
    types: &[TypeOption],
    scopes: &[TypeOption],
) -> Result<String, FormatError> {
    let parsed = parse_custom_title(text, segments, types, scopes)?;
    let values = FieldValues {
        commit_type: parsed.commit_type,
        scope: parsed.scope,
        description: parsed.description,
        fields: parsed.fields,
    };
    Ok(render_custom(segments, &values))
}

/// render an example title for a pattern, using the first configured
/// type/scope and the field labels as placeholder values
fn custom_example(segments: &[Segment], types: &[TypeOption], scopes: &[TypeOption]) -> String {
    let mut fields = BTreeMap::new();
    for segment in segments {
        if let Segment::Field { label } = segment {
            fields.insert(label.clone(), label.clone());
        }
    }
    let values = FieldValues {
        commit_type: types
            .first()
            .map(|t| t.value.clone())
            .unwrap_or_else(|| "feat".to_string()),
        scope: scopes.first().map(|s| s.value.clone()),
        description: "example description".to_string(),
        fields,
    };
    render_custom(segments, &values)
}

lazy_static! {
    // the four numbered shapes, tried most-specific first so a scoped colon
    // title is never claimed by a looser expression
    static ref NUMBERED_MATCHERS: [(FormatGroup, Regex); 4] = [
        (
            FormatGroup::ScopeColon,
            Regex::new(r"^([A-Za-z]+)\(([^()]+)\):\s*(.+)$").unwrap(),
        ),
        (
            FormatGroup::Scope,
            Regex::new(r"^([A-Za-z]+)\(([^()]+)\)\s*(.+)$").unwrap(),
        ),
        (
            FormatGroup::Colon,
            Regex::new(r"^([A-Za-z]+):\s*(.+)$").unwrap(),
        ),
        (
            FormatGroup::Paren,
            Regex::new(r"^\(([A-Za-z]+)\)\s*(.+)$").unwrap(),
        ),
    ];
}

/// detect which numbered shape a title follows
fn detect_numbered(text: &str) -> Option<(FormatGroup, String, Option<String>, String)> {
    for (group, matcher) in NUMBERED_MATCHERS.iter() {
        if let Some(caps) = matcher.captures(text) {
            let (commit_type, scope, title) = match group {
                FormatGroup::Scope | FormatGroup::ScopeColon => (
                    caps[1].trim().to_string(),
                    Some(caps[2].trim().to_string()),
                    caps[3].trim().to_string(),
                ),
                FormatGroup::Paren | FormatGroup::Colon => {
                    (caps[1].trim().to_string(), None, caps[2].trim().to_string())
                }
            };
            return Some((*group, commit_type, scope, title));
        }
    }
    None
}

/// parse a title against a built-in numbered format and re-render it
///
/// the detected shape must belong to the same format group the configuration
/// expects: a `type(scope): title` is refused under a `type(scope) title`
/// configuration even though it parses on its own.
pub fn normalize_numbered_title(
    text: &str,
    format: CommitFormat,
    types: &[TypeOption],
    scopes: &[TypeOption],
) -> Result<String, FormatError> {
    let example = numbered_example(format, types, scopes);

    let (detected, commit_type, scope, title) =
        detect_numbered(text).ok_or_else(|| FormatError::FormatMismatch {
            reason: "title does not match any known commit format".to_string(),
            example: example.clone(),
        })?;

    if detected != format.group() {
        return Err(FormatError::FormatMismatch {
            reason: format!(
                "title follows \"{detected}\" but the configured format is \"{}\"",
                format.group()
            ),
            example,
        });
    }

    let commit_type = canonical_value(&commit_type, "type", types)?;
    let scope = match scope {
        Some(value) => Some(canonical_scope(&value, scopes)?),
        None => None,
    };

    Ok(format.render(&commit_type, scope.as_deref(), &title))
}

fn numbered_example(format: CommitFormat, types: &[TypeOption], scopes: &[TypeOption]) -> String {
    let first_type = types.first().map(|t| t.value.as_str()).unwrap_or("feat");
    let first_scope = scopes.first().map(|s| s.value.as_str());
    format.render(first_type, first_scope, "example description")
}

/// normalize a free-text title under the active configuration
///
/// this is the single acceptance path shared by manually typed titles and
/// AI suggestions; the caller applies the length gate to the result.
pub fn normalize_commit_title(text: &str, config: &Config) -> Result<String, FormatError> {
    let types = &config.types;
    let scopes = config.scope_options();

    match config.format {
        FormatChoice::Custom => {
            let pattern = config.custom_format.as_deref().ok_or_else(|| {
                FormatError::PatternInvalid(
                    "format is \"custom\" but no customFormat is defined".to_string(),
                )
            })?;
            let segments = compile(pattern);
            normalize_custom_title(text.trim(), &segments, types, scopes)
        }
        FormatChoice::Numbered(number) => {
            let format = CommitFormat::from_number(number).ok_or_else(|| {
                FormatError::PatternInvalid(format!("{number} is not a valid commit format number"))
            })?;
            normalize_numbered_title(text.trim(), format, types, scopes)
        }
    }
}

/// example title for the active configuration, used in prompts and errors
pub fn example_title(config: &Config) -> String {
    let types = &config.types;
    let scopes = config.scope_options();
    match config.format {
        FormatChoice::Custom => config
            .custom_format
            .as_deref()
            .map(|pattern| custom_example(&compile(pattern), types, scopes))
            .unwrap_or_default(),
        FormatChoice::Numbered(number) => CommitFormat::from_number(number)
            .map(|format| numbered_example(format, types, scopes))
            .unwrap_or_default(),
    }
}

fn canonical_value(
    value: &str,
    kind: &'static str,
    options: &[TypeOption],
) -> Result<String, FormatError> {
    options
        .iter()
        .find(|o| o.value.eq_ignore_ascii_case(value))
        .map(|o| o.value.clone())
        .ok_or_else(|| FormatError::UnknownVocabulary {
            kind,
            value: value.to_string(),
            valid: valid_list(options),
        })
}

fn canonical_scope(value: &str, scopes: &[TypeOption]) -> Result<String, FormatError> {
    if scopes.is_empty() {
        return Err(FormatError::UnknownVocabulary {
            kind: "scope",
            value: value.to_string(),
            valid: "(no scopes are configured)".to_string(),
        });
    }
    canonical_value(value, "scope", scopes)
}

fn valid_list(options: &[TypeOption]) -> String {
    options
        .iter()
        .map(|o| o.value.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
