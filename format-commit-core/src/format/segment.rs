// pattern compiler - turns a pattern string into an ordered segment list

use lazy_static::lazy_static;
use regex::Regex;

/// casing inferred from how a keyword was spelled in the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Lower,
    Upper,
    Capitalize,
    /// kept for completeness; detection never produces it (any mixed-case
    /// spelling collapses to `Capitalize`)
    AsProvided,
}

/// the three recognised placeholder keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordName {
    Type,
    Scope,
    Description,
}

impl KeywordName {
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordName::Type => "type",
            KeywordName::Scope => "scope",
            KeywordName::Description => "description",
        }
    }
}

/// one compiled unit of a pattern, in left-to-right pattern order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// fixed separator text, emitted verbatim
    Literal(String),
    /// a recognised keyword placeholder with its inferred casing
    Keyword { name: KeywordName, casing: Casing },
    /// a free-form `{Label}` placeholder, filled interactively per invocation
    Field { label: String },
}

lazy_static! {
    // a field token or, failing that, a bare word-boundary keyword; the
    // regex engine picks whichever starts earliest at each position
    static ref TOKEN: Regex =
        Regex::new(r"(?i)\{([^{}]*)\}|\b(type|scope|description)\b").unwrap();
}

/// compile a pattern string into segments
///
/// compilation is total: a pattern with no keywords at all still compiles
/// (to literals and fields only), legality is the validator's concern.
pub fn compile(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in TOKEN.captures_iter(pattern) {
        let token = caps.get(0).expect("match always has a whole group");
        if token.start() > cursor {
            segments.push(Segment::Literal(pattern[cursor..token.start()].to_string()));
        }

        if let Some(label) = caps.get(1) {
            segments.push(Segment::Field {
                label: label.as_str().to_string(),
            });
        } else if let Some(word) = caps.get(2) {
            let name = match word.as_str().to_lowercase().as_str() {
                "type" => KeywordName::Type,
                "scope" => KeywordName::Scope,
                "description" => KeywordName::Description,
                other => unreachable!("keyword regex matched unknown word {other:?}"),
            };
            segments.push(Segment::Keyword {
                name,
                casing: detect_casing(word.as_str()),
            });
        }

        cursor = token.end();
    }

    if cursor < pattern.len() {
        segments.push(Segment::Literal(pattern[cursor..].to_string()));
    }

    segments
}

/// infer casing from a keyword's literal spelling in the pattern
///
/// mixed-case spellings that are neither all-lower nor all-upper collapse to
/// `Capitalize`; there is no reachable "as provided" state.
pub fn detect_casing(word: &str) -> Casing {
    if word == word.to_lowercase() {
        Casing::Lower
    } else if word == word.to_uppercase() {
        Casing::Upper
    } else {
        Casing::Capitalize
    }
}

/// apply a casing transform to a whole value (multi-word values are
/// transformed as one unit, not per-word)
pub fn apply_casing(value: &str, casing: Casing) -> String {
    match casing {
        Casing::Lower => value.to_lowercase(),
        Casing::Upper => value.to_uppercase(),
        Casing::Capitalize => capitalize(value),
        Casing::AsProvided => value.to_string(),
    }
}

/// uppercase the first character, lowercase the rest
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// list the `{Field}` labels of a pattern, in order of first appearance
///
/// drives the interactive collector: one prompt per returned label.
pub fn get_custom_fields(pattern: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for segment in compile(pattern) {
        if let Segment::Field { label } = segment {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }
    labels
}

/// whether any compiled segment is the `scope` keyword
pub fn has_scope_keyword(segments: &[Segment]) -> bool {
    segments.iter().any(|s| {
        matches!(
            s,
            Segment::Keyword {
                name: KeywordName::Scope,
                ..
            }
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_keywords_fields_and_literals_in_order() {
        let segments = compile("{Issue ID} - type - scope - description");
        assert_eq!(
            segments,
            vec![
                Segment::Field {
                    label: "Issue ID".to_string()
                },
                Segment::Literal(" - ".to_string()),
                Segment::Keyword {
                    name: KeywordName::Type,
                    casing: Casing::Lower
                },
                Segment::Literal(" - ".to_string()),
                Segment::Keyword {
                    name: KeywordName::Scope,
                    casing: Casing::Lower
                },
                Segment::Literal(" - ".to_string()),
                Segment::Keyword {
                    name: KeywordName::Description,
                    casing: Casing::Lower
                },
            ]
        );
    }

    #[test]
    fn keyword_casing_follows_pattern_spelling() {
        let segments = compile("TYPE: Description");
        assert_eq!(
            segments,
            vec![
                Segment::Keyword {
                    name: KeywordName::Type,
                    casing: Casing::Upper
                },
                Segment::Literal(": ".to_string()),
                Segment::Keyword {
                    name: KeywordName::Description,
                    casing: Casing::Capitalize
                },
            ]
        );
    }

    #[test]
    fn keywords_inside_longer_words_are_not_tokens() {
        let segments = compile("subtype - description");
        assert_eq!(
            segments[0],
            Segment::Literal("subtype - ".to_string()),
            "word boundary must protect 'subtype'"
        );
    }

    #[test]
    fn braced_keyword_is_a_field_not_a_keyword() {
        let segments = compile("{type} description");
        assert_eq!(
            segments[0],
            Segment::Field {
                label: "type".to_string()
            }
        );
    }

    #[test]
    fn pattern_without_keywords_still_compiles() {
        let segments = compile("release notes");
        assert_eq!(segments, vec![Segment::Literal("release notes".to_string())]);
    }

    #[test]
    fn detect_casing_three_states() {
        assert_eq!(detect_casing("type"), Casing::Lower);
        assert_eq!(detect_casing("TYPE"), Casing::Upper);
        assert_eq!(detect_casing("Type"), Casing::Capitalize);
        // mixed case collapses to capitalize, the permissive default
        assert_eq!(detect_casing("tYpE"), Casing::Capitalize);
    }

    #[test]
    fn apply_casing_transforms_whole_value() {
        assert_eq!(apply_casing("feat", Casing::Upper), "FEAT");
        assert_eq!(apply_casing("FEAT", Casing::Capitalize), "Feat");
        assert_eq!(apply_casing("Add User Endpoint", Casing::Lower), "add user endpoint");
        assert_eq!(
            apply_casing("add user endpoint", Casing::Capitalize),
            "Add user endpoint"
        );
    }

    #[test]
    fn custom_fields_are_listed_once_in_order() {
        let fields = get_custom_fields("{Issue ID}/{Team} - type - {Issue ID} - description");
        assert_eq!(fields, vec!["Issue ID".to_string(), "Team".to_string()]);
    }
}
