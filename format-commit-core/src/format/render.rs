// renderer - segments plus field values in, concrete titles and branch names out

use std::collections::BTreeMap;
use std::fmt;

use super::segment::{apply_casing, capitalize, KeywordName, Segment};

/// the values collected for one commit or branch operation
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    pub commit_type: String,
    pub scope: Option<String>,
    pub description: String,
    /// `{Field}` label to value, collected interactively
    pub fields: BTreeMap<String, String>,
}

/// render a compiled commit pattern with the given values
pub fn render_custom(segments: &[Segment], values: &FieldValues) -> String {
    render_segments(segments, values, false)
}

/// render a compiled branch pattern with the given values
///
/// description and field values are sanitized into branch-safe form before
/// casing and concatenation; literals and vocabulary values are trusted
/// (literals are validated, type/scope come from configuration).
pub fn render_custom_branch(segments: &[Segment], values: &FieldValues) -> String {
    render_segments(segments, values, true)
}

fn render_segments(segments: &[Segment], values: &FieldValues, branch: bool) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Keyword { name, casing } => {
                let raw = match name {
                    KeywordName::Type => values.commit_type.clone(),
                    KeywordName::Scope => values.scope.clone().unwrap_or_default(),
                    KeywordName::Description => {
                        if branch {
                            sanitize_branch_value(&values.description)
                        } else {
                            values.description.clone()
                        }
                    }
                };
                out.push_str(&apply_casing(&raw, *casing));
            }
            Segment::Field { label } => {
                let raw = values.fields.get(label).cloned().unwrap_or_default();
                if branch {
                    out.push_str(&sanitize_branch_field(&raw));
                } else {
                    out.push_str(&raw);
                }
            }
        }
    }
    out
}

/// sanitize a free-text value into branch-safe form: lowercase, whitespace
/// runs become a single "-", anything outside [a-z0-9-] is dropped, repeated
/// "-" collapsed, leading/trailing "-" trimmed
pub fn sanitize_branch_value(value: &str) -> String {
    let hyphenated: String = value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '-'))
        .collect();
    collapse_hyphens(&hyphenated)
}

/// branch sanitizer for `{Field}` values: same stripping, but the original
/// casing is kept so identifiers like issue keys survive (PROJ-123)
pub fn sanitize_branch_field(value: &str) -> String {
    let hyphenated: String = value
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-'))
        .collect();
    collapse_hyphens(&hyphenated)
}

fn collapse_hyphens(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_hyphen = false;
    for c in value.chars() {
        if c == '-' {
            if !last_was_hyphen {
                out.push(c);
            }
            last_was_hyphen = true;
        } else {
            out.push(c);
            last_was_hyphen = false;
        }
    }
    out.trim_matches('-').to_string()
}

/// the shape family a numbered format belongs to, used by the reverse parser
/// to refuse a title that matches some other numbered format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatGroup {
    /// `(type) message`
    Paren,
    /// `type: message`
    Colon,
    /// `type(scope) message`
    Scope,
    /// `type(scope): message`
    ScopeColon,
}

impl fmt::Display for FormatGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            FormatGroup::Paren => "(type) message",
            FormatGroup::Colon => "type: message",
            FormatGroup::Scope => "type(scope) message",
            FormatGroup::ScopeColon => "type(scope): message",
        };
        f.write_str(shape)
    }
}

/// the eight built-in commit formats, a closed set that bypasses the
/// pattern compiler entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitFormat {
    /// 1: `(type) Title`
    ParenSentence,
    /// 2: `(type) title`
    ParenLower,
    /// 3: `type: Title`
    ColonSentence,
    /// 4: `type: title`
    ColonLower,
    /// 5: `type(scope) Title`
    ScopeSentence,
    /// 6: `type(scope) title`
    ScopeLower,
    /// 7: `type(scope): Title`
    ScopeColonSentence,
    /// 8: `type(scope): title`
    ScopeColonLower,
}

impl CommitFormat {
    pub const ALL: [CommitFormat; 8] = [
        CommitFormat::ParenSentence,
        CommitFormat::ParenLower,
        CommitFormat::ColonSentence,
        CommitFormat::ColonLower,
        CommitFormat::ScopeSentence,
        CommitFormat::ScopeLower,
        CommitFormat::ScopeColonSentence,
        CommitFormat::ScopeColonLower,
    ];

    /// map a configuration format number (1-8) to its variant
    pub fn from_number(number: u8) -> Option<CommitFormat> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    pub fn number(self) -> u8 {
        Self::ALL
            .iter()
            .position(|f| *f == self)
            .expect("format is in ALL") as u8
            + 1
    }

    /// formats 5-8 carry a scope
    pub fn requires_scope(self) -> bool {
        matches!(self.group(), FormatGroup::Scope | FormatGroup::ScopeColon)
    }

    pub fn group(self) -> FormatGroup {
        match self {
            CommitFormat::ParenSentence | CommitFormat::ParenLower => FormatGroup::Paren,
            CommitFormat::ColonSentence | CommitFormat::ColonLower => FormatGroup::Colon,
            CommitFormat::ScopeSentence | CommitFormat::ScopeLower => FormatGroup::Scope,
            CommitFormat::ScopeColonSentence | CommitFormat::ScopeColonLower => {
                FormatGroup::ScopeColon
            }
        }
    }

    /// render the final commit title for this built-in format
    pub fn render(self, commit_type: &str, scope: Option<&str>, title: &str) -> String {
        let scope = scope.unwrap_or_default();
        match self {
            CommitFormat::ParenSentence => format!("({commit_type}) {}", capitalize(title)),
            CommitFormat::ParenLower => format!("({commit_type}) {}", title.to_lowercase()),
            CommitFormat::ColonSentence => format!("{commit_type}: {}", capitalize(title)),
            CommitFormat::ColonLower => format!("{commit_type}: {}", title.to_lowercase()),
            CommitFormat::ScopeSentence => {
                format!("{commit_type}({scope}) {}", capitalize(title))
            }
            CommitFormat::ScopeLower => {
                format!("{commit_type}({scope}) {}", title.to_lowercase())
            }
            CommitFormat::ScopeColonSentence => {
                format!("{commit_type}({scope}): {}", capitalize(title))
            }
            CommitFormat::ScopeColonLower => {
                format!("{commit_type}({scope}): {}", title.to_lowercase())
            }
        }
    }

    /// one-line human description, shown in the setup wizard and AI prompt
    pub fn describe(self) -> &'static str {
        match self {
            CommitFormat::ParenSentence => "(type) Title with first letter capitalized",
            CommitFormat::ParenLower => "(type) title in lowercase",
            CommitFormat::ColonSentence => "type: Title with first letter capitalized",
            CommitFormat::ColonLower => "type: title in lowercase",
            CommitFormat::ScopeSentence => "type(scope) Title with first letter capitalized",
            CommitFormat::ScopeLower => "type(scope) title in lowercase",
            CommitFormat::ScopeColonSentence => "type(scope): Title with first letter capitalized",
            CommitFormat::ScopeColonLower => "type(scope): title in lowercase",
        }
    }
}

/// the two built-in branch formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchFormat {
    /// 1: `type/description`
    TypeSlash,
    /// 2: `type/scope/description`
    TypeScopeSlash,
}

impl BranchFormat {
    pub fn from_number(number: u8) -> Option<BranchFormat> {
        match number {
            1 => Some(BranchFormat::TypeSlash),
            2 => Some(BranchFormat::TypeScopeSlash),
            _ => None,
        }
    }

    pub fn requires_scope(self) -> bool {
        matches!(self, BranchFormat::TypeScopeSlash)
    }

    /// render the final branch name, sanitizing the description
    pub fn render(self, branch_type: &str, scope: Option<&str>, description: &str) -> String {
        let description = sanitize_branch_value(description);
        match self {
            BranchFormat::TypeSlash => format!("{branch_type}/{description}"),
            BranchFormat::TypeScopeSlash => {
                format!("{branch_type}/{}/{description}", scope.unwrap_or_default())
            }
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            BranchFormat::TypeSlash => "type/description",
            BranchFormat::TypeScopeSlash => "type/scope/description",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::segment::compile;
    use super::*;

    fn values() -> FieldValues {
        let mut fields = BTreeMap::new();
        fields.insert("Issue ID".to_string(), "PROJ-123".to_string());
        FieldValues {
            commit_type: "feat".to_string(),
            scope: Some("api".to_string()),
            description: "Add user endpoint".to_string(),
            fields,
        }
    }

    #[test]
    fn renders_custom_pattern_in_segment_order() {
        let segments = compile("{Issue ID} - type - scope - description");
        // lowercase "description" keyword lowercases the whole value
        assert_eq!(
            render_custom(&segments, &values()),
            "PROJ-123 - feat - api - add user endpoint"
        );
    }

    #[test]
    fn keyword_casing_is_applied_on_render() {
        let segments = compile("TYPE(scope): Description");
        assert_eq!(
            render_custom(&segments, &values()),
            "FEAT(api): Add user endpoint"
        );
    }

    #[test]
    fn missing_scope_and_fields_render_empty() {
        let segments = compile("type/{Ticket}/scope/description");
        let values = FieldValues {
            commit_type: "fix".to_string(),
            scope: None,
            description: "thing".to_string(),
            fields: BTreeMap::new(),
        };
        assert_eq!(render_custom(&segments, &values), "fix///thing");
    }

    #[test]
    fn branch_render_sanitizes_description_and_fields() {
        let segments = compile("type/{Issue ID}-description");
        let mut v = values();
        v.description = "User Authentication!!".to_string();
        assert_eq!(
            render_custom_branch(&segments, &v),
            "feat/PROJ-123-user-authentication"
        );
    }

    #[test]
    fn sanitize_collapses_whitespace_and_strips_punctuation() {
        assert_eq!(sanitize_branch_value("User   Authentication!!"), "user-authentication");
        assert_eq!(sanitize_branch_value("  -- weird -- input --  "), "weird-input");
        assert_eq!(sanitize_branch_value("déjà vu"), "dj-vu");
    }

    #[test]
    fn numbered_formats_render_all_eight_variants() {
        let cases = [
            (1, "(feat) Add user endpoint"),
            (2, "(feat) add user endpoint"),
            (3, "feat: Add user endpoint"),
            (4, "feat: add user endpoint"),
            (5, "feat(api) Add user endpoint"),
            (6, "feat(api) add user endpoint"),
            (7, "feat(api): Add user endpoint"),
            (8, "feat(api): add user endpoint"),
        ];
        for (number, expected) in cases {
            let format = CommitFormat::from_number(number).unwrap();
            assert_eq!(format.number(), number);
            assert_eq!(
                format.render("feat", Some("api"), "Add User endpoint"),
                expected,
                "format {number}"
            );
        }
    }

    #[test]
    fn scope_is_required_from_format_five() {
        for number in 1..=4u8 {
            assert!(!CommitFormat::from_number(number).unwrap().requires_scope());
        }
        for number in 5..=8u8 {
            assert!(CommitFormat::from_number(number).unwrap().requires_scope());
        }
    }

    #[test]
    fn branch_formats_render() {
        assert_eq!(
            BranchFormat::TypeSlash.render("feat", None, "User auth"),
            "feat/user-auth"
        );
        assert_eq!(
            BranchFormat::TypeScopeSlash.render("feat", Some("api"), "User auth"),
            "feat/api/user-auth"
        );
    }
}
