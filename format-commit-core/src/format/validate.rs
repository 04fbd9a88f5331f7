// pattern validators and length gates
//
// validators gate pattern acceptance at configuration time, before the
// renderer or the reverse parser ever see the pattern.

use super::segment::{compile, KeywordName, Segment};
use super::FormatError;

// characters git refuses inside reference names
const GIT_ILLEGAL_CHARS: [char; 7] = ['~', '^', ':', '?', '*', '[', '\\'];

/// validate a custom commit pattern
///
/// a commit pattern must carry both the `type` and `description` keywords.
pub fn validate_commit_pattern(pattern: &str) -> Result<(), FormatError> {
    validate_pattern(pattern, true)?;
    Ok(())
}

/// validate a custom branch pattern
///
/// branch patterns only require the `description` keyword, and every literal
/// separator must be legal inside a git reference name.
pub fn validate_branch_pattern(pattern: &str) -> Result<(), FormatError> {
    validate_pattern(pattern, false)?;

    for segment in compile(pattern) {
        // dynamic segments are exempt: their rendered values are sanitized
        let Segment::Literal(text) = segment else {
            continue;
        };

        if text.chars().any(|c| c.is_whitespace()) {
            return Err(FormatError::PatternInvalid(format!(
                "branch separator \"{text}\" contains whitespace, which is not allowed in git branch names"
            )));
        }
        if let Some(bad) = text.chars().find(|c| GIT_ILLEGAL_CHARS.contains(c)) {
            return Err(FormatError::PatternInvalid(format!(
                "branch separator \"{text}\" contains \"{bad}\", one of the characters ~ ^ : ? * [ \\ that are illegal in git branch names"
            )));
        }
        if text.contains("..") || text.contains("//") {
            return Err(FormatError::PatternInvalid(format!(
                "branch separator \"{text}\" must not contain \"..\" or \"//\""
            )));
        }
    }

    Ok(())
}

fn validate_pattern(pattern: &str, require_type: bool) -> Result<(), FormatError> {
    if pattern.trim().is_empty() {
        return Err(FormatError::PatternInvalid(
            "pattern cannot be empty".to_string(),
        ));
    }

    // the keywords must survive tokenization: a substring match would accept
    // embedded spellings like "prototype" that compile to plain literals
    let segments = compile(pattern);
    let has_keyword = |wanted: KeywordName| {
        segments
            .iter()
            .any(|s| matches!(s, Segment::Keyword { name, .. } if *name == wanted))
    };
    if require_type && !has_keyword(KeywordName::Type) {
        return Err(FormatError::PatternInvalid(
            "pattern must contain the \"type\" keyword".to_string(),
        ));
    }
    if !has_keyword(KeywordName::Description) {
        return Err(FormatError::PatternInvalid(
            "pattern must contain the \"description\" keyword".to_string(),
        ));
    }

    // running depth counter: never negative, zero at the end
    let mut depth: i32 = 0;
    for c in pattern.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(FormatError::PatternInvalid(
                        "pattern braces are unbalanced: \"}\" without a matching \"{\"".to_string(),
                    ));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(FormatError::PatternInvalid(
            "pattern braces are unbalanced: \"{\" without a matching \"}\"".to_string(),
        ));
    }

    Ok(())
}

/// length gate for a final rendered title, applied after normalization
pub fn valid_title(title: &str, len_min: usize, len_max: usize) -> Result<(), FormatError> {
    let len = title.chars().count();
    if len < len_min {
        return Err(FormatError::LengthViolation(format!(
            "commit title too short ({len} characters, minimum is {len_min})"
        )));
    }
    if len > len_max {
        return Err(FormatError::LengthViolation(format!(
            "commit title too long ({len} characters, maximum is {len_max})"
        )));
    }
    Ok(())
}

/// bounds check for the min/max length values entered at setup time
pub fn valid_setup_length(len: i64) -> Result<(), FormatError> {
    if len < 1 {
        return Err(FormatError::LengthViolation(format!(
            "{len} is not a valid length"
        )));
    }
    if len > 255 {
        return Err(FormatError::LengthViolation(
            "length cannot be higher than 255".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_pattern_requires_description() {
        let err = validate_commit_pattern("{Issue} - type").unwrap_err();
        assert!(err.to_string().contains("description"), "got: {err}");
    }

    #[test]
    fn commit_pattern_requires_type() {
        let err = validate_commit_pattern("{Issue} - description").unwrap_err();
        assert!(err.to_string().contains("type"), "got: {err}");
    }

    // keywords embedded inside longer words tokenize as literals and must
    // not satisfy the presence check
    #[test]
    fn embedded_keyword_spellings_do_not_count() {
        let err = validate_commit_pattern("prototype - description").unwrap_err();
        assert!(err.to_string().contains("type"), "got: {err}");

        let err = validate_commit_pattern("type - redescription").unwrap_err();
        assert!(err.to_string().contains("description"), "got: {err}");
    }

    // `{type}` is a field labelled "type", not the keyword
    #[test]
    fn braced_keyword_is_a_field_not_a_keyword() {
        let err = validate_commit_pattern("{type} - description").unwrap_err();
        assert!(err.to_string().contains("type"), "got: {err}");
    }

    // later behaviour of the tool: branch patterns are the permissive
    // variant and only need a description
    #[test]
    fn branch_pattern_does_not_require_type() {
        assert!(validate_branch_pattern("{Issue}-description").is_ok());
    }

    #[test]
    fn unbalanced_braces_are_rejected() {
        let err = validate_commit_pattern("{Issue - type - description").unwrap_err();
        assert!(err.to_string().contains("unbalanced"), "got: {err}");

        let err = validate_commit_pattern("Issue} - type - description").unwrap_err();
        assert!(err.to_string().contains("unbalanced"), "got: {err}");
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let err = validate_commit_pattern("   ").unwrap_err();
        assert!(err.to_string().contains("empty"), "got: {err}");
    }

    #[test]
    fn branch_literals_must_be_git_safe() {
        let err = validate_branch_pattern("type - description").unwrap_err();
        assert!(err.to_string().contains("whitespace"), "got: {err}");

        let err = validate_branch_pattern("type..description").unwrap_err();
        assert!(err.to_string().contains(".."), "got: {err}");

        let err = validate_branch_pattern("type:description").unwrap_err();
        assert!(err.to_string().contains("illegal"), "got: {err}");
    }

    #[test]
    fn branch_field_and_keyword_segments_are_exempt() {
        // the label may contain a space, only literals are checked
        assert!(validate_branch_pattern("type/{Issue ID}-description").is_ok());
    }

    #[test]
    fn title_length_gate() {
        assert!(valid_title("feat: add endpoint", 5, 50).is_ok());
        let err = valid_title("hi", 5, 50).unwrap_err();
        assert!(err.to_string().contains("too short"), "got: {err}");
        let err = valid_title(&"x".repeat(60), 5, 50).unwrap_err();
        assert!(err.to_string().contains("too long"), "got: {err}");
    }

    #[test]
    fn setup_length_bounds() {
        assert!(valid_setup_length(1).is_ok());
        assert!(valid_setup_length(255).is_ok());
        assert!(valid_setup_length(0).is_err());
        assert!(valid_setup_length(256).is_err());
    }
}
