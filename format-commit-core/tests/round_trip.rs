// end-to-end checks of the title pipeline through the public api:
// render, reverse-parse, normalize, length gate

use format_commit_core::config::Config;
use format_commit_core::format::{
    compile, normalize_commit_title, render_custom, valid_title, FieldValues, FormatError,
};

fn config(json: &str) -> Config {
    serde_json::from_str(json).expect("test config parses")
}

fn base_config(format: &str) -> Config {
    config(&format!(
        r#"{{
            "format": {format},
            "customFormat": "{{Issue ID}} - type - scope - description",
            "types": [
                {{"value": "feat", "description": "a new feature"}},
                {{"value": "fix", "description": "a bug fix"}}
            ],
            "scopes": [{{"value": "api", "description": ""}}],
            "minLength": 5,
            "maxLength": 80
        }}"#
    ))
}

#[test]
fn custom_render_parse_normalize_is_stable() {
    let config = base_config("\"custom\"");
    let segments = compile(config.custom_format.as_deref().unwrap());

    let mut fields = std::collections::BTreeMap::new();
    fields.insert("Issue ID".to_string(), "PROJ-123".to_string());
    let rendered = render_custom(
        &segments,
        &FieldValues {
            commit_type: "feat".to_string(),
            scope: Some("api".to_string()),
            description: "add user endpoint".to_string(),
            fields,
        },
    );
    assert_eq!(rendered, "PROJ-123 - feat - api - add user endpoint");

    // a rendered title is a fixed point of normalization
    let normalized = normalize_commit_title(&rendered, &config).unwrap();
    assert_eq!(normalized, rendered);

    // sloppy casing from a user or the AI converges to the same fixed point
    let normalized =
        normalize_commit_title("PROJ-123 - FEAT - API - add user endpoint", &config).unwrap();
    assert_eq!(normalized, rendered);
}

#[test]
fn numbered_normalization_is_stable_for_every_format() {
    for number in 1..=8u8 {
        let config = base_config(&number.to_string());
        let example = format_commit_core::format::example_title(&config);
        let normalized = normalize_commit_title(&example, &config)
            .unwrap_or_else(|e| panic!("format {number}: {e}"));
        assert_eq!(normalized, example, "format {number}");
    }
}

#[test]
fn numbered_group_mismatch_is_an_error_across_configs() {
    // format 7 expects "type(scope): Title" and must refuse format 5 shapes
    let config = base_config("7");
    let err = normalize_commit_title("feat(api) Add user endpoint", &config).unwrap_err();
    assert!(matches!(err, FormatError::FormatMismatch { .. }), "{err}");

    // and the other way around
    let config = base_config("5");
    let err = normalize_commit_title("feat(api): Add user endpoint", &config).unwrap_err();
    assert!(matches!(err, FormatError::FormatMismatch { .. }), "{err}");
}

#[test]
fn normalized_titles_feed_the_length_gate() {
    let config = base_config("4");
    let normalized = normalize_commit_title("FIX: Handle Empty Index", &config).unwrap();
    assert_eq!(normalized, "fix: handle empty index");
    assert!(valid_title(&normalized, config.min_length, config.max_length).is_ok());
    assert!(valid_title(&normalized, 30, 80).is_err());
}
