// interactive commit flow: collect values, render the title, run git

use std::collections::BTreeMap;

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::ai;
use crate::config::{ChangeVersion, Config, FormatChoice, TypeOption};
use crate::format::{
    compile, get_custom_fields, render_custom, valid_title, validate_commit_pattern, CommitFormat,
    FieldValues,
};
use crate::git;
use crate::logger;

pub async fn run(repo_path: &str, config: &Config, test_mode: bool, debug: bool) -> Result<()> {
    logger::info("new commit");
    if test_mode {
        logger::warn("test mode enabled - changes will not be committed");
    }

    if config.types.is_empty() {
        logger::error("no types defined - please update config");
        return Ok(());
    }

    let needs_scope = config.commit_requires_scope();
    if needs_scope && !config.has_scopes() {
        logger::error("no scopes defined - update config or commit format option");
        return Ok(());
    }

    // gate the flow on pattern legality before any prompt
    if config.format == FormatChoice::Custom {
        let Some(pattern) = config.custom_format.as_deref() else {
            logger::error("format is \"custom\" but no customFormat is defined");
            return Ok(());
        };
        if let Err(e) = validate_commit_pattern(pattern) {
            logger::error(&format!("invalid custom commit format - {e}"));
            return Ok(());
        }
    }

    if config.stage_all_changes && !test_mode {
        git::run_git(repo_path, &["add", "-A"])?;
    } else if !git::has_staged_changes(repo_path).unwrap_or(false) {
        logger::warn("no staged changes found - stage your changes or enable stageAllChanges");
    }

    let title = match suggested_title(repo_path, config, debug).await? {
        Some(title) => title,
        None => prompt_title(config)?,
    };

    let body: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("commit description? (optional)")
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.chars().count() > 255 {
                Err("commit description too long")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    handle_version_bump(repo_path, config, test_mode)?;

    if test_mode {
        logger::warn(&format!("commit title: {title}"));
        return Ok(());
    }

    logger::info("commit changes...");
    let message = if body.trim().is_empty() {
        title.clone()
    } else {
        format!("{title}\n\n{}", body.trim())
    };
    let output = git::run_git(repo_path, &["commit", "-m", &message])?;
    logger::success("commit successfully completed");
    println!("{output}");

    let push = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("push changes?")
        .default(false)
        .interact()?;
    if push {
        logger::info("push changes...");
        let branch = git::current_branch(repo_path)?;
        let output = git::run_git(repo_path, &["push", "-u", "origin", &branch])?;
        println!("{output}");
    }

    println!("{}", git::run_git(repo_path, &["status"])?);
    Ok(())
}

/// offer AI suggestions when configured; Some(title) is already normalized
/// and length-checked, None means the user writes the title manually
async fn suggested_title(
    repo_path: &str,
    config: &Config,
    debug: bool,
) -> Result<Option<String>> {
    if config.ai.is_none() {
        return Ok(None);
    }

    let suggestions = match ai::generate_suggestions(repo_path, config).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            logger::warn(&format!("AI suggestion failed: {e}"));
            Vec::new()
        }
    };
    if suggestions.is_empty() {
        return Ok(None);
    }

    if debug {
        logger::info(&format!("{} valid AI suggestions", suggestions.len()));
    }

    let mut items: Vec<&str> = suggestions.iter().map(String::as_str).collect();
    items.push("write my own title");
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("commit title")
        .items(&items)
        .default(0)
        .interact()?;

    if selection < suggestions.len() {
        Ok(Some(suggestions[selection].clone()))
    } else {
        // manual entry shares the suggestion acceptance path: the typed
        // title is reverse-parsed, normalized and length-checked
        let title = loop {
            let text: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("commit title?")
                .interact_text()?;
            match ai::accept_suggestion(&text, config) {
                Ok(normalized) => break normalized,
                Err(e) => logger::error(&e.to_string()),
            }
        };
        Ok(Some(title))
    }
}

/// structured prompts: custom fields, type, scope and description, rendered
/// through the configured format
fn prompt_title(config: &Config) -> Result<String> {
    let fields = match config.format {
        FormatChoice::Custom => {
            let pattern = config.custom_format.as_deref().unwrap_or_default();
            prompt_custom_fields(pattern)?
        }
        FormatChoice::Numbered(_) => BTreeMap::new(),
    };

    let commit_type = select_option("type of changes", &config.types)?;
    let scope = if config.commit_requires_scope() {
        Some(select_option("scope", config.scope_options())?)
    } else {
        None
    };

    loop {
        let description: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("commit title?")
            .interact_text()?;

        let values = FieldValues {
            commit_type: commit_type.clone(),
            scope: scope.clone(),
            description,
            fields: fields.clone(),
        };
        let rendered = match config.format {
            FormatChoice::Custom => {
                let segments = compile(config.custom_format.as_deref().unwrap_or_default());
                render_custom(&segments, &values)
            }
            FormatChoice::Numbered(number) => match CommitFormat::from_number(number) {
                Some(format) => {
                    format.render(&values.commit_type, values.scope.as_deref(), &values.description)
                }
                None => {
                    logger::error(&format!("{number} is not a valid commit format number"));
                    return Ok(values.description);
                }
            },
        };

        match valid_title(&rendered, config.min_length, config.max_length) {
            Ok(()) => return Ok(rendered),
            Err(e) => logger::error(&e.to_string()),
        }
    }
}

/// one non-empty prompt per `{Field}` label in the pattern
pub fn prompt_custom_fields(pattern: &str) -> Result<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();
    for label in get_custom_fields(pattern) {
        let value: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{label}?"))
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() {
                    Err("a value is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        fields.insert(label, value.trim().to_string());
    }
    Ok(fields)
}

pub fn select_option(prompt: &str, options: &[TypeOption]) -> Result<String> {
    let items: Vec<String> = options
        .iter()
        .map(|o| {
            if o.description.is_empty() {
                o.value.clone()
            } else {
                format!("{} - {}", o.value, o.description)
            }
        })
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    Ok(options[selection].value.clone())
}

/// optional package version bump, per the configured changeVersion mode
fn handle_version_bump(repo_path: &str, config: &Config, test_mode: bool) -> Result<()> {
    let current = git::current_branch(repo_path).unwrap_or_default();
    let ask_directly = match config.change_version {
        ChangeVersion::Always => true,
        ChangeVersion::ReleaseBranch => config.release_branch.as_deref() == Some(current.as_str()),
        ChangeVersion::Never => false,
    };

    let bump = if ask_directly {
        true
    } else {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("change package version?")
            .default(false)
            .interact()?
    };
    if !bump {
        return Ok(());
    }

    let mut version_types = vec!["patch", "minor", "major", "custom"];
    if config.show_all_version_types {
        version_types.extend(["prepatch", "preminor", "premajor", "prerelease"]);
    }
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("type of version change")
        .items(&version_types)
        .default(0)
        .interact()?;
    let version_type = version_types[selection];

    let args: Vec<String> = match version_type {
        "custom" => {
            let version: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("version?")
                .validate_with(|input: &String| -> Result<(), &str> {
                    semver::Version::parse(input)
                        .map(|_| ())
                        .map_err(|_| "version does not respect semantic versioning")
                })
                .interact_text()?;
            vec!["version".into(), version, "--allow-same-version".into()]
        }
        "prerelease" => {
            let tag: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("pre-release tag?")
                .interact_text()?;
            vec!["version".into(), "prerelease".into(), format!("--preid={tag}")]
        }
        other => vec!["version".into(), other.into(), "--allow-same-version".into()],
    };

    if test_mode {
        logger::warn(&format!("would run: npm {}", args.join(" ")));
        return Ok(());
    }

    logger::info("update version...");
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let new_version = git::run_npm(repo_path, &arg_refs)?;
    if !new_version.is_empty() {
        logger::info(&format!("package updated to {new_version}"));
    }
    Ok(())
}
