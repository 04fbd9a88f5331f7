// configuration wizard: builds and writes format-commit.json

use std::path::Path;

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::config::{
    default_types, AiConfig, AiProvider, ChangeVersion, Config, FormatChoice, DEFAULT_MAX_LENGTH,
    DEFAULT_MIN_LENGTH,
};
use crate::env::{add_to_gitignore, is_in_gitignore, key_exists_in_env, set_env_key};
use crate::format::{
    valid_setup_length, validate_branch_pattern, validate_commit_pattern, BranchFormat,
    CommitFormat,
};
use crate::git;
use crate::logger;

/// run the setup wizard; returns the new config when the user chose to
/// commit right away
pub fn run(repo_path: &str, offer_commit_after: bool) -> Result<Option<Config>> {
    logger::info("create config file");
    let dir = Path::new(repo_path);

    let (format, custom_format) = ask_commit_format()?;
    let (branch_format, custom_branch_format) = ask_branch_format()?;

    let min_length: u64 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("commit minimum length?")
        .default(DEFAULT_MIN_LENGTH as u64)
        .validate_with(|input: &u64| -> Result<(), String> {
            valid_setup_length(*input as i64).map_err(|e| e.to_string())
        })
        .interact_text()?;

    let max_length: u64 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("commit maximum length?")
        .default(DEFAULT_MAX_LENGTH as u64)
        .validate_with(move |input: &u64| -> Result<(), String> {
            valid_setup_length(*input as i64).map_err(|e| e.to_string())?;
            if *input < min_length {
                return Err("maximum cannot be lower than the minimum".to_string());
            }
            Ok(())
        })
        .interact_text()?;

    let stage_all_changes = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("stage all changes before each commit?")
        .default(false)
        .interact()?;

    let modes = ["always", "releaseBranch", "never"];
    let mode = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("change package version")
        .items(&modes)
        .default(2)
        .interact()?;
    let change_version = match mode {
        0 => ChangeVersion::Always,
        1 => ChangeVersion::ReleaseBranch,
        _ => ChangeVersion::Never,
    };

    let current = git::current_branch(repo_path).unwrap_or_else(|_| "main".to_string());
    let release_branch = if change_version == ChangeVersion::ReleaseBranch {
        let branch: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("release git branch?")
            .default(current.clone())
            .interact_text()?;
        Some(branch)
    } else {
        None
    };

    let show_all_version_types = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("display all npm version types?")
        .default(false)
        .interact()?;

    let ai = ask_ai(dir)?;

    let config = Config {
        format,
        custom_format,
        branch_format,
        custom_branch_format,
        types: default_types(),
        scopes: None,
        min_length: min_length as usize,
        max_length: max_length as usize,
        stage_all_changes,
        change_version,
        release_branch,
        main_branch: current,
        show_all_version_types,
        ai,
    };

    logger::info(&format!("write {} file...", Config::file_name()));
    config.save(dir)?;
    logger::success("configuration created");

    if offer_commit_after {
        let commit_after = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("commit your changes now? (or exit the configuration without committing)")
            .default(false)
            .interact()?;
        if commit_after {
            return Ok(Some(config));
        }
    }
    Ok(None)
}

fn ask_commit_format() -> Result<(FormatChoice, Option<String>)> {
    let mut items: Vec<&str> = CommitFormat::ALL.iter().map(|f| f.describe()).collect();
    items.push("custom pattern");
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("commit format")
        .items(&items)
        .default(0)
        .interact()?;

    if selection < CommitFormat::ALL.len() {
        return Ok((FormatChoice::Numbered(selection as u8 + 1), None));
    }

    let pattern: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("custom commit pattern? (e.g. \"{Issue ID} - type - description\")")
        .validate_with(|input: &String| -> Result<(), String> {
            validate_commit_pattern(input).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok((FormatChoice::Custom, Some(pattern)))
}

fn ask_branch_format() -> Result<(Option<FormatChoice>, Option<String>)> {
    let items = [
        "none",
        BranchFormat::TypeSlash.describe(),
        BranchFormat::TypeScopeSlash.describe(),
        "custom pattern",
    ];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("branch format")
        .items(&items)
        .default(0)
        .interact()?;

    match selection {
        0 => Ok((None, None)),
        1 => Ok((Some(FormatChoice::Numbered(1)), None)),
        2 => Ok((Some(FormatChoice::Numbered(2)), None)),
        _ => {
            let pattern: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("custom branch pattern? (e.g. \"type/{Issue ID}-description\")")
                .validate_with(|input: &String| -> Result<(), String> {
                    validate_branch_pattern(input).map_err(|e| e.to_string())
                })
                .interact_text()?;
            Ok((Some(FormatChoice::Custom), Some(pattern)))
        }
    }
}

fn ask_ai(dir: &Path) -> Result<Option<AiConfig>> {
    let enable = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("enable AI title suggestions?")
        .default(false)
        .interact()?;
    if !enable {
        return Ok(None);
    }

    let providers = [AiProvider::Anthropic, AiProvider::OpenAi, AiProvider::Google];
    let labels: Vec<&str> = providers.iter().map(|p| p.label()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("AI provider")
        .items(&labels)
        .default(0)
        .interact()?;
    let provider = providers[selection];

    let model: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("model?")
        .default(provider.default_model().to_string())
        .interact_text()?;

    let env_path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("path of the .env file holding the api key?")
        .default(".env".to_string())
        .interact_text()?;

    let env_key_name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("name of the api key variable?")
        .default(provider.default_env_key_name().to_string())
        .interact_text()?;

    let env_file = dir.join(&env_path);
    if !key_exists_in_env(&env_file, &env_key_name) {
        let key: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{env_key_name}?"))
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() {
                    Err("a key is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        set_env_key(&env_file, &env_key_name, key.trim())?;
        logger::success(&format!("{env_key_name} written to {env_path}"));
    }

    if !is_in_gitignore(dir, &env_path) {
        let ignore = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("add {env_path} to .gitignore?"))
            .default(true)
            .interact()?;
        if ignore {
            add_to_gitignore(dir, &env_path)?;
        }
    }

    Ok(Some(AiConfig {
        provider,
        model,
        env_path,
        env_key_name,
        large_diff_token_threshold: 20_000,
    }))
}
