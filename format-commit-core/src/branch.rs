// interactive branch flow: collect values, render a branch-safe name, run git

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::commit::{prompt_custom_fields, select_option};
use crate::config::{Config, FormatChoice};
use crate::format::{
    compile, render_custom_branch, sanitize_branch_value, validate_branch_pattern, BranchFormat,
    FieldValues,
};
use crate::git;
use crate::logger;

pub fn run(repo_path: &str, config: &Config, test_mode: bool) -> Result<()> {
    logger::info("new branch");
    if test_mode {
        logger::warn("test mode enabled - branch will not be created");
    }

    let Some(branch_format) = config.branch_format else {
        logger::error("no branch format defined - please update config");
        return Ok(());
    };

    if config.types.is_empty() {
        logger::error("no types defined - please update config");
        return Ok(());
    }

    let needs_scope = config.branch_requires_scope();
    if needs_scope && !config.has_scopes() {
        logger::error("no scopes defined - update config or branch format option");
        return Ok(());
    }

    let custom_pattern = match branch_format {
        FormatChoice::Custom => {
            let Some(pattern) = config.custom_branch_format.as_deref() else {
                logger::error("branch format is \"custom\" but no customBranchFormat is defined");
                return Ok(());
            };
            if let Err(e) = validate_branch_pattern(pattern) {
                logger::error(&format!("invalid custom branch format - {e}"));
                return Ok(());
            }
            Some(pattern)
        }
        FormatChoice::Numbered(_) => None,
    };

    let fields = match custom_pattern {
        Some(pattern) => prompt_custom_fields(pattern)?,
        None => Default::default(),
    };

    let branch_type = select_option("type of branch", &config.types)?;
    let scope = if needs_scope {
        Some(select_option("scope", config.scope_options())?)
    } else {
        None
    };

    let max_length = config.max_length;
    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("branch description?")
        .validate_with(move |input: &String| -> Result<(), String> {
            let sanitized = sanitize_branch_value(input);
            if sanitized.is_empty() {
                return Err("description must contain letters or digits".to_string());
            }
            if sanitized.len() > max_length {
                return Err(format!("branch description too long (maximum {max_length})"));
            }
            Ok(())
        })
        .interact_text()?;

    logger::info("create branch...");
    let values = FieldValues {
        commit_type: branch_type,
        scope,
        description,
        fields,
    };
    let branch_name = match custom_pattern {
        Some(pattern) => render_custom_branch(&compile(pattern), &values),
        None => match branch_format {
            FormatChoice::Numbered(number) => match BranchFormat::from_number(number) {
                Some(format) => format.render(
                    &values.commit_type,
                    values.scope.as_deref(),
                    &values.description,
                ),
                None => {
                    logger::error(&format!("{number} is not a valid branch format number"));
                    return Ok(());
                }
            },
            FormatChoice::Custom => unreachable!("custom pattern handled above"),
        },
    };

    if test_mode {
        logger::warn(&format!("branch name: {branch_name}"));
        return Ok(());
    }

    if git::branch_exists(repo_path, &branch_name)? {
        logger::error(&format!("branch \"{branch_name}\" already exists"));
        return Ok(());
    }

    let checkout = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("switch to the new branch after creation?")
        .default(true)
        .interact()?;

    let output = if checkout {
        git::run_git(repo_path, &["checkout", "-b", &branch_name])?
    } else {
        git::run_git(repo_path, &["branch", &branch_name])?
    };

    let done = if checkout {
        format!("branch \"{branch_name}\" successfully created and checked out")
    } else {
        format!("branch \"{branch_name}\" successfully created")
    };
    logger::success(&done);
    if !output.is_empty() {
        println!("{output}");
    }

    println!("{}", git::run_git(repo_path, &["status"])?);
    Ok(())
}
