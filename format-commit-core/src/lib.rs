// format-commit-core/src/lib.rs

pub mod ai;
pub mod branch;
pub mod commit;
pub mod config;
pub mod env;
pub mod format;
pub mod git;
pub mod logger;
pub mod setup;

// re-export key items for the cli crate
pub use anyhow::{Context, Result};
pub use clap::Parser;
pub use console::style;
pub use dotenv::dotenv;

pub use crate::config::Config;
pub use crate::format::FormatError;

use std::path::Path;

/// cli arguments, shared with the binary crate
#[derive(Parser, Debug, Clone)]
#[command(name = "format-commit", about = "CLI to standardize commit nomenclature")]
pub struct CliArgs {
    /// create a new branch with standardized naming
    #[arg(short, long)]
    pub branch: bool,

    /// generate a configuration file on your project for format-commit
    #[arg(short, long)]
    pub config: bool,

    /// start without finalizing the commit (for tests)
    #[arg(short, long)]
    pub test: bool,

    /// display additional logs
    #[arg(short, long)]
    pub debug: bool,

    /// path to git repository (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<String>,
}

/// entry point behind the binary: dispatches to setup, branch or commit
pub async fn run(args: CliArgs) -> Result<()> {
    dotenv().ok();
    let repo_path = args.path.clone().unwrap_or_else(|| ".".to_string());

    if args.config {
        setup::run(&repo_path, false)?;
        return Ok(());
    }

    if !Config::exists(Path::new(&repo_path)) {
        logger::warn("no configuration found");
        if let Some(config) = setup::run(&repo_path, true)? {
            commit::run(&repo_path, &config, args.test, args.debug).await?;
        }
        return Ok(());
    }

    let config = Config::load(Path::new(&repo_path))?;
    if args.branch {
        branch::run(&repo_path, &config, args.test)
    } else {
        commit::run(&repo_path, &config, args.test, args.debug).await
    }
}
