// git helpers: read-side queries through git2, mutations through the git cli

use anyhow::{anyhow, Context, Result};
use git2::{BranchType, DiffFormat, DiffOptions, DiffStatsFormat, Repository, Tree};
use lazy_static::lazy_static;
use regex::Regex;
use std::process::Command;

lazy_static! {
    // lockfiles and minified assets add noise without meaning, keep them out
    // of the diff sent to the AI
    static ref EXCLUDED_PATHS: Regex =
        Regex::new(r"(?i)(^|/)(package-lock\.json|yarn\.lock|cargo\.lock)$|\.lock$|\.min\.").unwrap();
}

/// the staged changes, summarised for the AI prompt
#[derive(Debug, Clone)]
pub struct StagedDiff {
    pub stats: String,
    pub diff: String,
}

/// name of the branch HEAD points at
pub fn current_branch(repo_path: &str) -> Result<String> {
    let repo = open(repo_path)?;
    let head = repo.head().context("failed to resolve HEAD")?;
    Ok(head.shorthand().unwrap_or("HEAD").to_string())
}

/// whether a local branch with this name already exists
pub fn branch_exists(repo_path: &str, name: &str) -> Result<bool> {
    let repo = open(repo_path)?;
    let exists = repo.find_branch(name, BranchType::Local).is_ok();
    Ok(exists)
}

/// whether anything is staged in the index
pub fn has_staged_changes(repo_path: &str) -> Result<bool> {
    let repo = open(repo_path)?;
    let tree = head_tree(&repo);
    let diff = repo
        .diff_tree_to_index(tree.as_ref(), None, Some(&mut diff_options()))
        .context("failed to diff index against HEAD")?;
    Ok(diff.stats()?.files_changed() > 0)
}

/// staged diff stats plus a line-capped unified diff, None when nothing
/// relevant is staged
pub fn staged_diff(repo_path: &str, max_lines: usize) -> Result<Option<StagedDiff>> {
    let repo = open(repo_path)?;
    let tree = head_tree(&repo);
    let diff = repo
        .diff_tree_to_index(tree.as_ref(), None, Some(&mut diff_options()))
        .context("failed to diff index against HEAD")?;

    let stats = diff
        .stats()?
        .to_buf(DiffStatsFormat::FULL, 80)?
        .as_str()
        .unwrap_or_default()
        .to_string();

    let mut lines: Vec<String> = Vec::new();
    diff.print(DiffFormat::Patch, |delta, _hunk, line| {
        if lines.len() >= max_lines {
            return true;
        }
        let path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        if EXCLUDED_PATHS.is_match(&path) {
            return true;
        }
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            '+' | '-' | ' ' => lines.push(format!("{}{}", line.origin(), content.trim_end())),
            _ => lines.push(content.trim_end().to_string()),
        }
        true
    })
    .context("failed to print staged diff")?;

    if stats.trim().is_empty() && lines.is_empty() {
        return Ok(None);
    }

    Ok(Some(StagedDiff {
        stats,
        diff: lines.join("\n"),
    }))
}

fn open(repo_path: &str) -> Result<Repository> {
    Repository::discover(repo_path).context("failed to open git repository")
}

// HEAD tree, or None in a repository without commits
fn head_tree(repo: &Repository) -> Option<Tree<'_>> {
    repo.head().ok()?.peel_to_tree().ok()
}

fn diff_options() -> DiffOptions {
    let mut opts = DiffOptions::new();
    opts.show_binary(false);
    opts.context_lines(1);
    opts
}

/// run a git subcommand in the repository, returning its stdout
pub fn run_git(repo_path: &str, args: &[&str]) -> Result<String> {
    run_command(repo_path, "git", args)
}

/// run an npm subcommand in the repository, returning its stdout
pub fn run_npm(repo_path: &str, args: &[&str]) -> Result<String> {
    run_command(repo_path, "npm", args)
}

fn run_command(repo_path: &str, program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .current_dir(repo_path)
        .args(args)
        .output()
        .with_context(|| format!("failed to execute {program} {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "{program} {} failed: {}",
            args.join(" "),
            stderr.trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_repo() -> (std::path::PathBuf, Repository) {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("format-commit-git-{millis}"));
        fs::create_dir_all(&dir).unwrap();
        let repo = Repository::init(&dir).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "tester").unwrap();
        config.set_str("user.email", "tester@example.com").unwrap();
        (dir, repo)
    }

    fn stage_and_commit(repo: &Repository, dir: &std::path::Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(std::path::Path::new(file)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = repo.signature().unwrap();
        let parents: Vec<git2::Commit> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &parent_refs)
            .unwrap();
    }

    #[test]
    fn reports_staged_changes_and_diff() {
        let (dir, repo) = temp_repo();
        let path = dir.to_string_lossy().to_string();

        stage_and_commit(&repo, &dir, "readme.md", "hello\n");
        assert!(!has_staged_changes(&path).unwrap());

        fs::write(dir.join("readme.md"), "hello world\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(std::path::Path::new("readme.md")).unwrap();
        index.write().unwrap();

        assert!(has_staged_changes(&path).unwrap());
        let staged = staged_diff(&path, 500).unwrap().expect("diff expected");
        assert!(staged.stats.contains("readme.md"), "stats: {}", staged.stats);
        assert!(staged.diff.contains("+hello world"), "diff: {}", staged.diff);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn branch_queries() {
        let (dir, repo) = temp_repo();
        let path = dir.to_string_lossy().to_string();

        stage_and_commit(&repo, &dir, "a.txt", "a\n");
        let branch = current_branch(&path).unwrap();
        assert!(!branch.is_empty());
        assert!(branch_exists(&path, &branch).unwrap());
        assert!(!branch_exists(&path, "no-such-branch").unwrap());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn excluded_paths_filter() {
        assert!(EXCLUDED_PATHS.is_match("package-lock.json"));
        assert!(EXCLUDED_PATHS.is_match("sub/dir/yarn.lock"));
        assert!(EXCLUDED_PATHS.is_match("app.min.js"));
        assert!(!EXCLUDED_PATHS.is_match("src/lock_manager.rs"));
    }
}
