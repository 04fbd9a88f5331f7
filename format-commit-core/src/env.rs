// .env and .gitignore touch-ups for the AI api key

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

fn key_regex(key_name: &str) -> Regex {
    // key names come from configuration, escape them anyway
    Regex::new(&format!(r"(?m)^{}=(.*)$", regex::escape(key_name)))
        .expect("escaped key name builds a valid expression")
}

/// read a key's value from a .env style file, if both exist
pub fn get_env_key(env_path: &Path, key_name: &str) -> Option<String> {
    let content = fs::read_to_string(env_path).ok()?;
    key_regex(key_name)
        .captures(&content)
        .map(|caps| caps[1].trim().to_string())
        .filter(|v| !v.is_empty())
}

/// whether a key is present in a .env style file
pub fn key_exists_in_env(env_path: &Path, key_name: &str) -> bool {
    get_env_key(env_path, key_name).is_some()
}

/// add or update a key in a .env style file, creating the file if needed
pub fn set_env_key(env_path: &Path, key_name: &str, value: &str) -> Result<()> {
    let line = format!("{key_name}={value}");
    let content = match fs::read_to_string(env_path) {
        Ok(existing) => {
            let matcher = key_regex(key_name);
            if matcher.is_match(&existing) {
                // NoExpand: values may contain "$", never treat it as a group
                matcher
                    .replace(&existing, regex::NoExpand(line.as_str()))
                    .into_owned()
            } else {
                let mut updated = existing;
                if !updated.is_empty() && !updated.ends_with('\n') {
                    updated.push('\n');
                }
                updated.push_str(&line);
                updated.push('\n');
                updated
            }
        }
        Err(_) => format!("{line}\n"),
    };
    fs::write(env_path, content)
        .with_context(|| format!("failed to write {}", env_path.display()))?;
    Ok(())
}

fn normalize_entry(entry: &str) -> &str {
    entry.strip_prefix("./").unwrap_or(entry)
}

/// whether a path is already listed in the .gitignore next to it
pub fn is_in_gitignore(dir: &Path, entry: &str) -> bool {
    let Ok(content) = fs::read_to_string(dir.join(".gitignore")) else {
        return false;
    };
    let wanted = normalize_entry(entry);
    content.lines().map(str::trim).any(|line| {
        !line.is_empty()
            && !line.starts_with('#')
            && (line == wanted || line == format!("/{wanted}"))
    })
}

/// append a path to the .gitignore, creating the file if needed
pub fn add_to_gitignore(dir: &Path, entry: &str) -> Result<()> {
    let path = dir.join(".gitignore");
    let mut content = fs::read_to_string(&path).unwrap_or_default();
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(normalize_entry(entry));
    content.push('\n');
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("format-commit-{tag}-{millis}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn set_and_get_env_key() {
        let dir = temp_dir("env");
        let env_path = dir.join(".env");

        assert!(get_env_key(&env_path, "API_KEY").is_none());

        set_env_key(&env_path, "API_KEY", "secret-1").unwrap();
        assert_eq!(get_env_key(&env_path, "API_KEY").as_deref(), Some("secret-1"));

        // update in place, other keys untouched
        set_env_key(&env_path, "OTHER", "value").unwrap();
        set_env_key(&env_path, "API_KEY", "secret-2").unwrap();
        assert_eq!(get_env_key(&env_path, "API_KEY").as_deref(), Some("secret-2"));
        assert_eq!(get_env_key(&env_path, "OTHER").as_deref(), Some("value"));
        assert!(key_exists_in_env(&env_path, "OTHER"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn gitignore_check_and_append() {
        let dir = temp_dir("gitignore");

        assert!(!is_in_gitignore(&dir, ".env"));
        add_to_gitignore(&dir, "./.env").unwrap();
        assert!(is_in_gitignore(&dir, ".env"));
        assert!(is_in_gitignore(&dir, "./.env"));

        // comments and unrelated lines are ignored
        add_to_gitignore(&dir, "# a comment").ok();
        assert!(!is_in_gitignore(&dir, "target"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
