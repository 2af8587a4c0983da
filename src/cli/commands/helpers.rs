//! Shared helper functions for command execution.

use crate::config::ReleaseConfig;
use crate::error::Result;
use std::path::Path;

/// Load the config file, or an empty form when it does not exist yet.
///
/// An empty project path is filled from the current directory.
pub(super) fn load_config(path: &Path) -> Result<ReleaseConfig> {
    let config = ReleaseConfig::load(path)?.unwrap_or_default();
    let cwd = std::env::current_dir()?;
    Ok(config.with_detected_project(&cwd))
}

/// Prompt user for confirmation with y/n input
pub(super) fn prompt_confirmation(prompt: &str) -> std::io::Result<bool> {
    use std::io::Write;

    print!("{} [y/N]: ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(is_affirmative(&input))
}

fn is_affirmative(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    matches!(response.as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("nope"));
    }

    #[test]
    fn test_load_missing_config_is_empty_form() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("scripts/config.json")).unwrap();
        assert!(config.github_token.is_empty());
        assert!(!config.project_path.is_empty());
    }
}
