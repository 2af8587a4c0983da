//! Config file commands.

use super::helpers::load_config;
use crate::cli::{Args, ConfigAction, OutputManager};
use crate::config::{ReleaseConfig, mask_token};
use crate::error::Result;

/// Execute config command
pub(super) fn execute_config(args: &Args, action: &ConfigAction, output: &OutputManager) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            let config = load_config(&args.config)?;
            let _ = output.section(&format!("Config ({})", args.config.display()));
            for line in describe(&config) {
                let _ = output.indent(&line);
            }
        }
        ConfigAction::Save { overrides } => {
            let mut config = ReleaseConfig::load(&args.config)?.unwrap_or_default();
            overrides.apply(&mut config);
            config.save(&args.config)?;
            let _ = output.success(&format!("Config saved to {}", args.config.display()));
        }
    }
    Ok(0)
}

fn describe(config: &ReleaseConfig) -> Vec<String> {
    let token = if config.github_token.is_empty() {
        "(not set)".to_string()
    } else {
        mask_token(&config.github_token)
    };
    vec![
        format!("github_token:  {}", token),
        format!("version:       {}", config.version),
        format!("project_path:  {}", config.project_path),
        format!("release_notes: {}", config.notes_or_default()),
        format!("is_prerelease: {}", config.is_prerelease),
        format!("is_draft:      {}", config.is_draft),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_masks_token() {
        let config = ReleaseConfig {
            github_token: "ghp_abcdef".to_string(),
            ..Default::default()
        };
        let lines = describe(&config);
        assert!(lines.iter().all(|line| !line.contains("ghp_abcdef")));
        assert!(lines[3].ends_with("Automated release"));
    }
}
