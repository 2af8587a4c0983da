//! Git configuration for release operations.

/// Configuration for git operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitConfig {
    /// Remote to push to and read the repository URL from
    pub default_remote: String,
    /// Branch pushed first
    pub primary_branch: String,
    /// Branch pushed when the primary push fails
    pub fallback_branch: String,
    /// Commit message template; `{tag}` is replaced with the release tag
    pub commit_message_template: String,
    /// Extra files staged with the manifest when present; failures are warnings
    pub optional_paths: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            default_remote: "origin".to_string(),
            primary_branch: "main".to_string(),
            fallback_branch: "master".to_string(),
            commit_message_template: "chore: bump version to {tag}".to_string(),
            optional_paths: vec![crate::project::GRADLE_SCRIPT.to_string()],
        }
    }
}

impl GitConfig {
    /// Render the commit message for `tag`
    pub fn commit_message(&self, tag: &str) -> String {
        self.commit_message_template.replace("{tag}", tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commit_message() {
        let config = GitConfig::default();
        assert_eq!(config.commit_message("v1.0.0"), "chore: bump version to v1.0.0");
        assert_eq!(config.default_remote, "origin");
        assert_eq!(config.fallback_branch, "master");
    }
}
