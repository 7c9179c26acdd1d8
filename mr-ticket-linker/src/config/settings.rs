//! Optional TOML settings file.

use super::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Settings read from an optional TOML file.
///
/// Every key is optional; values given on the command line or in the
/// environment take precedence.
///
/// ```toml
/// ticket-prefix = "PROJ"
/// skip-keywords = ["lockfile", "pin"]
/// issue-type = "Task"
/// labels = ["dependencies"]
/// comment-template = "Tracked in Jira: {{issue_key}}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LinkerSettings {
    /// Ticket-key prefix to search for.
    pub ticket_prefix: Option<String>,

    /// Case-insensitive keywords that exclude a merge request.
    #[serde(default)]
    pub skip_keywords: Vec<String>,

    /// Jira issue type for new tracking issues.
    pub issue_type: Option<String>,

    /// Labels applied to new tracking issues.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Handlebars template for the issue summary.
    pub summary_template: Option<String>,

    /// Handlebars template for the issue description.
    pub description_template: Option<String>,

    /// Handlebars template for the merge request comment.
    pub comment_template: Option<String>,
}

impl LinkerSettings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
