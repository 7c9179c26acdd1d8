//! Connection settings and configuration loading.
//!
//! Nothing in this crate reads the process environment. The CLI maps flags and
//! environment variables onto these types and hands them to the runner.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::LinkerSettings;

use std::fmt;
use url::Url;

/// Connection settings for the GitLab project being watched.
#[derive(Clone, PartialEq, Eq)]
pub struct GitLabConfig {
    /// Base URL of the GitLab instance (e.g. `https://gitlab.example.com`).
    pub url: Url,

    /// Token sent as `PRIVATE-TOKEN`.
    pub token: String,

    /// Numeric project id or `group/project` path.
    pub project_id: String,
}

impl GitLabConfig {
    /// Validates and builds GitLab connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the URL is not an http(s)
    /// URL or the token or project id is blank.
    pub fn new(url: &str, token: &str, project_id: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            url: parse_http_url("gitlab-url", url)?,
            token: require("gitlab-token", token)?,
            project_id: require("project-id", project_id)?,
        })
    }
}

impl fmt::Debug for GitLabConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLabConfig")
            .field("url", &self.url.as_str())
            .field("token", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Connection settings for the Jira instance.
#[derive(Clone, PartialEq, Eq)]
pub struct JiraConfig {
    /// Base URL of the Jira instance (e.g. `https://example.atlassian.net`).
    pub url: Url,

    /// User (usually an e-mail address) for basic authentication.
    pub user: String,

    /// API token for basic authentication.
    pub token: String,
}

impl JiraConfig {
    /// Validates and builds Jira connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the URL is not an http(s)
    /// URL or the user or token is blank.
    pub fn new(url: &str, user: &str, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            url: parse_http_url("jira-url", url)?,
            user: require("jira-user", user)?,
            token: require("jira-token", token)?,
        })
    }
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("url", &self.url.as_str())
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Parses an absolute http(s) URL.
fn parse_http_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }

    let url = Url::parse(raw).map_err(|e| ConfigError::invalid(field, format!("'{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::invalid(
            field,
            format!("unsupported scheme '{scheme}' in '{raw}'"),
        )),
    }
}

/// Returns the trimmed value, rejecting blank input.
pub(crate) fn require(field: &str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    Ok(value.to_string())
}
