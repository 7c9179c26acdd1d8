//! Runner configuration.

use crate::config::{require, ConfigError, GitLabConfig, JiraConfig, LinkerSettings};
use crate::issues::DEFAULT_ISSUE_TYPE;
use crate::matching::{LinkPolicy, SkipKeywords, TicketKeyPattern};
use crate::templates::LinkTemplates;
use std::time::Duration;

/// Default per-request HTTP timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a single linking run.
///
/// Built explicitly by the caller; defaults are:
/// - ticket prefix: the Jira project key
/// - skip-keywords: none (nothing is filtered)
/// - issue type: `Task`, no labels
/// - templates: [`LinkTemplates::default`]
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// GitLab connection.
    gitlab: GitLabConfig,
    /// Jira connection.
    jira: JiraConfig,
    /// Username of the automation identity whose merge requests are linked.
    author: String,
    /// Jira project new issues are created in.
    project_key: String,
    /// Ticket-key prefix; falls back to `project_key`.
    ticket_prefix: Option<String>,
    /// Keywords that exclude a merge request.
    skip_keywords: SkipKeywords,
    /// Jira issue type for new issues.
    issue_type: String,
    /// Labels for new issues.
    labels: Vec<String>,
    /// Issue and comment templates.
    templates: LinkTemplates,
    /// Whether to report intended writes instead of performing them.
    dry_run: bool,
    /// Per-request HTTP timeout.
    http_timeout: Duration,
}

impl RunnerConfig {
    /// Creates a configuration with default policy settings.
    pub fn new(
        gitlab: GitLabConfig,
        jira: JiraConfig,
        author: impl Into<String>,
        project_key: impl Into<String>,
    ) -> Self {
        Self {
            gitlab,
            jira,
            author: author.into().trim().to_string(),
            project_key: project_key.into().trim().to_string(),
            ticket_prefix: None,
            skip_keywords: SkipKeywords::default(),
            issue_type: DEFAULT_ISSUE_TYPE.to_string(),
            labels: Vec::new(),
            templates: LinkTemplates::default(),
            dry_run: false,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Applies values from a settings file. Apply before explicit overrides.
    pub fn with_settings(mut self, settings: LinkerSettings) -> Self {
        if let Some(prefix) = settings.ticket_prefix {
            self.ticket_prefix = Some(prefix);
        }
        if !settings.skip_keywords.is_empty() {
            self.skip_keywords = SkipKeywords::new(settings.skip_keywords);
        }
        if let Some(issue_type) = settings.issue_type {
            self.issue_type = issue_type;
        }
        if !settings.labels.is_empty() {
            self.labels = settings.labels;
        }
        if let Some(summary) = settings.summary_template {
            self.templates.summary = summary;
        }
        if let Some(description) = settings.description_template {
            self.templates.description = description;
        }
        if let Some(comment) = settings.comment_template {
            self.templates.comment = comment;
        }
        self
    }

    /// Sets the ticket-key prefix.
    pub fn with_ticket_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ticket_prefix = Some(prefix.into());
        self
    }

    /// Sets the skip-keywords.
    pub fn with_skip_keywords(mut self, keywords: SkipKeywords) -> Self {
        self.skip_keywords = keywords;
        self
    }

    /// Sets the Jira issue type.
    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    /// Sets the labels applied to new issues.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the issue and comment templates.
    pub fn with_templates(mut self, templates: LinkTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the per-request HTTP timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Returns the GitLab connection settings.
    pub fn gitlab(&self) -> &GitLabConfig {
        &self.gitlab
    }

    /// Returns the Jira connection settings.
    pub fn jira(&self) -> &JiraConfig {
        &self.jira
    }

    /// Returns the automation author username.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the Jira project key.
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Returns the effective ticket-key prefix.
    pub fn ticket_prefix(&self) -> &str {
        self.ticket_prefix.as_deref().unwrap_or(&self.project_key)
    }

    /// Returns the skip-keywords.
    pub fn skip_keywords(&self) -> &SkipKeywords {
        &self.skip_keywords
    }

    /// Returns the Jira issue type.
    pub fn issue_type(&self) -> &str {
        &self.issue_type
    }

    /// Returns the labels applied to new issues.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the templates.
    pub fn templates(&self) -> &LinkTemplates {
        &self.templates
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Checks the values that are not validated on construction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("author", &self.author)?;
        require("jira-project-key", &self.project_key)?;
        require("issue-type", &self.issue_type)?;
        if self.http_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "http-timeout-secs",
                "must be greater than zero",
            ));
        }
        self.link_policy()?;
        Ok(())
    }

    /// Builds the linking policy for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the prefix is blank or
    /// would not recognise keys of issues created in the project, since
    /// every later run would then create a duplicate issue.
    pub fn link_policy(&self) -> Result<LinkPolicy, ConfigError> {
        let pattern = TicketKeyPattern::new(self.ticket_prefix())
            .map_err(|e| ConfigError::invalid("ticket-prefix", e.to_string()))?;

        let sample_key = self.sample_issue_key();
        if !pattern.is_match(&sample_key) {
            return Err(ConfigError::invalid(
                "ticket-prefix",
                format!(
                    "'{}' does not match keys created in project '{}' (e.g. {sample_key})",
                    pattern.prefix(),
                    self.project_key
                ),
            ));
        }

        Ok(LinkPolicy::new(self.skip_keywords.clone(), pattern))
    }

    /// A key shaped like the ones Jira assigns in the configured project.
    pub(crate) fn sample_issue_key(&self) -> String {
        format!("{}-1", self.project_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunnerConfig {
        RunnerConfig::new(
            GitLabConfig::new("https://gitlab.example.com", "token", "group/app").unwrap(),
            JiraConfig::new("https://jira.example.com", "bot", "secret").unwrap(),
            "renovate-bot",
            "PROJ",
        )
    }

    #[test]
    fn prefix_defaults_to_project_key() {
        let config = config();
        assert_eq!(config.ticket_prefix(), "PROJ");
        assert!(config.skip_keywords().is_empty());
        assert_eq!(config.issue_type(), "Task");
        config.validate().unwrap();
    }

    #[test]
    fn explicit_values_override_settings() {
        let settings = LinkerSettings {
            ticket_prefix: Some("OJ".to_string()),
            skip_keywords: vec!["lockfile".to_string()],
            issue_type: Some("Story".to_string()),
            comment_template: Some("Linked {{issue_key}}".to_string()),
            ..LinkerSettings::default()
        };

        let config = config()
            .with_settings(settings)
            .with_skip_keywords(SkipKeywords::parse_list("pin"));

        assert_eq!(config.ticket_prefix(), "OJ");
        assert_eq!(config.skip_keywords().as_slice(), ["pin"]);
        assert_eq!(config.issue_type(), "Story");
        assert_eq!(config.templates().comment, "Linked {{issue_key}}");
        assert_eq!(
            config.templates().summary,
            LinkTemplates::default().summary
        );
    }

    #[test]
    fn rejects_prefix_that_misses_project_keys() {
        let result = config().with_ticket_prefix("OPS").validate();
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "ticket-prefix"
        ));
    }

    #[test]
    fn rejects_blank_prefix_and_author() {
        assert!(config().with_ticket_prefix("  ").validate().is_err());

        let blank_author = RunnerConfig::new(
            config().gitlab().clone(),
            config().jira().clone(),
            " ",
            "PROJ",
        );
        assert!(matches!(
            blank_author.validate(),
            Err(ConfigError::ValidationError { ref field, .. }) if field == "author"
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let result = config().with_http_timeout(Duration::ZERO).validate();
        assert!(result.is_err());
    }
}
