//! Issue and comment rendering using Handlebars.
//!
//! Templates see the merge request as `title`, `description`, `web_url`,
//! `iid`, `author`, `source_branch`, `target_branch` and `labels`; the
//! comment template additionally sees `issue_key` and `issue_url`.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

/// Default issue summary: the merge request title.
pub const DEFAULT_SUMMARY_TEMPLATE: &str = "{{title}}";

/// Default issue description.
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str = "{{web_url}}

Dependency update opened by {{author}} ({{source_branch}} -> {{target_branch}}).";

/// Default merge request comment.
pub const DEFAULT_COMMENT_TEMPLATE: &str = "Tracked in Jira: [{{issue_key}}]({{issue_url}})";

/// Maximum length of a Jira summary.
pub const MAX_SUMMARY_CHARS: usize = 255;

/// The three templates used when linking a merge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplates {
    /// Issue summary template.
    pub summary: String,
    /// Issue description template.
    pub description: String,
    /// Merge request comment template.
    pub comment: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self {
            summary: DEFAULT_SUMMARY_TEMPLATE.to_string(),
            description: DEFAULT_DESCRIPTION_TEMPLATE.to_string(),
            comment: DEFAULT_COMMENT_TEMPLATE.to_string(),
        }
    }
}
