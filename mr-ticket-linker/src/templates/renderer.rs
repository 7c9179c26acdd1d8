//! Template renderer.

use super::{LinkTemplates, TemplateError, MAX_SUMMARY_CHARS};
use crate::issues::CreatedIssue;
use crate::matching::TicketKeyPattern;
use crate::merge_requests::MergeRequest;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (Jira and GitLab render their own markup)
/// - Strict mode (catches misspelled variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Jira wiki markup and GitLab markdown must reach the server unescaped
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch misspelled variables
    hbs.set_strict_mode(true);

    hbs
}

/// Renders issue summaries, descriptions and link comments.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the issue summary as a single line of at most
    /// [`MAX_SUMMARY_CHARS`] characters.
    ///
    /// # Arguments
    ///
    /// * `templates` - The configured templates
    /// * `merge_request` - The merge request being linked
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_summary(
        &self,
        templates: &LinkTemplates,
        merge_request: &MergeRequest,
    ) -> Result<String, TemplateError> {
        let rendered = self.render(&templates.summary, &merge_request_data(merge_request))?;
        let single_line = rendered.split_whitespace().collect::<Vec<_>>().join(" ");

        if single_line.is_empty() {
            return Ok(format!("Dependency update !{}", merge_request.iid));
        }
        Ok(single_line.chars().take(MAX_SUMMARY_CHARS).collect())
    }

    /// Renders the issue description.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_description(
        &self,
        templates: &LinkTemplates,
        merge_request: &MergeRequest,
    ) -> Result<String, TemplateError> {
        self.render(&templates.description, &merge_request_data(merge_request))
    }

    /// Renders the comment that links a merge request to its new issue.
    ///
    /// # Arguments
    ///
    /// * `templates` - The configured templates
    /// * `merge_request` - The merge request being linked
    /// * `issue` - The created (or, in a dry run, placeholder) issue
    /// * `pattern` - Ticket-key pattern the rendered comment must match
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingTicketKey`] if the rendered comment
    /// does not contain a key matching `pattern`, or a rendering error.
    pub fn render_comment(
        &self,
        templates: &LinkTemplates,
        merge_request: &MergeRequest,
        issue: &CreatedIssue,
        pattern: &TicketKeyPattern,
    ) -> Result<String, TemplateError> {
        let mut data = merge_request_data(merge_request);
        data["issue_key"] = json!(issue.key);
        data["issue_url"] = json!(issue.url);

        let comment = self.render(&templates.comment, &data)?;
        if !pattern.is_match(&comment) {
            return Err(TemplateError::MissingTicketKey {
                prefix: pattern.prefix().to_string(),
            });
        }
        Ok(comment)
    }

    /// Renders all three templates against a sample merge request so that
    /// broken templates fail before any issue is created.
    ///
    /// # Errors
    ///
    /// Returns the first rendering error found.
    pub fn check_templates(
        &self,
        templates: &LinkTemplates,
        pattern: &TicketKeyPattern,
        sample_issue: &CreatedIssue,
    ) -> Result<(), TemplateError> {
        let sample = MergeRequest {
            iid: 1,
            title: "Update dependency foo to v1.2.3".to_string(),
            description: "This MR contains the following updates".to_string(),
            web_url: "https://gitlab.example.com/group/project/-/merge_requests/1".to_string(),
            author: "renovate-bot".to_string(),
            source_branch: "renovate/foo-1.x".to_string(),
            target_branch: "main".to_string(),
            labels: vec!["dependencies".to_string()],
        };

        self.render_summary(templates, &sample)?;
        self.render_description(templates, &sample)?;
        self.render_comment(templates, &sample, sample_issue, pattern)?;
        Ok(())
    }

    /// Renders a template with the given data.
    fn render(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}

fn merge_request_data(merge_request: &MergeRequest) -> Value {
    json!({
        "iid": merge_request.iid,
        "title": merge_request.title,
        "description": merge_request.description,
        "web_url": merge_request.web_url,
        "author": merge_request.author,
        "source_branch": merge_request.source_branch,
        "target_branch": merge_request.target_branch,
        "labels": merge_request.labels,
    })
}
