//! Orchestrates a linking run.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_HTTP_TIMEOUT};
pub use error::RunnerError;

use crate::issues::{CreatedIssue, IssueTracker, JiraClient, NewIssue};
use crate::matching::{Decision, LinkPolicy, SkipReason};
use crate::merge_requests::{GitLabClient, MergeRequest, MergeRequestSource};
use crate::summary::{FailureStage, ProcessingResult, RunSummary};
use crate::templates::{TemplateError, TemplateRenderer};
use tracing::{debug, error, info, info_span, Instrument};

/// Links open merge requests of one author to tracking issues.
pub struct Runner {
    config: RunnerConfig,
    policy: LinkPolicy,
    source: Box<dyn MergeRequestSource>,
    tracker: Box<dyn IssueTracker>,
    renderer: TemplateRenderer,
}

impl Runner {
    /// Builds a runner talking to GitLab and Jira.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration is invalid, a client
    /// cannot be built or a template is broken.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let source = GitLabClient::new(config.gitlab(), config.http_timeout())?;
        let tracker = JiraClient::new(config.jira(), config.http_timeout())?;
        Self::with_clients(config, Box::new(source), Box::new(tracker))
    }

    /// Builds a runner over the given merge request source and issue tracker.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration is invalid or a template
    /// is broken.
    pub fn with_clients(
        config: RunnerConfig,
        source: Box<dyn MergeRequestSource>,
        tracker: Box<dyn IssueTracker>,
    ) -> Result<Self, RunnerError> {
        config.validate()?;
        let policy = config.link_policy()?;
        let renderer = TemplateRenderer::new();

        let runner = Self {
            config,
            policy,
            source,
            tracker,
            renderer,
        };
        runner.renderer.check_templates(
            runner.config.templates(),
            runner.policy.pattern(),
            &runner.placeholder_issue(),
        )?;

        Ok(runner)
    }

    /// Executes a full run.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Source`] if the merge requests cannot be
    /// listed. Failures on individual merge requests are recorded in the
    /// summary instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());

        info!(
            author = %self.config.author(),
            project = %self.config.gitlab().project_id,
            "Listing open merge requests"
        );
        let merge_requests = self
            .source
            .list_open_merge_requests(self.config.author())
            .await?;

        summary.merge_requests_found = merge_requests.len();
        info!(count = merge_requests.len(), "Found merge requests");

        if self.config.dry_run() {
            print_dry_run_listing(self.config.author(), &merge_requests);
        }

        for merge_request in &merge_requests {
            let span = info_span!("merge_request", iid = merge_request.iid);
            let result = self
                .process_merge_request(merge_request)
                .instrument(span)
                .await;
            summary.record_result(result);
        }

        Ok(summary)
    }

    async fn process_merge_request(&self, merge_request: &MergeRequest) -> ProcessingResult {
        debug!(title = %merge_request.title, "Processing merge request");

        if let Some(reason) = self.policy.pre_screen(merge_request) {
            return skipped(merge_request, reason);
        }

        let notes = match self.source.list_notes(merge_request.iid).await {
            Ok(notes) => notes,
            Err(e) => return failed(merge_request, FailureStage::ListNotes, &e, None),
        };
        debug!(count = notes.len(), "Fetched notes");

        match self.policy.decide(merge_request, &notes) {
            Decision::Skip(reason) => skipped(merge_request, reason),
            Decision::Link => self.link(merge_request).await,
        }
    }

    async fn link(&self, merge_request: &MergeRequest) -> ProcessingResult {
        let new_issue = match self.build_issue(merge_request) {
            Ok(issue) => issue,
            Err(e) => return failed(merge_request, FailureStage::RenderTemplate, &e, None),
        };

        if self.config.dry_run() {
            return self.plan(merge_request, new_issue);
        }

        let issue = match self.tracker.create_issue(&new_issue).await {
            Ok(issue) => issue,
            Err(e) => return failed(merge_request, FailureStage::CreateIssue, &e, None),
        };
        info!(issue_key = %issue.key, "Created tracking issue");

        let comment = match self.renderer.render_comment(
            self.config.templates(),
            merge_request,
            &issue,
            self.policy.pattern(),
        ) {
            Ok(comment) => comment,
            Err(e) => {
                return failed(merge_request, FailureStage::RenderTemplate, &e, Some(issue))
            }
        };

        if let Err(e) = self.source.post_comment(merge_request.iid, &comment).await {
            return failed(merge_request, FailureStage::PostComment, &e, Some(issue));
        }
        info!(issue_key = %issue.key, "Linked merge request");

        ProcessingResult::Linked {
            iid: merge_request.iid,
            web_url: merge_request.web_url.clone(),
            issue,
        }
    }

    /// Dry run: renders the comment against a placeholder issue and reports
    /// what would be written.
    fn plan(&self, merge_request: &MergeRequest, new_issue: NewIssue) -> ProcessingResult {
        let placeholder = self.placeholder_issue();
        let comment = match self.renderer.render_comment(
            self.config.templates(),
            merge_request,
            &placeholder,
            self.policy.pattern(),
        ) {
            Ok(comment) => comment,
            Err(e) => return failed(merge_request, FailureStage::RenderTemplate, &e, None),
        };

        print_dry_run_issue(merge_request, &new_issue, &comment);
        ProcessingResult::Planned {
            iid: merge_request.iid,
            web_url: merge_request.web_url.clone(),
            summary: new_issue.summary,
            comment,
        }
    }

    /// Stand-in for the issue Jira would create, keyed like the project's issues.
    fn placeholder_issue(&self) -> CreatedIssue {
        let key = self.config.sample_issue_key();
        let base = self.config.jira().url.as_str().trim_end_matches('/');
        CreatedIssue {
            url: format!("{base}/browse/{key}"),
            key,
        }
    }

    fn build_issue(
        &self,
        merge_request: &MergeRequest,
    ) -> Result<NewIssue, TemplateError> {
        let templates = self.config.templates();
        Ok(NewIssue {
            project_key: self.config.project_key().to_string(),
            summary: self.renderer.render_summary(templates, merge_request)?,
            description: self.renderer.render_description(templates, merge_request)?,
            issue_type: self.config.issue_type().to_string(),
            labels: self.config.labels().to_vec(),
        })
    }
}

fn skipped(merge_request: &MergeRequest, reason: SkipReason) -> ProcessingResult {
    info!(reason = %reason, "Skipping merge request");
    ProcessingResult::Skipped {
        iid: merge_request.iid,
        web_url: merge_request.web_url.clone(),
        reason,
    }
}

fn failed(
    merge_request: &MergeRequest,
    stage: FailureStage,
    error: &dyn std::error::Error,
    issue: Option<CreatedIssue>,
) -> ProcessingResult {
    match &issue {
        Some(issue) => error!(
            stage = %stage,
            error = %error,
            issue_key = %issue.key,
            issue_url = %issue.url,
            "Issue created but not linked; add the link by hand"
        ),
        None => error!(stage = %stage, error = %error, "Failed to process merge request"),
    }

    ProcessingResult::Failed {
        iid: merge_request.iid,
        web_url: merge_request.web_url.clone(),
        stage,
        error: error.to_string(),
        issue,
    }
}

fn print_dry_run_listing(author: &str, merge_requests: &[MergeRequest]) {
    println!(
        "\n[DRY RUN] Found {} open merge requests by {author}:",
        merge_requests.len()
    );
    for merge_request in merge_requests {
        println!("  !{} {}", merge_request.iid, merge_request.title);
        println!("    {}", merge_request.web_url);
    }
    println!();
}

fn print_dry_run_issue(merge_request: &MergeRequest, issue: &NewIssue, comment: &str) {
    println!(
        "[DRY RUN] Would create {} in {} for !{}:",
        issue.issue_type, issue.project_key, merge_request.iid
    );
    println!("  Summary: {}", issue.summary);
    for line in issue.description.lines().take(10) {
        println!("  | {line}");
    }
    if issue.description.lines().count() > 10 {
        println!("  | ...");
    }
    println!("  Would comment on {}:", merge_request.web_url);
    for line in comment.lines() {
        println!("  > {line}");
    }
    println!();
}
