//! Run summary types.

use super::result::ProcessingResult;
use crate::matching::SkipReason;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of open merge requests by the configured author.
    pub merge_requests_found: usize,

    /// Number skipped because of a skip-keyword.
    pub keyword_filtered: usize,

    /// Number skipped because a ticket was already referenced.
    pub already_linked: usize,

    /// Number of tracking issues created.
    pub issues_created: usize,

    /// Number of link comments posted.
    pub comments_posted: usize,

    /// Number of issues that would have been created (dry run).
    pub issues_planned: usize,

    /// Number of merge requests whose processing failed.
    pub failed: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Per-merge-request results, in processing order.
    pub results: Vec<ProcessingResult>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result and keeps the result.
    pub fn record_result(&mut self, result: ProcessingResult) {
        match &result {
            ProcessingResult::Linked { .. } => {
                self.issues_created += 1;
                self.comments_posted += 1;
            }
            ProcessingResult::Planned { .. } => self.issues_planned += 1,
            ProcessingResult::Skipped { reason, .. } => match reason {
                SkipReason::KeywordFiltered { .. } => self.keyword_filtered += 1,
                SkipReason::AlreadyLinked(_) => self.already_linked += 1,
            },
            ProcessingResult::Failed { issue, .. } => {
                if issue.is_some() {
                    self.issues_created += 1;
                }
                self.failed += 1;
            }
        }
        self.results.push(result);
    }

    /// Results of merge requests whose processing failed.
    pub fn failures(&self) -> impl Iterator<Item = &ProcessingResult> {
        self.results
            .iter()
            .filter(|result| matches!(result, ProcessingResult::Failed { .. }))
    }

    /// Returns true if any merge request failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::CreatedIssue;
    use crate::matching::{LinkLocation, LinkMatch};
    use crate::summary::FailureStage;

    fn issue(key: &str) -> CreatedIssue {
        CreatedIssue {
            key: key.to_string(),
            url: format!("https://jira.example.com/browse/{key}"),
        }
    }

    #[test]
    fn can_record_results() {
        let mut summary = RunSummary::new(false);

        summary.record_result(ProcessingResult::Linked {
            iid: 1,
            web_url: "https://example.com/1".to_string(),
            issue: issue("PROJ-1"),
        });
        summary.record_result(ProcessingResult::Skipped {
            iid: 2,
            web_url: "https://example.com/2".to_string(),
            reason: SkipReason::KeywordFiltered {
                keyword: "lockfile".to_string(),
            },
        });
        summary.record_result(ProcessingResult::Skipped {
            iid: 3,
            web_url: "https://example.com/3".to_string(),
            reason: SkipReason::AlreadyLinked(LinkMatch {
                key: "PROJ-9".to_string(),
                location: LinkLocation::Description,
            }),
        });

        assert_eq!(summary.issues_created, 1);
        assert_eq!(summary.comments_posted, 1);
        assert_eq!(summary.keyword_filtered, 1);
        assert_eq!(summary.already_linked, 1);
        assert_eq!(summary.results.len(), 3);
        assert!(!summary.has_failures());
    }

    #[test]
    fn counts_orphaned_issue_on_comment_failure() {
        let mut summary = RunSummary::new(false);

        summary.record_result(ProcessingResult::Failed {
            iid: 4,
            web_url: "https://example.com/4".to_string(),
            stage: FailureStage::PostComment,
            error: "forbidden (HTTP 403)".to_string(),
            issue: Some(issue("PROJ-4")),
        });

        assert_eq!(summary.issues_created, 1);
        assert_eq!(summary.comments_posted, 0);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
        assert_eq!(summary.failures().count(), 1);
    }
}
