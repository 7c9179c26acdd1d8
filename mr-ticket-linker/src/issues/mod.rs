//! Tracking issues and the tracker they are created in.
//!
//! [`IssueTracker`] is the seam between the linking policy and the issue
//! tracker; [`JiraClient`] implements it against the Jira REST v2 API.

mod error;
mod jira;

pub use error::TrackerError;
pub use jira::JiraClient;

use async_trait::async_trait;

/// Default Jira issue type for tracking issues.
pub const DEFAULT_ISSUE_TYPE: &str = "Task";

/// A tracking issue about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Key of the project the issue is created in (e.g. `PROJ`).
    pub project_key: String,

    /// One-line summary.
    pub summary: String,

    /// Issue description.
    pub description: String,

    /// Issue type name (e.g. `Task`).
    pub issue_type: String,

    /// Labels to apply; omitted from the request when empty.
    pub labels: Vec<String>,
}

/// A tracking issue that exists in the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Ticket key assigned by the tracker (e.g. `PROJ-7`).
    pub key: String,

    /// Browser URL of the issue.
    pub url: String,
}

/// Write access to an issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Creates a tracking issue and returns its key.
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError>;
}
