//! Processing result types.

use crate::issues::CreatedIssue;
use crate::matching::SkipReason;
use std::fmt;

/// Step of the linking flow that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Fetching discussion notes.
    ListNotes,
    /// Rendering the issue or comment templates.
    RenderTemplate,
    /// Creating the tracking issue.
    CreateIssue,
    /// Posting the link comment.
    PostComment,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ListNotes => "list notes",
            Self::RenderTemplate => "render template",
            Self::CreateIssue => "create issue",
            Self::PostComment => "post comment",
        })
    }
}

/// Result of processing a single merge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResult {
    /// A tracking issue was created and linked.
    Linked {
        /// Merge request number.
        iid: u64,
        /// Merge request URL.
        web_url: String,
        /// The new issue.
        issue: CreatedIssue,
    },

    /// Dry run: an issue would have been created.
    Planned {
        /// Merge request number.
        iid: u64,
        /// Merge request URL.
        web_url: String,
        /// Summary of the issue that would be created.
        summary: String,
        /// Link comment that would be posted, rendered with a placeholder key.
        comment: String,
    },

    /// The merge request was left alone.
    Skipped {
        /// Merge request number.
        iid: u64,
        /// Merge request URL.
        web_url: String,
        /// Why it was skipped.
        reason: SkipReason,
    },

    /// Processing failed.
    Failed {
        /// Merge request number.
        iid: u64,
        /// Merge request URL.
        web_url: String,
        /// Step that failed.
        stage: FailureStage,
        /// Error message.
        error: String,
        /// Issue created before the failure, left without a link comment.
        issue: Option<CreatedIssue>,
    },
}
