//! Merge requests and the source they are fetched from.
//!
//! The [`MergeRequestSource`] trait is the seam between the linking policy
//! and the source-control server. [`GitLabClient`] implements it against the
//! GitLab REST v4 API; tests substitute in-memory fakes.

mod error;
mod gitlab;

pub use error::SourceError;
pub use gitlab::GitLabClient;

use async_trait::async_trait;

/// An open merge request, as fetched at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Project-scoped merge request number.
    pub iid: u64,

    /// Merge request title.
    pub title: String,

    /// Merge request description (empty when the server has none).
    pub description: String,

    /// Browser URL of the merge request.
    pub web_url: String,

    /// Username of the author.
    pub author: String,

    /// Branch the changes come from.
    pub source_branch: String,

    /// Branch the changes merge into.
    pub target_branch: String,

    /// Labels attached to the merge request.
    pub labels: Vec<String>,
}

/// A discussion note (comment) on a merge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionNote {
    /// Note id.
    pub id: u64,

    /// Free-text note body.
    pub body: String,

    /// Username of the note author.
    pub author: String,

    /// Whether the note was generated by the server (label changes, pushes, ...).
    pub system: bool,
}

/// Read and comment access to open merge requests of a single project.
#[async_trait]
pub trait MergeRequestSource: Send + Sync {
    /// Lists open merge requests authored by `author`, in server order.
    async fn list_open_merge_requests(
        &self,
        author: &str,
    ) -> Result<Vec<MergeRequest>, SourceError>;

    /// Lists the discussion notes of a merge request, oldest first.
    async fn list_notes(&self, iid: u64) -> Result<Vec<DiscussionNote>, SourceError>;

    /// Posts a comment on a merge request.
    async fn post_comment(&self, iid: u64, body: &str) -> Result<(), SourceError>;
}
