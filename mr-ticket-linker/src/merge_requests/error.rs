//! Merge request source error types.

use crate::http::HttpError;
use thiserror::Error;

/// Errors that can occur while talking to the merge request source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// GitLab API error.
    #[error("GitLab API error: {0}")]
    GitLabError(#[from] HttpError),

    /// The configured GitLab URL cannot carry API paths.
    #[error("Invalid GitLab URL: {url}")]
    InvalidUrl { url: String },
}
