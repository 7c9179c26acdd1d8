//! Issue tracker error types.

use crate::http::HttpError;
use thiserror::Error;

/// Errors that can occur during issue operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Jira API error.
    #[error("Jira API error: {0}")]
    JiraError(#[from] HttpError),

    /// The configured Jira URL cannot carry API paths.
    #[error("Invalid Jira URL: {url}")]
    InvalidUrl { url: String },
}
