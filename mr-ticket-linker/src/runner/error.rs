//! Runner error types.

use crate::config::ConfigError;
use crate::issues::TrackerError;
use crate::merge_requests::SourceError;
use crate::templates::TemplateError;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Invalid configuration or settings file.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Listing merge requests failed, or the GitLab client could not be built.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The Jira client could not be built.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// A configured template is broken.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
