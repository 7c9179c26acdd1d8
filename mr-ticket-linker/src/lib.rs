#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod http;
pub mod issues;
pub mod matching;
pub mod merge_requests;
pub mod runner;
pub mod summary;
pub mod templates;

pub use config::{ConfigError, GitLabConfig, JiraConfig, LinkerSettings};
pub use http::HttpError;
pub use issues::{CreatedIssue, IssueTracker, JiraClient, NewIssue, TrackerError};
pub use matching::{
    detect_link, Decision, LinkLocation, LinkMatch, LinkPolicy, PatternError, SkipKeywords,
    SkipReason, TicketKeyPattern,
};
pub use merge_requests::{
    DiscussionNote, GitLabClient, MergeRequest, MergeRequestSource, SourceError,
};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{FailureStage, ProcessingResult, RunSummary};
pub use templates::{LinkTemplates, TemplateError, TemplateRenderer};
