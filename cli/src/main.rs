//! CLI for the merge request ticket linker.
//!
//! Links open dependency-update merge requests on GitLab to Jira tracking
//! issues, commenting the new issue key back on each merge request.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use mr_ticket_linker::{
    ConfigError, GitLabConfig, JiraConfig, LinkerSettings, ProcessingResult, RunSummary, Runner,
    RunnerConfig, RunnerError, SkipKeywords,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Merge Request Ticket Linker - Create Jira issues for unlinked dependency-update merge requests.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitLab base URL.
    #[arg(long, env = "GITLAB_URL")]
    gitlab_url: Option<String>,

    /// GitLab base URL as provided by GitLab CI.
    #[arg(long, env = "CI_SERVER_URL", hide = true)]
    ci_server_url: Option<String>,

    /// GitLab access token.
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    gitlab_token: String,

    /// GitLab project id or `group/project` path.
    #[arg(long, env = "GITLAB_PROJECT_ID")]
    project_id: Option<String>,

    /// GitLab project id as provided by GitLab CI.
    #[arg(long, env = "CI_PROJECT_ID", hide = true)]
    ci_project_id: Option<String>,

    /// Username of the bot whose merge requests are linked.
    #[arg(long, env = "RENOVATE_USERNAME")]
    author: String,

    /// Jira base URL.
    #[arg(long, env = "JIRA_URL")]
    jira_url: String,

    /// Jira user for basic authentication.
    #[arg(long, env = "JIRA_USER")]
    jira_user: String,

    /// Jira API token.
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    jira_token: String,

    /// Jira project new issues are created in.
    #[arg(long, env = "JIRA_PROJECT_KEY")]
    jira_project_key: String,

    /// Ticket-key prefix to look for [default: the Jira project key].
    #[arg(long, env = "TICKET_PREFIX")]
    ticket_prefix: Option<String>,

    /// Comma-separated keywords that exclude a merge request (case-insensitive).
    #[arg(long, env = "SKIP_KEYWORDS")]
    skip_keywords: Option<String>,

    /// Jira issue type [default: Task].
    #[arg(long, env = "JIRA_ISSUE_TYPE")]
    issue_type: Option<String>,

    /// Comma-separated labels for new issues.
    #[arg(long, env = "JIRA_LABELS")]
    labels: Option<String>,

    /// Path to a TOML settings file.
    #[arg(long, env = "LINKER_SETTINGS")]
    settings: Option<PathBuf>,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    http_timeout_secs: u64,

    /// Preview changes without creating issues or comments.
    #[arg(
        long,
        env = "DRY_RUN",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Compact single-line events without module target paths
        .with(fmt::layer().compact().with_target(false))
        // RUST_LOG filtering (e.g. RUST_LOG=mr_ticket_linker=debug), "info" otherwise
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // Register as the global default subscriber
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = build_config(args)?;
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Maps arguments onto a runner configuration.
///
/// Precedence: flags and environment, then the settings file, then defaults.
/// Variables that are set but blank count as unset, so CI templates that
/// declare them empty do not clear settings-file values.
fn build_config(args: Args) -> Result<RunnerConfig, ConfigError> {
    let gitlab_url = first_non_blank(args.gitlab_url, args.ci_server_url)
        .ok_or_else(|| missing("gitlab-url", "GITLAB_URL or CI_SERVER_URL"))?;
    let project_id = first_non_blank(args.project_id, args.ci_project_id)
        .ok_or_else(|| missing("project-id", "GITLAB_PROJECT_ID or CI_PROJECT_ID"))?;

    let gitlab = GitLabConfig::new(&gitlab_url, &args.gitlab_token, &project_id)?;
    let jira = JiraConfig::new(&args.jira_url, &args.jira_user, &args.jira_token)?;

    let mut config = RunnerConfig::new(gitlab, jira, args.author, args.jira_project_key);

    if let Some(path) = args.settings.filter(|path| !path.as_os_str().is_empty()) {
        config = config.with_settings(LinkerSettings::load(&path)?);
    }
    if let Some(prefix) = non_blank(args.ticket_prefix) {
        config = config.with_ticket_prefix(prefix);
    }
    if let Some(keywords) = non_blank(args.skip_keywords) {
        config = config.with_skip_keywords(SkipKeywords::parse_list(&keywords));
    }
    if let Some(issue_type) = non_blank(args.issue_type) {
        config = config.with_issue_type(issue_type);
    }
    if let Some(labels) = non_blank(args.labels) {
        config = config.with_labels(split_list(&labels));
    }

    Ok(config
        .with_dry_run(args.dry_run)
        .with_http_timeout(Duration::from_secs(args.http_timeout_secs)))
}

fn first_non_blank(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .into_iter()
        .chain(fallback)
        .find(|value| !value.trim().is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    first_non_blank(value, None)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn missing(field: &str, sources: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: format!("not set (use --{field} or {sources})"),
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Merge requests found: {}", summary.merge_requests_found);
    println!("  Skipped (keyword): {}", summary.keyword_filtered);
    println!("  Skipped (already linked): {}", summary.already_linked);

    if summary.dry_run {
        println!("  Issues that would be created: {}", summary.issues_planned);
    } else {
        println!("  Issues created: {}", summary.issues_created);
        println!("  Comments posted: {}", summary.comments_posted);
    }
    println!("  Failed: {}", summary.failed);

    for failure in summary.failures() {
        if let ProcessingResult::Failed {
            iid,
            web_url,
            stage,
            error,
            issue,
        } = failure
        {
            println!("    !{iid} ({web_url}) failed to {stage}: {error}");
            if let Some(issue) = issue {
                println!("      created {} ({}) without a link comment", issue.key, issue.url);
            }
        }
    }
}
