//! Jira REST v2 implementation of [`IssueTracker`].

use super::{CreatedIssue, IssueTracker, NewIssue, TrackerError};
use crate::config::JiraConfig;
use crate::http::{build_client, check_status, HttpError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for creating issues in Jira with basic authentication.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    base_url: Url,
    user: String,
    token: String,
}

impl JiraClient {
    /// Builds a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidUrl`] if the URL cannot carry a path and
    /// [`TrackerError::JiraError`] if the HTTP client cannot be built.
    pub fn new(config: &JiraConfig, timeout: Duration) -> Result<Self, TrackerError> {
        if config.url.cannot_be_a_base() {
            return Err(TrackerError::InvalidUrl {
                url: config.url.to_string(),
            });
        }

        Ok(Self {
            http: build_client(timeout)?,
            base_url: config.url.clone(),
            user: config.user.clone(),
            token: config.token.clone(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, TrackerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TrackerError::InvalidUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Browser URL of an issue: `<base>/browse/<key>`.
    fn browse_url(&self, key: &str) -> Result<String, TrackerError> {
        Ok(self.url(&["browse", key])?.to_string())
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError> {
        let url = self.url(&["rest", "api", "2", "issue"])?;
        debug!(url = %url, project = %issue.project_key, "Jira POST");

        let response = self
            .http
            .post(url)
            .basic_auth(&self.user, Some(&self.token))
            .json(&CreateIssueRequest::from(issue))
            .send()
            .await
            .map_err(HttpError::from)?;
        let response = check_status(response).await?;
        let created: CreateIssueResponse = response.json().await.map_err(HttpError::from)?;

        Ok(CreatedIssue {
            url: self.browse_url(&created.key)?,
            key: created.key,
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateIssueRequest<'a> {
    fields: IssueFields<'a>,
}

#[derive(Debug, Serialize)]
struct IssueFields<'a> {
    project: ProjectRef<'a>,
    summary: &'a str,
    description: &'a str,
    #[serde(rename = "issuetype")]
    issue_type: IssueTypeRef<'a>,
    #[serde(skip_serializing_if = "no_labels")]
    labels: &'a [String],
}

fn no_labels(labels: &&[String]) -> bool {
    labels.is_empty()
}

#[derive(Debug, Serialize)]
struct ProjectRef<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct IssueTypeRef<'a> {
    name: &'a str,
}

impl<'a> From<&'a NewIssue> for CreateIssueRequest<'a> {
    fn from(issue: &'a NewIssue) -> Self {
        Self {
            fields: IssueFields {
                project: ProjectRef {
                    key: &issue.project_key,
                },
                summary: &issue.summary,
                description: &issue.description,
                issue_type: IssueTypeRef {
                    name: &issue.issue_type,
                },
                labels: &issue.labels,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateIssueResponse {
    key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_issue(labels: Vec<String>) -> NewIssue {
        NewIssue {
            project_key: "PROJ".to_string(),
            summary: "Update foo to 1.2".to_string(),
            description: "https://gitlab.example.com/group/app/-/merge_requests/5".to_string(),
            issue_type: "Task".to_string(),
            labels,
        }
    }

    #[test]
    fn serializes_create_request() {
        let issue = sample_issue(Vec::new());
        let body = serde_json::to_value(CreateIssueRequest::from(&issue)).unwrap();

        assert_eq!(
            body,
            json!({
                "fields": {
                    "project": { "key": "PROJ" },
                    "summary": "Update foo to 1.2",
                    "description": "https://gitlab.example.com/group/app/-/merge_requests/5",
                    "issuetype": { "name": "Task" }
                }
            })
        );
    }

    #[test]
    fn includes_labels_when_present() {
        let issue = sample_issue(vec!["dependencies".to_string()]);
        let body = serde_json::to_value(CreateIssueRequest::from(&issue)).unwrap();

        assert_eq!(body["fields"]["labels"], json!(["dependencies"]));
    }

    #[test]
    fn builds_browse_url_under_base_path() {
        let config = JiraConfig {
            url: Url::parse("https://jira.example.com/jira/").unwrap(),
            user: "bot".to_string(),
            token: "secret".to_string(),
        };
        let client = JiraClient::new(&config, Duration::from_secs(5)).unwrap();

        assert_eq!(
            client.browse_url("PROJ-7").unwrap(),
            "https://jira.example.com/jira/browse/PROJ-7"
        );
    }
}
