//! GitLab REST v4 implementation of [`MergeRequestSource`].
//!
//! Endpoints used:
//! - GET  /projects/:id/merge_requests?state=opened&author_username=:author
//! - GET  /projects/:id/merge_requests/:iid/notes?sort=asc&order_by=created_at
//! - POST /projects/:id/merge_requests/:iid/notes

use super::{DiscussionNote, MergeRequest, MergeRequestSource, SourceError};
use crate::config::GitLabConfig;
use crate::http::{build_client, check_status, HttpError};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Page size requested from list endpoints (GitLab's maximum).
const PER_PAGE: &str = "100";

/// Header GitLab uses to announce the next page of a paginated listing.
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Client for the merge requests of a single GitLab project.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    base_url: Url,
    project_id: String,
    token: String,
}

impl GitLabClient {
    /// Builds a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if the URL cannot carry a path and
    /// [`SourceError::GitLabError`] if the HTTP client cannot be built.
    pub fn new(config: &GitLabConfig, timeout: Duration) -> Result<Self, SourceError> {
        if config.url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl {
                url: config.url.to_string(),
            });
        }

        Ok(Self {
            http: build_client(timeout)?,
            base_url: config.url.clone(),
            project_id: config.project_id.clone(),
            token: config.token.clone(),
        })
    }

    /// Builds `<base>/api/v4/projects/<id>/merge_requests/<tail...>`.
    ///
    /// The project id is percent-encoded as a single segment, so both numeric
    /// ids and `group/project` paths work.
    fn merge_requests_url(&self, tail: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "v4", "projects", self.project_id.as_str(), "merge_requests"])
            .extend(tail);
        Ok(url)
    }

    /// Fetches every page of a list endpoint, following `X-Next-Page`.
    async fn get_all_pages<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, SourceError> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("per_page", PER_PAGE)
                .append_pair("page", &page.to_string());

            debug!(url = %page_url, "GitLab GET");
            let response = self
                .http
                .get(page_url)
                .header("PRIVATE-TOKEN", &self.token)
                .send()
                .await
                .map_err(HttpError::from)?;
            let response = check_status(response).await?;
            let next = next_page(response.headers());

            let batch: Vec<T> = response.json().await.map_err(HttpError::from)?;
            items.extend(batch);

            match next {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl MergeRequestSource for GitLabClient {
    async fn list_open_merge_requests(
        &self,
        author: &str,
    ) -> Result<Vec<MergeRequest>, SourceError> {
        let mut url = self.merge_requests_url(&[])?;
        url.query_pairs_mut()
            .append_pair("state", "opened")
            .append_pair("author_username", author);

        let raw: Vec<GitLabMergeRequest> = self.get_all_pages(url).await?;
        let total = raw.len();

        // Older servers ignore `author_username`.
        let merge_requests: Vec<MergeRequest> = raw
            .into_iter()
            .filter(|mr| mr.author.username == author)
            .map(MergeRequest::from)
            .collect();

        debug!(
            total,
            kept = merge_requests.len(),
            author,
            "Listed open merge requests"
        );
        Ok(merge_requests)
    }

    async fn list_notes(&self, iid: u64) -> Result<Vec<DiscussionNote>, SourceError> {
        let iid = iid.to_string();
        let mut url = self.merge_requests_url(&[iid.as_str(), "notes"])?;
        url.query_pairs_mut()
            .append_pair("sort", "asc")
            .append_pair("order_by", "created_at");

        let raw: Vec<GitLabNote> = self.get_all_pages(url).await?;
        Ok(raw.into_iter().map(DiscussionNote::from).collect())
    }

    async fn post_comment(&self, iid: u64, body: &str) -> Result<(), SourceError> {
        let iid = iid.to_string();
        let url = self.merge_requests_url(&[iid.as_str(), "notes"])?;

        debug!(url = %url, "GitLab POST");
        let response = self
            .http
            .post(url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&CreateNoteRequest { body })
            .send()
            .await
            .map_err(HttpError::from)?;
        check_status(response).await?;
        Ok(())
    }
}

/// Parses the `X-Next-Page` header; an empty value marks the last page.
fn next_page(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(NEXT_PAGE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

#[derive(Debug, Deserialize)]
struct GitLabUser {
    username: String,
}

#[derive(Debug, Deserialize)]
struct GitLabMergeRequest {
    iid: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    web_url: String,
    author: GitLabUser,
    #[serde(default)]
    source_branch: String,
    #[serde(default)]
    target_branch: String,
    #[serde(default)]
    labels: Vec<String>,
}

impl From<GitLabMergeRequest> for MergeRequest {
    fn from(raw: GitLabMergeRequest) -> Self {
        Self {
            iid: raw.iid,
            title: raw.title,
            description: raw.description.unwrap_or_default(),
            web_url: raw.web_url,
            author: raw.author.username,
            source_branch: raw.source_branch,
            target_branch: raw.target_branch,
            labels: raw.labels,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitLabNote {
    id: u64,
    #[serde(default)]
    body: String,
    author: GitLabUser,
    #[serde(default)]
    system: bool,
}

impl From<GitLabNote> for DiscussionNote {
    fn from(raw: GitLabNote) -> Self {
        Self {
            id: raw.id,
            body: raw.body,
            author: raw.author.username,
            system: raw.system,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateNoteRequest<'a> {
    body: &'a str,
}
