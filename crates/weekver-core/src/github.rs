//! GitHub Actions run history
//!
//! Two REST calls: resolve the workflow of the current run, then list every
//! run of that workflow. The listing is paginated; all pages are fetched
//! before returning so callers see the complete history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::{Config, Repository};
use crate::error::StampError;
use crate::history::{BuildRun, RunHistory};

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct WorkflowRunDetail {
    workflow_id: u64,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunSummary {
    run_number: u64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunPage {
    total_count: u64,
    workflow_runs: Vec<WorkflowRunSummary>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// [`RunHistory`] backed by the GitHub REST API.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    repository: Repository,
    token: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Client for the repository and endpoint named in `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_client(
            Client::new(),
            &config.api_url,
            config.repository.clone(),
            &config.token,
        )
    }

    /// Reuse an existing HTTP client.
    pub fn with_client(client: Client, api_url: &str, repository: Repository, token: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            repository,
            token: token.to_string(),
        }
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{path}",
            self.api_url, self.repository.owner, self.repository.name
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, StampError> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(USER_AGENT, crate::USER_AGENT);
        if !query.is_empty() {
            request = request.query(query);
        }
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(StampError::Api {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RunHistory for GitHubClient {
    async fn workflow_id(&self, run_id: u64) -> Result<u64, StampError> {
        let url = self.repo_url(&format!("actions/runs/{run_id}"));
        let run: WorkflowRunDetail = self.get_json(&url, &[]).await?;
        tracing::debug!(run_id, workflow_id = run.workflow_id, "Resolved workflow");
        Ok(run.workflow_id)
    }

    async fn list_runs(&self, workflow_id: u64) -> Result<Vec<BuildRun>, StampError> {
        let url = self.repo_url(&format!("actions/workflows/{workflow_id}/runs"));
        let mut runs = Vec::new();
        let mut page = 1u32;

        loop {
            let body: WorkflowRunPage = self
                .get_json(
                    &url,
                    &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())],
                )
                .await?;
            let fetched = body.workflow_runs.len();
            runs.extend(body.workflow_runs.into_iter().map(|run| BuildRun {
                number: run.run_number,
                created_at: run.created_at,
            }));
            tracing::debug!(page, fetched, total = body.total_count, "Fetched workflow runs");

            if fetched < PER_PAGE || runs.len() as u64 >= body.total_count {
                break;
            }
            page += 1;
        }

        Ok(runs)
    }
}
