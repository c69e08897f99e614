use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::common::AgentType;
use crate::server::config::BackendConfiguration;
use crate::server::error::ServerError;

const STATUS_ENDPOINT: &str = "/get-job-status";

#[derive(Debug, Error)]
pub enum JobBackendError {
    #[error("Request to job backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job backend returned an unusable response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
struct StartJobRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartJobResponse {
    job_id: Option<String>,
}

/// Relay to the asynchronous job backend.
///
/// Holds no job state: every call is one upstream round trip.
pub struct JobBackendClient {
    http_client: Client,
    base_url: String,
}

impl JobBackendClient {
    pub fn new(config: &BackendConfiguration, timeout: Duration) -> Result<Self, ServerError> {
        Url::parse(&config.base_url)
            .map_err(|e| ServerError::Configuration(format!("Invalid backend URL: {}", e)))?;

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Configuration(format!("Invalid HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Start a job on the agent's endpoint and return the backend's job id
    pub async fn submit(&self, agent: AgentType, query: &str) -> Result<String, JobBackendError> {
        let url = format!("{}{}", self.base_url, agent.endpoint());

        let resp = self
            .http_client
            .post(&url)
            .json(&StartJobRequest { query })
            .send()
            .await?
            .error_for_status()?
            .json::<StartJobResponse>()
            .await?;

        resp.job_id
            .filter(|job_id| !job_id.is_empty())
            .ok_or_else(|| JobBackendError::InvalidResponse("missing jobId".to_string()))
    }

    /// Current status body of a job, exactly as the backend reported it
    pub async fn status(&self, job_id: &str) -> Result<serde_json::Value, JobBackendError> {
        let url = format!("{}{}", self.base_url, STATUS_ENDPOINT);

        let body = self
            .http_client
            .get(&url)
            .query(&[("jobId", job_id)])
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        Ok(body)
    }
}
