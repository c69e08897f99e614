use reqwest::{header::COOKIE, Client, RequestBuilder, StatusCode, Url};
use std::time::Duration;

use super::Settings;
use crate::common::{AgentType, AuthStatusResponse, JobStatus, SubmitJobRequest, SubmitJobResponse};
use crate::error::ClientError;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Typed client for the gateway's JSON API.
///
/// The gateway identifies the browser by its session cookie, so requests
/// against protected endpoints need the cookie obtained from a completed
/// login (see [`GatewayClient::with_session_cookie`]).
pub struct GatewayClient {
    http_client: Client,
    server_url: Url,
    session_cookie: Option<String>,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl GatewayClient {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        settings.validate().map_err(ClientError::Configuration)?;

        let server_url = Url::parse(&settings.server_url)
            .map_err(|e| ClientError::Configuration(format!("Invalid server URL: {}", e)))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            server_url,
            session_cookie: None,
            poll_interval: Duration::from_secs(settings.poll_interval_seconds),
            max_poll_attempts: settings.max_poll_attempts,
        })
    }

    /// Attach a `Cookie` header value (e.g. `agent_gateway_sid=...`) to every request
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Identity claims of the current session, `None` when anonymous
    pub async fn auth_status(&self) -> Result<Option<serde_json::Value>, ClientError> {
        let url = self.endpoint(&["api", "auth", "status"])?;

        let resp = self
            .with_cookie(self.http_client.get(url))
            .send()
            .await?
            .error_for_status()?
            .json::<AuthStatusResponse>()
            .await?;

        Ok(resp.user)
    }

    /// Submit a job and return the job id assigned by the backend
    pub async fn submit_job(&self, query: &str, agent: AgentType) -> Result<String, ClientError> {
        let url = self.endpoint(&["api", "submit-job"])?;
        let req = SubmitJobRequest {
            query: query.to_string(),
            agent_type: agent,
        };

        let resp = self
            .with_cookie(self.http_client.post(url))
            .json(&req)
            .send()
            .await?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthenticated),
            status if !status.is_success() => Err(ClientError::UnexpectedStatus(status.as_u16())),
            _ => Ok(resp.json::<SubmitJobResponse>().await?.job_id),
        }
    }

    /// Fetch the current status of a job.
    ///
    /// The gateway reports proxy failures as a `FAILED` status body with an
    /// error status code, so the body is read whatever the status code is.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        let url = self.endpoint(&["api", "status", job_id])?;

        let resp = self.with_cookie(self.http_client.get(url)).send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthenticated);
        }

        match resp.json::<JobStatus>().await {
            Ok(job_status) => Ok(job_status),
            Err(_) if !status.is_success() => Err(ClientError::UnexpectedStatus(status.as_u16())),
            Err(e) => Err(e.into()),
        }
    }

    /// Poll a job every `poll_interval_seconds` until it reaches a terminal
    /// status or `max_poll_attempts` requests have been made.
    pub async fn wait_for_job(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        for attempt in 1..=self.max_poll_attempts {
            let status = self.job_status(job_id).await?;

            if status.is_terminal() {
                tracing::debug!(job_id, attempt, status = %status.status, "Job finished");
                return Ok(status);
            }

            tracing::trace!(job_id, attempt, status = %status.status, "Job still running");

            if attempt < self.max_poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(ClientError::PollLimitReached {
            job_id: job_id.to_string(),
            attempts: self.max_poll_attempts,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.server_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Configuration("server_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_cookie(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => builder.header(COOKIE, cookie.as_str()),
            None => builder,
        }
    }
}
