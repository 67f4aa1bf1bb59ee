use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::content::CandidateTest;

use super::driver::SubmissionSink;
use super::state::SubmissionPayload;

#[derive(Debug, Error)]
pub enum SubmitClientError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("test already submitted")]
    AlreadySubmitted,
    #[error("server rejected request with {status}: {detail}")]
    Rejected { status: u16, detail: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Talks to the exam API on behalf of one signed-in candidate.
#[derive(Debug, Clone)]
pub struct HttpSubmitClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpSubmitClient {
    /// `base_url` is the API root, e.g. `https://exams.example.org/api/v1`.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, SubmitClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub async fn start_session(&self, test_id: &str) -> Result<CandidateTest, SubmitClientError> {
        let url = format!("{}/tests/{test_id}/session", self.base_url);
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Returns the server's result object for the submission.
    pub async fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<serde_json::Value, SubmitClientError> {
        let url = format!("{}/submissions", self.base_url);
        let response = self.client.post(&url).bearer_auth(&self.token).json(payload).send().await?;
        Ok(check(response).await?.json().await?)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, SubmitClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::CONFLICT {
        return Err(SubmitClientError::AlreadySubmitted);
    }
    let detail = match response.json::<ErrorBody>().await {
        Ok(body) => body.detail,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(SubmitClientError::Rejected { status: status.as_u16(), detail })
}

#[async_trait]
impl SubmissionSink for HttpSubmitClient {
    async fn deliver(&self, payload: &SubmissionPayload) -> anyhow::Result<()> {
        let result = self.submit(payload).await?;
        tracing::info!(
            test_id = %payload.test_id,
            percentage = result.get("percentage").and_then(|v| v.as_i64()),
            "Submission delivered"
        );
        Ok(())
    }
}
