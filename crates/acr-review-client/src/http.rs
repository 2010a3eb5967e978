use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};

use crate::{
    errors::SubmitError,
    models::{ReviewResult, SubmissionRequest},
    traits::ReviewGateway,
};

pub const DEFAULT_ENDPOINT: &str = "https://automated-code-review-woa.onrender.com/review";

pub struct HttpReviewGateway {
    client: Client,
    uri: String,
}

pub struct HttpReviewGatewayOptions {
    uri: String,
    user_agent: String,
}

impl HttpReviewGatewayOptions {
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }
}

impl Default for HttpReviewGatewayOptions {
    fn default() -> Self {
        Self {
            uri: DEFAULT_ENDPOINT.into(),
            user_agent: format!("acr/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpReviewGateway {
    pub fn new(options: HttpReviewGatewayOptions) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            uri: options.uri,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

#[async_trait]
impl ReviewGateway for HttpReviewGateway {
    async fn submit(&self, request: &SubmissionRequest) -> Result<ReviewResult, SubmitError> {
        tracing::debug!(
            owner = %request.owner,
            repo = %request.repo,
            pr_id = %request.pr_id,
            "posting review request to {}",
            self.uri
        );

        let res = self
            .client
            .post(&self.uri)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(SubmitError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            let error_body = res.text().await.unwrap_or_default();
            tracing::error!("review service returned {}: {}", status, error_body);
            return Err(SubmitError::Status(status));
        }

        let body = res.bytes().await.map_err(SubmitError::Transport)?;
        let result: ReviewResult = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("failed to parse review response: {}", e);
            SubmitError::Body(e)
        })?;

        tracing::info!(
            file = %result.file,
            issues = result.issues.len(),
            "received review"
        );

        Ok(result)
    }
}
