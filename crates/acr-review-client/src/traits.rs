use async_trait::async_trait;

use crate::{
    errors::SubmitError,
    models::{ReviewResult, SubmissionRequest},
};

/// One-shot exchange with the review service.
///
/// Implementations submit whatever they are given: validation is the
/// caller's job. Every call is exactly one attempt.
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    async fn submit(&self, request: &SubmissionRequest) -> Result<ReviewResult, SubmitError>;
}
