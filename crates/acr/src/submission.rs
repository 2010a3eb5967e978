use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use acr_review_client::{
    errors::SubmitError,
    models::{ReviewResult, SubmissionRequest},
    ReviewClient,
};
use tokio::sync::oneshot;

pub type SubmissionOutcome = Result<ReviewResult, SubmitError>;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("a review submission is already in progress")]
pub struct SubmissionBusy;

/// Runs review submissions one at a time.
///
/// Clones share the busy flag, so a form and any background task holding a
/// clone see the same state. There is no cancellation: a submission that
/// never completes keeps the submitter busy.
#[derive(Clone)]
pub struct ReviewSubmitter {
    client: ReviewClient,
    busy: Arc<AtomicBool>,
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ReviewSubmitter {
    pub fn new(client: ReviewClient) -> Self {
        Self {
            client,
            busy: Arc::default(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn run(
        &self,
        request: SubmissionRequest,
    ) -> Result<oneshot::Receiver<SubmissionOutcome>, SubmissionBusy> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SubmissionBusy);
        }
        let guard = BusyGuard(self.busy.clone());

        let client = self.client.clone();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            tracing::info!(?request, "submitting review request");
            let outcome = client.submit(&request).await;
            if let Err(e) = &outcome {
                tracing::error!("review submission failed: {e}");
            }

            // clear the flag before the outcome is observable
            drop(guard);

            if tx.send(outcome).is_err() {
                tracing::debug!("submission outcome was not awaited");
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use acr_review_client::{
        errors::SubmitError,
        models::{ReviewResult, SubmissionRequest},
        traits::ReviewGateway,
        ReviewClient, StatusCode,
    };
    use async_trait::async_trait;
    use tokio::sync::Notify;

    pub fn sample_result(file: &str) -> ReviewResult {
        ReviewResult {
            file: file.into(),
            complexity: 2.0,
            issues: Vec::new(),
            ai_suggestions: Some(vec!["## Summary".into(), "Looks good.".into()]),
        }
    }

    /// Gateway answering with canned outcomes, optionally held until
    /// `release` is notified.
    pub struct FakeGateway {
        pub calls: AtomicUsize,
        pub gate: Option<Arc<Notify>>,
        pub fail_with_status: Option<StatusCode>,
    }

    impl FakeGateway {
        pub fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: None,
                fail_with_status: None,
            })
        }

        pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Some(gate),
                fail_with_status: None,
            })
        }

        pub fn failing(status: StatusCode) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: None,
                fail_with_status: Some(status),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn client(self: &Arc<Self>) -> ReviewClient {
            ReviewClient::new(self.clone())
        }
    }

    #[async_trait]
    impl ReviewGateway for FakeGateway {
        async fn submit(&self, request: &SubmissionRequest) -> Result<ReviewResult, SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            match self.fail_with_status {
                Some(status) => Err(SubmitError::Status(status)),
                None => Ok(sample_result(&format!("{}/{}", request.owner, request.repo))),
            }
        }
    }

    pub fn filled_request() -> SubmissionRequest {
        SubmissionRequest {
            owner: "krishnaag23".into(),
            repo: "automated-code-review-woa".into(),
            repo_id: "1".into(),
            pr_id: "1".into(),
            github_token: "ghp_token".into(),
            llm_api_key: "sk-key".into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use acr_review_client::StatusCode;
    use tokio::sync::Notify;

    use super::{test_support::*, *};

    #[tokio::test]
    async fn test_submits_and_clears_busy_flag() -> anyhow::Result<()> {
        let gateway = FakeGateway::ok();
        let submitter = ReviewSubmitter::new(gateway.client());

        let outcome = submitter.run(filled_request())?.await?;

        assert_eq!("krishnaag23/automated-code-review-woa", outcome?.file);
        assert_eq!(1, gateway.calls());
        assert!(!submitter.is_busy());

        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_overlapping_submissions() -> anyhow::Result<()> {
        let gate = Arc::new(Notify::new());
        let gateway = FakeGateway::gated(gate.clone());
        let submitter = ReviewSubmitter::new(gateway.client());
        let other_handle = submitter.clone();

        let pending = submitter.run(filled_request())?;

        assert!(submitter.is_busy());
        assert!(other_handle.is_busy());
        assert_eq!(Err(SubmissionBusy), other_handle.run(filled_request()).map(|_| ()));

        gate.notify_one();
        pending.await??;

        assert!(!submitter.is_busy());
        let second = other_handle.run(filled_request())?;
        gate.notify_one();
        second.await??;

        assert_eq!(2, gateway.calls());

        Ok(())
    }

    #[tokio::test]
    async fn test_failure_clears_busy_flag() -> anyhow::Result<()> {
        let gateway = FakeGateway::failing(StatusCode::INTERNAL_SERVER_ERROR);
        let submitter = ReviewSubmitter::new(gateway.client());

        let outcome = submitter.run(filled_request())?.await?;

        let err = outcome.unwrap_err();
        assert!(err.user_message().contains("500"));
        assert!(!submitter.is_busy());

        Ok(())
    }
}
