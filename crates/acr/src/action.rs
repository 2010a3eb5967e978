use acr_review_client::models::ReviewResult;
use chrono::{DateTime, Utc};

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    Error(String),
    Submit,
    ScrollUp,
    ScrollDown,
    Review(ReviewAction),
}

/// Numbers the submissions made from one form, starting at 1.
pub type SubmissionId = u64;

#[derive(Debug, Clone)]
pub enum ReviewAction {
    /// A submit attempt was blocked by empty required fields.
    Invalid,
    EnterProcessing {
        id: SubmissionId,
    },
    Completed {
        result: Box<ReviewResult>,
        received_at: DateTime<Utc>,
    },
    Failed {
        message: String,
    },
    /// Only ends the processing state when `id` is the submission that
    /// entered it.
    ExitProcessing {
        id: SubmissionId,
    },
}

impl PartialEq for ReviewAction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EnterProcessing { id: a }, Self::EnterProcessing { id: b })
            | (Self::ExitProcessing { id: a }, Self::ExitProcessing { id: b }) => a == b,
            _ => matches!(
                (self, other),
                (Self::Invalid, Self::Invalid)
                    | (Self::Completed { .. }, Self::Completed { .. })
                    | (Self::Failed { .. }, Self::Failed { .. })
            ),
        }
    }
}

impl Eq for ReviewAction {}
