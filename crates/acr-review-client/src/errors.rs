#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("HTTP error! status: {0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid review response: {0}")]
    Body(#[source] serde_json::Error),
}

impl SubmitError {
    /// Single line shown to the user in place of a result.
    pub fn user_message(&self) -> String {
        format!("Failed to fetch: {self}")
    }
}
