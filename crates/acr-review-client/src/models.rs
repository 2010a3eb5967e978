use std::fmt;

use acr_suggestions::ContentBlock;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "JavaScript";

/// Everything the review service needs to review one pull request.
///
/// Built fresh for every submission. The credentials are only ever sent in
/// the request body, and `Debug` output redacts them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub owner: String,
    pub repo: String,
    pub repo_id: String,
    pub pr_id: String,
    pub language: String,
    pub github_token: String,
    pub llm_api_key: String,
}

impl Default for SubmissionRequest {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            repo_id: String::new(),
            pr_id: String::new(),
            language: DEFAULT_LANGUAGE.into(),
            github_token: String::new(),
            llm_api_key: String::new(),
        }
    }
}

impl SubmissionRequest {
    pub fn value(&self, field: RequestField) -> &str {
        match field {
            RequestField::Owner => &self.owner,
            RequestField::Repo => &self.repo,
            RequestField::RepoId => &self.repo_id,
            RequestField::PrId => &self.pr_id,
            RequestField::Language => &self.language,
            RequestField::GithubToken => &self.github_token,
            RequestField::LlmApiKey => &self.llm_api_key,
        }
    }

    pub fn value_mut(&mut self, field: RequestField) -> &mut String {
        match field {
            RequestField::Owner => &mut self.owner,
            RequestField::Repo => &mut self.repo,
            RequestField::RepoId => &mut self.repo_id,
            RequestField::PrId => &mut self.pr_id,
            RequestField::Language => &mut self.language,
            RequestField::GithubToken => &mut self.github_token,
            RequestField::LlmApiKey => &mut self.llm_api_key,
        }
    }
}

impl fmt::Debug for SubmissionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() {
                ""
            } else {
                "<redacted>"
            }
        }

        f.debug_struct("SubmissionRequest")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("repo_id", &self.repo_id)
            .field("pr_id", &self.pr_id)
            .field("language", &self.language)
            .field("github_token", &redact(&self.github_token))
            .field("llm_api_key", &redact(&self.llm_api_key))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestField {
    Owner,
    Repo,
    RepoId,
    PrId,
    Language,
    GithubToken,
    LlmApiKey,
}

impl RequestField {
    pub const ALL: [RequestField; 7] = [
        RequestField::Owner,
        RequestField::Repo,
        RequestField::RepoId,
        RequestField::PrId,
        RequestField::Language,
        RequestField::GithubToken,
        RequestField::LlmApiKey,
    ];

    /// Key used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            RequestField::Owner => "owner",
            RequestField::Repo => "repo",
            RequestField::RepoId => "repo_id",
            RequestField::PrId => "pr_id",
            RequestField::Language => "language",
            RequestField::GithubToken => "github_token",
            RequestField::LlmApiKey => "llm_api_key",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequestField::Owner => "Repository Owner",
            RequestField::Repo => "Repository Name",
            RequestField::RepoId => "Repository ID",
            RequestField::PrId => "PR ID",
            RequestField::Language => "Language",
            RequestField::GithubToken => "GitHub Token",
            RequestField::LlmApiKey => "LLM API Key",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            RequestField::Owner => "e.g., krishnaag23",
            RequestField::Repo => "e.g., automated-code-review-woa",
            RequestField::RepoId => "e.g., 1",
            RequestField::PrId => "e.g., 1",
            RequestField::Language => DEFAULT_LANGUAGE,
            RequestField::GithubToken => "Enter your GitHub token",
            RequestField::LlmApiKey => "Enter your LLM API key",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, RequestField::Language)
    }

    pub fn is_secret(self) -> bool {
        matches!(self, RequestField::GithubToken | RequestField::LlmApiKey)
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub file: String,
    pub complexity: f64,
    pub issues: Vec<Issue>,
    #[serde(
        rename = "aiSuggestions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_suggestions: Option<Vec<String>>,
}

impl ReviewResult {
    pub fn rating(&self) -> ComplexityRating {
        ComplexityRating::from_score(self.complexity)
    }

    /// Parses `aiSuggestions` into content blocks. `None` when the service
    /// sent no suggestions at all.
    pub fn suggestion_blocks(&self) -> Option<Vec<ContentBlock>> {
        self.ai_suggestions
            .as_ref()
            .map(|fragments| acr_suggestions::parse(fragments))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityRating {
    Optimal,
    Moderate,
    High,
}

impl ComplexityRating {
    pub fn from_score(score: f64) -> Self {
        if score == 0.0 {
            ComplexityRating::Optimal
        } else if score < 5.0 {
            ComplexityRating::Moderate
        } else {
            ComplexityRating::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Issue category. Categories this client does not know about are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueKind {
    Security,
    Lint,
    CodeSmell,
    Other(String),
}

impl IssueKind {
    pub fn as_str(&self) -> &str {
        match self {
            IssueKind::Security => "security",
            IssueKind::Lint => "lint",
            IssueKind::CodeSmell => "codesmell",
            IssueKind::Other(other) => other,
        }
    }
}

impl From<String> for IssueKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "security" => IssueKind::Security,
            "lint" => IssueKind::Lint,
            "codesmell" => IssueKind::CodeSmell,
            _ => IssueKind::Other(value),
        }
    }
}

impl From<IssueKind> for String {
    fn from(kind: IssueKind) -> Self {
        match kind {
            IssueKind::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
