use std::collections::HashSet;

use acr_review_client::{
    models::{RequestField, SubmissionRequest},
    validate_field, ValidationErrors,
};

use crate::application_config::ApplicationConfig;

/// Inputs shown in the form, in focus order. `language` is not editable and
/// comes from configuration.
pub const FORM_FIELDS: [RequestField; 6] = [
    RequestField::Owner,
    RequestField::Repo,
    RequestField::RepoId,
    RequestField::PrId,
    RequestField::GithubToken,
    RequestField::LlmApiKey,
];

#[derive(Debug, Clone, Default)]
pub struct ReviewForm {
    request: SubmissionRequest,
    touched: HashSet<RequestField>,
    focus: usize,
}

impl ReviewForm {
    pub fn new(request: SubmissionRequest) -> Self {
        Self {
            request,
            ..Default::default()
        }
    }

    pub fn from_config(config: &ApplicationConfig) -> Self {
        Self::new(SubmissionRequest {
            language: config.language().to_string(),
            github_token: config.github_token.clone().unwrap_or_default(),
            llm_api_key: config.llm_api_key.clone().unwrap_or_default(),
            ..Default::default()
        })
    }

    pub fn value(&self, field: RequestField) -> &str {
        self.request.value(field)
    }

    pub fn set(&mut self, field: RequestField, value: impl Into<String>) {
        *self.request.value_mut(field) = value.into();
    }

    pub fn focused(&self) -> RequestField {
        FORM_FIELDS[self.focus % FORM_FIELDS.len()]
    }

    pub fn focus_next(&mut self) {
        self.blur();
        self.focus = (self.focus + 1) % FORM_FIELDS.len();
    }

    pub fn focus_prev(&mut self) {
        self.blur();
        self.focus = (self.focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    fn blur(&mut self) {
        self.touched.insert(self.focused());
    }

    pub fn input(&mut self, c: char) {
        let field = self.focused();
        self.request.value_mut(field).push(c);
    }

    /// Pasted text is single line; newlines are dropped.
    pub fn paste(&mut self, text: &str) {
        let field = self.focused();
        self.request
            .value_mut(field)
            .extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        self.request.value_mut(field).pop();
    }

    pub fn is_touched(&self, field: RequestField) -> bool {
        self.touched.contains(&field)
    }

    /// Error for a field, only once the user has left it or tried to submit.
    pub fn field_error(&self, field: RequestField) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }

        validate_field(field, self.value(field))
    }

    /// Marks every field touched and hands back a snapshot of the request
    /// when all required fields are filled in.
    pub fn submit(&mut self) -> Result<SubmissionRequest, ValidationErrors> {
        self.touched.extend(FORM_FIELDS);
        self.request.validate()?;

        Ok(self.request.clone())
    }

    pub fn display_value(&self, field: RequestField) -> String {
        let value = self.value(field);
        if field.is_secret() {
            "•".repeat(value.chars().count())
        } else {
            value.to_string()
        }
    }
}
