use acr_review_client::models::RequestField;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    action::{Action, ReviewAction, SubmissionId},
    form::{ReviewForm, FORM_FIELDS},
    submission::ReviewSubmitter,
};

use super::Component;

pub struct ReviewFormView {
    form: ReviewForm,
    submitter: ReviewSubmitter,
    action_tx: Option<UnboundedSender<Action>>,
    last_submission: SubmissionId,
    processing: Option<SubmissionId>,
}

impl ReviewFormView {
    pub fn new(form: ReviewForm, submitter: ReviewSubmitter) -> Self {
        Self {
            form,
            submitter,
            action_tx: None,
            last_submission: 0,
            processing: None,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_some()
    }

    fn schedule_submit(&mut self) -> anyhow::Result<Option<Action>> {
        if self.submitter.is_busy() {
            tracing::debug!("submission already in progress, ignoring submit");
            return Ok(None);
        }

        let request = match self.form.submit() {
            Ok(request) => request,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "form has invalid fields");
                return Ok(Some(Action::Review(ReviewAction::Invalid)));
            }
        };

        let tx = self
            .action_tx
            .clone()
            .ok_or(anyhow::anyhow!("action handler was not registered"))?;

        let outcome = match self.submitter.run(request) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!("{e}");
                return Ok(None);
            }
        };

        self.last_submission += 1;
        let id = self.last_submission;

        tx.send(Action::Review(ReviewAction::EnterProcessing { id }))?;
        tokio::spawn(async move {
            let action = match outcome.await {
                Ok(Ok(result)) => ReviewAction::Completed {
                    result: Box::new(result),
                    received_at: Utc::now(),
                },
                Ok(Err(e)) => ReviewAction::Failed {
                    message: e.user_message(),
                },
                Err(e) => ReviewAction::Failed {
                    message: format!("Failed to fetch: {e}"),
                },
            };

            for action in [action, ReviewAction::ExitProcessing { id }] {
                if tx.send(Action::Review(action)).is_err() {
                    tracing::debug!("action channel closed before review finished");
                    break;
                }
            }
        });

        Ok(None)
    }

    fn field_lines(&self, field: RequestField) -> Vec<Line<'static>> {
        let focused = self.form.focused() == field;

        let mut label = vec![Span::styled(
            field.label(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if field.is_required() {
            label.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }

        let marker = if focused { "> " } else { "  " };
        let value = self.form.display_value(field);
        let mut input = vec![Span::raw(marker)];
        if value.is_empty() && !focused {
            input.push(Span::styled(
                field.placeholder(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            input.push(Span::raw(value));
        }
        if focused {
            input.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
        }

        let mut lines = vec![Line::from(label), Line::from(input)];
        if let Some(error) = self.form.field_error(field) {
            lines.push(Line::styled(
                format!("  {error}"),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::default());

        lines
    }
}

impl Component for ReviewFormView {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> anyhow::Result<()> {
        self.action_tx = Some(tx);

        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> anyhow::Result<Option<Action>> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Enter => return Ok(Some(Action::Submit)),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.form.input(c)
            }
            _ => {}
        }

        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> anyhow::Result<Option<Action>> {
        self.form.paste(text);

        Ok(None)
    }

    fn update(&mut self, action: Action) -> anyhow::Result<Option<Action>> {
        match action {
            Action::Submit => return self.schedule_submit(),
            Action::Review(ReviewAction::EnterProcessing { id }) => self.processing = Some(id),
            Action::Review(ReviewAction::ExitProcessing { id }) if self.processing == Some(id) => {
                self.processing = None
            }
            _ => {}
        }

        Ok(None)
    }

    fn draw(&mut self, f: &mut crate::tui::Frame<'_>, area: Rect) -> anyhow::Result<()> {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let lines = FORM_FIELDS
            .iter()
            .flat_map(|&field| self.field_lines(field))
            .collect::<Vec<_>>();

        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Line::from("[ Review Request ]")),
            ),
            layout[0],
        );

        let button = if self.is_processing() {
            Paragraph::new("Analyzing Code...").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new("Submit for Review  (enter)")
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        };
        f.render_widget(
            button
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            layout[1],
        );

        Ok(())
    }
}
