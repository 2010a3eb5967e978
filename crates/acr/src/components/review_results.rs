use acr_review_client::models::{ComplexityRating, IssueKind, ReviewResult};
use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};
use timeago::Formatter;

use crate::action::{Action, ReviewAction, SubmissionId};

use super::{suggestions, Component};

const INVALID_FORM_MESSAGE: &str = "Please fill in all required fields correctly.";

#[derive(Default)]
pub struct ReviewResultsView {
    result: Option<(ReviewResult, DateTime<Utc>)>,
    error: Option<String>,
    processing: Option<SubmissionId>,
    scroll: u16,
}

impl ReviewResultsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> Option<&ReviewResult> {
        self.result.as_ref().map(|(result, _)| result)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_some()
    }

    fn result_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.is_processing() {
            lines.push(Line::styled(
                "Analyzing Code...",
                Style::default().fg(Color::Cyan),
            ));
            lines.push(Line::default());
        }

        if let Some(error) = &self.error {
            lines.push(Line::styled(
                error.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::default());
        }

        match &self.result {
            Some((result, received_at)) => lines.extend(render_result(result, *received_at)),
            None if self.error.is_none() && !self.is_processing() => lines.push(Line::styled(
                "Fill in the form and submit a pull request to see its review here.",
                Style::default().fg(Color::DarkGray),
            )),
            None => {}
        }

        lines
    }
}

fn complexity_color(rating: ComplexityRating) -> Color {
    match rating {
        ComplexityRating::Optimal => Color::Green,
        ComplexityRating::Moderate => Color::Yellow,
        ComplexityRating::High => Color::Red,
    }
}

fn issue_badge(kind: &IssueKind) -> Span<'static> {
    let color = match kind {
        IssueKind::Security => Color::Red,
        IssueKind::Lint => Color::Yellow,
        IssueKind::CodeSmell => Color::Magenta,
        IssueKind::Other(_) => Color::Gray,
    };

    Span::styled(
        format!("[{kind}]"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_result(result: &ReviewResult, received_at: DateTime<Utc>) -> Vec<Line<'static>> {
    let section = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let formatter = Formatter::new();

    let rating = result.rating();
    let score = match rating {
        ComplexityRating::Optimal => "Optimal".to_string(),
        _ => result.complexity.to_string(),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("File: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(result.file.clone()),
        ]),
        Line::from(vec![
            Span::styled(
                "Complexity Score: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(score, Style::default().fg(complexity_color(rating))),
        ]),
        Line::styled(
            format!("received {}", formatter.convert_chrono(received_at, Utc::now())),
            Style::default().fg(Color::DarkGray),
        ),
        Line::default(),
        Line::styled(format!("Issues Found ({})", result.issues.len()), section),
    ];

    if result.issues.is_empty() {
        lines.push(Line::styled(
            "  No issues found",
            Style::default().fg(Color::Green),
        ));
    }
    for issue in &result.issues {
        let mut spans = vec![Span::raw("  "), issue_badge(&issue.kind), Span::raw(" ")];
        spans.push(Span::raw(issue.message.clone()));
        if let Some(line) = issue.line {
            spans.push(Span::styled(
                format!("  (Line {line})"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }

    if let Some(blocks) = result.suggestion_blocks() {
        lines.push(Line::default());
        lines.push(Line::styled("AI Analysis & Suggestions", section));
        lines.extend(suggestions::block_lines(&blocks));
    }

    lines
}

impl Component for ReviewResultsView {
    fn update(&mut self, action: Action) -> anyhow::Result<Option<Action>> {
        match action {
            Action::Review(review) => match review {
                ReviewAction::Invalid => self.error = Some(INVALID_FORM_MESSAGE.into()),
                ReviewAction::EnterProcessing { id } => {
                    self.error = None;
                    self.processing = Some(id);
                }
                ReviewAction::Completed {
                    result,
                    received_at,
                } => {
                    tracing::info!(file = %result.file, "review received");
                    self.result = Some((*result, received_at));
                    self.error = None;
                    self.scroll = 0;
                }
                ReviewAction::Failed { message } => {
                    tracing::warn!("review failed: {message}");
                    self.error = Some(message);
                }
                ReviewAction::ExitProcessing { id } => {
                    if self.processing == Some(id) {
                        self.processing = None;
                    }
                }
            },
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(5),
            Action::ScrollDown => self.scroll = self.scroll.saturating_add(5),
            _ => {}
        }

        Ok(None)
    }

    fn draw(&mut self, f: &mut crate::tui::Frame<'_>, area: Rect) -> anyhow::Result<()> {
        let paragraph = Paragraph::new(self.result_lines())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Line::from("[ Review Results ]"))
                    .title(
                        block::Title::from(Line::from("[ pgup/pgdn to scroll ]"))
                            .alignment(Alignment::Right),
                    ),
            );

        f.render_widget(paragraph, area);

        Ok(())
    }
}
