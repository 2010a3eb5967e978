use ratatui::{prelude::*, widgets::Paragraph};

use crate::{components::Component, tui::Frame};

/// A named screen: an optional title line above components laid out side by
/// side.
pub struct Page {
    name: String,
    title: Option<String>,
    components: Vec<Box<dyn Component>>,
}

impl Page {
    pub fn new(name: impl Into<String>, components: Vec<Box<dyn Component>>) -> Self {
        Self {
            name: name.into(),
            title: None,
            components,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(
        &mut self,
        mut apply_fn: impl FnMut(&mut Box<dyn Component>) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        for c in self.components.iter_mut() {
            apply_fn(c)?;
        }

        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) -> anyhow::Result<()> {
        let mut area = frame.size();

        if let Some(title) = &self.title {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Length(1), Constraint::Min(0)])
                .split(area);
            frame.render_widget(
                Paragraph::new(title.as_str())
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .alignment(Alignment::Center),
                rows[0],
            );
            area = rows[1];
        }

        if self.components.is_empty() {
            return Ok(());
        }

        let count = self.components.len() as u32;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                (0..count)
                    .map(|_| Constraint::Ratio(1, count))
                    .collect::<Vec<_>>(),
            )
            .split(area);

        for (c, column) in self.components.iter_mut().zip(columns.iter()) {
            c.draw(frame, *column)?;
        }

        Ok(())
    }
}
