use acr_suggestions::{ContentBlock, HeadingLevel};
use ratatui::prelude::*;

pub fn block_lines(blocks: &[ContentBlock]) -> Vec<Line<'static>> {
    blocks.iter().flat_map(block_to_lines).collect()
}

fn block_to_lines(block: &ContentBlock) -> Vec<Line<'static>> {
    match block {
        ContentBlock::Heading {
            level: HeadingLevel::H2,
            text,
        } => vec![
            Line::default(),
            Line::styled(
                text.clone(),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
        ],
        ContentBlock::Heading {
            level: HeadingLevel::H3,
            text,
        } => vec![Line::styled(
            text.clone(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )],
        ContentBlock::BulletItem { text } => vec![Line::from(vec![
            Span::styled("  • ", Style::default().fg(Color::Cyan)),
            Span::raw(text.clone()),
        ])],
        ContentBlock::CodeBlock { text } => {
            let style = Style::default().fg(Color::Gray).bg(Color::Black);
            text.split('\n')
                .map(|line| Line::styled(format!("  {line}"), style))
                .collect()
        }
        ContentBlock::Paragraph { text } => vec![Line::raw(text.clone())],
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_renders_each_block_kind() {
        let blocks = acr_suggestions::parse([
            "## Summary",
            "### Details",
            "* Avoid eval",
            "```js",
            "let a = 1;",
            "let b = 2;",
            "```",
            "Plain text",
        ]);

        let lines = block_lines(&blocks)
            .iter()
            .map(plain)
            .collect::<Vec<_>>();

        assert_eq!(
            vec![
                "",
                "Summary",
                "Details",
                "  • Avoid eval",
                "  let a = 1;",
                "  let b = 2;",
                "Plain text",
            ],
            lines
        );
    }

    #[test]
    fn test_empty_code_block_renders_one_line() {
        let lines = block_lines(&[ContentBlock::code("")]);

        assert_eq!(1, lines.len());
    }
}
