use std::io::Write;

use acr_review_client::models::{ComplexityRating, ReviewResult};
use acr_suggestions::{to_fragments, ContentBlock};
use serde::Serialize;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// JSON output: the response as received plus its parsed suggestion blocks.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a ReviewResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<Vec<ContentBlock>>,
}

pub fn complexity_label(result: &ReviewResult) -> String {
    match result.rating() {
        ComplexityRating::Optimal => "Optimal".into(),
        ComplexityRating::Moderate => format!("{} (moderate)", result.complexity),
        ComplexityRating::High => format!("{} (high)", result.complexity),
    }
}

pub fn write_report<W: Write>(
    w: &mut W,
    result: &ReviewResult,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => write_text(w, result),
        OutputFormat::Markdown => write_markdown(w, result),
        OutputFormat::Json => {
            let report = JsonReport {
                result,
                suggestions: result.suggestion_blocks(),
            };
            serde_json::to_writer_pretty(&mut *w, &report)?;
            writeln!(w)?;
            Ok(())
        }
    }
}

fn write_text<W: Write>(w: &mut W, result: &ReviewResult) -> anyhow::Result<()> {
    writeln!(w, "File: {}", result.file)?;
    writeln!(w, "Complexity Score: {}", complexity_label(result))?;
    writeln!(w)?;
    writeln!(w, "Issues Found ({})", result.issues.len())?;
    for issue in &result.issues {
        match issue.line {
            Some(line) => writeln!(w, "  [{}] {} (Line {line})", issue.kind, issue.message)?,
            None => writeln!(w, "  [{}] {}", issue.kind, issue.message)?,
        }
    }

    if let Some(blocks) = result.suggestion_blocks() {
        writeln!(w)?;
        writeln!(w, "AI Analysis & Suggestions")?;
        for block in &blocks {
            let text = block.text();
            match block {
                ContentBlock::Heading { .. } => writeln!(w, "\n{text}")?,
                ContentBlock::BulletItem { .. } => writeln!(w, "  • {text}")?,
                ContentBlock::CodeBlock { .. } => {
                    for line in text.split('\n') {
                        writeln!(w, "    {line}")?;
                    }
                }
                ContentBlock::Paragraph { .. } => writeln!(w, "{text}")?,
            }
        }
    }

    Ok(())
}

fn write_markdown<W: Write>(w: &mut W, result: &ReviewResult) -> anyhow::Result<()> {
    writeln!(w, "# Review of `{}`", result.file)?;
    writeln!(w)?;
    writeln!(w, "**Complexity Score:** {}", complexity_label(result))?;
    writeln!(w)?;
    writeln!(w, "## Issues Found ({})", result.issues.len())?;
    writeln!(w)?;
    for issue in &result.issues {
        match issue.line {
            Some(line) => writeln!(w, "* **{}** {} (line {line})", issue.kind, issue.message)?,
            None => writeln!(w, "* **{}** {}", issue.kind, issue.message)?,
        }
    }

    if let Some(blocks) = result.suggestion_blocks() {
        writeln!(w)?;
        writeln!(w, "## AI Analysis & Suggestions")?;
        writeln!(w)?;
        for fragment in to_fragments(&blocks) {
            writeln!(w, "{fragment}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use acr_review_client::models::{Issue, IssueKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn result() -> ReviewResult {
        ReviewResult {
            file: "src/index.js".into(),
            complexity: 3.0,
            issues: vec![
                Issue {
                    kind: IssueKind::Security,
                    message: "eval used".into(),
                    line: Some(12),
                },
                Issue {
                    kind: IssueKind::Other("performance".into()),
                    message: "slow loop".into(),
                    line: None,
                },
            ],
            ai_suggestions: Some(vec![
                "## Summary".into(),
                "* Avoid eval".into(),
                "```js".into(),
                "run(x);".into(),
                "```".into(),
            ]),
        }
    }

    fn render(result: &ReviewResult, format: OutputFormat) -> anyhow::Result<String> {
        let mut out = Vec::new();
        write_report(&mut out, result, format)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_text_report() -> anyhow::Result<()> {
        let text = render(&result(), OutputFormat::Text)?;

        assert_eq!(
            "File: src/index.js
Complexity Score: 3 (moderate)

Issues Found (2)
  [security] eval used (Line 12)
  [performance] slow loop

AI Analysis & Suggestions

Summary
  • Avoid eval
    run(x);
",
            text
        );

        Ok(())
    }

    #[test]
    fn test_markdown_report_reparses_to_same_blocks() -> anyhow::Result<()> {
        let markdown = render(&result(), OutputFormat::Markdown)?;

        let suggestions = markdown
            .split_once("## AI Analysis & Suggestions\n\n")
            .map(|(_, rest)| rest)
            .ok_or(anyhow::anyhow!("missing suggestions section"))?;
        let reparsed = acr_suggestions::parse(suggestions.lines());

        assert!(markdown.contains("* **security** eval used (line 12)"));
        assert_eq!(result().suggestion_blocks(), Some(reparsed));

        Ok(())
    }

    #[test]
    fn test_json_report() -> anyhow::Result<()> {
        let json = render(&result(), OutputFormat::Json)?;

        let parsed: ReviewResult = serde_json::from_str(&json)?;
        assert_eq!(result(), parsed);

        Ok(())
    }

    #[test]
    fn test_json_report_includes_parsed_suggestions() -> anyhow::Result<()> {
        let json: serde_json::Value = serde_json::from_str(&render(&result(), OutputFormat::Json)?)?;

        assert_eq!(
            serde_json::json!([
                { "type": "heading", "level": 2, "text": "Summary" },
                { "type": "bullet_item", "text": "Avoid eval" },
                { "type": "code_block", "text": "run(x);" },
            ]),
            json["suggestions"]
        );
        assert_eq!(serde_json::json!("src/index.js"), json["file"]);

        Ok(())
    }

    #[test]
    fn test_json_report_omits_suggestions_when_absent() -> anyhow::Result<()> {
        let mut result = result();
        result.ai_suggestions = None;

        let json: serde_json::Value = serde_json::from_str(&render(&result, OutputFormat::Json)?)?;

        assert_eq!(None, json.get("suggestions"));
        assert_eq!(None, json.get("aiSuggestions"));

        Ok(())
    }

    #[test]
    fn test_optimal_label() {
        let mut result = result();
        result.complexity = 0.0;

        assert_eq!("Optimal", complexity_label(&result));
    }
}
