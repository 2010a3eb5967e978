use serde::Serialize;

use crate::rules::FENCE_MARKER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            HeadingLevel::H2 => "## ",
            HeadingLevel::H3 => "### ",
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.depth()
    }
}

/// One classified unit of suggestion output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: HeadingLevel, text: String },
    BulletItem { text: String },
    /// Raw code with the fence delimiter lines removed.
    CodeBlock { text: String },
    Paragraph { text: String },
}

impl ContentBlock {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Self::BulletItem { text: text.into() }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::CodeBlock { text: text.into() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            ContentBlock::Heading { text, .. }
            | ContentBlock::BulletItem { text }
            | ContentBlock::CodeBlock { text }
            | ContentBlock::Paragraph { text } => text,
        }
    }

    /// Turns the block back into the fragments that would produce it.
    ///
    /// Code blocks come back wrapped in bare fences, one fragment per line.
    pub fn to_fragment_lines(&self) -> Vec<String> {
        match self {
            ContentBlock::Heading { level, text } => vec![format!("{}{}", level.prefix(), text)],
            ContentBlock::BulletItem { text } => vec![format!("* {text}")],
            ContentBlock::Paragraph { text } => vec![text.clone()],
            ContentBlock::CodeBlock { text } => {
                let mut lines = vec![FENCE_MARKER.to_string()];
                if !text.is_empty() {
                    lines.extend(text.split('\n').map(str::to_string));
                }
                lines.push(FENCE_MARKER.to_string());
                lines
            }
        }
    }
}
