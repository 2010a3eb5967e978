use crate::block::{ContentBlock, HeadingLevel};

pub(crate) const FENCE_MARKER: &str = "```";

pub(crate) struct PrefixRule {
    pub prefix: &'static str,
    build: fn(&str) -> ContentBlock,
}

fn heading_3(text: &str) -> ContentBlock {
    ContentBlock::heading(HeadingLevel::H3, text)
}

fn heading_2(text: &str) -> ContentBlock {
    ContentBlock::heading(HeadingLevel::H2, text)
}

fn bullet(text: &str) -> ContentBlock {
    ContentBlock::bullet(text)
}

// Checked in order, first match wins.
pub(crate) const RULES: &[PrefixRule] = &[
    PrefixRule {
        prefix: "### ",
        build: heading_3,
    },
    PrefixRule {
        prefix: "## ",
        build: heading_2,
    },
    PrefixRule {
        prefix: "* ",
        build: bullet,
    },
];

pub(crate) fn is_fence_delimiter(fragment: &str) -> bool {
    fragment.starts_with(FENCE_MARKER)
}

/// Classifies a fragment found outside a code fence. Anything no rule
/// claims passes through untouched as a paragraph.
pub(crate) fn classify(fragment: &str) -> ContentBlock {
    RULES
        .iter()
        .find_map(|rule| fragment.strip_prefix(rule.prefix).map(rule.build))
        .unwrap_or_else(|| ContentBlock::paragraph(fragment))
}
