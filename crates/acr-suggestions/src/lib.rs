//! Reassembles the loosely formatted suggestion fragments returned by the
//! review service into typed content blocks.
//!
//! Each fragment is classified on its own by prefix, except for fenced code:
//! a fragment starting with three backticks opens a fence, and every fragment
//! up to the next delimiter is collected verbatim into a single code block.
//! A delimiter fragment spanning several lines contributes the lines after its
//! marker to the fence.

mod block;
mod fence;
mod rules;

pub use block::{ContentBlock, HeadingLevel};
pub use fence::{SuggestionParser, UnterminatedFence};

/// Parses fragments with the default [`UnterminatedFence::Flush`] policy.
pub fn parse<I, S>(fragments: I) -> Vec<ContentBlock>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_with(fragments, UnterminatedFence::default())
}

pub fn parse_with<I, S>(fragments: I, policy: UnterminatedFence) -> Vec<ContentBlock>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = SuggestionParser::new(policy);

    let mut blocks = fragments
        .into_iter()
        .flat_map(|fragment| parser.push(fragment.as_ref()))
        .collect::<Vec<_>>();
    blocks.extend(parser.finish());

    blocks
}

/// Inverse of [`parse`] for well formed blocks.
pub fn to_fragments(blocks: &[ContentBlock]) -> Vec<String> {
    blocks.iter().flat_map(ContentBlock::to_fragment_lines).collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parses_mixed_review_suggestions() {
        let blocks = parse([
            "## Summary",
            "* Add null check",
            "```",
            "const x = 1;",
            "```",
            "Looks good overall.",
        ]);

        assert_eq!(
            vec![
                ContentBlock::heading(HeadingLevel::H2, "Summary"),
                ContentBlock::bullet("Add null check"),
                ContentBlock::code("const x = 1;"),
                ContentBlock::paragraph("Looks good overall."),
            ],
            blocks
        );
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(Vec::<ContentBlock>::new(), parse(Vec::<String>::new()));
    }

    #[test]
    fn test_one_block_per_fragment_without_fences() {
        let fragments = [
            "### Readability",
            "* Rename `tmp`",
            "## Security",
            "Plain prose",
            "* Validate input",
        ];

        let blocks = parse(fragments);

        assert_eq!(fragments.len(), blocks.len());
        assert_eq!(
            vec![
                ContentBlock::heading(HeadingLevel::H3, "Readability"),
                ContentBlock::bullet("Rename `tmp`"),
                ContentBlock::heading(HeadingLevel::H2, "Security"),
                ContentBlock::paragraph("Plain prose"),
                ContentBlock::bullet("Validate input"),
            ],
            blocks
        );
    }

    #[test]
    fn test_fence_content_is_never_reclassified() {
        let blocks = parse(["```", "## not a heading", "* not a bullet", "plain", "```"]);

        assert_eq!(
            vec![ContentBlock::code("## not a heading\n* not a bullet\nplain")],
            blocks
        );
    }

    #[test]
    fn test_language_tag_is_discarded() {
        let blocks = parse(["```typescript", "let a: number = 1;", "```"]);

        assert_eq!(vec![ContentBlock::code("let a: number = 1;")], blocks);
    }

    #[test]
    fn test_closing_delimiter_with_trailing_text_still_closes() {
        let blocks = parse(["```", "x", "```js", "after"]);

        assert_eq!(
            vec![ContentBlock::code("x"), ContentBlock::paragraph("after")],
            blocks
        );
    }

    #[test]
    fn test_multiline_fence_fragment_keeps_code() {
        let blocks = parse(["```js\nconst a = 1;\n```", "Looks good."]);

        assert_eq!(
            vec![
                ContentBlock::code("const a = 1;"),
                ContentBlock::paragraph("Looks good."),
            ],
            blocks
        );
    }

    #[test]
    fn test_multiline_opening_fragment_continues_until_closing_delimiter() {
        let blocks = parse(["```js\nconst a = 1;", "const b = 2;", "```", "## Next"]);

        assert_eq!(
            vec![
                ContentBlock::code("const a = 1;\nconst b = 2;"),
                ContentBlock::heading(HeadingLevel::H2, "Next"),
            ],
            blocks
        );
    }

    #[test]
    fn test_empty_fence_yields_empty_code_block() {
        assert_eq!(vec![ContentBlock::code("")], parse(["```", "```"]));
    }

    #[test]
    fn test_multiple_and_adjacent_code_blocks() {
        let blocks = parse([
            "```", "first", "```", "```", "second", "third", "```", "## Next",
        ]);

        assert_eq!(
            vec![
                ContentBlock::code("first"),
                ContentBlock::code("second\nthird"),
                ContentBlock::heading(HeadingLevel::H2, "Next"),
            ],
            blocks
        );
    }

    #[test]
    fn test_adjacent_headings_stay_separate() {
        let blocks = parse(["## One", "### Two", "## Three"]);

        assert_eq!(
            vec![
                ContentBlock::heading(HeadingLevel::H2, "One"),
                ContentBlock::heading(HeadingLevel::H3, "Two"),
                ContentBlock::heading(HeadingLevel::H2, "Three"),
            ],
            blocks
        );
    }

    #[test]
    fn test_code_block_takes_position_of_opening_delimiter() {
        let blocks = parse(["before", "```", "code", "```", "after"]);

        assert_eq!(
            vec![
                ContentBlock::paragraph("before"),
                ContentBlock::code("code"),
                ContentBlock::paragraph("after"),
            ],
            blocks
        );
    }

    #[test]
    fn test_unterminated_fence_policies() {
        let fragments = ["## Fix", "```", "fn main() {}", "* still code"];

        assert_eq!(
            vec![
                ContentBlock::heading(HeadingLevel::H2, "Fix"),
                ContentBlock::code("fn main() {}\n* still code"),
            ],
            parse(fragments)
        );
        assert_eq!(
            vec![ContentBlock::heading(HeadingLevel::H2, "Fix")],
            parse_with(fragments, UnterminatedFence::Drop)
        );
    }

    #[test]
    fn test_reparsing_serialized_blocks_keeps_classification() {
        let fragments = [
            "## Summary",
            "### Details",
            "* Item",
            "Prose with **bold**",
            "```rust",
            "let x = 1;",
            "",
            "let y = 2;",
            "```",
        ];

        let blocks = parse(fragments);
        let reparsed = parse(to_fragments(&blocks));

        assert_eq!(blocks, reparsed);
    }

    #[test]
    fn test_parse_accepts_owned_strings() {
        let fragments = vec!["* one".to_string(), "two".to_string()];

        assert_eq!(
            vec![ContentBlock::bullet("one"), ContentBlock::paragraph("two")],
            parse(&fragments)
        );
    }
}
