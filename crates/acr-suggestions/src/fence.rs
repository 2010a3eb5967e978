use crate::{
    block::ContentBlock,
    rules::{classify, is_fence_delimiter},
};

/// What to do with a code fence that is still open when the input ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnterminatedFence {
    /// Emit whatever was collected as a code block.
    #[default]
    Flush,
    /// Emit nothing for the open fence.
    Drop,
}

#[derive(Debug, Default)]
enum FenceState {
    #[default]
    Outside,
    InsideFence {
        lines: Vec<String>,
    },
}

/// Incremental form of [`crate::parse`]: feed fragments one at a time with
/// [`SuggestionParser::push`] and close the stream with
/// [`SuggestionParser::finish`].
#[derive(Debug, Default)]
pub struct SuggestionParser {
    state: FenceState,
    policy: UnterminatedFence,
}

impl SuggestionParser {
    pub fn new(policy: UnterminatedFence) -> Self {
        Self {
            state: FenceState::Outside,
            policy,
        }
    }

    pub fn is_inside_fence(&self) -> bool {
        matches!(self.state, FenceState::InsideFence { .. })
    }

    /// Feeds one fragment and returns the blocks it completes.
    ///
    /// A fragment that starts with a fence marker is read line by line, so
    /// code carried after the marker (`"```js\nlet a = 1;\n```"`) is kept.
    /// Any other fragment counts as a single line.
    pub fn push(&mut self, fragment: &str) -> Vec<ContentBlock> {
        if !is_fence_delimiter(fragment) {
            return self.push_line(fragment).into_iter().collect();
        }

        fragment
            .lines()
            .filter_map(|line| self.push_line(line))
            .collect()
    }

    fn push_line(&mut self, line: &str) -> Option<ContentBlock> {
        let delimiter = is_fence_delimiter(line);

        if let FenceState::InsideFence { lines } = &mut self.state {
            if !delimiter {
                lines.push(line.to_string());
                return None;
            }

            let lines = std::mem::take(lines);
            self.state = FenceState::Outside;
            return Some(ContentBlock::code(lines.join("\n")));
        }

        if delimiter {
            // the language tag after the marker is not kept
            self.state = FenceState::InsideFence { lines: Vec::new() };
            return None;
        }

        Some(classify(line))
    }

    pub fn finish(self) -> Option<ContentBlock> {
        match (self.state, self.policy) {
            (FenceState::Outside, _) => None,
            (FenceState::InsideFence { .. }, UnterminatedFence::Drop) => None,
            (FenceState::InsideFence { lines }, UnterminatedFence::Flush) => {
                Some(ContentBlock::code(lines.join("\n")))
            }
        }
    }
}
