//! Fallback splitting for a single block that is over budget on its own.
//!
//! Prose is split between words and code between lines; neither strategy
//! ever cuts inside its unit, so a unit that alone exceeds the budget is
//! emitted as an over-budget piece.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use crate::blocks::{CodeFence, markdown_options};
use crate::tokens::TokenCounter;

/// Greedily pack whitespace-separated words into pieces of at most
/// `max_tokens`, rejoining them with single spaces.
pub fn split_words(text: &str, max_tokens: usize, counter: &dyn TokenCounter) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut buffer = String::new();
    let mut buffer_tokens = 0;

    for word in text.split_whitespace() {
        let unit = format!("{word} ");
        let unit_tokens = counter.count_tokens(&unit);

        if buffer_tokens + unit_tokens > max_tokens && !buffer.is_empty() {
            pieces.push(buffer.trim_end().to_string());
            buffer.clear();
            buffer_tokens = 0;
        }
        if unit_tokens > max_tokens {
            log::warn!(
                "word of {unit_tokens} tokens exceeds the {max_tokens} token budget; emitting it alone"
            );
        }

        buffer.push_str(&unit);
        buffer_tokens += unit_tokens;
    }

    if !buffer.is_empty() {
        pieces.push(buffer.trim_end().to_string());
    }
    pieces
}

/// Greedily pack the lines of a code block into pieces that each re-open and
/// re-close the original fence.
///
/// The fence overhead is subtracted from the budget up front. When the fences
/// alone use up the budget every line becomes its own piece.
pub fn split_code_lines(
    fence: &CodeFence,
    max_tokens: usize,
    counter: &dyn TokenCounter,
) -> Vec<String> {
    if fence.content().is_empty() {
        log::warn!("empty code block exceeds the {max_tokens} token budget; emitting it alone");
        return vec![fence.render()];
    }

    let overhead = counter.count_tokens(&fence.wrap(""));
    let budget = max_tokens.saturating_sub(overhead);

    let mut pieces = Vec::new();
    let mut buffer = String::new();
    let mut buffer_tokens = 0;

    for line in fence.content().lines() {
        let unit = format!("{line}\n");
        let unit_tokens = counter.count_tokens(&unit);

        if buffer_tokens + unit_tokens > budget && !buffer.is_empty() {
            pieces.push(fence.wrap(&buffer));
            buffer.clear();
            buffer_tokens = 0;
        }
        if unit_tokens > budget {
            log::warn!(
                "code line of {unit_tokens} tokens exceeds the {budget} tokens left after fences; emitting it alone"
            );
        }

        buffer.push_str(&unit);
        buffer_tokens += unit_tokens;
    }

    if !buffer.is_empty() {
        pieces.push(fence.wrap(&buffer));
    }
    pieces
}

/// Split a structural block (list, block quote, ...) that may hold fenced
/// code. Prose between code blocks is split by words; each nested code block
/// is re-emitted as a top-level fence, by lines when it is over budget, so no
/// piece leaves a fence open.
pub fn split_generic(text: &str, max_tokens: usize, counter: &dyn TokenCounter) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut prose_start = 0;

    for (fence, range) in nested_code_blocks(text) {
        pieces.extend(split_words(&text[prose_start..range.start], max_tokens, counter));
        let rendered = fence.render();
        if counter.count_tokens(&rendered) <= max_tokens {
            pieces.push(rendered);
        } else {
            pieces.extend(split_code_lines(&fence, max_tokens, counter));
        }
        prose_start = range.end.max(prose_start);
    }

    pieces.extend(split_words(&text[prose_start..], max_tokens, counter));
    pieces
}

/// Code blocks at any nesting depth, with their content stripped of container
/// indentation and markers, and their source spans.
fn nested_code_blocks(text: &str) -> Vec<(CodeFence, Range<usize>)> {
    let mut found = Vec::new();
    let mut open: Option<(String, String, Range<usize>)> = None;

    for (event, range) in Parser::new_ext(text, markdown_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                open = Some((language, String::new(), range));
            }
            Event::Text(code) => {
                if let Some((_, content, _)) = open.as_mut() {
                    content.push_str(&code);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, content, span)) = open.take() {
                    found.push((CodeFence::new(language, content), span));
                }
            }
            _ => {}
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{CharCounter, fences_balanced};
    use crate::tokens::WhitespaceCounter;
    use pretty_assertions::assert_eq;

    #[test]
    fn words_fill_each_piece_up_to_budget() {
        let pieces = split_words("a b c d e f g", 3, &WhitespaceCounter);
        assert_eq!(pieces, vec!["a b c", "d e f", "g"]);
    }

    #[test]
    fn words_collapse_whitespace_runs() {
        let pieces = split_words("a\n\nb   c\td", 2, &WhitespaceCounter);
        assert_eq!(pieces, vec!["a b", "c d"]);
    }

    #[test]
    fn oversized_word_stands_alone() {
        let pieces = split_words("a hugeword b", 4, &CharCounter);
        assert_eq!(pieces, vec!["a", "hugeword", "b"]);
    }

    #[test]
    fn leading_oversized_word_emits_no_empty_piece() {
        let pieces = split_words("hugeword a", 4, &CharCounter);
        assert_eq!(pieces, vec!["hugeword", "a"]);
    }

    #[test]
    fn no_words_no_pieces() {
        assert!(split_words("  \n ", 10, &WhitespaceCounter).is_empty());
    }

    #[test]
    fn code_lines_are_rewrapped_in_fences() {
        // "```rust" and "```" cost two tokens, leaving four for lines.
        let fence = CodeFence::new("rust", "l1 x\nl2 x\nl3 x\n");
        let pieces = split_code_lines(&fence, 6, &WhitespaceCounter);
        assert_eq!(
            pieces,
            vec![
                "```rust\nl1 x\nl2 x\n```\n\n".to_string(),
                "```rust\nl3 x\n```\n\n".to_string(),
            ]
        );
    }

    #[test]
    fn fence_overhead_at_budget_yields_one_line_per_piece() {
        let fence = CodeFence::new("rust", "a\nb\nc\n");
        let pieces = split_code_lines(&fence, 2, &WhitespaceCounter);
        assert_eq!(
            pieces,
            vec!["```rust\na\n```\n\n", "```rust\nb\n```\n\n", "```rust\nc\n```\n\n"]
        );
    }

    #[test]
    fn code_blank_lines_are_kept() {
        let fence = CodeFence::new("", "a\n\nb\n");
        let pieces = split_code_lines(&fence, 100, &WhitespaceCounter);
        assert_eq!(pieces, vec!["```\na\n\nb\n```\n\n"]);
    }

    #[test]
    fn longer_fence_is_reused_for_every_piece() {
        let fence = CodeFence::new("md", "```\nx\n```\n");
        let pieces = split_code_lines(&fence, 3, &WhitespaceCounter);
        assert!(pieces.iter().all(|p| p.starts_with("````md\n") && p.ends_with("````\n\n")));
        assert_eq!(pieces.len(), 3);
    }

    #[test]
    fn empty_code_block_over_budget_is_kept_whole() {
        let fence = CodeFence::new("averyveryverylonglanguagetag", "");
        let pieces = split_code_lines(&fence, 5, &CharCounter);
        assert_eq!(pieces, vec!["```averyveryverylonglanguagetag\n```\n\n"]);
    }

    #[test]
    fn generic_block_reemits_nested_code_as_balanced_fences() {
        let list = "- item one\n\n  ```rust\n  let a = 1;\n  let b = 2;\n  ```\n";
        let pieces = split_generic(list, 4, &WhitespaceCounter);
        assert_eq!(
            pieces,
            vec![
                "- item one",
                "```rust\nlet a = 1;\n```\n\n",
                "```rust\nlet b = 2;\n```\n\n",
            ]
        );
        assert!(pieces.iter().all(|piece| fences_balanced(piece)));
    }

    #[test]
    fn generic_block_keeps_fitting_nested_code_whole() {
        let quote = "> before the code\n>\n> ```\n> x\n> ```\n>\n> after it";
        let pieces = split_generic(quote, 4, &WhitespaceCounter);
        assert!(pieces.contains(&"```\nx\n```\n\n".to_string()));
        assert!(pieces.last().is_some_and(|piece| piece.ends_with("after it")));
        assert!(pieces.iter().all(|piece| fences_balanced(piece)));
    }

    #[test]
    fn generic_block_without_code_splits_by_words() {
        let pieces = split_generic("- a b\n- c d", 2, &WhitespaceCounter);
        assert_eq!(pieces, vec!["- a", "b -", "c d"]);
    }
}
