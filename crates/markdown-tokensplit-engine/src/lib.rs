//! # markdown-tokensplit-engine
//!
//! Splits a markdown document into chunks that each fit a token budget while
//! staying valid markdown: headings keep their marker, code fences stay
//! paired, and prose is never cut mid-word.
//!
//! ```text
//! markdown → extract_blocks → [Block] → Splitter::pack → [chunk]
//!                                            │
//!                        oversized block → split_words / split_code_lines / split_generic
//! ```
//!
//! Most callers only need [`split_by_tokens`]:
//!
//! ```no_run
//! let chunks = markdown_tokensplit_engine::split_by_tokens("# Title\n\nBody.", 200, None)?;
//! assert_eq!(chunks, vec!["# Title\n\nBody.\n"]);
//! # Ok::<(), markdown_tokensplit_engine::SplitError>(())
//! ```

pub mod blocks;
pub mod error;
pub mod pack;
pub mod split;
pub mod tokens;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use blocks::{Block, BlockKind, CodeFence, FenceKind, extract_blocks};
pub use error::{SplitError, validate_max_tokens};
pub use markdown_tokensplit_config::{Config, Encoding};
pub use pack::Splitter;
pub use split::{split_code_lines, split_generic, split_words};
pub use tokens::{
    BpeCounter, TokenCounter, WhitespaceCounter, default_tokenizer, shared_tokenizer,
};

/// Split `markdown` into chunks of at most `max_tokens` tokens.
///
/// Uses the shared GPT-2 tokenizer when `tokenizer` is `None`. The budget is
/// checked before the tokenizer is loaded or the document parsed.
pub fn split_by_tokens(
    markdown: &str,
    max_tokens: usize,
    tokenizer: Option<&dyn TokenCounter>,
) -> Result<Vec<String>, SplitError> {
    let max_tokens = pack::ensure_budget(max_tokens)?;
    let counter: &dyn TokenCounter = match tokenizer {
        Some(counter) => counter,
        None => default_tokenizer()?,
    };
    Ok(Splitter::new(max_tokens, counter)?.split(markdown))
}

/// Like [`split_by_tokens`] for input that has not been checked to be text.
/// Invalid UTF-8 is rejected before anything else.
pub fn split_bytes_by_tokens(
    input: &[u8],
    max_tokens: usize,
    tokenizer: Option<&dyn TokenCounter>,
) -> Result<Vec<String>, SplitError> {
    let markdown = std::str::from_utf8(input)?;
    split_by_tokens(markdown, max_tokens, tokenizer)
}
