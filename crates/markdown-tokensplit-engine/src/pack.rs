//! # Chunk Packing
//!
//! A single greedy pass over the blocks with no lookahead or backtracking.
//! Blocks accumulate into the current chunk while they fit. A block that does
//! not fit flushes the chunk and starts the next one. A block that cannot fit
//! even in an empty chunk is handed to the fine splitter, and its pieces are
//! emitted as-is without merging into their neighbours.
//!
//! Counts are summed per block, so a packed chunk's real token count can
//! differ slightly from the sum the packer tracked. See [`crate::tokens`].

use markdown_tokensplit_config::Config;

use crate::blocks::{Block, BlockKind, extract_blocks};
use crate::error::{SplitError, validate_max_tokens};
use crate::split::{split_code_lines, split_generic, split_words};
use crate::tokens::{TokenCounter, shared_tokenizer};

/// Rejects a zero budget.
pub(crate) fn ensure_budget(max_tokens: usize) -> Result<usize, SplitError> {
    if max_tokens == 0 {
        return Err(SplitError::InvalidConfiguration { max_tokens: 0 });
    }
    Ok(max_tokens)
}

pub struct Splitter<'t> {
    max_tokens: usize,
    counter: &'t dyn TokenCounter,
}

impl<'t> Splitter<'t> {
    pub fn new(max_tokens: usize, counter: &'t dyn TokenCounter) -> Result<Self, SplitError> {
        Ok(Self {
            max_tokens: ensure_budget(max_tokens)?,
            counter,
        })
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Extract the document's blocks and pack them.
    pub fn split(&self, markdown: &str) -> Vec<String> {
        let blocks = extract_blocks(markdown);
        self.pack(&blocks)
    }

    /// Pack blocks, in order, into chunks of at most `max_tokens`.
    pub fn pack(&self, blocks: &[Block]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut state = PackState::default();

        for block in blocks {
            let block_tokens = self.counter.count_tokens(block.text());
            log::trace!("{:?} block: {block_tokens} tokens", block.kind());

            if state.tokens + block_tokens <= self.max_tokens {
                state.append(block.text(), block_tokens);
                continue;
            }

            if let Some(chunk) = state.take() {
                self.emit(&mut chunks, chunk);
            }

            if block_tokens <= self.max_tokens {
                state.append(block.text(), block_tokens);
            } else {
                log::debug!(
                    "block of {block_tokens} tokens exceeds the {} token budget; splitting it",
                    self.max_tokens
                );
                for piece in self.split_oversized(block) {
                    self.emit(&mut chunks, piece);
                }
            }
        }

        if let Some(chunk) = state.take() {
            self.emit(&mut chunks, chunk);
        }
        chunks
    }

    fn split_oversized(&self, block: &Block) -> Vec<String> {
        match block.kind() {
            BlockKind::Code(fence) => split_code_lines(fence, self.max_tokens, self.counter),
            BlockKind::Generic => split_generic(block.text(), self.max_tokens, self.counter),
            _ => split_words(block.text(), self.max_tokens, self.counter),
        }
    }

    fn emit(&self, chunks: &mut Vec<String>, chunk: String) {
        log::debug!("chunk {} flushed ({} bytes)", chunks.len(), chunk.len());
        chunks.push(chunk);
    }
}

impl Splitter<'static> {
    /// A splitter using the configured budget and the shared tokenizer for
    /// the configured encoding.
    pub fn from_config(config: &Config) -> Result<Self, SplitError> {
        let max_tokens = validate_max_tokens(config.max_tokens)?;
        let counter = shared_tokenizer(config.encoding)?;
        Self::new(max_tokens, counter)
    }

    /// A splitter from the user's config file, or the defaults when there is
    /// none. See [`Config::config_path`] for where it is looked up.
    pub fn from_default_config() -> Result<Self, SplitError> {
        let config = Config::load()?.unwrap_or_default();
        log::debug!(
            "splitting with max_tokens={} encoding={:?}",
            config.max_tokens,
            config.encoding
        );
        Self::from_config(&config)
    }
}

/// The chunk being accumulated.
#[derive(Default)]
struct PackState {
    text: String,
    tokens: usize,
}

impl PackState {
    fn append(&mut self, text: &str, tokens: usize) {
        self.text.push_str(text);
        self.tokens += tokens;
    }

    /// Reset, returning the accumulated text if there was any.
    fn take(&mut self) -> Option<String> {
        self.tokens = 0;
        if self.text.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.text))
        }
    }
}
