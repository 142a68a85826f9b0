//! # Token Counting
//!
//! The packer only needs one question answered: how many tokens does this
//! string cost? [`TokenCounter`] is that seam. [`BpeCounter`] answers it with
//! a real BPE vocabulary and [`WhitespaceCounter`] with a cheap estimate.
//!
//! Counts of separately tokenized fragments do not add up exactly to the count
//! of their concatenation (BPE merges across boundaries). Callers compare
//! counts against a budget and never rely on exact additivity.

use std::sync::OnceLock;

use markdown_tokensplit_config::Encoding;
use tiktoken_rs::CoreBPE;

use crate::error::SplitError;

pub trait TokenCounter {
    /// Number of tokens in `text`. Must be deterministic and return 0 for "".
    fn count_tokens(&self, text: &str) -> usize;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

/// Counts tokens with a tiktoken BPE vocabulary.
pub struct BpeCounter {
    encoding: Encoding,
    bpe: CoreBPE,
}

impl BpeCounter {
    pub fn load(encoding: Encoding) -> anyhow::Result<Self> {
        let bpe = match encoding {
            Encoding::R50kBase => tiktoken_rs::r50k_base()?,
            Encoding::P50kBase => tiktoken_rs::p50k_base()?,
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base()?,
            Encoding::O200kBase => tiktoken_rs::o200k_base()?,
        };
        Ok(Self { encoding, bpe })
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl TokenCounter for BpeCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

impl std::fmt::Debug for BpeCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeCounter")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

/// Estimates one token per whitespace-separated word. Non-empty text always
/// costs at least one token.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceCounter;

impl TokenCounter for WhitespaceCounter {
    fn count_tokens(&self, text: &str) -> usize {
        let count = text.split_whitespace().count();
        if count == 0 && !text.is_empty() {
            1
        } else {
            count
        }
    }
}

/// The process-wide GPT-2 (`r50k_base`) counter, loaded on first use.
pub fn default_tokenizer() -> Result<&'static BpeCounter, SplitError> {
    shared_tokenizer(Encoding::default())
}

/// The process-wide counter for `encoding`. Each vocabulary is loaded at most
/// once; concurrent first callers block until it is ready.
pub fn shared_tokenizer(encoding: Encoding) -> Result<&'static BpeCounter, SplitError> {
    static R50K: OnceLock<Result<BpeCounter, String>> = OnceLock::new();
    static P50K: OnceLock<Result<BpeCounter, String>> = OnceLock::new();
    static CL100K: OnceLock<Result<BpeCounter, String>> = OnceLock::new();
    static O200K: OnceLock<Result<BpeCounter, String>> = OnceLock::new();

    let cell = match encoding {
        Encoding::R50kBase => &R50K,
        Encoding::P50kBase => &P50K,
        Encoding::Cl100kBase => &CL100K,
        Encoding::O200kBase => &O200K,
    };

    cell.get_or_init(|| {
        log::debug!("loading {encoding:?} tokenizer");
        BpeCounter::load(encoding).map_err(|e| format!("{encoding:?}: {e}"))
    })
    .as_ref()
    .map_err(|message| SplitError::Tokenizer(message.clone()))
}
