#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("Input is not valid UTF-8 text: {0}")]
    InvalidInput(#[from] std::str::Utf8Error),
    #[error("Invalid max_tokens {max_tokens}: must be a positive integer")]
    InvalidConfiguration { max_tokens: i64 },
    #[error("Failed to load tokenizer: {0}")]
    Tokenizer(String),
    #[error(transparent)]
    Config(#[from] markdown_tokensplit_config::ConfigError),
}

/// Convert a signed budget (for example one read from a config file) into a
/// usable token limit.
pub fn validate_max_tokens(max_tokens: i64) -> Result<usize, SplitError> {
    usize::try_from(max_tokens)
        .ok()
        .filter(|limit| *limit > 0)
        .ok_or(SplitError::InvalidConfiguration { max_tokens })
}
