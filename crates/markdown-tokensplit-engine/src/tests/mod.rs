//! Shared helpers for unit tests.

use crate::tokens::TokenCounter;

/// One token per character. Makes single words expensive.
pub struct CharCounter;

impl TokenCounter for CharCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Counts every call, to check work is skipped on invalid input.
#[derive(Default)]
pub struct CallCounter {
    pub calls: std::cell::Cell<usize>,
}

impl TokenCounter for CallCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.calls.set(self.calls.get() + 1);
        text.split_whitespace().count()
    }
}

/// Whether every fence opened in `chunk` is closed again.
pub fn fences_balanced(chunk: &str) -> bool {
    let mut open: Option<String> = None;
    for line in chunk.lines() {
        let marker: String = line
            .chars()
            .take_while(|c| *c == '`' || *c == '~')
            .collect();
        if marker.len() < 3 {
            continue;
        }
        match &open {
            None => open = Some(marker),
            Some(fence) if marker.starts_with(fence.as_str()) && line.trim() == marker => {
                open = None;
            }
            Some(_) => {}
        }
    }
    open.is_none()
}

mod api {
    use super::*;
    use crate::{SplitError, WhitespaceCounter, split_by_tokens, split_bytes_by_tokens};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("```rust\nfn a() {}\n```\n\n", true)]
    #[case("````md\n```\n````\n", true)]
    #[case("```rust\nfn a() {}\n", false)]
    #[case("no code at all\n", true)]
    fn fence_balance_helper(#[case] chunk: &str, #[case] expected: bool) {
        assert_eq!(fences_balanced(chunk), expected);
    }

    #[test]
    fn zero_budget_fails_before_any_counting() {
        let counter = CallCounter::default();
        let err = split_by_tokens("# Heading\n\nThis is a test.", 0, Some(&counter)).unwrap_err();
        assert!(matches!(err, SplitError::InvalidConfiguration { max_tokens: 0 }));
        assert_eq!(counter.calls.get(), 0);
    }

    #[test]
    fn invalid_utf8_is_invalid_input() {
        let counter = CallCounter::default();
        let err = split_bytes_by_tokens(&[b'#', b' ', 0xC3, 0x28], 50, Some(&counter)).unwrap_err();
        assert!(matches!(err, SplitError::InvalidInput(_)));
        assert_eq!(counter.calls.get(), 0);
    }

    #[test]
    fn invalid_input_is_reported_before_invalid_budget() {
        let err = split_bytes_by_tokens(&[0xFF], 0, Some(&WhitespaceCounter)).unwrap_err();
        assert!(matches!(err, SplitError::InvalidInput(_)));
    }

    #[test]
    fn valid_bytes_are_split() {
        let chunks = split_bytes_by_tokens(b"# Title\n\nBody.", 50, Some(&WhitespaceCounter)).unwrap();
        assert_eq!(chunks, vec!["# Title\n\nBody.\n"]);
    }

    #[test]
    fn custom_counter_drives_packing() {
        let chunks = split_by_tokens("abcd efgh", 5, Some(&CharCounter)).unwrap();
        assert_eq!(chunks, vec!["abcd", "efgh"]);
    }
}
