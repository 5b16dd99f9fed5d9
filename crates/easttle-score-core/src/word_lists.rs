//! Fixed word lists used by text analysis.
//!
//! Both lists are closed. Changing an entry changes assessment results.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Connectives counted toward the Organisation score.
pub static TRANSITION_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "however",
        "therefore",
        "furthermore",
        "moreover",
        "additionally",
        "consequently",
        "meanwhile",
        "nevertheless",
        "although",
        "because",
        "since",
        "while",
        "whereas",
        "firstly",
        "secondly",
        "finally",
        "also",
        "then",
        "next",
        "after",
        "before",
        "during",
    ]
    .into_iter()
    .collect()
});

/// High-frequency words treated as correctly spelled.
///
/// Any other word longer than two letters counts as a spelling error.
pub static COMMON_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "as", "is", "was", "are", "were", "be", "been", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "i",
        "you", "he", "she", "it", "we", "they", "this", "that", "these", "those", "what", "which",
        "who", "when", "where", "why", "how", "not", "no", "yes",
    ]
    .into_iter()
    .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_list_is_closed() {
        assert_eq!(TRANSITION_WORDS.len(), 22);
        assert!(TRANSITION_WORDS.contains("because"));
        assert!(!TRANSITION_WORDS.contains("thus"));
    }

    #[test]
    fn common_words_cover_function_words() {
        for word in ["the", "she", "would", "yes"] {
            assert!(COMMON_WORDS.contains(word), "{word} should be common");
        }
        assert!(!COMMON_WORDS.contains("cat"));
    }
}
