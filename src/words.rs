//! Whitespace word counting.
//!
//! This is the approximation used for batch budgets: the text is split on
//! runs of whitespace and the non-empty pieces are counted. It is not a
//! natural-language word count, and batch boundaries depend on it exactly.

/// Counts whitespace-delimited words in `text`.
#[inline]
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words_empty() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t "), 0);
    }

    #[test]
    fn test_count_words_basic() {
        assert_eq!(count_words("hello"), 1);
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("  hello   world  "), 2);
    }

    #[test]
    fn test_count_words_mixed_whitespace() {
        assert_eq!(count_words("a\tb\nc\r\nd"), 4);
    }

    #[test]
    fn test_count_words_punctuation_is_part_of_word() {
        // Markup and separators count as words when surrounded by whitespace.
        assert_eq!(count_words("-----------------\nFILE PATH: docs/a.mdx"), 4);
        assert_eq!(count_words("<Tabs>{props}</Tabs>"), 1);
    }
}
