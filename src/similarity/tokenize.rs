// Tokenization and stop-word filtering.
//
// Tokens are lowercased runs of alphanumeric characters (or '_') at least
// two characters long. Single letters and punctuation never reach the
// vocabulary.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

const MIN_TOKEN_CHARS: usize = 2;

/// Splits text into vocabulary terms, dropping English stop words.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Tokenizer {
    /// Tokenizer with the fixed English stop-word list.
    pub fn english() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self::with_stop_words(stop_words)
    }

    /// Tokenizer with a caller-supplied stop-word list (matched case-insensitively).
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }

    /// Terms of `text` in order of appearance, repeats included.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !is_word_char(c))
            .filter(|raw| raw.chars().count() >= MIN_TOKEN_CHARS)
            .map(str::to_lowercase)
            .filter(|term| !self.is_stop_word(term))
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        let tokenizer = Tokenizer::with_stop_words(Vec::<String>::new());
        assert_eq!(
            tokenizer.tokenize("Hello, World! snake_case stays-split"),
            vec!["hello", "world", "snake_case", "stays", "split"]
        );
    }

    #[test]
    fn test_drops_single_character_tokens() {
        let tokenizer = Tokenizer::with_stop_words(Vec::<String>::new());
        assert_eq!(tokenizer.tokenize("a b cd 7 42"), vec!["cd", "42"]);
    }

    #[test]
    fn test_removes_english_stop_words() {
        let tokenizer = Tokenizer::english();
        let tokens = tokenizer.tokenize("The cat sat on the mat");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"on".to_string()));
        assert!(tokens.contains(&"cat".to_string()));
        assert!(tokens.contains(&"mat".to_string()));
    }

    #[test]
    fn test_stop_words_match_case_insensitively() {
        let tokenizer = Tokenizer::with_stop_words(["And"]);
        assert_eq!(tokenizer.tokenize("AND and rust"), vec!["rust"]);
    }

    #[test]
    fn test_unicode_words_stay_whole() {
        let tokenizer = Tokenizer::with_stop_words(Vec::<String>::new());
        assert_eq!(tokenizer.tokenize("Café naïve"), vec!["café", "naïve"]);
    }
}
