// src/parser/words.rs
// =============================================================================
// Splits page text into words and counts them.
//
// A "word" is a run of non-whitespace characters, lowercased, with every
// character that is not a letter, digit or underscore removed. So
// "Hello," and "hello" count as the same word, and "--" is not a word at all.
// Words that fully match an ignored-word pattern are dropped.
// =============================================================================

use std::collections::HashMap;

use crate::patterns::PatternList;

// Counts the words in `text`, skipping ignored words
pub fn count_words(text: &str, ignored: &PatternList) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    for raw in text.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .flat_map(char::to_lowercase)
            .collect();

        if word.is_empty() || ignored.matches(&word) {
            continue;
        }

        *counts.entry(word).or_insert(0) += 1;
    }

    counts
}
