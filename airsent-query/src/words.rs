//! Word frequencies feeding the word cloud

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// English stop words dropped before counting
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't",
    "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during", "each",
    "else", "ever", "few", "for", "from", "further", "get", "had", "hadn't", "has", "hasn't",
    "have", "haven't", "having", "he", "he'd", "he'll", "he's", "hence", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "however", "http",
    "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its",
    "itself", "just", "k", "let's", "like", "me", "more", "most", "mustn't", "my", "myself",
    "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "otherwise",
    "ought", "our", "ours", "ourselves", "out", "over", "own", "r", "same", "shall", "shan't",
    "she", "she'd", "she'll", "she's", "should", "shouldn't", "since", "so", "some", "such",
    "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
    "there's", "therefore", "these", "they", "they'd", "they'll", "they're", "they've",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "wasn't",
    "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when",
    "when's", "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's",
    "with", "won't", "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've",
    "your", "yours", "yourself", "yourselves",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Stop-word set: the built-in list plus caller-supplied extras, lower-cased
pub fn stopword_set<S: AsRef<str>>(extra: &[S]) -> HashSet<String> {
    STOPWORDS
        .iter()
        .map(|w| w.to_string())
        .chain(extra.iter().map(|w| w.as_ref().to_lowercase()))
        .collect()
}

/// Count words in a cleaned corpus, most frequent first.
///
/// Tokens are lower-cased and trimmed of surrounding punctuation. Stop words,
/// bare numbers and single characters are skipped.
pub fn word_frequencies(corpus: &str, stopwords: &HashSet<String>, max_words: usize) -> Vec<WordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for token in corpus.split_whitespace() {
        let word = token
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .trim_matches('\'')
            .to_lowercase();
        if word.chars().count() < 2 || word.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if stopwords.contains(&word) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(max_words);
    words
}
