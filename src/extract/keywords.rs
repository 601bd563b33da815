//! Frequency-based keyword ranking
//!
//! Body text is case-folded and split on anything that is not alphanumeric,
//! except apostrophes inside words. Short tokens, numbers and stopwords are
//! dropped; the rest are ranked by count, ties broken by first occurrence.

use std::collections::{HashMap, HashSet};

/// Default number of keywords kept in a report
pub const DEFAULT_KEYWORD_LIMIT: usize = 15;

/// Tokens shorter than this are never keywords
const MIN_TOKEN_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "and", "any", "are", "aren't",
    "because", "been", "before", "being", "below", "between", "both", "but", "can", "can't",
    "cannot", "could", "couldn't", "did", "didn't", "does", "doesn't", "doing", "don't", "down",
    "during", "each", "few", "for", "from", "further", "get", "had", "hadn't", "has", "hasn't",
    "have", "haven't", "having", "he'd", "he'll", "he's", "her", "here", "here's", "hers",
    "herself", "him", "himself", "his", "how", "how's", "i'd", "i'll", "i'm", "i've", "into",
    "isn't", "it's", "its", "itself", "just", "let's", "more", "most", "mustn't", "myself",
    "nor", "not", "off", "once", "only", "other", "ought", "our", "ours", "ourselves", "out",
    "over", "own", "same", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't",
    "some", "such", "than", "that", "that's", "the", "their", "theirs", "them", "themselves",
    "then", "there", "there's", "these", "they", "they'd", "they'll", "they're", "they've",
    "this", "those", "through", "too", "under", "until", "very", "was", "wasn't", "we'd",
    "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "will", "with",
    "won't", "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your",
    "yours", "yourself", "yourselves",
];

/// Keyword ranker with a fixed limit and stopword set
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    limit: usize,
    stopwords: HashSet<String>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD_LIMIT)
    }
}

impl KeywordExtractor {
    /// Creates an extractor with the built-in English stopwords
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            stopwords: STOPWORDS.iter().map(|word| word.to_string()).collect(),
        }
    }

    /// Adds stopwords on top of the built-in list
    pub fn with_stopwords<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(extra.into_iter().map(|word| word.as_ref().trim().to_lowercase()));
        self
    }

    /// Ranks the keywords of `text`, most frequent first
    pub fn extract(&self, text: &str) -> Vec<String> {
        // token -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for (position, token) in tokenize(text).enumerate() {
            if !self.is_candidate(&token) {
                continue;
            }
            counts.entry(token).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(self.limit)
            .map(|(token, _, _)| token)
            .collect()
    }

    fn is_candidate(&self, token: &str) -> bool {
        token.chars().count() >= MIN_TOKEN_CHARS
            && !token.chars().all(|c| c.is_numeric() || c == '\'')
            && !self.stopwords.contains(token)
    }
}

/// Ranks keywords with the built-in stopwords
///
/// # Example
///
/// ```
/// use site_lens::extract::extract_keywords;
///
/// let keywords = extract_keywords("Rust crates and more Rust", 15);
/// assert_eq!(keywords, vec!["rust", "crates"]);
/// ```
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    KeywordExtractor::new(limit).extract(text)
}

/// Splits case-folded text into word tokens
///
/// Apostrophes (straight or curly) survive only between two alphanumerics.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    let lowered = text.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            current.push(c);
            continue;
        }

        let is_apostrophe = c == '\'' || c == '\u{2019}';
        let next_is_word = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
        if is_apostrophe && !current.is_empty() && next_is_word {
            current.push('\'');
            continue;
        }

        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens.into_iter()
}
