//! Dialogue cleaning and tokenization.
//!
//! A line is cleaned once (stage directions removed, punctuation stripped,
//! lowercased) and the resulting [`Tokens`] applies the noise filters lazily
//! every time it is iterated.
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use rust_stemmers::{Algorithm, Stemmer};

use crate::config::{AnalysisConfig, StemMode};
use crate::model::TranscriptLine;

/// General English stopwords plus filler words common in the show's dialogue.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "that", "have", "for", "not", "with", "you", "this", "but", "his", "from",
    "they", "will", "would", "there", "their", "what", "about", "which", "were", "when", "your",
    "said", "could", "been", "them", "than",
    // show filler
    "hey", "uh", "um", "oh", "ah", "huh", "ha", "yo", "duh", "ugh", "whoa", "gonna", "wanna",
    "gotta", "kinda", "sorta", "like", "just", "really", "right", "well", "back", "get", "got",
    "see", "know", "think", "look", "come", "go", "one", "even", "still", "also", "okay", "yes",
    "no", "maybe", "th",
];

const SUFFIXES: [&str; 5] = ["'s", "s", "ing", "ly", "ed"];

/// Removes `( ... )` stage directions. An unclosed `(` is left in place.
///
/// # Example
/// ```
/// use dialogue_stats::strip_parentheticals;
/// assert_eq!(strip_parentheticals("Dude (laughs) yeah (sighs)"), "Dude  yeah ");
/// assert_eq!(strip_parentheticals("open (paren"), "open (paren");
/// ```
pub fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) if !rest[open..open + close].contains('\n') => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Keeps letters, digits, apostrophes, hyphens and whitespace, lowercased.
pub fn clean_text(text: &str) -> String {
    strip_parentheticals(text)
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '\'' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Chained suffix stripping: `'s`, then `s`, then `ing`, `ly`, `ed`.
///
/// # Example
/// ```
/// use dialogue_stats::suffix_stem;
/// assert_eq!(suffix_stem("rigby's"), "rigby");
/// assert_eq!(suffix_stem("slacking"), "slack");
/// assert_eq!(suffix_stem("totally"), "total");
/// ```
pub fn suffix_stem(word: &str) -> &str {
    let mut stem = word;
    for suffix in SUFFIXES {
        if let Some(s) = stem.strip_suffix(suffix) {
            stem = s;
        }
    }
    stem
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

pub struct Normalizer {
    stopwords: HashSet<String>,
    min_token_len: usize,
    consonant_run_min: usize,
    stem_mode: StemMode,
    snowball: Option<Stemmer>,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("stopwords", &self.stopwords.len())
            .field("min_token_len", &self.min_token_len)
            .field("consonant_run_min", &self.consonant_run_min)
            .field("stem_mode", &self.stem_mode)
            .finish()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: &AnalysisConfig) -> Self {
        let stopwords = DEFAULT_STOPWORDS
            .iter()
            .map(|w| w.to_string())
            .chain(config.extra_stopwords.iter().map(|w| w.trim().to_lowercase()))
            .collect();
        let snowball = match config.stem_mode {
            StemMode::Snowball => Some(Stemmer::create(Algorithm::English)),
            _ => None,
        };
        Self {
            stopwords,
            min_token_len: config.min_token_len,
            consonant_run_min: config.consonant_run_min,
            stem_mode: config.stem_mode,
            snowball,
        }
    }

    pub fn normalize(&self, line: &TranscriptLine) -> Tokens<'_> {
        self.normalize_text(&line.text)
    }

    pub fn normalize_text(&self, text: &str) -> Tokens<'_> {
        Tokens {
            normalizer: self,
            cleaned: clean_text(text),
        }
    }

    /// Noise filter applied to every cleaned token.
    pub fn keep(&self, token: &str) -> bool {
        let len = token.chars().count();
        if len <= self.min_token_len || self.stopwords.contains(token) {
            return false;
        }
        if token.chars().any(char::is_numeric) {
            return false;
        }
        if len == 1 && token.chars().all(char::is_alphabetic) {
            return false;
        }
        !(len >= self.consonant_run_min && !token.chars().any(is_vowel))
    }

    fn stem<'t>(&'t self, token: &'t str) -> Cow<'t, str> {
        match (self.stem_mode, &self.snowball) {
            (StemMode::Suffix, _) => Cow::Borrowed(suffix_stem(token)),
            (StemMode::Snowball, Some(stemmer)) => stemmer.stem(token),
            _ => Cow::Borrowed(token),
        }
    }
}

/// The cleaned text of one line; iterate with [`Tokens::iter`].
///
/// Filtering and stemming happen during iteration, and iterating again
/// yields the same sequence.
#[derive(Debug)]
pub struct Tokens<'n> {
    normalizer: &'n Normalizer,
    cleaned: String,
}

impl Tokens<'_> {
    pub fn iter(&self) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        self.cleaned
            .split_whitespace()
            .filter(|t| self.normalizer.keep(t))
            .map(|t| self.normalizer.stem(t))
            .filter(|t| !t.is_empty())
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(Cow::into_owned).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        Normalizer::default().normalize_text(text).to_vec()
    }

    #[test]
    fn strips_stage_directions_and_punctuation() {
        assert_eq!(
            tokens("(laughing) Dude, Benson's gonna FIRE us!"),
            vec!["dude", "benson's", "fire"]
        );
    }

    #[test]
    fn drops_short_stopwords_digits_and_consonant_runs() {
        assert_eq!(tokens("we the 2nd hmm shh pst yeah"), vec!["yeah"]);
        assert!(tokens("a b c").is_empty());
    }

    #[test]
    fn drops_tokens_with_any_numeric_char() {
        assert_eq!(tokens("abc½ x٣yz dude"), vec!["dude"]);
    }

    #[test]
    fn keeps_hyphens_and_apostrophes() {
        assert_eq!(tokens("high-five don't"), vec!["high-five", "don't"]);
    }

    #[test]
    fn underscores_and_symbols_removed() {
        assert_eq!(tokens("slack_er $cash$"), vec!["slacker", "cash"]);
    }

    #[test]
    fn restartable_iteration() {
        let n = Normalizer::default();
        let t = n.normalize_text("Mordecai and Rigby slacking again (sighs)");
        let first: Vec<_> = t.iter().collect();
        let second: Vec<_> = t.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["mordecai", "rigby", "slacking", "again"]);
    }

    #[test]
    fn suffix_stemming_is_opt_in() {
        let config = AnalysisConfig {
            stem_mode: StemMode::Suffix,
            ..AnalysisConfig::default()
        };
        let n = Normalizer::new(&config);
        assert_eq!(n.normalize_text("slacking sandwiches").to_vec(), vec!["slack", "sandwiche"]);
        assert_eq!(tokens("slacking"), vec!["slacking"]);
    }

    #[test]
    fn snowball_stemming() {
        let config = AnalysisConfig {
            stem_mode: StemMode::Snowball,
            ..AnalysisConfig::default()
        };
        let n = Normalizer::new(&config);
        assert_eq!(n.normalize_text("running cars").to_vec(), vec!["run", "car"]);
    }

    #[test]
    fn extra_stopwords_and_thresholds() {
        let config = AnalysisConfig {
            extra_stopwords: vec!["Dude".to_string()],
            min_token_len: 4,
            ..AnalysisConfig::default()
        };
        let n = Normalizer::new(&config);
        assert_eq!(n.normalize_text("dude park coffee").to_vec(), vec!["coffee"]);
    }
}
