//! Word and phrase frequencies under a season filter.
use std::collections::HashMap;
use std::hash::Hash;

use log::{debug, warn};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::model::{PhraseCount, SeasonFilter, TranscriptLine, WordCount};
use crate::normalize::Normalizer;

///Counts items and returns `(item, count)` pairs in first-encountered order.
/// # Example
/// ```
/// use dialogue_stats::tally;
/// let counted = tally(["two", "one", "two"]);
/// assert_eq!(counted, vec![("two", 2), ("one", 1)]);
/// ```
pub fn tally<K, I>(items: I) -> Vec<(K, u32)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counted: Vec<(K, u32)> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => counted[i].1 += 1,
            None => {
                index.insert(item.clone(), counted.len());
                counted.push((item, 1));
            }
        }
    }
    counted
}

///Groups items by key, keeping groups and their members in first-encountered order.
pub fn group_first_seen<K, T, I, F>(items: I, key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }
    groups
}

///Sorts `(item, count)` pairs by count, highest first. Equal counts keep their input order.
pub fn sort_by_count<K>(mut counted: Vec<(K, u32)>) -> Vec<(K, u32)> {
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    counted
}

/// Token frequencies of one character's lines.
///
/// Returns [`AnalysisError::NoCharacterSelected`] when `character` is `None`
/// or blank. A character without matching lines yields an empty table.
pub fn count_words(
    lines: &[TranscriptLine],
    season: SeasonFilter,
    character: Option<&str>,
    normalizer: &Normalizer,
) -> Result<Vec<WordCount>, AnalysisError> {
    let character = match character.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_uppercase(),
        _ => return Err(AnalysisError::NoCharacterSelected),
    };

    let tokens = season
        .apply(lines)
        .filter(|l| l.spoken_by(&character))
        .flat_map(|l| normalizer.normalize(l).to_vec());

    let counted: Vec<WordCount> = sort_by_count(tally(tokens))
        .into_iter()
        .map(|(text, size)| WordCount { text, size })
        .collect();
    debug!(
        "word counts for {character} (season {season}): {} distinct tokens",
        counted.len()
    );
    Ok(counted)
}

/// [`count_words`] without rows rarer than `min_occurrences`.
pub fn count_words_min(
    lines: &[TranscriptLine],
    season: SeasonFilter,
    character: Option<&str>,
    normalizer: &Normalizer,
    min_occurrences: u32,
) -> Result<Vec<WordCount>, AnalysisError> {
    let mut counted = count_words(lines, season, character, normalizer)?;
    counted.retain(|w| w.size >= min_occurrences);
    Ok(counted)
}

/// Upper-cases the first character, leaves the rest untouched.
pub fn capitalize(phrase: &str) -> String {
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whole-word, case-insensitive occurrences of each tracked phrase.
///
/// Output keeps the order of `phrases`, each capitalized for display.
pub fn count_phrases<S: AsRef<str>>(
    lines: &[TranscriptLine],
    season: SeasonFilter,
    phrases: &[S],
) -> Vec<PhraseCount> {
    let filtered: Vec<&TranscriptLine> = season.apply(lines).collect();

    phrases
        .iter()
        .map(|phrase| {
            let phrase = phrase.as_ref().trim();
            let count = if phrase.is_empty() {
                0
            } else {
                let pattern = format!(r"\b{}\b", regex::escape(phrase));
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(re) => filtered
                        .iter()
                        .map(|l| re.find_iter(&l.text).count() as u32)
                        .sum(),
                    Err(e) => {
                        warn!("skipping phrase {phrase:?}: {e}");
                        0
                    }
                }
            };
            PhraseCount {
                phrase: capitalize(phrase),
                count,
            }
        })
        .collect()
}

/// Logarithmic mapping from word counts to a display magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeScale {
    min: f64,
    max: f64,
    range: (f64, f64),
}

impl SizeScale {
    pub fn new(min: u32, max: u32, range: (f64, f64)) -> Self {
        let min = f64::from(min.max(1));
        let max = f64::from(max.max(1)).max(min);
        Self { min, max, range }
    }

    /// Scale spanning the smallest and largest size in `counts`; `None` when empty.
    pub fn from_counts(counts: &[WordCount], range: (f64, f64)) -> Option<Self> {
        let min = counts.iter().map(|w| w.size).min()?;
        let max = counts.iter().map(|w| w.size).max()?;
        Some(Self::new(min, max, range))
    }

    pub fn scale(&self, count: u32) -> f64 {
        let (lo, hi) = self.range;
        // a single distinct count has no spread to map
        if self.max <= self.min {
            return (lo + hi) / 2.0;
        }
        let c = f64::from(count.max(1)).clamp(self.min, self.max);
        lo + (c.ln() - self.min.ln()) / (self.max.ln() - self.min.ln()) * (hi - lo)
    }
}

/// A word count paired with its scaled display size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudWord {
    pub text: String,
    pub size: u32,
    pub font_size: f64,
}

pub fn word_cloud(counts: &[WordCount], range: (f64, f64)) -> Vec<CloudWord> {
    let Some(scale) = SizeScale::from_counts(counts, range) else {
        return Vec::new();
    };
    counts
        .iter()
        .map(|w| CloudWord {
            text: w.text.clone(),
            size: w.size,
            font_size: scale.scale(w.size),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_and_sort() {
        let words = vec![
            "one".to_string(),
            "two".to_string(),
            "two".to_string(),
            "three".to_string(),
            "three".to_string(),
            "three".to_string(),
            "four".to_string(),
        ];
        let counted = sort_by_count(tally(words));
        let expected = vec![
            ("three".to_string(), 3_u32),
            ("two".to_string(), 2_u32),
            ("one".to_string(), 1_u32),
            ("four".to_string(), 1_u32),
        ];
        assert_eq!(counted, expected);
    }

    #[test]
    fn capitalize_first_char_only() {
        assert_eq!(capitalize("you're fired"), "You're fired");
        assert_eq!(capitalize("jolly Good show"), "Jolly Good show");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn phrases_respect_word_edges() {
        let lines = vec![
            TranscriptLine::new(1, 1, 1, "RIGBY", "Dude! DUDE, bro."),
            TranscriptLine::new(1, 1, 2, "MORDECAI", "Brother, that's not a dudebro."),
            TranscriptLine::new(2, 1, 1, "POPS", "Jolly good show! Jolly   good show"),
        ];
        let counted = count_phrases(&lines, SeasonFilter::All, &["dude", "bro", "jolly good show"]);
        assert_eq!(
            counted,
            vec![
                PhraseCount { phrase: "Dude".into(), count: 2 },
                PhraseCount { phrase: "Bro".into(), count: 1 },
                PhraseCount { phrase: "Jolly good show".into(), count: 1 },
            ]
        );
        let season_one = count_phrases(&lines, SeasonFilter::Season(1), &["jolly good show"]);
        assert_eq!(season_one[0].count, 0);
    }

    #[test]
    fn size_scale_monotonic_and_flat() {
        let scale = SizeScale::new(1, 100, (10.0, 100.0));
        assert_eq!(scale.scale(1), 10.0);
        assert!((scale.scale(100) - 100.0).abs() < 1e-9);
        assert!((scale.scale(10) - 55.0).abs() < 1e-9);
        assert!(scale.scale(5) < scale.scale(6));

        let flat = SizeScale::new(4, 4, (10.0, 100.0));
        assert_eq!(flat.scale(4), 55.0);

        assert!(SizeScale::from_counts(&[], (10.0, 100.0)).is_none());
    }
}
