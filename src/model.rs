use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// One spoken line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub season: u32,
    pub episode: u32,
    pub line_number: u32,
    pub speaker: String,
    pub text: String,
}

impl TranscriptLine {
    pub fn new(
        season: u32,
        episode: u32,
        line_number: u32,
        speaker: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            season,
            episode,
            line_number,
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// Sort key for dialogue order across the whole show.
    pub fn order_key(&self) -> (u32, u32, u32) {
        (self.season, self.episode, self.line_number)
    }

    /// Case-insensitive exact speaker comparison (both sides upper-cased).
    pub fn spoken_by(&self, character: &str) -> bool {
        self.speaker.to_uppercase() == character.trim().to_uppercase()
    }
}

/// Either every season or one specific season.
///
/// Parses from the literal `all` (any case) or a positive integer.
/// ```
/// use dialogue_stats::SeasonFilter;
/// assert_eq!("all".parse::<SeasonFilter>().unwrap(), SeasonFilter::All);
/// assert_eq!("3".parse::<SeasonFilter>().unwrap(), SeasonFilter::Season(3));
/// assert!("0".parse::<SeasonFilter>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeasonFilter {
    #[default]
    All,
    Season(u32),
}

impl SeasonFilter {
    pub fn matches(&self, season: u32) -> bool {
        match self {
            SeasonFilter::All => true,
            SeasonFilter::Season(s) => *s == season,
        }
    }

    /// Lines of `lines` that belong to this filter, in input order.
    pub fn apply(self, lines: &[TranscriptLine]) -> impl Iterator<Item = &TranscriptLine> {
        lines.iter().filter(move |l| self.matches(l.season))
    }
}

impl From<u32> for SeasonFilter {
    fn from(season: u32) -> Self {
        SeasonFilter::Season(season)
    }
}

impl FromStr for SeasonFilter {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(SeasonFilter::All);
        }
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(SeasonFilter::Season(n)),
            _ => Err(AnalysisError::InvalidSeason(s.to_string())),
        }
    }
}

impl fmt::Display for SeasonFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonFilter::All => write!(f, "all"),
            SeasonFilter::Season(s) => write!(f, "{s}"),
        }
    }
}

/// Per-character totals, either all-time or rolled up for one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub character: String,
    pub total_episodes: u32,
    #[serde(default)]
    pub total_lines: u64,
    pub total_words: u64,
}

/// One row per (character, season).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStat {
    pub character: String,
    pub season: u32,
    pub episodes: BTreeSet<u32>,
    #[serde(default)]
    pub lines: u64,
    pub words: u64,
}

/// One row per (season, episode, character).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStat {
    pub season: u32,
    pub episode: u32,
    pub character: String,
    pub lines: u64,
    pub words: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub text: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseCount {
    pub phrase: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
}

/// Undirected weighted edge; `source` sorts before `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooccurrenceGraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

/// Fractional positions of one character's lines inside one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub character: String,
    pub season: u32,
    pub episode: u32,
    pub positions: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub season: u32,
    pub episode: u32,
    pub speaker: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_filter_parse_and_display() {
        assert_eq!("ALL".parse::<SeasonFilter>().unwrap(), SeasonFilter::All);
        assert_eq!(" 2 ".parse::<SeasonFilter>().unwrap(), SeasonFilter::Season(2));
        assert!("-1".parse::<SeasonFilter>().is_err());
        assert!("two".parse::<SeasonFilter>().is_err());
        assert_eq!(SeasonFilter::Season(4).to_string(), "4");
        assert_eq!(SeasonFilter::All.to_string(), "all");
    }

    #[test]
    fn season_filter_apply() {
        let lines = vec![
            TranscriptLine::new(1, 1, 1, "A", "x"),
            TranscriptLine::new(2, 1, 1, "B", "y"),
        ];
        assert_eq!(SeasonFilter::All.apply(&lines).count(), 2);
        let only: Vec<_> = SeasonFilter::Season(2).apply(&lines).collect();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].speaker, "B");
    }

    #[test]
    fn spoken_by_ignores_case() {
        let line = TranscriptLine::new(1, 1, 1, "MUSCLE MAN", "my mom!");
        assert!(line.spoken_by("Muscle Man"));
        assert!(!line.spoken_by("Muscle"));
    }
}
