//! Character, season and episode summary tables derived from transcript rows.
use std::collections::{BTreeSet, HashSet};

use log::info;
use serde::{Deserialize, Serialize};

use crate::frequency::group_first_seen;
use crate::model::{CharacterSummary, EpisodeStat, SeasonStat, TranscriptLine};

///Canonical speaker name, or `None` for combined or empty speakers.
///
///Upper-cases, drops a trailing parenthetical, turns hyphens into spaces and
///folds the "Hi-Five Ghost" spellings together.
/// # Example
/// ```
/// use dialogue_stats::canonical_speaker;
/// assert_eq!(canonical_speaker("Rigby (continued)").as_deref(), Some("RIGBY"));
/// assert_eq!(canonical_speaker("Hi-Five Ghost").as_deref(), Some("HIGH FIVE GHOST"));
/// assert_eq!(canonical_speaker("Mordecai and Rigby"), None);
/// ```
pub fn canonical_speaker(raw: &str) -> Option<String> {
    let mut name = raw.trim().to_uppercase();

    if name.ends_with(')') {
        if let Some(open) = name.find('(') {
            name.truncate(open);
        }
    }

    let name = name
        .replace(['-', '—'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if matches!(name.as_str(), "HI FIVE GHOST" | "HIGH FIVE GHOST") {
        return Some("HIGH FIVE GHOST".to_string());
    }

    if name.is_empty() || name.contains([',', '&']) || name.split(' ').any(|w| w == "AND") {
        return None;
    }
    Some(name)
}

/// Number of whitespace-separated pieces in a line.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summaries {
    pub characters: Vec<CharacterSummary>,
    pub seasons: Vec<SeasonStat>,
    pub episodes: Vec<EpisodeStat>,
}

struct Row<'a> {
    character: String,
    line: &'a TranscriptLine,
    words: u64,
}

impl Summaries {
    /// Builds all three tables.
    ///
    /// Speakers are canonicalized first; combined speakers and names in
    /// `dropped` are skipped. Characters seen in a single episode are left
    /// out of the all-time table.
    pub fn from_lines(lines: &[TranscriptLine], dropped: &HashSet<String>) -> Self {
        let rows: Vec<Row> = lines
            .iter()
            .filter_map(|line| {
                let character = canonical_speaker(&line.speaker)?;
                if dropped.contains(&character) {
                    return None;
                }
                Some(Row {
                    character,
                    line,
                    words: word_count(&line.text),
                })
            })
            .collect();

        let mut characters: Vec<CharacterSummary> =
            group_first_seen(rows.iter(), |r| r.character.clone())
                .into_iter()
                .map(|(character, group)| {
                    let episodes: BTreeSet<(u32, u32)> = group
                        .iter()
                        .map(|r| (r.line.season, r.line.episode))
                        .collect();
                    CharacterSummary {
                        character,
                        total_episodes: episodes.len() as u32,
                        total_lines: group.len() as u64,
                        total_words: group.iter().map(|r| r.words).sum(),
                    }
                })
                .filter(|c| c.total_episodes > 1)
                .collect();
        characters.sort_by(|a, b| b.total_episodes.cmp(&a.total_episodes));

        let mut seasons: Vec<SeasonStat> =
            group_first_seen(rows.iter(), |r| (r.line.season, r.character.clone()))
                .into_iter()
                .map(|((season, character), group)| SeasonStat {
                    character,
                    season,
                    episodes: group.iter().map(|r| r.line.episode).collect(),
                    lines: group.len() as u64,
                    words: group.iter().map(|r| r.words).sum(),
                })
                .collect();
        seasons.sort_by_key(|s| s.season);

        let episodes: Vec<EpisodeStat> = group_first_seen(rows.iter(), |r| {
            (r.line.season, r.line.episode, r.character.clone())
        })
        .into_iter()
        .map(|((season, episode, character), group)| EpisodeStat {
            season,
            episode,
            character,
            lines: group.len() as u64,
            words: group.iter().map(|r| r.words).sum(),
        })
        .collect();

        info!(
            "summaries: {} characters, {} season rows, {} episode rows",
            characters.len(),
            seasons.len(),
            episodes.len()
        );
        Self {
            characters,
            seasons,
            episodes,
        }
    }

    /// Lines and words per episode for one character, in episode order.
    pub fn character_episodes(&self, character: &str) -> Vec<&EpisodeStat> {
        character_episodes(&self.episodes, character)
    }
}

/// Rows of an episode table that belong to `character`, sorted by season and episode.
///
/// The name goes through [`canonical_speaker`] first, so any spelling the
/// summary builder folds together finds the same rows.
pub fn character_episodes<'a>(
    episodes: &'a [EpisodeStat],
    character: &str,
) -> Vec<&'a EpisodeStat> {
    let Some(wanted) = canonical_speaker(character) else {
        return Vec::new();
    };
    let mut found: Vec<&EpisodeStat> = episodes.iter().filter(|e| e.character == wanted).collect();
    found.sort_by_key(|e| (e.season, e.episode));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_speaker("  pops ").as_deref(), Some("POPS"));
        assert_eq!(canonical_speaker("HIGH-FIVE GHOST").as_deref(), Some("HIGH FIVE GHOST"));
        assert_eq!(canonical_speaker("Muscle—Man").as_deref(), Some("MUSCLE MAN"));
        assert_eq!(canonical_speaker("Benson (angrily)").as_deref(), Some("BENSON"));
        assert_eq!(canonical_speaker("Skips & Pops"), None);
        assert_eq!(canonical_speaker("Eileen, Margaret"), None);
        assert_eq!(canonical_speaker("(offscreen)"), None);
        assert_eq!(canonical_speaker("SANDRA").as_deref(), Some("SANDRA"));
    }

    #[test]
    fn tables_from_lines() {
        let lines = vec![
            TranscriptLine::new(1, 1, 1, "Mordecai", "Dude, come on"),
            TranscriptLine::new(1, 1, 2, "RIGBY", "No way"),
            TranscriptLine::new(1, 1, 3, "MORDECAI", "Yes way"),
            TranscriptLine::new(1, 2, 1, "MORDECAI", "Hey"),
            TranscriptLine::new(2, 1, 1, "Mordecai (whispering)", "Quiet"),
            TranscriptLine::new(2, 1, 2, "EVERYONE", "Yeah!"),
        ];
        let dropped: HashSet<String> = ["EVERYONE".to_string()].into_iter().collect();
        let s = Summaries::from_lines(&lines, &dropped);

        // RIGBY appears in a single episode and is left out
        assert_eq!(s.characters.len(), 1);
        let m = &s.characters[0];
        assert_eq!(m.character, "MORDECAI");
        assert_eq!(m.total_episodes, 3);
        assert_eq!(m.total_lines, 4);
        assert_eq!(m.total_words, 3 + 2 + 1 + 1);

        let seasons: Vec<_> = s
            .seasons
            .iter()
            .map(|r| (r.season, r.character.as_str(), r.episodes.len()))
            .collect();
        assert_eq!(seasons, vec![(1, "MORDECAI", 2), (1, "RIGBY", 1), (2, "MORDECAI", 1)]);

        let eps: Vec<_> = s
            .character_episodes("mordecai")
            .iter()
            .map(|e| (e.season, e.episode, e.lines))
            .collect();
        assert_eq!(eps, vec![(1, 1, 2), (1, 2, 1), (2, 1, 1)]);
    }

    #[test]
    fn episode_rows_match_canonical_names() {
        let row = |season, episode, character: &str| EpisodeStat {
            season,
            episode,
            character: character.to_string(),
            lines: 1,
            words: 1,
        };
        let rows = vec![
            row(2, 1, "HIGH FIVE GHOST"),
            row(1, 3, "HIGH FIVE GHOST"),
            row(1, 3, "POPS"),
        ];
        let found: Vec<_> = character_episodes(&rows, "Hi-Five Ghost")
            .iter()
            .map(|e| (e.season, e.episode))
            .collect();
        assert_eq!(found, vec![(1, 3), (2, 1)]);
        assert!(character_episodes(&rows, "Skips & Pops").is_empty());
    }
}
