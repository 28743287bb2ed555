//! Where in an episode a character speaks.
//!
//! Positions are 0-indexed: the k-th line of an `n`-line episode sits at
//! `k / n`, so every position lies in `[0, 1)`.
use log::debug;

use crate::error::AnalysisError;
use crate::frequency::group_first_seen;
use crate::model::{TimingRecord, TranscriptLine};

fn episode_lines(lines: &[TranscriptLine], season: u32, episode: u32) -> Vec<&TranscriptLine> {
    let mut found: Vec<&TranscriptLine> = lines
        .iter()
        .filter(|l| l.season == season && l.episode == episode)
        .collect();
    found.sort_by_key(|l| l.line_number);
    found
}

/// Timing record for one character in one episode.
///
/// Returns [`AnalysisError::NoLinesInEpisode`] when the character never
/// speaks in that episode.
pub fn build_timeline(
    lines: &[TranscriptLine],
    character: &str,
    season: u32,
    episode: u32,
) -> Result<TimingRecord, AnalysisError> {
    let ordered = episode_lines(lines, season, episode);
    let total = ordered.len() as f64;
    let matches: Vec<(usize, &TranscriptLine)> = ordered
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, l)| l.spoken_by(character))
        .collect();

    let Some((_, first)) = matches.first() else {
        return Err(AnalysisError::NoLinesInEpisode {
            character: character.trim().to_uppercase(),
            season,
            episode,
        });
    };
    debug!(
        "{character} speaks {} of {} lines in S{season}E{episode}",
        matches.len(),
        ordered.len()
    );
    Ok(TimingRecord {
        character: first.speaker.clone(),
        season,
        episode,
        positions: matches.iter().map(|(i, _)| *i as f64 / total).collect(),
    })
}

/// One timing record per (character, episode) across the whole transcript.
///
/// Records are ordered by season and episode, and within an episode by the
/// speaker's first line. Speakers are grouped case-insensitively, as in
/// [`build_timeline`], and keep the spelling of their first line.
pub fn build_timelines(lines: &[TranscriptLine]) -> Vec<TimingRecord> {
    let mut sorted: Vec<&TranscriptLine> = lines.iter().collect();
    sorted.sort_by_key(|l| l.order_key());

    let mut records = Vec::new();
    for ((season, episode), ep_lines) in group_first_seen(sorted, |l| (l.season, l.episode)) {
        let total = ep_lines.len() as f64;
        let indexed = ep_lines.iter().enumerate();
        for (_, hits) in group_first_seen(indexed, |(_, l)| l.speaker.trim().to_uppercase()) {
            let Some((_, first)) = hits.first() else {
                continue;
            };
            records.push(TimingRecord {
                character: first.speaker.clone(),
                season,
                episode,
                positions: hits.iter().map(|(i, _)| *i as f64 / total).collect(),
            });
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode_of(speakers: &[&str]) -> Vec<TranscriptLine> {
        speakers
            .iter()
            .enumerate()
            .map(|(i, s)| TranscriptLine::new(2, 5, i as u32 + 1, *s, "line"))
            .collect()
    }

    #[test]
    fn positions_are_zero_indexed_fractions() {
        let lines = episode_of(&["A", "B", "C", "A"]);
        let rec = build_timeline(&lines, "a", 2, 5).unwrap();
        assert_eq!(rec.character, "A");
        assert_eq!(rec.positions, vec![0.0, 0.75]);
    }

    #[test]
    fn missing_character_is_not_found() {
        let lines = episode_of(&["A", "B"]);
        let err = build_timeline(&lines, "Pops", 2, 5).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "POPS has no lines in S2E5");
        assert!(build_timeline(&lines, "A", 2, 6).unwrap_err().is_not_found());
    }

    #[test]
    fn all_timelines_cover_every_speaker() {
        let mut lines = episode_of(&["A", "B", "A", "C"]);
        lines.push(TranscriptLine::new(1, 1, 1, "B", "earlier"));
        let records = build_timelines(&lines);
        let keys: Vec<_> = records
            .iter()
            .map(|r| (r.season, r.episode, r.character.as_str()))
            .collect();
        assert_eq!(keys, vec![(1, 1, "B"), (2, 5, "A"), (2, 5, "B"), (2, 5, "C")]);
        assert_eq!(records[1].positions, vec![0.0, 0.5]);
        assert_eq!(records[0].positions, vec![0.0]);
    }

    #[test]
    fn speaker_case_does_not_split_records() {
        let lines = episode_of(&["MORDECAI", "Mordecai"]);
        let records = build_timelines(&lines);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].character, "MORDECAI");
        assert_eq!(records[0].positions, vec![0.0, 0.5]);
        let single = build_timeline(&lines, "mordecai", 2, 5).unwrap();
        assert_eq!(single, records[0]);
    }
}
