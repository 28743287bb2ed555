//! Per-season character totals and the two top-N rankings drawn from them.
use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::frequency::group_first_seen;
use crate::model::{CharacterSummary, SeasonFilter, SeasonStat};

/// Groups the rows of `season` by character.
///
/// Episodes are unioned, so a character listed twice for the same episode
/// counts it once. Output keeps first-grouping order.
pub fn rollup_by_season(stats: &[SeasonStat], season: u32) -> Vec<CharacterSummary> {
    let groups = group_first_seen(
        stats.iter().filter(|s| s.season == season),
        |s| s.character.clone(),
    );
    groups
        .into_iter()
        .map(|(character, rows)| {
            let episodes: BTreeSet<u32> =
                rows.iter().flat_map(|r| r.episodes.iter().copied()).collect();
            CharacterSummary {
                character,
                total_episodes: episodes.len() as u32,
                total_lines: rows.iter().map(|r| r.lines).sum(),
                total_words: rows.iter().map(|r| r.words).sum(),
            }
        })
        .collect()
}

fn top_by<K: Ord>(
    summaries: &[CharacterSummary],
    n: usize,
    key: impl Fn(&CharacterSummary) -> K,
) -> Vec<CharacterSummary> {
    let mut ranked = summaries.to_vec();
    // stable: ties keep grouping order
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked.truncate(n);
    ranked
}

pub fn top_by_episodes(summaries: &[CharacterSummary], n: usize) -> Vec<CharacterSummary> {
    top_by(summaries, n, |s| s.total_episodes)
}

pub fn top_by_words(summaries: &[CharacterSummary], n: usize) -> Vec<CharacterSummary> {
    top_by(summaries, n, |s| s.total_words)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rankings {
    pub by_episodes: Vec<CharacterSummary>,
    pub by_words: Vec<CharacterSummary>,
}

/// Top-`n` characters by episodes and by words.
///
/// `SeasonFilter::All` ranks the precomputed all-time table as is; a single
/// season is rolled up from `season_stats`.
pub fn rankings(
    filter: SeasonFilter,
    all_time: &[CharacterSummary],
    season_stats: &[SeasonStat],
    n: usize,
) -> Rankings {
    let rolled;
    let summaries = match filter {
        SeasonFilter::All => all_time,
        SeasonFilter::Season(s) => {
            rolled = rollup_by_season(season_stats, s);
            debug!("season {s}: rolled up {} characters", rolled.len());
            &rolled[..]
        }
    };
    Rankings {
        by_episodes: top_by_episodes(summaries, n),
        by_words: top_by_words(summaries, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(character: &str, season: u32, episodes: &[u32], words: u64) -> SeasonStat {
        SeasonStat {
            character: character.to_string(),
            season,
            episodes: episodes.iter().copied().collect(),
            lines: 1,
            words,
        }
    }

    #[test]
    fn duplicate_episode_rows_collapse() {
        let stats = vec![
            stat("RIGBY", 1, &[1, 2], 10),
            stat("MORDECAI", 1, &[1], 30),
            stat("RIGBY", 1, &[2, 3], 5),
            stat("RIGBY", 2, &[1], 100),
        ];
        let rolled = rollup_by_season(&stats, 1);
        assert_eq!(rolled.len(), 2);
        assert_eq!(rolled[0].character, "RIGBY");
        assert_eq!(rolled[0].total_episodes, 3);
        assert_eq!(rolled[0].total_words, 15);
        assert_eq!(rolled[0].total_lines, 2);
        assert_eq!(rolled[1].character, "MORDECAI");
    }

    #[test]
    fn rankings_are_stable_and_truncated() {
        let stats = vec![
            stat("A", 1, &[1], 5),
            stat("B", 1, &[1, 2], 5),
            stat("C", 1, &[3], 50),
        ];
        let r = rankings(SeasonFilter::Season(1), &[], &stats, 2);
        let by_ep: Vec<_> = r.by_episodes.iter().map(|s| s.character.as_str()).collect();
        let by_w: Vec<_> = r.by_words.iter().map(|s| s.character.as_str()).collect();
        assert_eq!(by_ep, vec!["B", "A"]);
        assert_eq!(by_w, vec!["C", "A"]);
    }

    #[test]
    fn all_uses_precomputed_table() {
        let all_time = vec![CharacterSummary {
            character: "POPS".into(),
            total_episodes: 7,
            total_lines: 9,
            total_words: 40,
        }];
        let r = rankings(SeasonFilter::All, &all_time, &[stat("X", 1, &[1], 1)], 10);
        assert_eq!(r.by_episodes, all_time);
        assert_eq!(r.by_words, all_time);
    }
}
