//! Free-text phrase search over the whole transcript.
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::frequency::{sort_by_count, tally};
use crate::model::{SearchHit, TranscriptLine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeHits {
    pub season: u32,
    pub episode: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerHits {
    pub speaker: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub hits: Vec<SearchHit>,
    pub hits_by_episode: Vec<EpisodeHits>,
    pub hits_by_speaker: Vec<SpeakerHits>,
}

impl SearchResult {
    /// No line contains the query.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.hits_by_episode.iter().map(|e| e.count).sum()
    }
}

/// Case-insensitive substring search.
///
/// Unlike phrase counting this does not respect word edges: `dude` also
/// matches `dudes`. A blank query is rejected with
/// [`AnalysisError::EmptyQuery`]; no match is an empty [`SearchResult`].
pub fn search(
    lines: &[TranscriptLine],
    phrase: &str,
    top_speakers: usize,
) -> Result<SearchResult, AnalysisError> {
    let query = phrase.trim().to_lowercase();
    if query.is_empty() {
        return Err(AnalysisError::EmptyQuery);
    }

    let hits: Vec<SearchHit> = lines
        .iter()
        .filter(|l| l.text.to_lowercase().contains(&query))
        .map(|l| SearchHit {
            season: l.season,
            episode: l.episode,
            speaker: l.speaker.clone(),
            text: l.text.clone(),
        })
        .collect();

    let mut by_episode: BTreeMap<(u32, u32), u32> = BTreeMap::new();
    for hit in &hits {
        *by_episode.entry((hit.season, hit.episode)).or_insert(0) += 1;
    }
    let hits_by_episode = by_episode
        .into_iter()
        .map(|((season, episode), count)| EpisodeHits {
            season,
            episode,
            count,
        })
        .collect();

    let mut hits_by_speaker: Vec<SpeakerHits> =
        sort_by_count(tally(hits.iter().map(|h| h.speaker.as_str())))
            .into_iter()
            .map(|(speaker, count)| SpeakerHits {
                speaker: speaker.to_string(),
                count,
            })
            .collect();
    hits_by_speaker.truncate(top_speakers);

    debug!("search {query:?}: {} matching lines", hits.len());
    Ok(SearchResult {
        query,
        hits,
        hits_by_episode,
        hits_by_speaker,
    })
}
