#![forbid(unsafe_code)]
//! # dialogue_stats
//!
//! Dialogue statistics for TV show transcripts. Every aggregator is a pure
//! function over in-memory rows and takes the current filter (season,
//! character, query) as an argument.
//!
//! - [`normalize`]: stage-direction stripping, token cleaning, stopwords, optional stemming
//! - [`frequency`]: word clouds, tracked phrase counts, logarithmic size scale
//! - [`rollup`]: per-season character totals and top-N rankings
//! - [`cooccurrence`]: sliding-window co-speaking graph
//! - [`timeline`]: where in an episode a character speaks
//! - [`search`]: phrase search by episode and by speaker
//! - [`summaries`]: character/season/episode tables built from transcript rows
//!
//! Loading ([`load`]) and exporting ([`export`]) live at the edges and are
//! only used by the command-line front end.

pub mod config;
pub mod cooccurrence;
pub mod error;
pub mod export;
pub mod frequency;
pub mod load;
pub mod model;
pub mod normalize;
pub mod rollup;
pub mod search;
pub mod summaries;
pub mod timeline;

pub use config::{AnalysisConfig, StemMode, load_stopwords};
pub use cooccurrence::{build_cooccurrence, pair_key, window_end};
pub use error::{AnalysisError, ExportError, LoadError};
pub use export::{ExportFormat, TableRow, csv_safe_cell, render, render_json, save_file};
pub use frequency::{
    CloudWord, SizeScale, capitalize, count_phrases, count_words, count_words_min,
    group_first_seen, sort_by_count, tally, word_cloud,
};
pub use load::{
    load_character_summary, load_episode_summary, load_season_summary, load_transcripts,
    read_transcripts,
};
pub use model::{
    CharacterSummary, CooccurrenceGraph, EpisodeStat, Link, Node, PhraseCount, SearchHit,
    SeasonFilter, SeasonStat, TimingRecord, TranscriptLine, WordCount,
};
pub use normalize::{
    DEFAULT_STOPWORDS, Normalizer, Tokens, clean_text, strip_parentheticals, suffix_stem,
};
pub use rollup::{Rankings, rankings, rollup_by_season, top_by_episodes, top_by_words};
pub use search::{EpisodeHits, SearchResult, SpeakerHits, search};
pub use summaries::{Summaries, canonical_speaker, character_episodes, word_count};
pub use timeline::{build_timeline, build_timelines};
