//! Tunable constants for the aggregators.
//!
//! Every field has a default, so a configuration file only needs to name the
//! values it changes. Unknown fields are rejected.
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Optional post-processing of normalized tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StemMode {
    #[default]
    Off,
    /// Strip `'s`, `s`, `ing`, `ly`, `ed` in that order.
    Suffix,
    /// English Snowball stemmer.
    Snowball,
}

fn default_min_token_len() -> usize {
    2
}

fn default_consonant_run_min() -> usize {
    3
}

fn default_min_word_occurrences() -> u32 {
    1
}

fn default_font_range() -> (f64, f64) {
    (10.0, 100.0)
}

fn default_window_size() -> i64 {
    5
}

fn default_min_link_weight() -> u32 {
    10
}

fn default_top_n() -> usize {
    10
}

fn default_tracked_characters() -> Vec<String> {
    [
        "MORDECAI",
        "RIGBY",
        "MUSCLE MAN",
        "BENSON",
        "POPS",
        "SKIPS",
        "HI-FIVE GHOST",
        "EILEEN",
        "MARGARET",
        "CJ",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_tracked_phrases() -> Vec<String> {
    [
        "dude",
        "bro",
        "hmph",
        "ooohhhh",
        "you're fired",
        "my mom",
        "jolly good show",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_dropped_speakers() -> Vec<String> {
    ["REGULAR SHOW", "EVERYONE", "MAN", "WOMAN", "ANNOUNCER"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Tokens with at most this many characters are dropped.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Vowel-free tokens at least this long are treated as noise.
    #[serde(default = "default_consonant_run_min")]
    pub consonant_run_min: usize,

    #[serde(default)]
    pub extra_stopwords: Vec<String>,

    #[serde(default)]
    pub stem_mode: StemMode,

    #[serde(default = "default_min_word_occurrences")]
    pub min_word_occurrences: u32,

    /// Display magnitude range for the word size scale.
    #[serde(default = "default_font_range")]
    pub font_range: (f64, f64),

    #[serde(default = "default_window_size")]
    pub window_size: i64,

    #[serde(default = "default_min_link_weight")]
    pub min_link_weight: u32,

    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default = "default_top_n")]
    pub search_top_speakers: usize,

    #[serde(default = "default_tracked_characters")]
    pub tracked_characters: Vec<String>,

    #[serde(default = "default_tracked_phrases")]
    pub tracked_phrases: Vec<String>,

    #[serde(default = "default_dropped_speakers")]
    pub dropped_speakers: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
            consonant_run_min: default_consonant_run_min(),
            extra_stopwords: Vec::new(),
            stem_mode: StemMode::default(),
            min_word_occurrences: default_min_word_occurrences(),
            font_range: default_font_range(),
            window_size: default_window_size(),
            min_link_weight: default_min_link_weight(),
            top_n: default_top_n(),
            search_top_speakers: default_top_n(),
            tracked_characters: default_tracked_characters(),
            tracked_phrases: default_tracked_phrases(),
            dropped_speakers: default_dropped_speakers(),
        }
    }
}

impl AnalysisConfig {
    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&raw)?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn tracked_set(&self) -> HashSet<String> {
        self.tracked_characters
            .iter()
            .map(|s| s.trim().to_uppercase())
            .collect()
    }

    pub fn dropped_set(&self) -> HashSet<String> {
        self.dropped_speakers
            .iter()
            .map(|s| s.trim().to_uppercase())
            .collect()
    }
}

/// Reads a stopword file: one word per line, blank lines and `#` comments ignored.
pub fn load_stopwords(path: &Path) -> Result<Vec<String>, LoadError> {
    let raw = fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect())
}
