#![forbid(unsafe_code)]
//! # dialogue_stats CLI
//!
//! Command-line front end for the `dialogue_stats` crate. Each subcommand
//! loads a transcript CSV (or the precomputed summary tables), runs one
//! aggregator and prints or exports the result.
//!
//! ## Example
//! ```bash
//! cargo run --release -- words data/regular_show_transcripts.csv --character Rigby --season 2
//! cargo run --release -- --export-format json cooccur data/regular_show_transcripts.csv --window 5
//! ```
//!
//! See `--help` for all available options.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use dialogue_stats::{
    AnalysisConfig, AnalysisError, EpisodeStat, ExportFormat, Normalizer, SeasonFilter, StemMode,
    Summaries, TableRow, build_cooccurrence, build_timeline, build_timelines, character_episodes,
    count_phrases, count_words_min, load_character_summary, load_episode_summary,
    load_season_summary, load_stopwords, load_transcripts, rankings, render, render_json,
    save_file, search, word_cloud,
};
use log::{error, info};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON configuration file (any subset of the tunable constants)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    /// Output format for export (txt, csv, tsv, json)
    #[arg(long, global = true, value_enum, default_value = "txt")]
    export_format: ExportFormat,

    /// Write results into this directory instead of printing them
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Word frequencies of one character's lines (word cloud data)
    Words {
        transcripts: PathBuf,
        #[arg(long)]
        character: Option<String>,
        /// Season number or "all"
        #[arg(long, default_value = "all")]
        season: SeasonFilter,
        #[arg(long, value_enum)]
        stem: Option<StemMode>,
        /// Drop words seen fewer times than this
        #[arg(long)]
        min_occurrences: Option<u32>,
    },
    /// Whole-word counts of the tracked phrases
    Phrases {
        transcripts: PathBuf,
        #[arg(long, default_value = "all")]
        season: SeasonFilter,
        /// Replace the tracked phrase list (repeatable)
        #[arg(long = "phrase")]
        phrases: Vec<String>,
    },
    /// Top characters by episodes and by words
    Rollup {
        /// character_summary.json (all-time table)
        #[arg(long)]
        characters: PathBuf,
        /// season_summary.json
        #[arg(long)]
        seasons: PathBuf,
        #[arg(long, default_value = "all")]
        season: SeasonFilter,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Co-occurrence graph of the tracked characters
    Cooccur {
        transcripts: PathBuf,
        #[arg(long, default_value = "all")]
        season: SeasonFilter,
        #[arg(long, allow_negative_numbers = true)]
        window: Option<i64>,
        /// Keep only links at least this heavy. Defaults to `min_link_weight`
        /// from the config (10), which prunes to the network view; pass 0 for
        /// the full graph
        #[arg(long)]
        min_weight: Option<u32>,
    },
    /// Positions of a character's lines inside one episode
    Timeline {
        transcripts: PathBuf,
        /// Character to locate (repeatable)
        #[arg(long = "character")]
        characters: Vec<String>,
        #[arg(long)]
        season: Option<u32>,
        #[arg(long)]
        episode: Option<u32>,
        /// Emit the timing table for every character and episode
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Case-insensitive phrase search
    Search {
        transcripts: PathBuf,
        query: String,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Build character, season and episode summary tables
    Summarize {
        transcripts: PathBuf,
        /// Only print this character's lines and words per episode
        #[arg(long)]
        character: Option<String>,
    },
    /// Lines and words per episode for one character, from episode_summary.json
    Detail {
        #[arg(long)]
        episodes: PathBuf,
        #[arg(long)]
        character: String,
    },
}

struct Output {
    format: ExportFormat,
    out_dir: Option<PathBuf>,
    stem: String,
}

impl Output {
    fn emit(&self, content: &str, table: &str) -> Result<(), Box<dyn Error>> {
        match &self.out_dir {
            Some(dir) => {
                let path = save_file(content, dir, &self.stem, table, self.format)?;
                println!("Saved {}", path.display());
            }
            None => println!("{content}"),
        }
        Ok(())
    }

    fn table<T: TableRow + Serialize>(
        &self,
        rows: &[T],
        table: &str,
    ) -> Result<(), Box<dyn Error>> {
        self.emit(&render(rows, self.format)?, table)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string())
}

fn build_config(cli: &Cli) -> Result<AnalysisConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(path) = &cli.stopwords {
        config.extra_stopwords.extend(load_stopwords(path)?);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = build_config(&cli)?;
    let input = match &cli.command {
        Command::Words { transcripts, .. }
        | Command::Phrases { transcripts, .. }
        | Command::Cooccur { transcripts, .. }
        | Command::Timeline { transcripts, .. }
        | Command::Search { transcripts, .. }
        | Command::Summarize { transcripts, .. } => transcripts.clone(),
        Command::Rollup { characters, .. } => characters.clone(),
        Command::Detail { episodes, .. } => episodes.clone(),
    };
    let out = Output {
        format: cli.export_format,
        out_dir: cli.out_dir.clone(),
        stem: file_stem(&input),
    };

    match cli.command {
        Command::Words {
            transcripts,
            character,
            season,
            stem,
            min_occurrences,
        } => {
            if let Some(stem) = stem {
                config.stem_mode = stem;
            }
            let min = min_occurrences.unwrap_or(config.min_word_occurrences);
            let lines = load_transcripts(&transcripts)?;
            let normalizer = Normalizer::new(&config);
            let counts = count_words_min(&lines, season, character.as_deref(), &normalizer, min)?;
            if counts.is_empty() {
                println!(
                    "No words found for {} (season {season}).",
                    character.unwrap_or_default().to_uppercase()
                );
                return Ok(());
            }
            out.table(&word_cloud(&counts, config.font_range), "wordfreq")?;
        }
        Command::Phrases {
            transcripts,
            season,
            phrases,
        } => {
            let phrases = if phrases.is_empty() {
                config.tracked_phrases.clone()
            } else {
                phrases
            };
            let lines = load_transcripts(&transcripts)?;
            out.table(&count_phrases(&lines, season, &phrases), "phrases")?;
        }
        Command::Rollup {
            characters,
            seasons,
            season,
            top,
        } => {
            let all_time = load_character_summary(&characters)?;
            let season_stats = load_season_summary(&seasons)?;
            let ranked = rankings(season, &all_time, &season_stats, top.unwrap_or(config.top_n));
            if out.format == ExportFormat::Json {
                out.emit(&render_json(&ranked)?, "rankings")?;
            } else {
                out.table(&ranked.by_episodes, "top_episodes")?;
                out.table(&ranked.by_words, "top_words")?;
            }
        }
        Command::Cooccur {
            transcripts,
            season,
            window,
            min_weight,
        } => {
            let lines = load_transcripts(&transcripts)?;
            let window = window.unwrap_or(config.window_size);
            let graph = build_cooccurrence(&lines, season, window, &config.tracked_set())
                .with_min_weight(min_weight.unwrap_or(config.min_link_weight));
            info!("graph has {} nodes and {} links", graph.nodes.len(), graph.links.len());
            if out.format == ExportFormat::Json {
                out.emit(&render_json(&graph)?, "cooccurrence")?;
            } else {
                out.table(&graph.links, "cooccurrence")?;
            }
        }
        Command::Timeline {
            transcripts,
            characters,
            season,
            episode,
            all,
        } => {
            let lines = load_transcripts(&transcripts)?;
            if all {
                out.table(&build_timelines(&lines), "timing")?;
                return Ok(());
            }
            let (Some(season), Some(episode)) = (season, episode) else {
                return Err("--season and --episode are required unless --all is given".into());
            };
            if characters.is_empty() {
                return Err(AnalysisError::NoCharacterSelected.into());
            }
            let mut records = Vec::new();
            for character in &characters {
                match build_timeline(&lines, character, season, episode) {
                    Ok(record) => records.push(record),
                    Err(e) if e.is_not_found() => println!("{e}."),
                    Err(e) => return Err(e.into()),
                }
            }
            if !records.is_empty() {
                out.table(&records, "timing")?;
            }
        }
        Command::Search {
            transcripts,
            query,
            top,
        } => {
            let lines = load_transcripts(&transcripts)?;
            let result = search(&lines, &query, top.unwrap_or(config.search_top_speakers))?;
            if result.is_empty() {
                println!("No occurrences of \"{}\" found.", result.query);
                return Ok(());
            }
            if out.format == ExportFormat::Json {
                out.emit(&render_json(&result)?, "search")?;
            } else {
                out.table(&result.hits_by_episode, "search_episodes")?;
                out.table(&result.hits_by_speaker, "search_speakers")?;
            }
        }
        Command::Summarize {
            transcripts,
            character,
        } => {
            let lines = load_transcripts(&transcripts)?;
            let summaries = Summaries::from_lines(&lines, &config.dropped_set());
            if let Some(character) = character {
                let rows = summaries.character_episodes(&character);
                return episode_detail(&out, rows, &character);
            }
            out.table(&summaries.characters, "character_summary")?;
            out.table(&summaries.seasons, "season_summary")?;
            out.table(&summaries.episodes, "episode_summary")?;
        }
        Command::Detail {
            episodes,
            character,
        } => {
            let table = load_episode_summary(&episodes)?;
            episode_detail(&out, character_episodes(&table, &character), &character)?;
        }
    }
    Ok(())
}

fn episode_detail(
    out: &Output,
    rows: Vec<&EpisodeStat>,
    character: &str,
) -> Result<(), Box<dyn Error>> {
    if character.trim().is_empty() {
        return Err(AnalysisError::NoCharacterSelected.into());
    }
    if rows.is_empty() {
        println!("{} has no lines.", character.trim().to_uppercase());
        return Ok(());
    }
    let rows: Vec<EpisodeStat> = rows.into_iter().cloned().collect();
    out.table(&rows, "character_episodes")
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        process::exit(1);
    }
}
