//! Rendering result tables as txt, csv, tsv or json, and writing them to disk.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use serde::Serialize;

use crate::error::ExportError;
use crate::frequency::CloudWord;
use crate::model::{
    CharacterSummary, EpisodeStat, Link, PhraseCount, SearchHit, SeasonStat, TimingRecord,
    WordCount,
};
use crate::search::{EpisodeHits, SpeakerHits};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

/// A flat record with a fixed column layout.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

///Neutralizes cells a spreadsheet would read as a formula.
/// # Example
/// ```
/// use dialogue_stats::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)"), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("dude"), "dude");
/// ```
pub fn csv_safe_cell(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

fn join_numbers<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

impl TableRow for WordCount {
    fn headers() -> &'static [&'static str] {
        &["text", "size"]
    }
    fn cells(&self) -> Vec<String> {
        vec![self.text.clone(), self.size.to_string()]
    }
}

impl TableRow for CloudWord {
    fn headers() -> &'static [&'static str] {
        &["text", "size", "font_size"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.text.clone(),
            self.size.to_string(),
            format!("{:.2}", self.font_size),
        ]
    }
}

impl TableRow for PhraseCount {
    fn headers() -> &'static [&'static str] {
        &["phrase", "count"]
    }
    fn cells(&self) -> Vec<String> {
        vec![self.phrase.clone(), self.count.to_string()]
    }
}

impl TableRow for CharacterSummary {
    fn headers() -> &'static [&'static str] {
        &["character", "totalEpisodes", "totalLines", "totalWords"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.character.clone(),
            self.total_episodes.to_string(),
            self.total_lines.to_string(),
            self.total_words.to_string(),
        ]
    }
}

impl TableRow for SeasonStat {
    fn headers() -> &'static [&'static str] {
        &["season", "character", "episodes", "lines", "words"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.season.to_string(),
            self.character.clone(),
            join_numbers(&self.episodes),
            self.lines.to_string(),
            self.words.to_string(),
        ]
    }
}

impl TableRow for EpisodeStat {
    fn headers() -> &'static [&'static str] {
        &["season", "episode", "character", "lines", "words"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.season.to_string(),
            self.episode.to_string(),
            self.character.clone(),
            self.lines.to_string(),
            self.words.to_string(),
        ]
    }
}

impl TableRow for Link {
    fn headers() -> &'static [&'static str] {
        &["source", "target", "value"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.source.clone(),
            self.target.clone(),
            self.value.to_string(),
        ]
    }
}

impl TableRow for TimingRecord {
    fn headers() -> &'static [&'static str] {
        &["character", "season", "episode", "positions"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.character.clone(),
            self.season.to_string(),
            self.episode.to_string(),
            join_numbers(self.positions.iter().map(|p| format!("{p:.4}"))),
        ]
    }
}

impl TableRow for SearchHit {
    fn headers() -> &'static [&'static str] {
        &["season", "episode", "speaker", "text"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.season.to_string(),
            self.episode.to_string(),
            self.speaker.clone(),
            self.text.clone(),
        ]
    }
}

impl TableRow for EpisodeHits {
    fn headers() -> &'static [&'static str] {
        &["season", "episode", "count"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.season.to_string(),
            self.episode.to_string(),
            self.count.to_string(),
        ]
    }
}

impl TableRow for SpeakerHits {
    fn headers() -> &'static [&'static str] {
        &["speaker", "count"]
    }
    fn cells(&self) -> Vec<String> {
        vec![self.speaker.clone(), self.count.to_string()]
    }
}

fn render_delimited<T: TableRow>(rows: &[T], delimiter: u8) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    wtr.write_record(T::headers())?;
    for row in rows {
        wtr.write_record(row.cells().iter().map(|c| csv_safe_cell(c)))?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn render_txt<T: TableRow>(rows: &[T]) -> String {
    let mut out = String::new();
    for row in rows {
        let line = T::headers()
            .iter()
            .zip(row.cells())
            .map(|(h, c)| format!("{h}: {c}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Renders a table in the requested format.
pub fn render<T: TableRow + Serialize>(
    rows: &[T],
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Txt => Ok(render_txt(rows)),
        ExportFormat::Csv => render_delimited(rows, b','),
        ExportFormat::Tsv => render_delimited(rows, b'\t'),
        ExportFormat::Json => render_json(rows),
    }
}

/// Output file name: `<stem>_<YYYYMMDD_HHMMSS>_<table>.<ext>`.
pub fn timestamped_name(stem: &str, table: &str, format: ExportFormat) -> String {
    let local: DateTime<Local> = Local::now();
    format!(
        "{stem}_{}_{table}.{}",
        local.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

///Writes `content` into `dir` under a timestamped name. Returns the path written.
pub fn save_file(
    content: &str,
    dir: &Path,
    stem: &str,
    table: &str,
    format: ExportFormat,
) -> std::io::Result<PathBuf> {
    let path = dir.join(timestamped_name(stem, table, format));

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)?;

    file.write_all(content.as_bytes())?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<WordCount> {
        vec![
            WordCount { text: "dude".into(), size: 3 },
            WordCount { text: "-yeah".into(), size: 1 },
        ]
    }

    #[test]
    fn csv_and_tsv_have_headers_and_safe_cells() {
        let csv = render(&sample(), ExportFormat::Csv).unwrap();
        assert_eq!(csv, "text,size\ndude,3\n'-yeah,1\n");
        let tsv = render(&sample(), ExportFormat::Tsv).unwrap();
        assert!(tsv.starts_with("text\tsize\n"));
    }

    #[test]
    fn txt_and_json() {
        let txt = render(&sample(), ExportFormat::Txt).unwrap();
        assert_eq!(txt.lines().next(), Some("text: dude, size: 3"));
        let json = render(&sample(), ExportFormat::Json).unwrap();
        let parsed: Vec<WordCount> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn nested_fields_are_joined() {
        let rec = TimingRecord {
            character: "A".into(),
            season: 1,
            episode: 2,
            positions: vec![0.0, 0.25],
        };
        assert_eq!(rec.cells()[3], "0.0000;0.2500");
    }

    #[test]
    fn file_name_pattern() {
        let name = timestamped_name("transcripts", "wordfreq", ExportFormat::Csv);
        let re = regex::Regex::new(r"^transcripts_\d{8}_\d{6}_wordfreq\.csv$").unwrap();
        assert!(re.is_match(&name), "{name}");
    }
}
