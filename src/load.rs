//! Reading transcripts and summary tables.
//!
//! Numeric fields are validated here, before any aggregator sees them:
//! loading stops at the first row whose season, episode or line number is
//! not a positive integer.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::LoadError;
use crate::model::{CharacterSummary, EpisodeStat, SeasonStat, TranscriptLine};

#[derive(Debug, Deserialize)]
struct RawLine {
    season: String,
    episode: String,
    #[serde(default)]
    line_number: Option<String>,
    speaker: String,
    text: String,
}

fn parse_positive(row: usize, field: &'static str, value: &str) -> Result<u32, LoadError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(LoadError::MalformedField {
            row,
            field,
            value: value.to_string(),
        }),
    }
}

/// Parses transcript CSV with a header row.
///
/// Required columns: `season`, `episode`, `speaker`, `text`. A missing or
/// empty `line_number` is filled with the line's position in its episode,
/// counting from 1 in file order. Other columns are ignored.
pub fn read_transcripts<R: Read>(reader: R) -> Result<Vec<TranscriptLine>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut next_number: HashMap<(u32, u32), u32> = HashMap::new();
    let mut lines = Vec::new();
    for (index, record) in rdr.deserialize::<RawLine>().enumerate() {
        let raw = record?;
        let row = index + 1;
        let season = parse_positive(row, "season", &raw.season)?;
        let episode = parse_positive(row, "episode", &raw.episode)?;
        let counter = next_number.entry((season, episode)).or_insert(0);
        *counter += 1;
        let line_number = match raw.line_number.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => parse_positive(row, "line_number", n)?,
            _ => *counter,
        };
        lines.push(TranscriptLine {
            season,
            episode,
            line_number,
            speaker: raw.speaker.trim().to_string(),
            text: raw.text,
        });
    }
    Ok(lines)
}

pub fn load_transcripts(path: &Path) -> Result<Vec<TranscriptLine>, LoadError> {
    let file = File::open(path)?;
    let lines = read_transcripts(BufReader::new(file))?;
    info!("loaded {} transcript lines from {}", lines.len(), path.display());
    Ok(lines)
}

fn load_json_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = File::open(path)?;
    let rows: Vec<T> = serde_json::from_reader(BufReader::new(file))?;
    info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// `character_summary.json`: the precomputed all-time table.
pub fn load_character_summary(path: &Path) -> Result<Vec<CharacterSummary>, LoadError> {
    load_json_table(path)
}

fn check_positive(row: usize, field: &'static str, value: u32) -> Result<(), LoadError> {
    if value == 0 {
        return Err(LoadError::MalformedField {
            row,
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_season_rows(rows: &[SeasonStat]) -> Result<(), LoadError> {
    for (index, row) in rows.iter().enumerate() {
        check_positive(index + 1, "season", row.season)?;
        for &episode in &row.episodes {
            check_positive(index + 1, "episodes", episode)?;
        }
    }
    Ok(())
}

fn check_episode_rows(rows: &[EpisodeStat]) -> Result<(), LoadError> {
    for (index, row) in rows.iter().enumerate() {
        check_positive(index + 1, "season", row.season)?;
        check_positive(index + 1, "episode", row.episode)?;
    }
    Ok(())
}

/// `season_summary.json`. Seasons and episode numbers must be positive.
pub fn load_season_summary(path: &Path) -> Result<Vec<SeasonStat>, LoadError> {
    let rows: Vec<SeasonStat> = load_json_table(path)?;
    check_season_rows(&rows)?;
    Ok(rows)
}

/// `episode_summary.json`. Seasons and episodes must be positive.
pub fn load_episode_summary(path: &Path) -> Result<Vec<EpisodeStat>, LoadError> {
    let rows: Vec<EpisodeStat> = load_json_table(path)?;
    check_episode_rows(&rows)?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_lines_per_episode_when_column_missing() {
        let csv = "season,episode,speaker,text,scene,url\n\
                   1,1,MORDECAI,Dude,park,http://x\n\
                   1,2,RIGBY,Hmph,house,http://y\n\
                   1,1, RIGBY ,Yeah,park,http://x\n";
        let lines = read_transcripts(csv.as_bytes()).unwrap();
        let keys: Vec<_> = lines
            .iter()
            .map(|l| (l.episode, l.line_number, l.speaker.as_str()))
            .collect();
        assert_eq!(keys, vec![(1, 1, "MORDECAI"), (2, 1, "RIGBY"), (1, 2, "RIGBY")]);
    }

    #[test]
    fn explicit_line_numbers_kept() {
        let csv = "season,episode,line_number,speaker,text\n2,3,17,POPS,Jolly good show\n";
        let lines = read_transcripts(csv.as_bytes()).unwrap();
        assert_eq!(lines[0].order_key(), (2, 3, 17));
    }

    #[test]
    fn malformed_season_fails_fast() {
        let csv = "season,episode,speaker,text\n1,1,A,ok\nthree,1,B,bad\n";
        let err = read_transcripts(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::MalformedField { row, field, value } => {
                assert_eq!(row, 2);
                assert_eq!(field, "season");
                assert_eq!(value, "three");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn summary_tables_reject_zero_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let episodes = dir.path().join("episode_summary.json");
        std::fs::write(
            &episodes,
            r#"[{"season":1,"episode":2,"character":"POPS","lines":3,"words":9},
                {"season":1,"episode":0,"character":"POPS","lines":1,"words":2}]"#,
        )
        .unwrap();
        match load_episode_summary(&episodes).unwrap_err() {
            LoadError::MalformedField { row, field, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "episode");
            }
            other => panic!("unexpected error: {other}"),
        }

        let seasons = dir.path().join("season_summary.json");
        std::fs::write(
            &seasons,
            r#"[{"character":"POPS","season":1,"episodes":[0,4],"lines":3,"words":9}]"#,
        )
        .unwrap();
        match load_season_summary(&seasons).unwrap_err() {
            LoadError::MalformedField { field, value, .. } => {
                assert_eq!(field, "episodes");
                assert_eq!(value, "0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_episode_summary_loads() {
        let dir = tempfile::tempdir().unwrap();
        let episodes = dir.path().join("episode_summary.json");
        std::fs::write(
            &episodes,
            r#"[{"season":3,"episode":7,"character":"SKIPS","lines":4,"words":30}]"#,
        )
        .unwrap();
        let rows = load_episode_summary(&episodes).unwrap();
        assert_eq!(rows[0].character, "SKIPS");
        assert_eq!((rows[0].season, rows[0].episode), (3, 7));
    }

    #[test]
    fn zero_episode_rejected() {
        let csv = "season,episode,speaker,text\n1,0,A,ok\n";
        assert!(read_transcripts(csv.as_bytes()).is_err());
    }
}
