use thiserror::Error;

/// Outcomes of an aggregation that are not a regular result.
///
/// Empty results are never errors: an aggregator that finds nothing returns
/// an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no character selected")]
    NoCharacterSelected,

    #[error("search query is empty")]
    EmptyQuery,

    #[error("{character} has no lines in S{season}E{episode}")]
    NoLinesInEpisode {
        character: String,
        season: u32,
        episode: u32,
    },

    #[error("invalid season filter {0:?}: expected \"all\" or a positive integer")]
    InvalidSeason(String),
}

impl AnalysisError {
    /// The caller asked for something without supplying what it needs.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoCharacterSelected
                | AnalysisError::EmptyQuery
                | AnalysisError::InvalidSeason(_)
        )
    }

    /// Informational: the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalysisError::NoLinesInEpisode { .. })
    }
}

/// Failures while reading transcripts or summary tables.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: field `{field}` must be a positive integer, got {value:?}")]
    MalformedField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Failures while rendering or writing results.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
