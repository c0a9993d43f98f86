use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OflightError {
    #[error("missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("unrecognized date {value:?}")]
    DateParse { value: String },
    #[error("failed to read candidate list {}", .path.display())]
    CandidateListRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OflightError>;
