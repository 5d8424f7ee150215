use std::result;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("unknown export format '{0}' (expected manifest, glyphnames, lilypond, classes or metadata)")]
    UnknownFormat(String),
}

pub type Result<T> = result::Result<T, Error>;
