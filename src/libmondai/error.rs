use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing ANS for question {number}")]
    MissingAnswer { number: u64 },
    #[error("{0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("{failed} document(s) failed to convert")]
    BatchFailed { failed: usize },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("cannot serialize questions: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
