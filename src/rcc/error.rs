#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RccError {
    #[error("{}: malformed manifest: {reason}", .path.display())]
    ManifestMalformed { path: PathBuf, reason: String },

    #[error("{}: unresolved reference: {reason}", .path.display())]
    ReferenceUnresolved { path: PathBuf, reason: String },

    #[error("{}: io: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid resource bundle: {0}")]
    Invalid(String),

    #[error("{}: artifact is out of date ({reason})", .path.display())]
    Stale { path: PathBuf, reason: String },
}

impl RccError {
    pub(crate) fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        RccError::ManifestMalformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(path: &Path, reason: impl Into<String>) -> Self {
        RccError::ReferenceUnresolved {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        RccError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type RccResult<T> = Result<T, RccError>;
