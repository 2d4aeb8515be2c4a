// Error taxonomy for the OneSky sync flows.
//
// The provider does not define structured error codes; a rejected request
// carries its response body verbatim so the operator sees exactly what
// OneSky answered.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection, DNS, TLS or body-read failure reported by reqwest.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("{body}")]
    Rejected { status: StatusCode, body: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Writing a downloaded translation failed.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Neither the region-specific nor the language-only bundle directory exists.
    #[error("no bundle directory for locale {locale} (tried {})", display_paths(.tried))]
    MissingLocaleDirectory { locale: String, tried: Vec<PathBuf> },

    #[error("string extraction failed: {0}")]
    Extraction(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Status code of a provider rejection, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SyncError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, SyncError>;
