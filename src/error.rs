//! Error types for loading the content file and preparing it offline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the static content file.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The file could not be read (usually missing).
    #[error("failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a valid array of chapters.
    #[error("malformed content file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but holds no chapters at all.
    #[error("content file {0} contains no chapters")]
    Empty(PathBuf),
}

/// Errors raised by the offline data-preparation commands.
#[derive(Debug, Error)]
pub enum PrepError {
    /// HTTP request failed or returned a non-success status.
    #[error("network error while fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a payload we could not interpret.
    #[error("unexpected upstream payload from {url}: {message}")]
    Upstream { url: String, message: String },

    /// Merged data set is structurally wrong (wrong chapter count etc.).
    #[error("merge failed: {0}")]
    Merge(String),

    /// Bismillah prefix detection did not find a usable prefix.
    #[error("bismillah detection failed: {0}")]
    Bismillah(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}
