//! Error types for page selection, extraction runs and the settings record.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A page-range expression that could not be turned into a page set.
///
/// These are always detected before any file is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A token does not match `N` or `N-M`.
    #[error("Malformed page range: {0:?}")]
    Malformed(String),

    /// A range runs backwards, or names page zero where that is not allowed.
    #[error("Invalid page bounds: {start}-{end}")]
    InvalidBounds { start: u32, end: u32 },

    /// Nothing is left to extract.
    #[error("Page range selects no pages")]
    EmptyPageSet,
}

/// A failure that aborts an extraction run.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The source could not be read or parsed as a PDF.
    #[error("Failed to open PDF {path}: {reason}")]
    DocumentOpen { path: PathBuf, reason: String },

    /// One page could not be copied or rasterized.
    #[error("Failed to process page {page}: {reason}")]
    PageRender { page: u32, reason: String },

    /// The destination could not be created or written.
    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The page selection became empty against the opened document.
    #[error(transparent)]
    Selection(#[from] RangeError),
}

impl ExtractError {
    pub(crate) fn page(page: u32, reason: impl ToString) -> Self {
        ExtractError::PageRender {
            page,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExtractError::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

/// Reading or writing the persisted settings record failed.
///
/// Never fatal to an extraction; callers log it and carry on.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt settings record at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
