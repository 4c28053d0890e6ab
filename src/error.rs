//! Error types for the markdown2docx library.
//!
//! Every variant of [`Md2DocxError`] is **fatal**: the conversion stops and no
//! output file is written. Conditions the pipeline can recover from on its own
//! (unrecognised HTML nodes, emphasis nodes without text, a missing output
//! directory) never surface here; they are handled where they occur and only
//! show up in [`crate::output::ConversionStats`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the markdown2docx library.
#[derive(Debug, Error)]
pub enum Md2DocxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Markdown source file was not found.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading an input file.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Document errors ───────────────────────────────────────────────────
    /// A configured style name does not exist in the document's style sheet.
    #[error("Style '{style}' not found in the document style sheet")]
    StyleNotFound { style: String },

    /// An image referenced by the markdown does not exist.
    #[error("Image not found: '{path}'")]
    ImageNotFound { path: PathBuf },

    /// An image exists but could not be decoded.
    #[error("Failed to decode image '{image}': {source}")]
    ImageDecode {
        image: String,
        #[source]
        source: image::ImageError,
    },

    /// A `data:` image URI is not base64 or its payload is corrupt.
    #[error("Invalid data URI image: {detail}")]
    InvalidDataUri { detail: String },

    /// A table has no `<thead>` header cells, so its width is unknown.
    #[error("Table {index} has no header row; cannot determine column count")]
    MissingTableHeader { index: usize },

    /// Data cell count is not a multiple of the header column count.
    #[error("Table {index} is malformed: {cells} data cells do not fill rows of {columns} columns")]
    MalformedTable {
        index: usize,
        cells: usize,
        columns: usize,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// docx-rs failed to pack the document archive.
    #[error("Failed to pack DOCX archive: {0}")]
    PackFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Md2DocxError {
    /// Map an I/O error on an input file to the most specific variant.
    pub(crate) fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Md2DocxError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Md2DocxError::PermissionDenied { path },
            _ => Md2DocxError::ReadFailed { path, source },
        }
    }
}
