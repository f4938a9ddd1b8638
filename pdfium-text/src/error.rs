//! Error types for pdfium-text

use crate::handle::HandleKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pdfium-text operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Broad category of a [`PdfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The native library could not be located or bound.
    LibraryNotFound,
    /// Opening a document failed.
    DocumentLoad,
    /// A call against a handle failed, the handle was closed, or the
    /// capability is missing from the loaded library.
    Operation,
    /// A caller-supplied index or range was out of bounds.
    Argument,
}

/// Error types for PDF operations
#[derive(Error, Debug)]
pub enum PdfError {
    /// The PDFium shared library could not be opened or lacks required symbols
    #[error("PDFium library not found at {}: {reason}", .path.display())]
    LibraryNotFound { path: PathBuf, reason: String },

    /// No default library name is known for this operating system
    #[error("Unsupported platform for PDFium library resolution: {os}")]
    UnsupportedPlatform { os: String },

    /// Failed to open PDF document
    #[error("Failed to load PDF {document}: {reason} (code {code})")]
    DocumentLoad {
        document: String,
        reason: String,
        code: u64,
    },

    /// The handle was closed (or never valid) when the operation ran
    #[error("{kind} handle is invalid or closed")]
    InvalidHandle { kind: HandleKind },

    /// A native call reported failure
    #[error("{operation} failed: {reason}")]
    OperationFailed { operation: String, reason: String },

    /// The loaded PDFium build does not export this operation
    #[error("Operation {operation} is not supported by this library build")]
    Unsupported { operation: &'static str },

    /// A search has no current match to select
    #[error("No current match")]
    NoCurrentMatch,

    /// Invalid argument (index or range out of bounds)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl PdfError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LibraryNotFound { .. } | Self::UnsupportedPlatform { .. } => {
                ErrorKind::LibraryNotFound
            }
            Self::DocumentLoad { .. } => ErrorKind::DocumentLoad,
            Self::InvalidHandle { .. }
            | Self::OperationFailed { .. }
            | Self::Unsupported { .. }
            | Self::NoCurrentMatch => ErrorKind::Operation,
            Self::InvalidArgument(_) => ErrorKind::Argument,
        }
    }

    pub(crate) fn operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_index(what: &str, index: i32, count: i32) -> Self {
        Self::InvalidArgument(format!(
            "{what} index {index} out of range (valid range 0..{count})"
        ))
    }
}
