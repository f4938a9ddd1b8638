//! Locating the PDFium shared library.

use crate::error::{PdfError, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the PDFium shared library to load.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Which PDFium shared library to bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    library_path: PathBuf,
}

impl LibraryConfig {
    /// Resolve from `PDFIUM_LIB_PATH`, falling back to the platform default
    /// library name (searched on the loader path).
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(LIB_PATH_ENV) {
            Some(path) if !path.is_empty() => {
                log::debug!("Using PDFium library from {LIB_PATH_ENV}: {path:?}");
                Ok(Self::with_path(path))
            }
            _ => Ok(Self::with_path(default_library_name(std::env::consts::OS)?)),
        }
    }

    /// Use an explicit library path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: path.into(),
        }
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }
}

/// Default PDFium library file name for an operating system as reported by
/// `std::env::consts::OS`.
pub fn default_library_name(os: &str) -> Result<&'static str> {
    match os {
        "macos" => Ok("libpdfium.dylib"),
        "linux" => Ok("libpdfium.so"),
        "windows" => Ok("pdfium.dll"),
        other => Err(PdfError::UnsupportedPlatform {
            os: other.to_string(),
        }),
    }
}
