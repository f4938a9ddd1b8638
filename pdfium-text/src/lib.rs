//! # pdfium-text
//!
//! Safe access to PDFium's document, annotation and text APIs.
//!
//! The crate binds a PDFium shared library at runtime and wraps its opaque
//! handles in owned Rust types:
//!
//! - **Documents and pages** with explicit, idempotent close and
//!   drop-guaranteed release
//! - **Annotations** read into owned snapshots
//! - **Text** extraction, character geometry, search, selections and web
//!   link detection
//!
//! Every native operation goes through the [`PdfiumApi`] capability table.
//! Operations missing from the loaded PDFium build fail with
//! [`PdfError::Unsupported`] instead of at bind time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfium_text::Pdfium;
//!
//! // Binds $PDFIUM_LIB_PATH (or the platform default) and initializes once
//! let pdfium = Pdfium::new()?;
//!
//! let doc = pdfium.open_document("document.pdf", None)?;
//! for index in 0..doc.page_count()? {
//!     let page = doc.load_page(index)?;
//!     let text = page.text_page()?;
//!     println!("--- page {index} ---\n{}", text.all_text()?);
//! }
//!
//! for annot in doc.annotations()? {
//!     println!("{} on page {}: {}", annot.subtype, annot.page_index, annot.contents);
//! }
//! # Ok::<(), pdfium_text::PdfError>(())
//! ```
//!
//! ## Threading
//!
//! PDFium is not thread-safe. Documents, pages and text objects hold raw
//! handles and are neither `Send` nor `Sync`.

mod annotation;
mod capability;
mod codes;
mod config;
mod document;
mod error;
mod handle;
mod library;
mod link;
mod marshal;
mod search;
mod selection;
mod text;

pub use annotation::{Annotation, AnnotationRect, AnnotationSubtype};
pub use capability::{Operation, PdfiumApi};
pub use codes::{annotation_subtype_name, load_error_message};
pub use config::{default_library_name, LibraryConfig, LIB_PATH_ENV};
pub use document::{Document, DocumentSource, Page};
pub use error::{ErrorKind, PdfError, Result};
pub use handle::HandleKind;
pub use library::Pdfium;
pub use link::{TextLink, TextRange};
pub use search::{SearchFlags, TextSearch};
pub use selection::TextSelection;
pub use text::{CharBox, TextPage, DEFAULT_POSITION_TOLERANCE};

/// Raw FFI types used by [`PdfiumApi`] implementations
pub use pdfium_text_sys as sys;
