//! Annotation snapshots.
//!
//! Annotations are read eagerly into owned [`Annotation`] values; no native
//! annotation handle outlives the call that read it. See
//! [`Document::annotations`](crate::Document::annotations).
//!
//! ```no_run
//! use pdfium_text::Pdfium;
//!
//! let pdfium = Pdfium::new()?;
//! let doc = pdfium.open_document("document.pdf", None)?;
//!
//! for annot in doc.annotations()? {
//!     println!(
//!         "page {} #{}: {} at {:?} {:?}",
//!         annot.page_index, annot.index, annot.subtype, annot.rect, annot.contents
//!     );
//! }
//! # Ok::<(), pdfium_text::PdfError>(())
//! ```

use crate::codes::annotation_subtype_name;
use pdfium_text_sys::FS_RECTF;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Annotation subtype as reported by `FPDFAnnot_GetSubtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationSubtype {
    Unknown,
    /// Sticky note
    Text,
    Link,
    FreeText,
    Line,
    Square,
    Circle,
    Polygon,
    Polyline,
    Highlight,
    Underline,
    Squiggly,
    Strikeout,
    Stamp,
    Caret,
    /// Freehand drawing
    Ink,
    Popup,
    FileAttachment,
    Sound,
    Movie,
    /// Form field
    Widget,
    Screen,
    PrinterMark,
    TrapNet,
    Watermark,
    ThreeD,
    RichMedia,
    XfaWidget,
    Redact,
    /// A code outside the known range, kept verbatim.
    Other(i32),
}

impl AnnotationSubtype {
    /// Map a raw subtype code. Total: unknown codes become [`Self::Other`].
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Text,
            2 => Self::Link,
            3 => Self::FreeText,
            4 => Self::Line,
            5 => Self::Square,
            6 => Self::Circle,
            7 => Self::Polygon,
            8 => Self::Polyline,
            9 => Self::Highlight,
            10 => Self::Underline,
            11 => Self::Squiggly,
            12 => Self::Strikeout,
            13 => Self::Stamp,
            14 => Self::Caret,
            15 => Self::Ink,
            16 => Self::Popup,
            17 => Self::FileAttachment,
            18 => Self::Sound,
            19 => Self::Movie,
            20 => Self::Widget,
            21 => Self::Screen,
            22 => Self::PrinterMark,
            23 => Self::TrapNet,
            24 => Self::Watermark,
            25 => Self::ThreeD,
            26 => Self::RichMedia,
            27 => Self::XfaWidget,
            28 => Self::Redact,
            other => Self::Other(other),
        }
    }

    /// The raw `FPDF_ANNOT_*` code.
    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Text => 1,
            Self::Link => 2,
            Self::FreeText => 3,
            Self::Line => 4,
            Self::Square => 5,
            Self::Circle => 6,
            Self::Polygon => 7,
            Self::Polyline => 8,
            Self::Highlight => 9,
            Self::Underline => 10,
            Self::Squiggly => 11,
            Self::Strikeout => 12,
            Self::Stamp => 13,
            Self::Caret => 14,
            Self::Ink => 15,
            Self::Popup => 16,
            Self::FileAttachment => 17,
            Self::Sound => 18,
            Self::Movie => 19,
            Self::Widget => 20,
            Self::Screen => 21,
            Self::PrinterMark => 22,
            Self::TrapNet => 23,
            Self::Watermark => 24,
            Self::ThreeD => 25,
            Self::RichMedia => 26,
            Self::XfaWidget => 27,
            Self::Redact => 28,
            Self::Other(code) => *code,
        }
    }

    /// Upper-case name, e.g. `HIGHLIGHT`, or `UNKNOWN_{code}`.
    pub fn name(&self) -> Cow<'static, str> {
        annotation_subtype_name(self.code())
    }
}

impl fmt::Display for AnnotationSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for AnnotationSubtype {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

/// Annotation rectangle in page coordinates.
///
/// Fields follow the `FS_RECTF` layout (left, top, right, bottom). Values
/// are passed through as PDFium reports them; `left <= right` and
/// `bottom <= top` are not guaranteed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnnotationRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl AnnotationRect {
    pub fn width(&self) -> f32 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f32 {
        (self.top - self.bottom).abs()
    }
}

impl From<FS_RECTF> for AnnotationRect {
    fn from(rect: FS_RECTF) -> Self {
        Self {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        }
    }
}

/// An annotation read from a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Zero-based page the annotation was read from.
    pub page_index: i32,
    /// Zero-based position within the page's annotation list.
    pub index: i32,
    pub subtype: AnnotationSubtype,
    pub rect: AnnotationRect,
    /// The `Contents` entry, or empty when the annotation has none.
    pub contents: String,
}
