//! Numeric code tables reported by PDFium.
//!
//! Two independent code spaces: `FPDF_GetLastError` results and annotation
//! subtypes. Both mappings are total; unknown codes render with their value.

use pdfium_text_sys::{
    FPDF_ERR_FILE, FPDF_ERR_FORMAT, FPDF_ERR_PAGE, FPDF_ERR_PASSWORD, FPDF_ERR_SECURITY,
    FPDF_ERR_UNKNOWN,
};
use std::borrow::Cow;

/// Annotation subtype names indexed by `FPDF_ANNOT_*` value.
pub(crate) const ANNOTATION_SUBTYPE_NAMES: [&str; 29] = [
    "UNKNOWN",
    "TEXT",
    "LINK",
    "FREETEXT",
    "LINE",
    "SQUARE",
    "CIRCLE",
    "POLYGON",
    "POLYLINE",
    "HIGHLIGHT",
    "UNDERLINE",
    "SQUIGGLY",
    "STRIKEOUT",
    "STAMP",
    "CARET",
    "INK",
    "POPUP",
    "FILEATTACHMENT",
    "SOUND",
    "MOVIE",
    "WIDGET",
    "SCREEN",
    "PRINTERMARK",
    "TRAPNET",
    "WATERMARK",
    "THREED",
    "RICHMEDIA",
    "XFAWIDGET",
    "REDACT",
];

/// Describe a document load error code from `FPDF_GetLastError`.
///
/// ```
/// use pdfium_text::load_error_message;
///
/// assert_eq!(load_error_message(4), "Password required or incorrect password");
/// assert_eq!(load_error_message(42), "Error code: 42");
/// ```
pub fn load_error_message(code: u64) -> Cow<'static, str> {
    let known = u32::try_from(code).ok().and_then(|code| match code {
        FPDF_ERR_UNKNOWN => Some("Unknown error"),
        FPDF_ERR_FILE => Some("File not found or could not be opened"),
        FPDF_ERR_FORMAT => Some("File not in PDF format or corrupted"),
        FPDF_ERR_PASSWORD => Some("Password required or incorrect password"),
        FPDF_ERR_SECURITY => Some("Unsupported security scheme"),
        FPDF_ERR_PAGE => Some("Page not found or content error"),
        _ => None,
    });
    match known {
        Some(message) => Cow::Borrowed(message),
        None => Cow::Owned(format!("Error code: {code}")),
    }
}

/// Name of an annotation subtype code, `UNKNOWN_{code}` outside 0..=28.
pub fn annotation_subtype_name(code: i32) -> Cow<'static, str> {
    usize::try_from(code)
        .ok()
        .and_then(|index| ANNOTATION_SUBTYPE_NAMES.get(index))
        .map_or_else(|| Cow::Owned(format!("UNKNOWN_{code}")), |name| Cow::Borrowed(*name))
}
