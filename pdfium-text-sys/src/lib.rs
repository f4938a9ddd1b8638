//! FFI surface for PDFium's document, annotation and text APIs
//!
//! This crate provides the low-level types of the PDFium C API together with
//! [`PdfiumBindings`], a symbol table resolved by name from a PDFium shared
//! library at runtime. Nothing here validates handles or buffers; the safe
//! layer lives in `pdfium-text`.
//!
//! Only the subset of `fpdfview.h`, `fpdf_annot.h`, `fpdf_text.h` and
//! `fpdf_doc.h` needed for page geometry, annotations, text, search and web
//! links is declared.
//!
//! # Optional symbols
//!
//! Some PDFium builds ship without the annotation or web-link modules. Those
//! entry points are stored as `Option<fn>` and resolved once in
//! [`PdfiumBindings::load`]; a missing required symbol fails the load.
//!
//! ```no_run
//! use pdfium_text_sys::PdfiumBindings;
//!
//! let bindings = unsafe { PdfiumBindings::load("libpdfium.so") }?;
//! unsafe { (bindings.FPDF_InitLibrary)() };
//!
//! if bindings.FPDFLink_LoadWebLinks.is_none() {
//!     println!("web link extraction is not available in this build");
//! }
//! # Ok::<(), pdfium_text_sys::BindError>(())
//! ```

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use libc::{c_char, c_double, c_float, c_int, c_ulong, c_ushort, c_void};
use libloading::Library;
use std::ffi::OsStr;
use std::path::PathBuf;

// ========================================
// Opaque handle types
// ========================================

#[repr(C)]
pub struct fpdf_document_t__ {
    _unused: [u8; 0],
}
pub type FPDF_DOCUMENT = *mut fpdf_document_t__;

#[repr(C)]
pub struct fpdf_page_t__ {
    _unused: [u8; 0],
}
pub type FPDF_PAGE = *mut fpdf_page_t__;

#[repr(C)]
pub struct fpdf_annotation_t__ {
    _unused: [u8; 0],
}
pub type FPDF_ANNOTATION = *mut fpdf_annotation_t__;

#[repr(C)]
pub struct fpdf_textpage_t__ {
    _unused: [u8; 0],
}
pub type FPDF_TEXTPAGE = *mut fpdf_textpage_t__;

#[repr(C)]
pub struct fpdf_schhandle_t__ {
    _unused: [u8; 0],
}
pub type FPDF_SCHHANDLE = *mut fpdf_schhandle_t__;

#[repr(C)]
pub struct fpdf_pagelink_t__ {
    _unused: [u8; 0],
}
pub type FPDF_PAGELINK = *mut fpdf_pagelink_t__;

// ========================================
// Scalar and string typedefs
// ========================================

pub type FPDF_BOOL = c_int;
pub type FPDF_DWORD = c_ulong;
pub type FPDF_WCHAR = c_ushort;
pub type FPDF_STRING = *const c_char;
pub type FPDF_BYTESTRING = *const c_char;
pub type FPDF_WIDESTRING = *const FPDF_WCHAR;
pub type FPDF_ANNOTATION_SUBTYPE = c_int;

/// Rectangle as laid out by `fpdfview.h`: left, top, right, bottom.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct FS_RECTF {
    pub left: c_float,
    pub top: c_float,
    pub right: c_float,
    pub bottom: c_float,
}

// ========================================
// Constants
// ========================================

pub const FPDF_ERR_SUCCESS: u32 = 0;
pub const FPDF_ERR_UNKNOWN: u32 = 1;
pub const FPDF_ERR_FILE: u32 = 2;
pub const FPDF_ERR_FORMAT: u32 = 3;
pub const FPDF_ERR_PASSWORD: u32 = 4;
pub const FPDF_ERR_SECURITY: u32 = 5;
pub const FPDF_ERR_PAGE: u32 = 6;

pub const FPDF_ANNOT_UNKNOWN: u32 = 0;
pub const FPDF_ANNOT_TEXT: u32 = 1;
pub const FPDF_ANNOT_LINK: u32 = 2;
pub const FPDF_ANNOT_FREETEXT: u32 = 3;
pub const FPDF_ANNOT_LINE: u32 = 4;
pub const FPDF_ANNOT_SQUARE: u32 = 5;
pub const FPDF_ANNOT_CIRCLE: u32 = 6;
pub const FPDF_ANNOT_POLYGON: u32 = 7;
pub const FPDF_ANNOT_POLYLINE: u32 = 8;
pub const FPDF_ANNOT_HIGHLIGHT: u32 = 9;
pub const FPDF_ANNOT_UNDERLINE: u32 = 10;
pub const FPDF_ANNOT_SQUIGGLY: u32 = 11;
pub const FPDF_ANNOT_STRIKEOUT: u32 = 12;
pub const FPDF_ANNOT_STAMP: u32 = 13;
pub const FPDF_ANNOT_CARET: u32 = 14;
pub const FPDF_ANNOT_INK: u32 = 15;
pub const FPDF_ANNOT_POPUP: u32 = 16;
pub const FPDF_ANNOT_FILEATTACHMENT: u32 = 17;
pub const FPDF_ANNOT_SOUND: u32 = 18;
pub const FPDF_ANNOT_MOVIE: u32 = 19;
pub const FPDF_ANNOT_WIDGET: u32 = 20;
pub const FPDF_ANNOT_SCREEN: u32 = 21;
pub const FPDF_ANNOT_PRINTERMARK: u32 = 22;
pub const FPDF_ANNOT_TRAPNET: u32 = 23;
pub const FPDF_ANNOT_WATERMARK: u32 = 24;
pub const FPDF_ANNOT_THREED: u32 = 25;
pub const FPDF_ANNOT_RICHMEDIA: u32 = 26;
pub const FPDF_ANNOT_XFAWIDGET: u32 = 27;
pub const FPDF_ANNOT_REDACT: u32 = 28;

pub const FPDF_MATCHCASE: u32 = 0x0000_0001;
pub const FPDF_MATCHWHOLEWORD: u32 = 0x0000_0002;
pub const FPDF_CONSECUTIVE: u32 = 0x0000_0004;

// ========================================
// Function signatures
// ========================================

pub type FnInitLibrary = unsafe extern "C" fn();
pub type FnDestroyLibrary = unsafe extern "C" fn();
pub type FnLoadDocument =
    unsafe extern "C" fn(file_path: FPDF_STRING, password: FPDF_BYTESTRING) -> FPDF_DOCUMENT;
pub type FnLoadMemDocument = unsafe extern "C" fn(
    data_buf: *const c_void,
    size: c_int,
    password: FPDF_BYTESTRING,
) -> FPDF_DOCUMENT;
pub type FnCloseDocument = unsafe extern "C" fn(document: FPDF_DOCUMENT);
pub type FnGetPageCount = unsafe extern "C" fn(document: FPDF_DOCUMENT) -> c_int;
pub type FnGetLastError = unsafe extern "C" fn() -> c_ulong;

pub type FnLoadPage = unsafe extern "C" fn(document: FPDF_DOCUMENT, page_index: c_int) -> FPDF_PAGE;
pub type FnClosePage = unsafe extern "C" fn(page: FPDF_PAGE);
pub type FnGetPageWidth = unsafe extern "C" fn(page: FPDF_PAGE) -> c_double;
pub type FnGetPageHeight = unsafe extern "C" fn(page: FPDF_PAGE) -> c_double;

pub type FnGetAnnotCount = unsafe extern "C" fn(page: FPDF_PAGE) -> c_int;
pub type FnGetAnnot = unsafe extern "C" fn(page: FPDF_PAGE, index: c_int) -> FPDF_ANNOTATION;
pub type FnCloseAnnot = unsafe extern "C" fn(annot: FPDF_ANNOTATION);
pub type FnAnnotGetSubtype = unsafe extern "C" fn(annot: FPDF_ANNOTATION) -> FPDF_ANNOTATION_SUBTYPE;
pub type FnAnnotGetRect = unsafe extern "C" fn(annot: FPDF_ANNOTATION, rect: *mut FS_RECTF) -> FPDF_BOOL;
pub type FnAnnotHasKey = unsafe extern "C" fn(annot: FPDF_ANNOTATION, key: FPDF_BYTESTRING) -> FPDF_BOOL;
pub type FnAnnotGetStringValue = unsafe extern "C" fn(
    annot: FPDF_ANNOTATION,
    key: FPDF_BYTESTRING,
    buffer: *mut FPDF_WCHAR,
    buflen: c_ulong,
) -> c_ulong;

pub type FnTextLoadPage = unsafe extern "C" fn(page: FPDF_PAGE) -> FPDF_TEXTPAGE;
pub type FnTextClosePage = unsafe extern "C" fn(text_page: FPDF_TEXTPAGE);
pub type FnTextCountChars = unsafe extern "C" fn(text_page: FPDF_TEXTPAGE) -> c_int;
pub type FnTextGetText = unsafe extern "C" fn(
    text_page: FPDF_TEXTPAGE,
    start_index: c_int,
    count: c_int,
    result: *mut c_ushort,
) -> c_int;
pub type FnTextGetCharBox = unsafe extern "C" fn(
    text_page: FPDF_TEXTPAGE,
    index: c_int,
    left: *mut c_double,
    right: *mut c_double,
    bottom: *mut c_double,
    top: *mut c_double,
) -> FPDF_BOOL;
pub type FnTextGetCharIndexAtPos = unsafe extern "C" fn(
    text_page: FPDF_TEXTPAGE,
    x: c_double,
    y: c_double,
    x_tolerance: c_double,
    y_tolerance: c_double,
) -> c_int;

pub type FnTextFindStart = unsafe extern "C" fn(
    text_page: FPDF_TEXTPAGE,
    findwhat: FPDF_WIDESTRING,
    flags: c_ulong,
    start_index: c_int,
) -> FPDF_SCHHANDLE;
pub type FnTextFindNext = unsafe extern "C" fn(handle: FPDF_SCHHANDLE) -> FPDF_BOOL;
pub type FnTextFindPrev = unsafe extern "C" fn(handle: FPDF_SCHHANDLE) -> FPDF_BOOL;
pub type FnTextGetSchResultIndex = unsafe extern "C" fn(handle: FPDF_SCHHANDLE) -> c_int;
pub type FnTextGetSchCount = unsafe extern "C" fn(handle: FPDF_SCHHANDLE) -> c_int;
pub type FnTextFindClose = unsafe extern "C" fn(handle: FPDF_SCHHANDLE);

pub type FnLinkLoadWebLinks = unsafe extern "C" fn(text_page: FPDF_TEXTPAGE) -> FPDF_PAGELINK;
pub type FnLinkCloseWebLinks = unsafe extern "C" fn(link_page: FPDF_PAGELINK);
pub type FnLinkCountWebLinks = unsafe extern "C" fn(link_page: FPDF_PAGELINK) -> c_int;
pub type FnLinkGetURL = unsafe extern "C" fn(
    link_page: FPDF_PAGELINK,
    link_index: c_int,
    buffer: *mut c_ushort,
    buflen: c_int,
) -> c_int;
pub type FnLinkGetTextRange = unsafe extern "C" fn(
    link_page: FPDF_PAGELINK,
    link_index: c_int,
    start_char_index: *mut c_int,
    char_count: *mut c_int,
) -> FPDF_BOOL;

// ========================================
// Runtime symbol table
// ========================================

/// Failure to bind a PDFium shared library.
#[derive(thiserror::Error, Debug)]
pub enum BindError {
    /// The shared library could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// The library opened but lacks a symbol every build must export.
    #[error("required symbol {symbol} missing from {path}: {source}")]
    MissingSymbol {
        symbol: &'static str,
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
}

/// PDFium entry points resolved from a shared library.
///
/// Required entry points are plain function pointers. Entry points that a
/// PDFium build may omit are `Option`s, decided once when the library is
/// loaded. The function pointers stay valid for as long as this value (and
/// therefore the owned [`Library`]) is alive.
pub struct PdfiumBindings {
    _library: Library,
    path: PathBuf,

    pub FPDF_InitLibrary: FnInitLibrary,
    pub FPDF_DestroyLibrary: FnDestroyLibrary,
    pub FPDF_LoadDocument: FnLoadDocument,
    pub FPDF_LoadMemDocument: Option<FnLoadMemDocument>,
    pub FPDF_CloseDocument: FnCloseDocument,
    pub FPDF_GetPageCount: FnGetPageCount,
    pub FPDF_GetLastError: FnGetLastError,

    pub FPDF_LoadPage: FnLoadPage,
    pub FPDF_ClosePage: FnClosePage,
    pub FPDF_GetPageWidth: FnGetPageWidth,
    pub FPDF_GetPageHeight: FnGetPageHeight,

    pub FPDFPage_GetAnnotCount: Option<FnGetAnnotCount>,
    pub FPDFPage_GetAnnot: Option<FnGetAnnot>,
    pub FPDFPage_CloseAnnot: Option<FnCloseAnnot>,
    pub FPDFAnnot_GetSubtype: Option<FnAnnotGetSubtype>,
    pub FPDFAnnot_GetRect: Option<FnAnnotGetRect>,
    pub FPDFAnnot_HasKey: Option<FnAnnotHasKey>,
    pub FPDFAnnot_GetStringValue: Option<FnAnnotGetStringValue>,

    pub FPDFText_LoadPage: FnTextLoadPage,
    pub FPDFText_ClosePage: FnTextClosePage,
    pub FPDFText_CountChars: FnTextCountChars,
    pub FPDFText_GetText: FnTextGetText,
    pub FPDFText_GetCharBox: FnTextGetCharBox,
    pub FPDFText_GetCharIndexAtPos: Option<FnTextGetCharIndexAtPos>,

    pub FPDFText_FindStart: FnTextFindStart,
    pub FPDFText_FindNext: FnTextFindNext,
    pub FPDFText_FindPrev: FnTextFindPrev,
    pub FPDFText_GetSchResultIndex: FnTextGetSchResultIndex,
    pub FPDFText_GetSchCount: FnTextGetSchCount,
    pub FPDFText_FindClose: FnTextFindClose,

    pub FPDFLink_LoadWebLinks: Option<FnLinkLoadWebLinks>,
    pub FPDFLink_CloseWebLinks: Option<FnLinkCloseWebLinks>,
    pub FPDFLink_CountWebLinks: Option<FnLinkCountWebLinks>,
    pub FPDFLink_GetURL: Option<FnLinkGetURL>,
    pub FPDFLink_GetTextRange: Option<FnLinkGetTextRange>,
}

impl PdfiumBindings {
    /// Open the shared library at `path` and resolve every entry point.
    ///
    /// # Safety
    ///
    /// Loading a shared library runs its initialisers. `path` must name a
    /// PDFium build whose exported symbols match the signatures declared in
    /// this crate.
    pub unsafe fn load<P: AsRef<OsStr>>(path: P) -> Result<Self, BindError> {
        let path_buf = PathBuf::from(path.as_ref());
        let library = Library::new(path.as_ref()).map_err(|source| BindError::Open {
            path: path_buf.clone(),
            source,
        })?;

        let path = path_buf.as_path();

        Ok(Self {
            FPDF_InitLibrary: symbol(&library, path, "FPDF_InitLibrary")?,
            FPDF_DestroyLibrary: symbol(&library, path, "FPDF_DestroyLibrary")?,
            FPDF_LoadDocument: symbol(&library, path, "FPDF_LoadDocument")?,
            FPDF_LoadMemDocument: optional(&library, "FPDF_LoadMemDocument"),
            FPDF_CloseDocument: symbol(&library, path, "FPDF_CloseDocument")?,
            FPDF_GetPageCount: symbol(&library, path, "FPDF_GetPageCount")?,
            FPDF_GetLastError: symbol(&library, path, "FPDF_GetLastError")?,

            FPDF_LoadPage: symbol(&library, path, "FPDF_LoadPage")?,
            FPDF_ClosePage: symbol(&library, path, "FPDF_ClosePage")?,
            FPDF_GetPageWidth: symbol(&library, path, "FPDF_GetPageWidth")?,
            FPDF_GetPageHeight: symbol(&library, path, "FPDF_GetPageHeight")?,

            FPDFPage_GetAnnotCount: optional(&library, "FPDFPage_GetAnnotCount"),
            FPDFPage_GetAnnot: optional(&library, "FPDFPage_GetAnnot"),
            FPDFPage_CloseAnnot: optional(&library, "FPDFPage_CloseAnnot"),
            FPDFAnnot_GetSubtype: optional(&library, "FPDFAnnot_GetSubtype"),
            FPDFAnnot_GetRect: optional(&library, "FPDFAnnot_GetRect"),
            FPDFAnnot_HasKey: optional(&library, "FPDFAnnot_HasKey"),
            FPDFAnnot_GetStringValue: optional(&library, "FPDFAnnot_GetStringValue"),

            FPDFText_LoadPage: symbol(&library, path, "FPDFText_LoadPage")?,
            FPDFText_ClosePage: symbol(&library, path, "FPDFText_ClosePage")?,
            FPDFText_CountChars: symbol(&library, path, "FPDFText_CountChars")?,
            FPDFText_GetText: symbol(&library, path, "FPDFText_GetText")?,
            FPDFText_GetCharBox: symbol(&library, path, "FPDFText_GetCharBox")?,
            FPDFText_GetCharIndexAtPos: optional(&library, "FPDFText_GetCharIndexAtPos"),

            FPDFText_FindStart: symbol(&library, path, "FPDFText_FindStart")?,
            FPDFText_FindNext: symbol(&library, path, "FPDFText_FindNext")?,
            FPDFText_FindPrev: symbol(&library, path, "FPDFText_FindPrev")?,
            FPDFText_GetSchResultIndex: symbol(&library, path, "FPDFText_GetSchResultIndex")?,
            FPDFText_GetSchCount: symbol(&library, path, "FPDFText_GetSchCount")?,
            FPDFText_FindClose: symbol(&library, path, "FPDFText_FindClose")?,

            FPDFLink_LoadWebLinks: optional(&library, "FPDFLink_LoadWebLinks"),
            FPDFLink_CloseWebLinks: optional(&library, "FPDFLink_CloseWebLinks"),
            FPDFLink_CountWebLinks: optional(&library, "FPDFLink_CountWebLinks"),
            FPDFLink_GetURL: optional(&library, "FPDFLink_GetURL"),
            FPDFLink_GetTextRange: optional(&library, "FPDFLink_GetTextRange"),

            _library: library,
            path: path_buf,
        })
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

/// Entry points every supported PDFium build exports.
pub const REQUIRED_SYMBOLS: &[&str] = &[
    "FPDF_InitLibrary",
    "FPDF_DestroyLibrary",
    "FPDF_LoadDocument",
    "FPDF_CloseDocument",
    "FPDF_GetPageCount",
    "FPDF_GetLastError",
    "FPDF_LoadPage",
    "FPDF_ClosePage",
    "FPDF_GetPageWidth",
    "FPDF_GetPageHeight",
    "FPDFText_LoadPage",
    "FPDFText_ClosePage",
    "FPDFText_CountChars",
    "FPDFText_GetText",
    "FPDFText_GetCharBox",
    "FPDFText_FindStart",
    "FPDFText_FindNext",
    "FPDFText_FindPrev",
    "FPDFText_GetSchResultIndex",
    "FPDFText_GetSchCount",
    "FPDFText_FindClose",
];

/// Entry points that may be absent depending on how PDFium was built.
pub const OPTIONAL_SYMBOLS: &[&str] = &[
    "FPDF_LoadMemDocument",
    "FPDFPage_GetAnnotCount",
    "FPDFPage_GetAnnot",
    "FPDFPage_CloseAnnot",
    "FPDFAnnot_GetSubtype",
    "FPDFAnnot_GetRect",
    "FPDFAnnot_HasKey",
    "FPDFAnnot_GetStringValue",
    "FPDFText_GetCharIndexAtPos",
    "FPDFLink_LoadWebLinks",
    "FPDFLink_CloseWebLinks",
    "FPDFLink_CountWebLinks",
    "FPDFLink_GetURL",
    "FPDFLink_GetTextRange",
];

unsafe fn symbol<T: Copy>(
    library: &Library,
    path: &std::path::Path,
    name: &'static str,
) -> Result<T, BindError> {
    library
        .get::<T>(name.as_bytes())
        .map(|sym| *sym)
        .map_err(|source| BindError::MissingSymbol {
            symbol: name,
            path: path.to_path_buf(),
            source,
        })
}

unsafe fn optional<T: Copy>(library: &Library, name: &str) -> Option<T> {
    library.get::<T>(name.as_bytes()).ok().map(|sym| *sym)
}
