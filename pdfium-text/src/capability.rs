//! The native operations this crate depends on.
//!
//! [`PdfiumApi`] is the seam between the safe wrappers and PDFium. The real
//! implementation is [`PdfiumBindings`], resolved by symbol name from a shared
//! library; tests substitute their own implementation.
//!
//! Operations a PDFium build may omit have default method bodies that return
//! [`PdfError::Unsupported`]. Whether an operation is available is decided
//! once, when the table is built, and can be queried with
//! [`PdfiumApi::supports`].
//!
//! Methods taking raw handles are `unsafe`: the caller guarantees the handle
//! came from this table and has not been closed.

use crate::error::{PdfError, Result};
use pdfium_text_sys::{
    PdfiumBindings, FPDF_ANNOTATION, FPDF_DOCUMENT, FPDF_PAGE, FPDF_PAGELINK, FPDF_SCHHANDLE,
    FPDF_TEXTPAGE, FS_RECTF,
};
use std::ffi::CStr;

/// Every native operation in the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InitLibrary,
    DestroyLibrary,
    LoadDocument,
    LoadMemDocument,
    CloseDocument,
    GetPageCount,
    GetLastError,
    LoadPage,
    ClosePage,
    GetPageWidth,
    GetPageHeight,
    GetAnnotCount,
    GetAnnot,
    CloseAnnot,
    GetAnnotSubtype,
    GetAnnotRect,
    AnnotHasKey,
    GetAnnotStringValue,
    LoadTextPage,
    CloseTextPage,
    CountChars,
    GetText,
    GetCharBox,
    GetCharIndexAtPos,
    FindStart,
    FindNext,
    FindPrev,
    GetSchResultIndex,
    GetSchCount,
    FindClose,
    LoadWebLinks,
    CloseWebLinks,
    CountWebLinks,
    GetUrl,
    GetTextRange,
}

impl Operation {
    /// All operations, in table order.
    pub const ALL: [Operation; 35] = [
        Self::InitLibrary,
        Self::DestroyLibrary,
        Self::LoadDocument,
        Self::LoadMemDocument,
        Self::CloseDocument,
        Self::GetPageCount,
        Self::GetLastError,
        Self::LoadPage,
        Self::ClosePage,
        Self::GetPageWidth,
        Self::GetPageHeight,
        Self::GetAnnotCount,
        Self::GetAnnot,
        Self::CloseAnnot,
        Self::GetAnnotSubtype,
        Self::GetAnnotRect,
        Self::AnnotHasKey,
        Self::GetAnnotStringValue,
        Self::LoadTextPage,
        Self::CloseTextPage,
        Self::CountChars,
        Self::GetText,
        Self::GetCharBox,
        Self::GetCharIndexAtPos,
        Self::FindStart,
        Self::FindNext,
        Self::FindPrev,
        Self::GetSchResultIndex,
        Self::GetSchCount,
        Self::FindClose,
        Self::LoadWebLinks,
        Self::CloseWebLinks,
        Self::CountWebLinks,
        Self::GetUrl,
        Self::GetTextRange,
    ];

    /// The exported C symbol backing this operation.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::InitLibrary => "FPDF_InitLibrary",
            Self::DestroyLibrary => "FPDF_DestroyLibrary",
            Self::LoadDocument => "FPDF_LoadDocument",
            Self::LoadMemDocument => "FPDF_LoadMemDocument",
            Self::CloseDocument => "FPDF_CloseDocument",
            Self::GetPageCount => "FPDF_GetPageCount",
            Self::GetLastError => "FPDF_GetLastError",
            Self::LoadPage => "FPDF_LoadPage",
            Self::ClosePage => "FPDF_ClosePage",
            Self::GetPageWidth => "FPDF_GetPageWidth",
            Self::GetPageHeight => "FPDF_GetPageHeight",
            Self::GetAnnotCount => "FPDFPage_GetAnnotCount",
            Self::GetAnnot => "FPDFPage_GetAnnot",
            Self::CloseAnnot => "FPDFPage_CloseAnnot",
            Self::GetAnnotSubtype => "FPDFAnnot_GetSubtype",
            Self::GetAnnotRect => "FPDFAnnot_GetRect",
            Self::AnnotHasKey => "FPDFAnnot_HasKey",
            Self::GetAnnotStringValue => "FPDFAnnot_GetStringValue",
            Self::LoadTextPage => "FPDFText_LoadPage",
            Self::CloseTextPage => "FPDFText_ClosePage",
            Self::CountChars => "FPDFText_CountChars",
            Self::GetText => "FPDFText_GetText",
            Self::GetCharBox => "FPDFText_GetCharBox",
            Self::GetCharIndexAtPos => "FPDFText_GetCharIndexAtPos",
            Self::FindStart => "FPDFText_FindStart",
            Self::FindNext => "FPDFText_FindNext",
            Self::FindPrev => "FPDFText_FindPrev",
            Self::GetSchResultIndex => "FPDFText_GetSchResultIndex",
            Self::GetSchCount => "FPDFText_GetSchCount",
            Self::FindClose => "FPDFText_FindClose",
            Self::LoadWebLinks => "FPDFLink_LoadWebLinks",
            Self::CloseWebLinks => "FPDFLink_CloseWebLinks",
            Self::CountWebLinks => "FPDFLink_CountWebLinks",
            Self::GetUrl => "FPDFLink_GetURL",
            Self::GetTextRange => "FPDFLink_GetTextRange",
        }
    }

    /// Whether a PDFium build may legitimately lack this operation.
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            Self::LoadMemDocument
                | Self::GetAnnotCount
                | Self::GetAnnot
                | Self::CloseAnnot
                | Self::GetAnnotSubtype
                | Self::GetAnnotRect
                | Self::AnnotHasKey
                | Self::GetAnnotStringValue
                | Self::GetCharIndexAtPos
                | Self::LoadWebLinks
                | Self::CloseWebLinks
                | Self::CountWebLinks
                | Self::GetUrl
                | Self::GetTextRange
        )
    }

    /// The error returned when this operation is absent.
    pub fn unsupported(&self) -> PdfError {
        PdfError::Unsupported {
            operation: self.symbol(),
        }
    }
}

/// The PDFium capability table.
///
/// Implementations are not required to be reentrant. All calls into one
/// table must be serialized by the caller; the wrappers in this crate never
/// call it from more than one thread because they are `!Send`.
///
/// Size-probing methods (`get_annot_string_value`, `get_url`) treat an empty
/// `buffer` as the null/zero-length probe and return the required size.
#[allow(clippy::missing_safety_doc)]
pub trait PdfiumApi: Send + Sync {
    /// Whether `operation` is available in this table.
    ///
    /// The default matches the default method bodies: required operations
    /// are present, optional ones are not. Tables that implement optional
    /// methods must override this too.
    fn supports(&self, operation: Operation) -> bool {
        !operation.is_optional()
    }

    // Library
    fn init_library(&self) -> Result<()>;
    fn destroy_library(&self) -> Result<()>;

    // Document
    fn load_document(&self, path: &CStr, password: Option<&CStr>) -> Result<FPDF_DOCUMENT>;
    fn load_mem_document(&self, data: &[u8], password: Option<&CStr>) -> Result<FPDF_DOCUMENT> {
        let _ = (data, password);
        Err(Operation::LoadMemDocument.unsupported())
    }
    unsafe fn close_document(&self, document: FPDF_DOCUMENT) -> Result<()>;
    unsafe fn get_page_count(&self, document: FPDF_DOCUMENT) -> Result<i32>;
    fn get_last_error(&self) -> Result<u64>;

    // Page
    unsafe fn load_page(&self, document: FPDF_DOCUMENT, index: i32) -> Result<FPDF_PAGE>;
    unsafe fn close_page(&self, page: FPDF_PAGE) -> Result<()>;
    unsafe fn get_page_width(&self, page: FPDF_PAGE) -> Result<f64>;
    unsafe fn get_page_height(&self, page: FPDF_PAGE) -> Result<f64>;

    // Annotation
    unsafe fn get_annot_count(&self, page: FPDF_PAGE) -> Result<i32> {
        let _ = page;
        Err(Operation::GetAnnotCount.unsupported())
    }
    unsafe fn get_annot(&self, page: FPDF_PAGE, index: i32) -> Result<FPDF_ANNOTATION> {
        let _ = (page, index);
        Err(Operation::GetAnnot.unsupported())
    }
    unsafe fn close_annot(&self, annot: FPDF_ANNOTATION) -> Result<()> {
        let _ = annot;
        Err(Operation::CloseAnnot.unsupported())
    }
    unsafe fn get_annot_subtype(&self, annot: FPDF_ANNOTATION) -> Result<i32> {
        let _ = annot;
        Err(Operation::GetAnnotSubtype.unsupported())
    }
    /// Fill `rect` in `FS_RECTF` order. `Ok(false)` means the native call failed.
    unsafe fn get_annot_rect(&self, annot: FPDF_ANNOTATION, rect: &mut FS_RECTF) -> Result<bool> {
        let _ = (annot, rect);
        Err(Operation::GetAnnotRect.unsupported())
    }
    unsafe fn annot_has_key(&self, annot: FPDF_ANNOTATION, key: &CStr) -> Result<bool> {
        let _ = (annot, key);
        Err(Operation::AnnotHasKey.unsupported())
    }
    /// UTF-16LE bytes including a two-byte terminator; returns the byte length.
    unsafe fn get_annot_string_value(
        &self,
        annot: FPDF_ANNOTATION,
        key: &CStr,
        buffer: &mut [u8],
    ) -> Result<u64> {
        let _ = (annot, key, buffer);
        Err(Operation::GetAnnotStringValue.unsupported())
    }

    // Text
    unsafe fn load_text_page(&self, page: FPDF_PAGE) -> Result<FPDF_TEXTPAGE>;
    unsafe fn close_text_page(&self, text_page: FPDF_TEXTPAGE) -> Result<()>;
    unsafe fn count_chars(&self, text_page: FPDF_TEXTPAGE) -> Result<i32>;
    /// Write `count` characters from `start` plus a terminator into `buffer`;
    /// returns the number of units written, terminator included.
    unsafe fn get_text(
        &self,
        text_page: FPDF_TEXTPAGE,
        start: i32,
        count: i32,
        buffer: &mut [u16],
    ) -> Result<i32>;
    /// Out-parameters in the native order: left, right, bottom, top.
    unsafe fn get_char_box(
        &self,
        text_page: FPDF_TEXTPAGE,
        index: i32,
        left: &mut f64,
        right: &mut f64,
        bottom: &mut f64,
        top: &mut f64,
    ) -> Result<bool>;
    unsafe fn get_char_index_at_pos(
        &self,
        text_page: FPDF_TEXTPAGE,
        x: f64,
        y: f64,
        x_tolerance: f64,
        y_tolerance: f64,
    ) -> Result<i32> {
        let _ = (text_page, x, y, x_tolerance, y_tolerance);
        Err(Operation::GetCharIndexAtPos.unsupported())
    }

    // Search
    /// `needle` is NUL-terminated UTF-16.
    unsafe fn find_start(
        &self,
        text_page: FPDF_TEXTPAGE,
        needle: &[u16],
        flags: u32,
        start_index: i32,
    ) -> Result<FPDF_SCHHANDLE>;
    unsafe fn find_next(&self, search: FPDF_SCHHANDLE) -> Result<bool>;
    unsafe fn find_prev(&self, search: FPDF_SCHHANDLE) -> Result<bool>;
    unsafe fn get_sch_result_index(&self, search: FPDF_SCHHANDLE) -> Result<i32>;
    unsafe fn get_sch_count(&self, search: FPDF_SCHHANDLE) -> Result<i32>;
    unsafe fn find_close(&self, search: FPDF_SCHHANDLE) -> Result<()>;

    // Links
    unsafe fn load_web_links(&self, text_page: FPDF_TEXTPAGE) -> Result<FPDF_PAGELINK> {
        let _ = text_page;
        Err(Operation::LoadWebLinks.unsupported())
    }
    unsafe fn close_web_links(&self, links: FPDF_PAGELINK) -> Result<()> {
        let _ = links;
        Err(Operation::CloseWebLinks.unsupported())
    }
    unsafe fn count_web_links(&self, links: FPDF_PAGELINK) -> Result<i32> {
        let _ = links;
        Err(Operation::CountWebLinks.unsupported())
    }
    /// UTF-16 units including a terminator; returns the unit count.
    unsafe fn get_url(&self, links: FPDF_PAGELINK, index: i32, buffer: &mut [u16]) -> Result<i32> {
        let _ = (links, index, buffer);
        Err(Operation::GetUrl.unsupported())
    }
    unsafe fn get_text_range(
        &self,
        links: FPDF_PAGELINK,
        index: i32,
        start: &mut i32,
        count: &mut i32,
    ) -> Result<bool> {
        let _ = (links, index, start, count);
        Err(Operation::GetTextRange.unsupported())
    }
}

fn optional<T: Copy>(function: Option<T>, operation: Operation) -> Result<T> {
    function.ok_or_else(|| operation.unsupported())
}

fn password_ptr(password: Option<&CStr>) -> *const libc::c_char {
    password.map_or(std::ptr::null(), CStr::as_ptr)
}

fn buffer_ptr<T>(buffer: &mut [T]) -> *mut T {
    if buffer.is_empty() {
        std::ptr::null_mut()
    } else {
        buffer.as_mut_ptr()
    }
}

// SAFETY (all methods below): the function pointers were resolved from the
// library owned by `self`, and handle validity is the caller's obligation.
impl PdfiumApi for PdfiumBindings {
    fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::LoadMemDocument => self.FPDF_LoadMemDocument.is_some(),
            Operation::GetAnnotCount => self.FPDFPage_GetAnnotCount.is_some(),
            Operation::GetAnnot => self.FPDFPage_GetAnnot.is_some(),
            Operation::CloseAnnot => self.FPDFPage_CloseAnnot.is_some(),
            Operation::GetAnnotSubtype => self.FPDFAnnot_GetSubtype.is_some(),
            Operation::GetAnnotRect => self.FPDFAnnot_GetRect.is_some(),
            Operation::AnnotHasKey => self.FPDFAnnot_HasKey.is_some(),
            Operation::GetAnnotStringValue => self.FPDFAnnot_GetStringValue.is_some(),
            Operation::GetCharIndexAtPos => self.FPDFText_GetCharIndexAtPos.is_some(),
            Operation::LoadWebLinks => self.FPDFLink_LoadWebLinks.is_some(),
            Operation::CloseWebLinks => self.FPDFLink_CloseWebLinks.is_some(),
            Operation::CountWebLinks => self.FPDFLink_CountWebLinks.is_some(),
            Operation::GetUrl => self.FPDFLink_GetURL.is_some(),
            Operation::GetTextRange => self.FPDFLink_GetTextRange.is_some(),
            _ => true,
        }
    }

    fn init_library(&self) -> Result<()> {
        unsafe { (self.FPDF_InitLibrary)() };
        Ok(())
    }

    fn destroy_library(&self) -> Result<()> {
        unsafe { (self.FPDF_DestroyLibrary)() };
        Ok(())
    }

    fn load_document(&self, path: &CStr, password: Option<&CStr>) -> Result<FPDF_DOCUMENT> {
        Ok(unsafe { (self.FPDF_LoadDocument)(path.as_ptr(), password_ptr(password)) })
    }

    fn load_mem_document(&self, data: &[u8], password: Option<&CStr>) -> Result<FPDF_DOCUMENT> {
        let load = optional(self.FPDF_LoadMemDocument, Operation::LoadMemDocument)?;
        let size = i32::try_from(data.len()).map_err(|_| {
            PdfError::InvalidArgument(format!(
                "PDF data too large: {} bytes exceeds maximum {} bytes",
                data.len(),
                i32::MAX
            ))
        })?;
        Ok(unsafe { load(data.as_ptr().cast(), size, password_ptr(password)) })
    }

    unsafe fn close_document(&self, document: FPDF_DOCUMENT) -> Result<()> {
        (self.FPDF_CloseDocument)(document);
        Ok(())
    }

    unsafe fn get_page_count(&self, document: FPDF_DOCUMENT) -> Result<i32> {
        Ok((self.FPDF_GetPageCount)(document))
    }

    fn get_last_error(&self) -> Result<u64> {
        Ok(u64::from(unsafe { (self.FPDF_GetLastError)() }))
    }

    unsafe fn load_page(&self, document: FPDF_DOCUMENT, index: i32) -> Result<FPDF_PAGE> {
        Ok((self.FPDF_LoadPage)(document, index))
    }

    unsafe fn close_page(&self, page: FPDF_PAGE) -> Result<()> {
        (self.FPDF_ClosePage)(page);
        Ok(())
    }

    unsafe fn get_page_width(&self, page: FPDF_PAGE) -> Result<f64> {
        Ok((self.FPDF_GetPageWidth)(page))
    }

    unsafe fn get_page_height(&self, page: FPDF_PAGE) -> Result<f64> {
        Ok((self.FPDF_GetPageHeight)(page))
    }

    unsafe fn get_annot_count(&self, page: FPDF_PAGE) -> Result<i32> {
        let count = optional(self.FPDFPage_GetAnnotCount, Operation::GetAnnotCount)?;
        Ok(count(page))
    }

    unsafe fn get_annot(&self, page: FPDF_PAGE, index: i32) -> Result<FPDF_ANNOTATION> {
        let get = optional(self.FPDFPage_GetAnnot, Operation::GetAnnot)?;
        Ok(get(page, index))
    }

    unsafe fn close_annot(&self, annot: FPDF_ANNOTATION) -> Result<()> {
        let close = optional(self.FPDFPage_CloseAnnot, Operation::CloseAnnot)?;
        close(annot);
        Ok(())
    }

    unsafe fn get_annot_subtype(&self, annot: FPDF_ANNOTATION) -> Result<i32> {
        let subtype = optional(self.FPDFAnnot_GetSubtype, Operation::GetAnnotSubtype)?;
        Ok(subtype(annot))
    }

    unsafe fn get_annot_rect(&self, annot: FPDF_ANNOTATION, rect: &mut FS_RECTF) -> Result<bool> {
        let get_rect = optional(self.FPDFAnnot_GetRect, Operation::GetAnnotRect)?;
        Ok(get_rect(annot, rect) != 0)
    }

    unsafe fn annot_has_key(&self, annot: FPDF_ANNOTATION, key: &CStr) -> Result<bool> {
        let has_key = optional(self.FPDFAnnot_HasKey, Operation::AnnotHasKey)?;
        Ok(has_key(annot, key.as_ptr()) != 0)
    }

    unsafe fn get_annot_string_value(
        &self,
        annot: FPDF_ANNOTATION,
        key: &CStr,
        buffer: &mut [u8],
    ) -> Result<u64> {
        let get_value = optional(self.FPDFAnnot_GetStringValue, Operation::GetAnnotStringValue)?;
        let written = get_value(
            annot,
            key.as_ptr(),
            buffer_ptr(buffer).cast(),
            buffer.len() as libc::c_ulong,
        );
        Ok(u64::from(written))
    }

    unsafe fn load_text_page(&self, page: FPDF_PAGE) -> Result<FPDF_TEXTPAGE> {
        Ok((self.FPDFText_LoadPage)(page))
    }

    unsafe fn close_text_page(&self, text_page: FPDF_TEXTPAGE) -> Result<()> {
        (self.FPDFText_ClosePage)(text_page);
        Ok(())
    }

    unsafe fn count_chars(&self, text_page: FPDF_TEXTPAGE) -> Result<i32> {
        Ok((self.FPDFText_CountChars)(text_page))
    }

    unsafe fn get_text(
        &self,
        text_page: FPDF_TEXTPAGE,
        start: i32,
        count: i32,
        buffer: &mut [u16],
    ) -> Result<i32> {
        Ok((self.FPDFText_GetText)(text_page, start, count, buffer_ptr(buffer)))
    }

    unsafe fn get_char_box(
        &self,
        text_page: FPDF_TEXTPAGE,
        index: i32,
        left: &mut f64,
        right: &mut f64,
        bottom: &mut f64,
        top: &mut f64,
    ) -> Result<bool> {
        Ok((self.FPDFText_GetCharBox)(text_page, index, left, right, bottom, top) != 0)
    }

    unsafe fn get_char_index_at_pos(
        &self,
        text_page: FPDF_TEXTPAGE,
        x: f64,
        y: f64,
        x_tolerance: f64,
        y_tolerance: f64,
    ) -> Result<i32> {
        let index_at = optional(self.FPDFText_GetCharIndexAtPos, Operation::GetCharIndexAtPos)?;
        Ok(index_at(text_page, x, y, x_tolerance, y_tolerance))
    }

    unsafe fn find_start(
        &self,
        text_page: FPDF_TEXTPAGE,
        needle: &[u16],
        flags: u32,
        start_index: i32,
    ) -> Result<FPDF_SCHHANDLE> {
        debug_assert_eq!(needle.last(), Some(&0), "search needle must be NUL-terminated");
        Ok((self.FPDFText_FindStart)(
            text_page,
            needle.as_ptr(),
            libc::c_ulong::from(flags),
            start_index,
        ))
    }

    unsafe fn find_next(&self, search: FPDF_SCHHANDLE) -> Result<bool> {
        Ok((self.FPDFText_FindNext)(search) != 0)
    }

    unsafe fn find_prev(&self, search: FPDF_SCHHANDLE) -> Result<bool> {
        Ok((self.FPDFText_FindPrev)(search) != 0)
    }

    unsafe fn get_sch_result_index(&self, search: FPDF_SCHHANDLE) -> Result<i32> {
        Ok((self.FPDFText_GetSchResultIndex)(search))
    }

    unsafe fn get_sch_count(&self, search: FPDF_SCHHANDLE) -> Result<i32> {
        Ok((self.FPDFText_GetSchCount)(search))
    }

    unsafe fn find_close(&self, search: FPDF_SCHHANDLE) -> Result<()> {
        (self.FPDFText_FindClose)(search);
        Ok(())
    }

    unsafe fn load_web_links(&self, text_page: FPDF_TEXTPAGE) -> Result<FPDF_PAGELINK> {
        let load = optional(self.FPDFLink_LoadWebLinks, Operation::LoadWebLinks)?;
        Ok(load(text_page))
    }

    unsafe fn close_web_links(&self, links: FPDF_PAGELINK) -> Result<()> {
        let close = optional(self.FPDFLink_CloseWebLinks, Operation::CloseWebLinks)?;
        close(links);
        Ok(())
    }

    unsafe fn count_web_links(&self, links: FPDF_PAGELINK) -> Result<i32> {
        let count = optional(self.FPDFLink_CountWebLinks, Operation::CountWebLinks)?;
        Ok(count(links))
    }

    unsafe fn get_url(&self, links: FPDF_PAGELINK, index: i32, buffer: &mut [u16]) -> Result<i32> {
        let get_url = optional(self.FPDFLink_GetURL, Operation::GetUrl)?;
        let len = i32::try_from(buffer.len()).unwrap_or(i32::MAX);
        Ok(get_url(links, index, buffer_ptr(buffer), len))
    }

    unsafe fn get_text_range(
        &self,
        links: FPDF_PAGELINK,
        index: i32,
        start: &mut i32,
        count: &mut i32,
    ) -> Result<bool> {
        let get_range = optional(self.FPDFLink_GetTextRange, Operation::GetTextRange)?;
        Ok(get_range(links, index, start, count) != 0)
    }
}
