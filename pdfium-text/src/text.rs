//! Text extraction from PDF pages
//!
//! A [`TextPage`] is the text layer of one [`Page`]. Character indices used
//! throughout the text API address `0..count_chars()` of a text page.
//!
//! ```no_run
//! use pdfium_text::Pdfium;
//!
//! let pdfium = Pdfium::new()?;
//! let doc = pdfium.open_document("document.pdf", None)?;
//! let page = doc.load_page(0)?;
//! let text = page.text_page()?;
//!
//! println!("{} chars", text.count_chars()?);
//! println!("first line-ish: {}", text.get_text(0, Some(40.min(text.count_chars()?)))?);
//!
//! let index = text.get_char_at_position(72.0, 720.0)?;
//! if index >= 0 {
//!     let b = text.get_char_box(index)?;
//!     println!("char {index} spans {}..{} x {}..{}", b.left, b.right, b.bottom, b.top);
//! }
//! # Ok::<(), pdfium_text::PdfError>(())
//! ```

use crate::capability::PdfiumApi;
use crate::document::Page;
use crate::error::{PdfError, Result};
use crate::handle::{Handle, HandleKind};
use crate::link::TextLink;
use crate::marshal::{decode_utf16, read_sized};
use crate::search::{SearchFlags, TextSearch};
use crate::selection::TextSelection;
use pdfium_text_sys::FPDF_TEXTPAGE;
use serde::Serialize;
use std::fmt;

/// Default hit-test tolerance for [`TextPage::get_char_at_position`], in points.
pub const DEFAULT_POSITION_TOLERANCE: f64 = 1.0;

/// Bounding box of one character, in the order `FPDFText_GetCharBox` writes
/// it: left, right, bottom, top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CharBox {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl CharBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Text content of a page.
///
/// Borrows its [`Page`]; released on [`close`](Self::close) or drop.
pub struct TextPage<'p> {
    api: &'p dyn PdfiumApi,
    handle: Handle<FPDF_TEXTPAGE>,
    page_index: i32,
}

impl<'p> TextPage<'p> {
    /// Load the text layer of `page`.
    pub fn load(page: &'p Page<'_>) -> Result<Self> {
        let raw_page = page.raw()?;
        let api = page.api();
        let raw = unsafe { api.load_text_page(raw_page)? };
        let handle = Handle::new(HandleKind::TextPage, raw)
            .ok_or_else(|| page.last_error("FPDFText_LoadPage"))?;
        log::debug!("Loaded text page for page {}", page.index());
        Ok(Self {
            api,
            handle,
            page_index: page.index(),
        })
    }

    /// Index of the page this text was loaded from.
    pub fn page_index(&self) -> i32 {
        self.page_index
    }

    /// Number of characters on the page.
    ///
    /// A negative native count is reported as a failure of
    /// `FPDFText_CountChars`.
    pub fn count_chars(&self) -> Result<i32> {
        let text_page = self.handle.get()?;
        let count = unsafe { self.api.count_chars(text_page)? };
        if count < 0 {
            return Err(PdfError::operation(
                "FPDFText_CountChars",
                format!("negative character count {count} on page {}", self.page_index),
            ));
        }
        Ok(count)
    }

    /// Extract `count` characters starting at `start`.
    ///
    /// `None` reads to the end of the page. A zero count yields an empty
    /// string for any start in `0..=count_chars()`.
    pub fn get_text(&self, start: i32, count: Option<i32>) -> Result<String> {
        let text_page = self.handle.get()?;
        let char_count = self.count_chars()?;

        if start < 0 || start > char_count {
            return Err(PdfError::invalid_index("Start", start, char_count));
        }
        let count = count.unwrap_or(char_count - start);
        if count < 0 || count > char_count - start {
            return Err(PdfError::InvalidArgument(format!(
                "Text range {start}+{count} exceeds character count {char_count}"
            )));
        }
        if count == 0 {
            return Ok(String::new());
        }

        // FPDFText_GetText cannot be probed with a null buffer; it needs
        // room for count + 1 units.
        let units = read_sized(1, |buffer: &mut [u16]| {
            if buffer.is_empty() {
                return Ok(i64::from(count) + 1);
            }
            let written = unsafe { self.api.get_text(text_page, start, count, buffer)? };
            Ok(i64::from(written))
        })?;
        Ok(decode_utf16(&units, "page text"))
    }

    /// All text on the page; empty for a page without text.
    pub fn all_text(&self) -> Result<String> {
        self.get_text(0, None)
    }

    /// Bounding box of the character at `index`.
    pub fn get_char_box(&self, index: i32) -> Result<CharBox> {
        let text_page = self.handle.get()?;
        let char_count = self.count_chars()?;
        if index < 0 || index >= char_count {
            return Err(PdfError::invalid_index("Character", index, char_count));
        }

        let mut b = CharBox::default();
        let ok = unsafe {
            self.api
                .get_char_box(text_page, index, &mut b.left, &mut b.right, &mut b.bottom, &mut b.top)?
        };
        if !ok {
            return Err(PdfError::operation(
                "FPDFText_GetCharBox",
                format!("failed to get character box for index {index}"),
            ));
        }
        Ok(b)
    }

    /// Index of the character at page coordinates `(x, y)`, or -1 if none.
    pub fn get_char_at_position(&self, x: f64, y: f64) -> Result<i32> {
        self.get_char_at_position_with_tolerance(
            x,
            y,
            DEFAULT_POSITION_TOLERANCE,
            DEFAULT_POSITION_TOLERANCE,
        )
    }

    pub fn get_char_at_position_with_tolerance(
        &self,
        x: f64,
        y: f64,
        x_tolerance: f64,
        y_tolerance: f64,
    ) -> Result<i32> {
        let text_page = self.handle.get()?;
        unsafe {
            self.api
                .get_char_index_at_pos(text_page, x, y, x_tolerance, y_tolerance)
        }
    }

    /// Select `count` characters starting at `start`.
    pub fn create_selection(&self, start: i32, count: i32) -> Result<TextSelection<'_>> {
        TextSelection::new(self, start, count)
    }

    /// Start a search for `text` from the beginning of the page.
    pub fn create_search(
        &self,
        text: &str,
        match_case: bool,
        match_whole_word: bool,
    ) -> Result<TextSearch<'_>> {
        let flags = SearchFlags {
            match_case,
            match_whole_word,
        };
        TextSearch::new(self, text, flags)
    }

    /// Detect web links in the page text.
    pub fn extract_links(&self) -> Result<TextLink<'_>> {
        TextLink::new(self)
    }

    pub fn is_closed(&self) -> bool {
        !self.handle.is_open()
    }

    /// Release the text page. Safe to call more than once; also runs on drop.
    pub fn close(&mut self) {
        let api = self.api;
        self.handle
            .close_with(|raw| unsafe { api.close_text_page(raw) });
    }

    pub(crate) fn raw(&self) -> Result<FPDF_TEXTPAGE> {
        self.handle.get()
    }

    pub(crate) fn api(&self) -> &'p dyn PdfiumApi {
        self.api
    }
}

impl fmt::Debug for TextPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextPage")
            .field("page_index", &self.page_index)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for TextPage<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
