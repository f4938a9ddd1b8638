//! Text search within a page.
//!
//! The match cursor lives inside PDFium. [`TextSearch`] never caches the
//! current match; every query goes to the native search handle.
//!
//! # Example
//!
//! ```no_run
//! use pdfium_text::Pdfium;
//!
//! let pdfium = Pdfium::new()?;
//! let doc = pdfium.open_document("document.pdf", None)?;
//! let page = doc.load_page(0)?;
//! let text = page.text_page()?;
//!
//! let search = text.create_search("keyword", false, true)?;
//! while search.find_next()? {
//!     let selection = search.get_selection()?;
//!     println!(
//!         "match at char {} (length {}): {}",
//!         selection.start_index(),
//!         selection.count(),
//!         selection.get_text()?
//!     );
//! }
//! # Ok::<(), pdfium_text::PdfError>(())
//! ```

use crate::error::{PdfError, Result};
use crate::handle::{Handle, HandleKind};
use crate::marshal::encode_utf16z;
use crate::selection::TextSelection;
use crate::text::TextPage;
use pdfium_text_sys::{FPDF_MATCHCASE, FPDF_MATCHWHOLEWORD, FPDF_SCHHANDLE};
use std::fmt;

/// Search option flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFlags {
    /// Case-sensitive matching.
    pub match_case: bool,
    /// Match whole words only.
    pub match_whole_word: bool,
}

impl SearchFlags {
    /// All flags disabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self) -> Self {
        self.match_case = true;
        self
    }

    pub fn whole_word(mut self) -> Self {
        self.match_whole_word = true;
        self
    }

    /// Convert to PDFium flags.
    pub fn bits(self) -> u32 {
        let mut flags = 0u32;
        if self.match_case {
            flags |= FPDF_MATCHCASE;
        }
        if self.match_whole_word {
            flags |= FPDF_MATCHWHOLEWORD;
        }
        flags
    }
}

/// A search over one [`TextPage`].
///
/// The search handle is closed on [`close`](Self::close) or drop.
pub struct TextSearch<'t> {
    text_page: &'t TextPage<'t>,
    handle: Handle<FPDF_SCHHANDLE>,
    needle: String,
    flags: SearchFlags,
}

impl<'t> TextSearch<'t> {
    pub(crate) fn new(text_page: &'t TextPage<'t>, needle: &str, flags: SearchFlags) -> Result<Self> {
        let raw_text_page = text_page.raw()?;
        let encoded = encode_utf16z(needle);
        let raw = unsafe {
            text_page
                .api()
                .find_start(raw_text_page, &encoded, flags.bits(), 0)?
        };
        let handle = Handle::new(HandleKind::Search, raw).ok_or_else(|| {
            PdfError::operation(
                "FPDFText_FindStart",
                format!("failed to start search for {needle:?}"),
            )
        })?;
        log::debug!(
            "Started search for {needle:?} on page {} (flags {:#x})",
            text_page.page_index(),
            flags.bits()
        );
        Ok(Self {
            text_page,
            handle,
            needle: needle.to_string(),
            flags,
        })
    }

    /// The text being searched for.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn match_case(&self) -> bool {
        self.flags.match_case
    }

    pub fn match_whole_word(&self) -> bool {
        self.flags.match_whole_word
    }

    pub fn flags(&self) -> SearchFlags {
        self.flags
    }

    /// Advance to the next match. `false` once there are no more.
    pub fn find_next(&self) -> Result<bool> {
        let search = self.handle.get()?;
        unsafe { self.text_page.api().find_next(search) }
    }

    /// Step back to the previous match.
    pub fn find_prev(&self) -> Result<bool> {
        let search = self.handle.get()?;
        unsafe { self.text_page.api().find_prev(search) }
    }

    /// Character index of the current match, as reported by PDFium.
    pub fn get_match_index(&self) -> Result<i32> {
        let search = self.handle.get()?;
        unsafe { self.text_page.api().get_sch_result_index(search) }
    }

    /// Length in characters of the current match, as reported by PDFium.
    pub fn get_match_count(&self) -> Result<i32> {
        let search = self.handle.get()?;
        unsafe { self.text_page.api().get_sch_count(search) }
    }

    /// Selection covering the current match.
    ///
    /// Fails with [`PdfError::NoCurrentMatch`] when PDFium reports a
    /// negative index or a non-positive length. Builds disagree on whether
    /// "no match" is -1 or 0, so both are treated alike.
    pub fn get_selection(&self) -> Result<TextSelection<'t>> {
        let index = self.get_match_index()?;
        let count = self.get_match_count()?;
        if index < 0 || count <= 0 {
            return Err(PdfError::NoCurrentMatch);
        }
        TextSelection::new(self.text_page, index, count)
    }

    pub fn is_closed(&self) -> bool {
        !self.handle.is_open()
    }

    /// Release the search. Safe to call more than once; also runs on drop.
    pub fn close(&mut self) {
        let api = self.text_page.api();
        self.handle.close_with(|raw| unsafe { api.find_close(raw) });
    }
}

impl fmt::Debug for TextSearch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSearch")
            .field("needle", &self.needle)
            .field("flags", &self.flags)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for TextSearch<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
