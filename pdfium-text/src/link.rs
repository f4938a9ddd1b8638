//! Web link detection
//!
//! PDFium scans page text for URL-like runs; each detected link is a URL
//! plus the character range it was found in.

use crate::error::{PdfError, Result};
use crate::handle::{Handle, HandleKind};
use crate::marshal::{decode_utf16, read_sized};
use crate::selection::TextSelection;
use crate::text::TextPage;
use pdfium_text_sys::FPDF_PAGELINK;
use serde::Serialize;
use std::fmt;

/// Character range of a detected link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRange {
    pub start_index: i32,
    pub count: i32,
}

/// The web links detected on one [`TextPage`].
pub struct TextLink<'t> {
    text_page: &'t TextPage<'t>,
    handle: Handle<FPDF_PAGELINK>,
}

impl<'t> TextLink<'t> {
    pub(crate) fn new(text_page: &'t TextPage<'t>) -> Result<Self> {
        let raw_text_page = text_page.raw()?;
        let raw = unsafe { text_page.api().load_web_links(raw_text_page)? };
        let handle = Handle::new(HandleKind::Links, raw).ok_or_else(|| {
            PdfError::operation("FPDFLink_LoadWebLinks", "failed to load web links")
        })?;
        Ok(Self { text_page, handle })
    }

    /// Number of detected links.
    pub fn count(&self) -> Result<i32> {
        let links = self.handle.get()?;
        let count = unsafe { self.text_page.api().count_web_links(links)? };
        if count < 0 {
            return Err(PdfError::operation(
                "FPDFLink_CountWebLinks",
                format!(
                    "negative link count {count} on page {}",
                    self.text_page.page_index()
                ),
            ));
        }
        Ok(count)
    }

    /// URL of link `index`; empty when PDFium reports none.
    pub fn get_url(&self, index: i32) -> Result<String> {
        let links = self.checked(index)?;
        let api = self.text_page.api();
        let units = read_sized(1, |buffer: &mut [u16]| {
            let len = unsafe { api.get_url(links, index, buffer)? };
            Ok(i64::from(len))
        })?;
        Ok(decode_utf16(&units, "link URL"))
    }

    /// Character range of link `index`.
    pub fn get_text_range(&self, index: i32) -> Result<TextRange> {
        let links = self.checked(index)?;
        let mut range = TextRange {
            start_index: 0,
            count: 0,
        };
        let ok = unsafe {
            self.text_page.api().get_text_range(
                links,
                index,
                &mut range.start_index,
                &mut range.count,
            )?
        };
        if !ok {
            return Err(PdfError::operation(
                "FPDFLink_GetTextRange",
                format!("failed to get text range for link {index}"),
            ));
        }
        Ok(range)
    }

    /// Selection over the text of link `index`.
    pub fn get_selection(&self, index: i32) -> Result<TextSelection<'t>> {
        let range = self.get_text_range(index)?;
        TextSelection::new(self.text_page, range.start_index, range.count)
    }

    pub fn is_closed(&self) -> bool {
        !self.handle.is_open()
    }

    /// Release the link set. Safe to call more than once; also runs on drop.
    pub fn close(&mut self) {
        let api = self.text_page.api();
        self.handle
            .close_with(|raw| unsafe { api.close_web_links(raw) });
    }

    fn checked(&self, index: i32) -> Result<FPDF_PAGELINK> {
        let links = self.handle.get()?;
        let count = self.count()?;
        if index < 0 || index >= count {
            return Err(PdfError::invalid_index("Link", index, count));
        }
        Ok(links)
    }
}

impl fmt::Debug for TextLink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLink")
            .field("page_index", &self.text_page.page_index())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for TextLink<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
