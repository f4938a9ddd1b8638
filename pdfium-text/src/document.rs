//! Documents and pages.
//!
//! A [`Document`] owns one native document handle. Pages are borrowed from
//! it by index and released when the [`Page`] is dropped, so a page can
//! never outlive its document.
//!
//! ```no_run
//! use pdfium_text::Pdfium;
//!
//! let pdfium = Pdfium::new()?;
//! let mut doc = pdfium.open_document("report.pdf", None)?;
//!
//! let (width, height) = doc.dimensions()?;
//! println!("{} pages, first page {width}x{height} pt", doc.page_count()?);
//!
//! {
//!     let page = doc.load_page(0)?;
//!     let text = page.text_page()?;
//!     println!("{}", text.all_text()?);
//! }
//!
//! doc.close();
//! assert!(doc.is_closed());
//! # Ok::<(), pdfium_text::PdfError>(())
//! ```

use crate::annotation::{Annotation, AnnotationRect, AnnotationSubtype};
use crate::capability::PdfiumApi;
use crate::codes::load_error_message;
use crate::error::{PdfError, Result};
use crate::handle::{Handle, HandleKind};
use crate::marshal::{decode_utf16le, read_sized};
use crate::text::TextPage;
use pdfium_text_sys::{
    FPDF_ANNOTATION, FPDF_DOCUMENT, FPDF_ERR_FILE, FPDF_ERR_PASSWORD, FPDF_PAGE, FS_RECTF,
};
use std::ffi::{CStr, CString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CONTENTS_KEY: &CStr = c"Contents";

/// Where a document was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Memory { len: usize },
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory { len } => write!(f, "<memory: {len} bytes>"),
        }
    }
}

/// An open PDF document.
///
/// Closed explicitly with [`close`](Self::close) or on drop. Once closed,
/// every operation fails with
/// [`InvalidHandle`](PdfError::InvalidHandle) for [`HandleKind::Document`].
pub struct Document {
    api: Arc<dyn PdfiumApi>,
    handle: Handle<FPDF_DOCUMENT>,
    source: DocumentSource,
    has_password: bool,
    // Must outlive the native handle for memory loads.
    _data: Option<Vec<u8>>,
}

impl Document {
    pub(crate) fn open(api: Arc<dyn PdfiumApi>, path: &Path, password: Option<&str>) -> Result<Self> {
        let source = DocumentSource::File(path.to_path_buf());
        let c_path = CString::new(path.to_string_lossy().as_bytes())
            .map_err(|_| rejected(&source, "Path contains a NUL byte", FPDF_ERR_FILE))?;
        let c_password = password_cstring(password, &source)?;

        let raw = api.load_document(&c_path, c_password.as_deref())?;
        Self::from_raw(api, raw, source, password.is_some(), None)
    }

    pub(crate) fn open_from_bytes(
        api: Arc<dyn PdfiumApi>,
        data: Vec<u8>,
        password: Option<&str>,
    ) -> Result<Self> {
        if data.is_empty() {
            return Err(PdfError::InvalidArgument("PDF data is empty".to_string()));
        }
        if i32::try_from(data.len()).is_err() {
            return Err(PdfError::InvalidArgument(format!(
                "PDF data too large: {} bytes exceeds maximum {} bytes",
                data.len(),
                i32::MAX
            )));
        }
        let source = DocumentSource::Memory { len: data.len() };
        let c_password = password_cstring(password, &source)?;

        let raw = api.load_mem_document(&data, c_password.as_deref())?;
        Self::from_raw(api, raw, source, password.is_some(), Some(data))
    }

    fn from_raw(
        api: Arc<dyn PdfiumApi>,
        raw: FPDF_DOCUMENT,
        source: DocumentSource,
        has_password: bool,
        data: Option<Vec<u8>>,
    ) -> Result<Self> {
        let Some(handle) = Handle::new(HandleKind::Document, raw) else {
            let code = api.get_last_error()?;
            return Err(PdfError::DocumentLoad {
                document: source.to_string(),
                reason: load_error_message(code).into_owned(),
                code,
            });
        };
        log::debug!("Opened PDF document {source}");
        Ok(Self {
            api,
            handle,
            source,
            has_password,
            _data: data,
        })
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// Whether a password was supplied when opening.
    pub fn has_password(&self) -> bool {
        self.has_password
    }

    pub fn is_closed(&self) -> bool {
        !self.handle.is_open()
    }

    /// Release the native document. Safe to call more than once.
    pub fn close(&mut self) {
        let api = &*self.api;
        self.handle
            .close_with(|raw| unsafe { api.close_document(raw) });
    }

    pub fn page_count(&self) -> Result<i32> {
        let doc = self.handle.get()?;
        let count = unsafe { self.api.get_page_count(doc)? };
        if count < 0 {
            return Err(PdfError::operation(
                "FPDF_GetPageCount",
                format!("negative page count {count} for {}", self.source),
            ));
        }
        Ok(count)
    }

    /// Load the page at zero-based `index`.
    ///
    /// The index is not pre-checked; PDFium rejects out-of-range pages and
    /// the failure is reported with the decoded last error.
    pub fn load_page(&self, index: i32) -> Result<Page<'_>> {
        let doc = self.handle.get()?;
        let raw = unsafe { self.api.load_page(doc, index)? };
        let handle = Handle::new(HandleKind::Page, raw).ok_or_else(|| self.last_error_for_page(index))?;
        log::debug!("Loaded page {index} of {}", self.source);
        Ok(Page {
            doc: self,
            handle,
            index,
        })
    }

    /// Width and height of the first page, in points.
    pub fn dimensions(&self) -> Result<(f64, f64)> {
        self.dimensions_for_page(0)
    }

    /// Width and height of page `index`, in points.
    pub fn dimensions_for_page(&self, index: i32) -> Result<(f64, f64)> {
        let page = self.load_page(index)?;
        page.size()
    }

    /// Every annotation in the document, ordered by page then by position.
    pub fn annotations(&self) -> Result<Vec<Annotation>> {
        let mut all = Vec::new();
        for index in 0..self.page_count()? {
            all.extend(self.annotations_by_page(index)?);
        }
        Ok(all)
    }

    /// Annotations of page `index`. The page is released before returning.
    pub fn annotations_by_page(&self, index: i32) -> Result<Vec<Annotation>> {
        let page = self.load_page(index)?;
        page.annotations()
    }

    pub(crate) fn api(&self) -> &dyn PdfiumApi {
        &*self.api
    }

    fn last_error_for_page(&self, index: i32) -> PdfError {
        match self.api.get_last_error() {
            Ok(code) => PdfError::operation(
                "FPDF_LoadPage",
                format!("page {index}: {} (code {code})", load_error_message(code)),
            ),
            Err(e) => e,
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("source", &self.source)
            .field("has_password", &self.has_password)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        self.close();
    }
}

/// A load failure detected before PDFium is called, reported like a native one.
fn rejected(source: &DocumentSource, reason: &str, code: u32) -> PdfError {
    PdfError::DocumentLoad {
        document: source.to_string(),
        reason: reason.to_string(),
        code: u64::from(code),
    }
}

fn password_cstring(password: Option<&str>, source: &DocumentSource) -> Result<Option<CString>> {
    password
        .map(|p| {
            CString::new(p)
                .map_err(|_| rejected(source, "Password contains a NUL byte", FPDF_ERR_PASSWORD))
        })
        .transpose()
}

/// A page borrowed from a [`Document`].
pub struct Page<'d> {
    doc: &'d Document,
    handle: Handle<FPDF_PAGE>,
    index: i32,
}

impl<'d> Page<'d> {
    /// Zero-based page index.
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn width(&self) -> Result<f64> {
        let page = self.handle.get()?;
        unsafe { self.api().get_page_width(page) }
    }

    pub fn height(&self) -> Result<f64> {
        let page = self.handle.get()?;
        unsafe { self.api().get_page_height(page) }
    }

    /// `(width, height)` in points.
    pub fn size(&self) -> Result<(f64, f64)> {
        Ok((self.width()?, self.height()?))
    }

    /// Load the text layer of this page.
    pub fn text_page(&self) -> Result<TextPage<'_>> {
        TextPage::load(self)
    }

    /// Read every annotation on this page.
    ///
    /// Null annotation slots are skipped. Each native annotation is closed
    /// after it has been read, including when reading it fails.
    pub fn annotations(&self) -> Result<Vec<Annotation>> {
        let page = self.handle.get()?;
        let api = self.api();
        let count = unsafe { api.get_annot_count(page)? };
        let mut annotations = Vec::with_capacity(usize::try_from(count).unwrap_or(0));

        for index in 0..count {
            let annot = unsafe { api.get_annot(page, index)? };
            if annot.is_null() {
                log::warn!("Skipping null annotation {index} on page {}", self.index);
                continue;
            }
            let read = unsafe { read_annotation(api, annot, self.index, index) };
            if let Err(e) = unsafe { api.close_annot(annot) } {
                log::warn!("Failed to close annotation {index} on page {}: {e}", self.index);
            }
            annotations.push(read?);
        }

        log::debug!(
            "Read {} annotations from page {}",
            annotations.len(),
            self.index
        );
        Ok(annotations)
    }

    pub fn is_closed(&self) -> bool {
        !self.handle.is_open()
    }

    /// Release the page. Safe to call more than once; also runs on drop.
    pub fn close(&mut self) {
        let api = self.doc.api();
        self.handle.close_with(|raw| unsafe { api.close_page(raw) });
    }

    pub(crate) fn raw(&self) -> Result<FPDF_PAGE> {
        self.handle.get()
    }

    pub(crate) fn api(&self) -> &'d dyn PdfiumApi {
        self.doc.api()
    }

    pub(crate) fn last_error(&self, operation: &str) -> PdfError {
        match self.api().get_last_error() {
            Ok(code) => PdfError::operation(
                operation,
                format!(
                    "page {}: {} (code {code})",
                    self.index,
                    load_error_message(code)
                ),
            ),
            Err(e) => e,
        }
    }
}

impl fmt::Debug for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("index", &self.index)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Page<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

unsafe fn read_annotation(
    api: &dyn PdfiumApi,
    annot: FPDF_ANNOTATION,
    page_index: i32,
    index: i32,
) -> Result<Annotation> {
    let subtype = AnnotationSubtype::from_raw(api.get_annot_subtype(annot)?);

    let mut rect = FS_RECTF::default();
    if !api.get_annot_rect(annot, &mut rect)? {
        return Err(PdfError::operation(
            "FPDFAnnot_GetRect",
            format!("failed to get rectangle for annotation {index} on page {page_index}"),
        ));
    }

    let contents = if api.annot_has_key(annot, CONTENTS_KEY)? {
        let bytes = read_sized(2, |buffer: &mut [u8]| {
            let len = api.get_annot_string_value(annot, CONTENTS_KEY, buffer)?;
            Ok(i64::try_from(len).unwrap_or(i64::MAX))
        })?;
        decode_utf16le(&bytes, "annotation contents")
    } else {
        String::new()
    };

    Ok(Annotation {
        page_index,
        index,
        subtype,
        rect: AnnotationRect::from(rect),
        contents,
    })
}
