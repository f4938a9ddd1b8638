//! Main PDFium entry point

use crate::capability::PdfiumApi;
use crate::config::LibraryConfig;
use crate::document::Document;
use crate::error::{PdfError, Result};
use once_cell::sync::OnceCell;
use pdfium_text_sys::PdfiumBindings;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The process-wide bound library. `FPDF_InitLibrary` runs exactly once, in
/// this cell's initializer.
static GLOBAL: OnceCell<Pdfium> = OnceCell::new();

/// Set once `FPDF_DestroyLibrary` has run.
static TORN_DOWN: AtomicBool = AtomicBool::new(false);

/// Main entry point for PDFium operations.
///
/// [`Pdfium::new`] binds the shared library named by [`LibraryConfig::from_env`]
/// on first use and initializes it once for the whole process; teardown is
/// registered to run at process exit. Cloning is cheap.
///
/// PDFium is not thread-safe. All documents opened through any `Pdfium`
/// value share one native library, and calls into it must not overlap.
///
/// # Example
///
/// ```no_run
/// use pdfium_text::Pdfium;
///
/// let pdfium = Pdfium::new()?;
/// let doc = pdfium.open_document("document.pdf", None)?;
/// let encrypted = pdfium.open_document("encrypted.pdf", Some("password"))?;
/// # Ok::<(), pdfium_text::PdfError>(())
/// ```
#[derive(Clone)]
pub struct Pdfium {
    api: Arc<dyn PdfiumApi>,
}

impl Pdfium {
    /// The process-wide instance, binding from the environment if needed.
    pub fn new() -> Result<Self> {
        Self::global().cloned()
    }

    /// Borrow the process-wide instance, binding from the environment if
    /// needed.
    pub fn global() -> Result<&'static Pdfium> {
        GLOBAL.get_or_try_init(|| Self::bind_global(&LibraryConfig::from_env()?))
    }

    /// Borrow the process-wide instance, binding it from `config` if this is
    /// the first use. Once bound, `config` is ignored.
    pub fn global_with_config(config: &LibraryConfig) -> Result<&'static Pdfium> {
        if let Some(pdfium) = GLOBAL.get() {
            log::debug!(
                "PDFium already bound; ignoring library path {}",
                config.library_path().display()
            );
            return Ok(pdfium);
        }
        GLOBAL.get_or_try_init(|| Self::bind_global(config))
    }

    /// Use an already initialized capability table.
    ///
    /// The caller is responsible for initializing and tearing down whatever
    /// `api` wraps. Mainly useful with test doubles.
    pub fn with_api(api: Arc<dyn PdfiumApi>) -> Self {
        Self { api }
    }

    /// The capability table documents opened through this instance use.
    pub fn api(&self) -> &dyn PdfiumApi {
        &*self.api
    }

    /// Open a PDF file.
    ///
    /// On failure the PDFium error code is decoded into
    /// [`PdfError::DocumentLoad`].
    pub fn open_document<P: AsRef<Path>>(&self, path: P, password: Option<&str>) -> Result<Document> {
        Document::open(Arc::clone(&self.api), path.as_ref(), password)
    }

    /// Open a PDF held in memory. The document keeps `data` alive.
    ///
    /// Requires `FPDF_LoadMemDocument`; empty input and input larger than
    /// `i32::MAX` bytes are rejected.
    pub fn open_document_from_bytes(&self, data: Vec<u8>, password: Option<&str>) -> Result<Document> {
        Document::open_from_bytes(Arc::clone(&self.api), data, password)
    }

    fn bind_global(config: &LibraryConfig) -> Result<Pdfium> {
        let path = config.library_path();
        let bindings = unsafe { PdfiumBindings::load(path) }.map_err(|e| {
            PdfError::LibraryNotFound {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        log::debug!("Bound PDFium from {}", bindings.path().display());

        let api: Arc<dyn PdfiumApi> = Arc::new(bindings);
        api.init_library()?;
        log::debug!("PDFium library initialized");

        if unsafe { libc::atexit(teardown_at_exit) } != 0 {
            log::warn!("Failed to register PDFium teardown; FPDF_DestroyLibrary will not run at exit");
        }
        Ok(Pdfium { api })
    }
}

impl fmt::Debug for Pdfium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pdfium").finish_non_exhaustive()
    }
}

extern "C" fn teardown_at_exit() {
    if let Some(pdfium) = GLOBAL.get() {
        teardown(&TORN_DOWN, pdfium.api());
    }
}

/// Run `FPDF_DestroyLibrary` unless `latch` shows it already ran.
fn teardown(latch: &AtomicBool, api: &dyn PdfiumApi) {
    if latch.swap(true, Ordering::SeqCst) {
        return;
    }
    match api.destroy_library() {
        Ok(()) => log::debug!("PDFium library destroyed"),
        Err(e) => log::warn!("Failed to destroy PDFium library: {e}"),
    }
}
