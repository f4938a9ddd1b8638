//! Scripted in-process stand-in for the PDFium capability table.
//!
//! Handles are integer ids cast to pointers and never dereferenced. Every
//! acquisition is recorded so tests can assert that nothing leaks and that
//! nothing is released twice.

#![allow(dead_code)]

use pdfium_text::sys::{
    FPDF_ANNOTATION, FPDF_DOCUMENT, FPDF_PAGE, FPDF_PAGELINK, FPDF_SCHHANDLE, FPDF_TEXTPAGE,
    FS_RECTF,
};
use pdfium_text::{Operation, PdfError, PdfiumApi, Result};
use std::collections::HashMap;
use std::ffi::CStr;
use std::sync::{Mutex, MutexGuard, Once};

pub const ERR_FILE: u64 = 2;
pub const ERR_FORMAT: u64 = 3;
pub const ERR_PASSWORD: u64 = 4;
pub const ERR_PAGE: u64 = 6;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[derive(Debug, Clone, Default)]
pub struct FakeAnnotation {
    pub subtype: i32,
    pub rect: FS_RECTF,
    pub contents: Option<String>,
    pub rect_fails: bool,
}

impl FakeAnnotation {
    pub fn new(subtype: i32, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            subtype,
            rect: FS_RECTF {
                left,
                top,
                right,
                bottom,
            },
            ..Self::default()
        }
    }

    pub fn with_contents(mut self, contents: &str) -> Self {
        self.contents = Some(contents.to_string());
        self
    }

    pub fn with_failing_rect(mut self) -> Self {
        self.rect_fails = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct FakeLink {
    pub url: String,
    pub start: i32,
    pub count: i32,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub width: f64,
    pub height: f64,
    pub text: Vec<char>,
    /// `None` models a slot PDFium returns as a null annotation.
    pub annotations: Vec<Option<FakeAnnotation>>,
    pub links: Vec<FakeLink>,
    pub failing_char_box: Option<i32>,
}

impl FakePage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            text: Vec::new(),
            annotations: Vec::new(),
            links: Vec::new(),
            failing_char_box: None,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.chars().collect();
        self
    }

    pub fn with_annotation(mut self, annotation: FakeAnnotation) -> Self {
        self.annotations.push(Some(annotation));
        self
    }

    pub fn with_null_annotation(mut self) -> Self {
        self.annotations.push(None);
        self
    }

    pub fn with_link(mut self, url: &str, start: i32, count: i32) -> Self {
        self.links.push(FakeLink {
            url: url.to_string(),
            start,
            count,
        });
        self
    }

    pub fn with_failing_char_box(mut self, index: i32) -> Self {
        self.failing_char_box = Some(index);
        self
    }

    /// Box of character `index`: 10pt advance, 8pt wide, baseline at 700.
    pub fn char_box(index: i32) -> (f64, f64, f64, f64) {
        let left = 10.0 * f64::from(index);
        (left, left + 8.0, 700.0, 712.0)
    }
}

#[derive(Debug, Clone)]
pub struct FakeDocument {
    pub pages: Vec<FakePage>,
    pub password: Option<String>,
}

impl FakeDocument {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            password: None,
        }
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Document,
    Page,
    Annotation,
    TextPage,
    Search,
    Links,
}

#[derive(Debug)]
enum Resource {
    Document {
        doc: usize,
    },
    Page {
        doc: usize,
        index: usize,
    },
    Annotation {
        doc: usize,
        page: usize,
        index: usize,
    },
    TextPage {
        doc: usize,
        page: usize,
    },
    Search {
        matches: Vec<(i32, i32)>,
        cursor: Option<usize>,
    },
    Links {
        doc: usize,
        page: usize,
    },
}

impl Resource {
    fn kind(&self) -> Kind {
        match self {
            Self::Document { .. } => Kind::Document,
            Self::Page { .. } => Kind::Page,
            Self::Annotation { .. } => Kind::Annotation,
            Self::TextPage { .. } => Kind::TextPage,
            Self::Search { .. } => Kind::Search,
            Self::Links { .. } => Kind::Links,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    next_id: usize,
    handles: HashMap<usize, Resource>,
    last_error: u64,
    init_calls: usize,
    destroy_calls: usize,
    double_closes: usize,
    document_close_calls: usize,
    url_buffer_sizes: Vec<usize>,
    text_buffer_sizes: Vec<usize>,
}

impl State {
    fn alloc(&mut self, resource: Resource) -> usize {
        self.next_id += 1;
        let id = self.next_id * 16;
        self.handles.insert(id, resource);
        id
    }

    fn release(&mut self, id: usize, kind: Kind) {
        match self.handles.get(&id) {
            Some(resource) if resource.kind() == kind => {
                self.handles.remove(&id);
            }
            _ => self.double_closes += 1,
        }
    }

    fn get(&self, id: usize) -> &Resource {
        match self.handles.get(&id) {
            Some(resource) => resource,
            None => panic!("use of released or unknown handle {id:#x}"),
        }
    }
}

/// The fake capability table.
pub struct FakePdfium {
    documents: Vec<FakeDocument>,
    files: HashMap<String, usize>,
    memory: Vec<(Vec<u8>, usize)>,
    links_supported: bool,
    mem_load_supported: bool,
    annotations_supported: bool,
    no_match_index: i32,
    faults: Faults,
    state: Mutex<State>,
}

/// Native failures the fake can be told to report.
#[derive(Debug, Default, Clone, Copy)]
struct Faults {
    negative_counts: bool,
    null_text_page: bool,
    null_search: bool,
    null_links: bool,
    document_close: bool,
}

impl Default for FakePdfium {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePdfium {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            files: HashMap::new(),
            memory: Vec::new(),
            links_supported: true,
            mem_load_supported: true,
            annotations_supported: true,
            no_match_index: -1,
            faults: Faults::default(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_file(mut self, path: &str, doc: FakeDocument) -> Self {
        self.documents.push(doc);
        self.files.insert(path.to_string(), self.documents.len() - 1);
        self
    }

    pub fn with_memory(mut self, data: &[u8], doc: FakeDocument) -> Self {
        self.documents.push(doc);
        self.memory.push((data.to_vec(), self.documents.len() - 1));
        self
    }

    pub fn without_links(mut self) -> Self {
        self.links_supported = false;
        self
    }

    pub fn without_mem_load(mut self) -> Self {
        self.mem_load_supported = false;
        self
    }

    pub fn without_annotations(mut self) -> Self {
        self.annotations_supported = false;
        self
    }

    /// Value reported by `FPDFText_GetSchResultIndex` with no current match.
    pub fn with_no_match_index(mut self, index: i32) -> Self {
        self.no_match_index = index;
        self
    }

    /// Page, character and link counts come back as -1.
    pub fn with_negative_counts(mut self) -> Self {
        self.faults.negative_counts = true;
        self
    }

    /// `FPDFText_LoadPage` returns null and sets `FPDF_ERR_PAGE`.
    pub fn with_failing_text_page(mut self) -> Self {
        self.faults.null_text_page = true;
        self
    }

    /// `FPDFText_FindStart` returns null.
    pub fn with_failing_search(mut self) -> Self {
        self.faults.null_search = true;
        self
    }

    /// `FPDFLink_LoadWebLinks` returns null.
    pub fn with_failing_links(mut self) -> Self {
        self.faults.null_links = true;
        self
    }

    /// `FPDF_CloseDocument` reports an error and keeps the document.
    pub fn with_failing_document_close(mut self) -> Self {
        self.faults.document_close = true;
        self
    }

    pub fn open_handles(&self) -> usize {
        self.state().handles.len()
    }

    pub fn open_handles_of(&self, kind: Kind) -> usize {
        self.state()
            .handles
            .values()
            .filter(|resource| resource.kind() == kind)
            .count()
    }

    pub fn double_closes(&self) -> usize {
        self.state().double_closes
    }

    pub fn document_close_calls(&self) -> usize {
        self.state().document_close_calls
    }

    pub fn init_calls(&self) -> usize {
        self.state().init_calls
    }

    pub fn destroy_calls(&self) -> usize {
        self.state().destroy_calls
    }

    pub fn url_buffer_sizes(&self) -> Vec<usize> {
        self.state().url_buffer_sizes.clone()
    }

    pub fn text_buffer_sizes(&self) -> Vec<usize> {
        self.state().text_buffer_sizes.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn page(&self, doc: usize, page: usize) -> &FakePage {
        &self.documents[doc].pages[page]
    }

    fn open(&self, doc: usize, password: Option<&CStr>) -> FPDF_DOCUMENT {
        let mut state = self.state();
        let supplied = password.map(|p| p.to_string_lossy().into_owned());
        if self.documents[doc].password.is_some() && self.documents[doc].password != supplied {
            state.last_error = ERR_PASSWORD;
            return std::ptr::null_mut();
        }
        state.last_error = 0;
        state.alloc(Resource::Document { doc }) as FPDF_DOCUMENT
    }

    fn text_page_of(&self, text_page: FPDF_TEXTPAGE) -> (usize, usize) {
        match self.state().get(text_page as usize) {
            Resource::TextPage { doc, page } => (*doc, *page),
            other => panic!("expected text page, got {other:?}"),
        }
    }

    fn links_of(&self, links: FPDF_PAGELINK) -> &[FakeLink] {
        let (doc, page) = match self.state().get(links as usize) {
            Resource::Links { doc, page } => (*doc, *page),
            other => panic!("expected link set, got {other:?}"),
        };
        &self.page(doc, page).links
    }

    fn annotation_of(&self, annot: FPDF_ANNOTATION) -> Option<&FakeAnnotation> {
        let (doc, page, index) = match self.state().get(annot as usize) {
            Resource::Annotation { doc, page, index } => (*doc, *page, *index),
            other => panic!("expected annotation, got {other:?}"),
        };
        self.page(doc, page).annotations[index].as_ref()
    }
}

fn matches(text: &[char], needle: &str, match_case: bool, whole_word: bool) -> Vec<(i32, i32)> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() || needle.len() > text.len() {
        return Vec::new();
    }
    let fold = |c: char| {
        if match_case {
            c
        } else {
            c.to_lowercase().next().unwrap_or(c)
        }
    };
    let is_word = |c: char| c.is_alphanumeric();

    let mut found = Vec::new();
    for start in 0..=text.len() - needle.len() {
        let end = start + needle.len();
        let hit = text[start..end]
            .iter()
            .zip(&needle)
            .all(|(a, b)| fold(*a) == fold(*b));
        if !hit {
            continue;
        }
        if whole_word {
            let before_ok = start == 0 || !is_word(text[start - 1]);
            let after_ok = end == text.len() || !is_word(text[end]);
            if !(before_ok && after_ok) {
                continue;
            }
        }
        found.push((start as i32, needle.len() as i32));
    }
    found
}

impl PdfiumApi for FakePdfium {
    fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::LoadMemDocument => self.mem_load_supported,
            Operation::LoadWebLinks
            | Operation::CloseWebLinks
            | Operation::CountWebLinks
            | Operation::GetUrl
            | Operation::GetTextRange => self.links_supported,
            Operation::GetAnnotCount
            | Operation::GetAnnot
            | Operation::CloseAnnot
            | Operation::GetAnnotSubtype
            | Operation::GetAnnotRect
            | Operation::AnnotHasKey
            | Operation::GetAnnotStringValue => self.annotations_supported,
            _ => true,
        }
    }

    fn init_library(&self) -> Result<()> {
        self.state().init_calls += 1;
        Ok(())
    }

    fn destroy_library(&self) -> Result<()> {
        self.state().destroy_calls += 1;
        Ok(())
    }

    fn load_document(&self, path: &CStr, password: Option<&CStr>) -> Result<FPDF_DOCUMENT> {
        match self.files.get(path.to_string_lossy().as_ref()) {
            Some(&doc) => Ok(self.open(doc, password)),
            None => {
                self.state().last_error = ERR_FILE;
                Ok(std::ptr::null_mut())
            }
        }
    }

    fn load_mem_document(&self, data: &[u8], password: Option<&CStr>) -> Result<FPDF_DOCUMENT> {
        if !self.mem_load_supported {
            return Err(Operation::LoadMemDocument.unsupported());
        }
        match self.memory.iter().find(|(bytes, _)| bytes.as_slice() == data) {
            Some(&(_, doc)) => Ok(self.open(doc, password)),
            None => {
                self.state().last_error = ERR_FORMAT;
                Ok(std::ptr::null_mut())
            }
        }
    }

    unsafe fn close_document(&self, document: FPDF_DOCUMENT) -> Result<()> {
        let mut state = self.state();
        state.document_close_calls += 1;
        if self.faults.document_close {
            return Err(PdfError::OperationFailed {
                operation: "FPDF_CloseDocument".to_string(),
                reason: "document is still in use".to_string(),
            });
        }
        state.release(document as usize, Kind::Document);
        Ok(())
    }

    unsafe fn get_page_count(&self, document: FPDF_DOCUMENT) -> Result<i32> {
        if self.faults.negative_counts {
            return Ok(-1);
        }
        let doc = match self.state().get(document as usize) {
            Resource::Document { doc } => *doc,
            other => panic!("expected document, got {other:?}"),
        };
        Ok(self.documents[doc].pages.len() as i32)
    }

    fn get_last_error(&self) -> Result<u64> {
        Ok(self.state().last_error)
    }

    unsafe fn load_page(&self, document: FPDF_DOCUMENT, index: i32) -> Result<FPDF_PAGE> {
        let mut state = self.state();
        let doc = match state.get(document as usize) {
            Resource::Document { doc } => *doc,
            other => panic!("expected document, got {other:?}"),
        };
        let page_count = self.documents[doc].pages.len();
        match usize::try_from(index) {
            Ok(index) if index < page_count => {
                Ok(state.alloc(Resource::Page { doc, index }) as FPDF_PAGE)
            }
            _ => {
                state.last_error = ERR_PAGE;
                Ok(std::ptr::null_mut())
            }
        }
    }

    unsafe fn close_page(&self, page: FPDF_PAGE) -> Result<()> {
        self.state().release(page as usize, Kind::Page);
        Ok(())
    }

    unsafe fn get_page_width(&self, page: FPDF_PAGE) -> Result<f64> {
        let (doc, index) = page_of(&self.state(), page);
        Ok(self.page(doc, index).width)
    }

    unsafe fn get_page_height(&self, page: FPDF_PAGE) -> Result<f64> {
        let (doc, index) = page_of(&self.state(), page);
        Ok(self.page(doc, index).height)
    }

    unsafe fn get_annot_count(&self, page: FPDF_PAGE) -> Result<i32> {
        if !self.annotations_supported {
            return Err(Operation::GetAnnotCount.unsupported());
        }
        let (doc, index) = page_of(&self.state(), page);
        Ok(self.page(doc, index).annotations.len() as i32)
    }

    unsafe fn get_annot(&self, page: FPDF_PAGE, index: i32) -> Result<FPDF_ANNOTATION> {
        let mut state = self.state();
        let (doc, page) = page_of(&state, page);
        let slot = &self.page(doc, page).annotations[index as usize];
        if slot.is_none() {
            return Ok(std::ptr::null_mut());
        }
        Ok(state.alloc(Resource::Annotation {
            doc,
            page,
            index: index as usize,
        }) as FPDF_ANNOTATION)
    }

    unsafe fn close_annot(&self, annot: FPDF_ANNOTATION) -> Result<()> {
        self.state().release(annot as usize, Kind::Annotation);
        Ok(())
    }

    unsafe fn get_annot_subtype(&self, annot: FPDF_ANNOTATION) -> Result<i32> {
        Ok(self.annotation_of(annot).map_or(0, |a| a.subtype))
    }

    unsafe fn get_annot_rect(&self, annot: FPDF_ANNOTATION, rect: &mut FS_RECTF) -> Result<bool> {
        match self.annotation_of(annot) {
            Some(a) if !a.rect_fails => {
                *rect = a.rect;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    unsafe fn annot_has_key(&self, annot: FPDF_ANNOTATION, key: &CStr) -> Result<bool> {
        assert_eq!(key.to_bytes(), b"Contents");
        Ok(self
            .annotation_of(annot)
            .is_some_and(|a| a.contents.is_some()))
    }

    unsafe fn get_annot_string_value(
        &self,
        annot: FPDF_ANNOTATION,
        key: &CStr,
        buffer: &mut [u8],
    ) -> Result<u64> {
        assert_eq!(key.to_bytes(), b"Contents");
        let contents = self
            .annotation_of(annot)
            .and_then(|a| a.contents.clone())
            .unwrap_or_default();
        let bytes: Vec<u8> = contents
            .encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(|unit| unit.to_le_bytes())
            .collect();
        if buffer.len() >= bytes.len() {
            buffer[..bytes.len()].copy_from_slice(&bytes);
        }
        Ok(bytes.len() as u64)
    }

    unsafe fn load_text_page(&self, page: FPDF_PAGE) -> Result<FPDF_TEXTPAGE> {
        let mut state = self.state();
        let (doc, page) = page_of(&state, page);
        if self.faults.null_text_page {
            state.last_error = ERR_PAGE;
            return Ok(std::ptr::null_mut());
        }
        Ok(state.alloc(Resource::TextPage { doc, page }) as FPDF_TEXTPAGE)
    }

    unsafe fn close_text_page(&self, text_page: FPDF_TEXTPAGE) -> Result<()> {
        self.state().release(text_page as usize, Kind::TextPage);
        Ok(())
    }

    unsafe fn count_chars(&self, text_page: FPDF_TEXTPAGE) -> Result<i32> {
        if self.faults.negative_counts {
            return Ok(-1);
        }
        let (doc, page) = self.text_page_of(text_page);
        Ok(self.page(doc, page).text.len() as i32)
    }

    unsafe fn get_text(
        &self,
        text_page: FPDF_TEXTPAGE,
        start: i32,
        count: i32,
        buffer: &mut [u16],
    ) -> Result<i32> {
        self.state().text_buffer_sizes.push(buffer.len());
        // Like PDFium, a null buffer reports nothing.
        if buffer.is_empty() {
            return Ok(0);
        }
        let (doc, page) = self.text_page_of(text_page);
        let text = &self.page(doc, page).text;
        let start = start as usize;
        let end = (start + count as usize).min(text.len());
        let units: Vec<u16> = text[start..end]
            .iter()
            .collect::<String>()
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();
        let written = units.len().min(buffer.len());
        buffer[..written].copy_from_slice(&units[..written]);
        Ok(written as i32)
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
        let (doc, page) = self.text_page_of(text_page);
        if self.page(doc, page).failing_char_box == Some(index) {
            return Ok(false);
        }
        (*left, *right, *bottom, *top) = FakePage::char_box(index);
        Ok(true)
    }

    unsafe fn get_char_index_at_pos(
        &self,
        text_page: FPDF_TEXTPAGE,
        x: f64,
        y: f64,
        x_tolerance: f64,
        y_tolerance: f64,
    ) -> Result<i32> {
        let (doc, page) = self.text_page_of(text_page);
        let count = self.page(doc, page).text.len() as i32;
        for index in 0..count {
            let (left, right, bottom, top) = FakePage::char_box(index);
            if x >= left - x_tolerance
                && x <= right + x_tolerance
                && y >= bottom - y_tolerance
                && y <= top + y_tolerance
            {
                return Ok(index);
            }
        }
        Ok(-1)
    }

    unsafe fn find_start(
        &self,
        text_page: FPDF_TEXTPAGE,
        needle: &[u16],
        flags: u32,
        start_index: i32,
    ) -> Result<FPDF_SCHHANDLE> {
        assert_eq!(needle.last(), Some(&0), "needle must be NUL-terminated");
        assert_eq!(start_index, 0);
        if self.faults.null_search {
            return Ok(std::ptr::null_mut());
        }
        let needle = String::from_utf16_lossy(&needle[..needle.len() - 1]);
        let (doc, page) = self.text_page_of(text_page);
        let found = matches(
            &self.page(doc, page).text,
            &needle,
            flags & 1 != 0,
            flags & 2 != 0,
        );
        let id = self.state().alloc(Resource::Search {
            matches: found,
            cursor: None,
        });
        Ok(id as FPDF_SCHHANDLE)
    }

    unsafe fn find_next(&self, search: FPDF_SCHHANDLE) -> Result<bool> {
        let mut state = self.state();
        match state.handles.get_mut(&(search as usize)) {
            Some(Resource::Search { matches, cursor }) => {
                let next = cursor.map_or(0, |c| c + 1);
                if next < matches.len() {
                    *cursor = Some(next);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    unsafe fn find_prev(&self, search: FPDF_SCHHANDLE) -> Result<bool> {
        let mut state = self.state();
        match state.handles.get_mut(&(search as usize)) {
            Some(Resource::Search { cursor, .. }) => match *cursor {
                Some(c) if c > 0 => {
                    *cursor = Some(c - 1);
                    Ok(true)
                }
                _ => Ok(false),
            },
            other => panic!("expected search, got {other:?}"),
        }
    }

    unsafe fn get_sch_result_index(&self, search: FPDF_SCHHANDLE) -> Result<i32> {
        match self.state().get(search as usize) {
            Resource::Search { matches, cursor } => {
                Ok(cursor.map_or(self.no_match_index, |c| matches[c].0))
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    unsafe fn get_sch_count(&self, search: FPDF_SCHHANDLE) -> Result<i32> {
        match self.state().get(search as usize) {
            Resource::Search { matches, cursor } => Ok(cursor.map_or(0, |c| matches[c].1)),
            other => panic!("expected search, got {other:?}"),
        }
    }

    unsafe fn find_close(&self, search: FPDF_SCHHANDLE) -> Result<()> {
        self.state().release(search as usize, Kind::Search);
        Ok(())
    }

    unsafe fn load_web_links(&self, text_page: FPDF_TEXTPAGE) -> Result<FPDF_PAGELINK> {
        if !self.links_supported {
            return Err(Operation::LoadWebLinks.unsupported());
        }
        if self.faults.null_links {
            return Ok(std::ptr::null_mut());
        }
        let (doc, page) = self.text_page_of(text_page);
        Ok(self.state().alloc(Resource::Links { doc, page }) as FPDF_PAGELINK)
    }

    unsafe fn close_web_links(&self, links: FPDF_PAGELINK) -> Result<()> {
        if !self.links_supported {
            return Err(Operation::CloseWebLinks.unsupported());
        }
        self.state().release(links as usize, Kind::Links);
        Ok(())
    }

    unsafe fn count_web_links(&self, links: FPDF_PAGELINK) -> Result<i32> {
        if self.faults.negative_counts {
            return Ok(-1);
        }
        Ok(self.links_of(links).len() as i32)
    }

    unsafe fn get_url(&self, links: FPDF_PAGELINK, index: i32, buffer: &mut [u16]) -> Result<i32> {
        self.state().url_buffer_sizes.push(buffer.len());
        let url = &self.links_of(links)[index as usize].url;
        if url.is_empty() {
            return Ok(0);
        }
        let units: Vec<u16> = url.encode_utf16().chain(std::iter::once(0)).collect();
        if buffer.len() >= units.len() {
            buffer[..units.len()].copy_from_slice(&units);
        }
        Ok(units.len() as i32)
    }

    unsafe fn get_text_range(
        &self,
        links: FPDF_PAGELINK,
        index: i32,
        start: &mut i32,
        count: &mut i32,
    ) -> Result<bool> {
        let link = &self.links_of(links)[index as usize];
        if link.count < 0 {
            return Ok(false);
        }
        *start = link.start;
        *count = link.count;
        Ok(true)
    }
}

fn page_of(state: &State, page: FPDF_PAGE) -> (usize, usize) {
    match state.get(page as usize) {
        Resource::Page { doc, index } => (*doc, *index),
        other => panic!("expected page, got {other:?}"),
    }
}

/// Unwrap helper for results whose error type must be inspected.
pub fn expect_err<T: std::fmt::Debug>(result: Result<T>) -> PdfError {
    match result {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(e) => e,
    }
}

pub const SAMPLE_PATH: &str = "sample.pdf";
pub const LOCKED_PATH: &str = "locked.pdf";
pub const EMPTY_PATH: &str = "empty.pdf";
pub const SAMPLE_BYTES: &[u8] = b"%PDF-1.7 sample";

pub const PAGE0_TEXT: &str = "Hello World. Visit https://example.com today.";
pub const PAGE2_TEXT: &str = "hello HELLO helloworld";

/// Three pages with one, two (plus a null slot) and one annotation.
pub fn sample_document() -> FakeDocument {
    let url_start = PAGE0_TEXT.find("https").unwrap_or(0) as i32;
    FakeDocument::new(vec![
        FakePage::new(612.0, 792.0)
            .with_text(PAGE0_TEXT)
            .with_annotation(
                FakeAnnotation::new(9, 72.0, 720.0, 180.0, 708.0).with_contents("Check this"),
            )
            .with_link("https://example.com", url_start, 19)
            .with_link("", 0, 5),
        FakePage::new(595.0, 842.0)
            .with_annotation(FakeAnnotation::new(1, 10.0, 20.0, 30.0, 5.0))
            .with_null_annotation()
            .with_annotation(
                FakeAnnotation::new(13, 100.0, 400.0, 300.0, 350.0).with_contents("Größe 𝄞"),
            ),
        FakePage::new(400.0, 300.0)
            .with_text(PAGE2_TEXT)
            .with_annotation(FakeAnnotation::new(28, 0.0, 50.0, 50.0, 0.0)),
    ])
}

pub fn sample_fake() -> FakePdfium {
    FakePdfium::new()
        .with_file(SAMPLE_PATH, sample_document())
        .with_file(LOCKED_PATH, sample_document().with_password("secret"))
        .with_file(EMPTY_PATH, FakeDocument::new(Vec::new()))
        .with_memory(SAMPLE_BYTES, sample_document())
}

/// A `Pdfium` over `fake`, plus a handle on the fake for assertions.
pub fn pdfium_over(fake: FakePdfium) -> (std::sync::Arc<FakePdfium>, pdfium_text::Pdfium) {
    init_logging();
    let fake = std::sync::Arc::new(fake);
    let pdfium = pdfium_text::Pdfium::with_api(fake.clone());
    (fake, pdfium)
}
