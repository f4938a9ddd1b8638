//! Owned native handles with an explicit open/closed state.
//!
//! Every wrapper that owns a PDFium resource keeps it in a [`Handle`]. A
//! handle starts `Open` with a non-null pointer and moves to `Closed` exactly
//! once; it is never reopened and a closed handle never yields its pointer.

use crate::error::{PdfError, Result};
use std::fmt;

/// Which kind of native resource a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Document,
    Page,
    TextPage,
    Search,
    Links,
    Selection,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Document => "Document",
            Self::Page => "Page",
            Self::TextPage => "Text page",
            Self::Search => "Search",
            Self::Links => "Link set",
            Self::Selection => "Selection",
        };
        f.write_str(name)
    }
}

/// Raw pointer types that can be held in a [`Handle`].
pub(crate) trait NativeHandle: Copy {
    fn is_null(&self) -> bool;
}

impl<T> NativeHandle for *mut T {
    fn is_null(&self) -> bool {
        <*mut T>::is_null(*self)
    }
}

#[derive(Debug)]
pub(crate) enum HandleState<T> {
    Open(T),
    Closed,
}

/// An exclusively owned native resource reference.
#[derive(Debug)]
pub(crate) struct Handle<T: NativeHandle> {
    kind: HandleKind,
    state: HandleState<T>,
}

impl<T: NativeHandle> Handle<T> {
    /// Wrap a pointer returned by PDFium. Returns `None` for null.
    pub(crate) fn new(kind: HandleKind, raw: T) -> Option<Self> {
        if raw.is_null() {
            return None;
        }
        Some(Self {
            kind,
            state: HandleState::Open(raw),
        })
    }

    pub(crate) fn is_open(&self) -> bool {
        matches!(self.state, HandleState::Open(_))
    }

    /// The live pointer, or `InvalidHandle` once closed.
    pub(crate) fn get(&self) -> Result<T> {
        match self.state {
            HandleState::Open(raw) => Ok(raw),
            HandleState::Closed => Err(PdfError::InvalidHandle { kind: self.kind }),
        }
    }

    /// Move to `Closed`, returning the pointer if the handle was open.
    pub(crate) fn take(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, HandleState::Closed) {
            HandleState::Open(raw) => Some(raw),
            HandleState::Closed => None,
        }
    }

    /// Close the handle with `release`. No-op when already closed.
    ///
    /// The handle is marked closed before `release` runs; a release failure
    /// is logged and dropped.
    pub(crate) fn close_with<F>(&mut self, release: F)
    where
        F: FnOnce(T) -> Result<()>,
    {
        let Some(raw) = self.take() else {
            return;
        };
        match release(raw) {
            Ok(()) => log::debug!("Closed {} handle", self.kind),
            Err(e) => log::warn!("Failed to close {} handle: {e}", self.kind),
        }
    }
}
