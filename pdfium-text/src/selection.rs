//! Character ranges on a text page.

use crate::error::{PdfError, Result};
use crate::handle::HandleKind;
use crate::text::{CharBox, TextPage};

/// A validated character range `start_index..start_index + count` of a
/// [`TextPage`].
///
/// Unlike the other text types a selection owns no native resource. Closing
/// it only detaches it from its page; afterwards every query fails with
/// [`PdfError::InvalidHandle`].
#[derive(Debug, Clone)]
pub struct TextSelection<'t> {
    text_page: Option<&'t TextPage<'t>>,
    start_index: i32,
    count: i32,
}

impl<'t> TextSelection<'t> {
    /// Select `count` characters from `start_index`.
    ///
    /// Requires `0 <= start_index < count_chars()`, `count >= 0` and
    /// `start_index + count <= count_chars()`.
    pub fn new(text_page: &'t TextPage<'t>, start_index: i32, count: i32) -> Result<Self> {
        let char_count = text_page.count_chars()?;
        if start_index < 0 || start_index >= char_count {
            return Err(PdfError::invalid_index("Start", start_index, char_count));
        }
        if count < 0 || count > char_count - start_index {
            return Err(PdfError::InvalidArgument(format!(
                "Selection {start_index}+{count} exceeds character count {char_count}"
            )));
        }
        Ok(Self {
            text_page: Some(text_page),
            start_index,
            count,
        })
    }

    pub fn start_index(&self) -> i32 {
        self.start_index
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    /// Text of the selected characters.
    pub fn get_text(&self) -> Result<String> {
        self.text_page()?
            .get_text(self.start_index, Some(self.count))
    }

    /// Number of rectangles covering the selection.
    ///
    /// One rectangle per character; adjacent characters are not merged into
    /// line boxes.
    pub fn count_rects(&self) -> Result<i32> {
        self.text_page()?;
        Ok(self.count)
    }

    /// Rectangle `index` of the selection.
    pub fn get_rect(&self, index: i32) -> Result<CharBox> {
        let text_page = self.text_page()?;
        if index < 0 || index >= self.count {
            return Err(PdfError::invalid_index("Rectangle", index, self.count));
        }
        text_page.get_char_box(self.start_index + index)
    }

    /// All rectangles, in character order.
    pub fn rects(&self) -> Result<Vec<CharBox>> {
        (0..self.count_rects()?).map(|i| self.get_rect(i)).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.text_page.is_none()
    }

    /// Detach from the text page. Safe to call more than once.
    pub fn close(&mut self) {
        self.text_page = None;
    }

    fn text_page(&self) -> Result<&'t TextPage<'t>> {
        self.text_page.ok_or(PdfError::InvalidHandle {
            kind: HandleKind::Selection,
        })
    }
}
