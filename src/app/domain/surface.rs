use std::ops::Range;

use super::rich_text::StyledText;
use super::style::{CharStyle, Effective, FontSpec, Rgb};
use crate::app::infrastructure::error::Result;
use crate::app::services::rtf;

/// A contiguous char range. An empty selection is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn caret(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn all(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn clamp(&self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// What changed in a surface, in chars. Mirrors FLTK's buffer modify callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifyEvent {
    pub position: usize,
    pub inserted: usize,
    pub deleted: usize,
    pub restyled: usize,
}

pub type ModifyCallback = Box<dyn FnMut(&ModifyEvent)>;

/// The text editing capability the editor core drives.
///
/// Implementations own the text, the per-run character styles and the
/// per-paragraph bullet flags, and notify observers after every mutation.
pub trait TextSurface {
    fn full_text(&self) -> String;

    fn char_count(&self) -> usize {
        self.full_text().chars().count()
    }

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    /// Font, size, flags and colour together.
    fn effective_style(&self, selection: Selection) -> Effective<CharStyle>;

    fn effective_font(&self, selection: Selection) -> Effective<FontSpec>;

    fn effective_color(&self, selection: Selection) -> Effective<Rgb>;

    /// The document-wide default font, used when a selection is mixed.
    fn base_font(&self) -> FontSpec;

    fn set_style(&mut self, selection: Selection, style: &CharStyle);

    fn set_font(&mut self, selection: Selection, font: &FontSpec);

    fn set_color(&mut self, selection: Selection, color: Rgb);

    /// Bullet state of the paragraphs the selection touches.
    fn bullet_state(&self, selection: Selection) -> Effective<bool>;

    fn set_bullet(&mut self, selection: Selection, bulleted: bool);

    fn snapshot(&self) -> StyledText;

    /// Replaces all content at once.
    fn replace_content(&mut self, content: StyledText);

    /// Replaces all content with unstyled text in the base font.
    fn replace_plain(&mut self, text: &str);

    fn clear(&mut self);

    fn set_base_font(&mut self, font: FontSpec);

    fn add_modify_callback(&mut self, callback: ModifyCallback);

    /// Decodes an RTF payload and replaces the content with it. Nothing is
    /// applied if decoding fails.
    fn load_structured(&mut self, bytes: &[u8]) -> Result<()> {
        let content = rtf::decode(bytes, &self.base_font())?;
        self.replace_content(content);
        Ok(())
    }

    fn serialize_structured(&self) -> Vec<u8> {
        rtf::encode(&self.snapshot(), &self.base_font())
    }
}
