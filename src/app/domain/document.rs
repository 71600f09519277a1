use std::ops::Range;

use super::rich_text::StyledText;
use super::style::{CharStyle, Effective, FontSpec, Rgb};
use super::surface::{ModifyCallback, ModifyEvent, Selection, TextSurface};
use crate::app::services::text_ops::normalize_newlines;

/// Style chosen at a caret, applied to the next characters typed there.
#[derive(Debug, Clone)]
struct TypingStyle {
    at: usize,
    style: CharStyle,
}

/// In-memory rich text surface: styled runs, paragraph bullets, a selection
/// and the modify observers.
pub struct RichDocument {
    content: StyledText,
    base: FontSpec,
    selection: Selection,
    typing: Option<TypingStyle>,
    observers: Vec<ModifyCallback>,
}

impl RichDocument {
    pub fn new(base: FontSpec) -> Self {
        Self {
            content: StyledText::empty(),
            base,
            selection: Selection::default(),
            typing: None,
            observers: Vec::new(),
        }
    }

    pub fn content(&self) -> &StyledText {
        &self.content
    }

    /// Inserts typed or pasted text and moves the caret after it.
    pub fn insert_text(&mut self, at: usize, text: &str) -> usize {
        let at = at.min(self.content.len());
        let style = self.caret_style(at);
        let inserted = self.content.insert(at, text, &style);
        if inserted == 0 {
            return 0;
        }
        let caret = at + inserted;
        self.selection = Selection::caret(caret);
        // Keep typing in the chosen style while the caret stays at the end.
        if let Some(typing) = self.typing.as_mut().filter(|t| t.at == at) {
            typing.at = caret;
        } else {
            self.typing = None;
        }
        self.notify(ModifyEvent {
            position: at,
            inserted,
            ..Default::default()
        });
        inserted
    }

    pub fn delete(&mut self, range: Range<usize>) -> usize {
        let start = range.start;
        let deleted = self.content.remove(range);
        if deleted == 0 {
            return 0;
        }
        self.selection = Selection::caret(start.min(self.content.len()));
        self.typing = None;
        self.notify(ModifyEvent {
            position: start,
            deleted,
            ..Default::default()
        });
        deleted
    }

    fn base_style(&self) -> CharStyle {
        CharStyle::plain(&self.base)
    }

    /// Style the next character typed at `at` would get.
    fn caret_style(&self, at: usize) -> CharStyle {
        if let Some(typing) = self.typing.as_ref().filter(|t| t.at == at) {
            return typing.style.clone();
        }
        let neighbour = if at > 0 {
            self.content.style_at(at - 1)
        } else {
            self.content.style_at(0)
        };
        neighbour.cloned().unwrap_or_else(|| self.base_style())
    }

    fn restyle(&mut self, selection: Selection, f: impl Fn(&CharStyle) -> CharStyle) {
        let selection = selection.clamp(self.content.len());
        if selection.is_empty() {
            let style = f(&self.caret_style(selection.start));
            self.typing = Some(TypingStyle {
                at: selection.start,
                style,
            });
            return;
        }
        self.content.restyle(selection.range(), f);
        self.notify(ModifyEvent {
            position: selection.start,
            restyled: selection.len(),
            ..Default::default()
        });
    }

    fn notify(&mut self, event: ModifyEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

impl TextSurface for RichDocument {
    fn full_text(&self) -> String {
        self.content.text().to_string()
    }

    fn char_count(&self) -> usize {
        self.content.len()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    /// Moving the caret away from a pending typing style drops it.
    fn set_selection(&mut self, selection: Selection) {
        let selection = selection.clamp(self.content.len());
        if self.typing.as_ref().is_some_and(|t| selection != Selection::caret(t.at)) {
            self.typing = None;
        }
        self.selection = selection;
    }

    fn effective_style(&self, selection: Selection) -> Effective<CharStyle> {
        let selection = selection.clamp(self.content.len());
        if selection.is_empty() {
            return Effective::Uniform(self.caret_style(selection.start));
        }
        Effective::from_values(self.content.styles_in(selection.range()).cloned())
    }

    fn effective_font(&self, selection: Selection) -> Effective<FontSpec> {
        let selection = selection.clamp(self.content.len());
        if selection.is_empty() {
            return Effective::Uniform(self.caret_style(selection.start).font);
        }
        Effective::from_values(self.content.styles_in(selection.range()).map(|s| &s.font))
            .map(FontSpec::clone)
    }

    fn effective_color(&self, selection: Selection) -> Effective<Rgb> {
        let selection = selection.clamp(self.content.len());
        if selection.is_empty() {
            return Effective::Uniform(self.caret_style(selection.start).color);
        }
        Effective::from_values(self.content.styles_in(selection.range()).map(|s| s.color))
    }

    fn base_font(&self) -> FontSpec {
        self.base.clone()
    }

    fn set_style(&mut self, selection: Selection, style: &CharStyle) {
        self.restyle(selection, |_| style.clone());
    }

    fn set_font(&mut self, selection: Selection, font: &FontSpec) {
        self.restyle(selection, |s| CharStyle::new(font.clone(), s.color));
    }

    fn set_color(&mut self, selection: Selection, color: Rgb) {
        self.restyle(selection, |s| CharStyle::new(s.font.clone(), color));
    }

    fn bullet_state(&self, selection: Selection) -> Effective<bool> {
        let span = self.content.paragraph_span(selection.range());
        Effective::from_values(span.map(|p| self.content.bullets()[p]))
    }

    fn set_bullet(&mut self, selection: Selection, bulleted: bool) {
        let selection = selection.clamp(self.content.len());
        let span = self.content.paragraph_span(selection.range());
        self.content.set_bullets(span, bulleted);
        self.notify(ModifyEvent {
            position: selection.start,
            restyled: selection.len(),
            ..Default::default()
        });
    }

    fn snapshot(&self) -> StyledText {
        self.content.clone()
    }

    fn replace_content(&mut self, content: StyledText) {
        let deleted = self.content.len();
        let inserted = content.len();
        self.content = content;
        self.selection = Selection::caret(0);
        self.typing = None;
        self.notify(ModifyEvent {
            position: 0,
            inserted,
            deleted,
            restyled: 0,
        });
    }

    fn replace_plain(&mut self, text: &str) {
        let content = StyledText::plain(&normalize_newlines(text), &self.base_style());
        self.replace_content(content);
    }

    fn clear(&mut self) {
        self.replace_content(StyledText::empty());
    }

    fn set_base_font(&mut self, font: FontSpec) {
        self.base = font;
        self.typing = None;
    }

    fn add_modify_callback(&mut self, callback: ModifyCallback) {
        self.observers.push(callback);
    }
}
