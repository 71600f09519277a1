use std::collections::HashMap;

use fltk::enums::{Color, Font};
use fltk::text::{StyleTableEntryExt, TextAttr};

use crate::app::domain::rich_text::StyledText;
use crate::app::domain::style::{CharStyle, StyleFlags};

/// Style buffer bytes must stay single-byte, so 'A'..='~' is the whole range.
const FIRST_STYLE: u8 = b'A';
const LAST_STYLE: u8 = b'~';

/// Maps character styles to FLTK style characters ('A', 'B', 'C', ...).
/// Builds the StyleTableEntryExt table as new styles are encountered.
#[derive(Default)]
pub struct StyleMap {
    style_to_char: HashMap<CharStyle, char>,
    entries: Vec<StyleTableEntryExt>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the style character for a style, inserting a new entry if needed.
    pub fn get_or_insert(&mut self, style: &CharStyle) -> char {
        if let Some(&ch) = self.style_to_char.get(style) {
            return ch;
        }

        let idx = self.entries.len();
        if idx > usize::from(LAST_STYLE - FIRST_STYLE) {
            return LAST_STYLE as char;
        }
        let ch = (FIRST_STYLE + idx as u8) as char;
        self.entries.push(table_entry(style));
        self.style_to_char.insert(style.clone(), ch);
        ch
    }

    /// Style buffer text for `content`: one style char per UTF-8 byte.
    pub fn style_bytes(&mut self, content: &StyledText) -> String {
        let mut out = String::with_capacity(content.text().len());
        for (segment, style) in content.segments() {
            let ch = self.get_or_insert(style);
            out.extend(std::iter::repeat_n(ch, segment.len()));
        }
        out
    }

    /// Get the style table entries for FLTK's set_highlight_data_ext.
    pub fn entries(&self) -> &[StyleTableEntryExt] {
        &self.entries
    }

    /// Drop all mappings (used when a document is replaced).
    pub fn clear(&mut self) {
        self.style_to_char.clear();
        self.entries.clear();
    }
}

fn table_entry(style: &CharStyle) -> StyleTableEntryExt {
    StyleTableEntryExt {
        color: Color::from_rgb(style.color.r, style.color.g, style.color.b),
        font: fltk_font(&style.font.family, style.font.flags),
        size: style.font.size.rounded_points() as i32,
        attr: if style.font.flags.underline {
            TextAttr::Underline
        } else {
            TextAttr::None
        },
        bgcolor: Color::Background2,
    }
}

/// Closest built-in FLTK face for a font family and style bits.
pub fn fltk_font(family: &str, flags: StyleFlags) -> Font {
    let family = family.to_ascii_lowercase();
    let serif = ["times", "georgia", "garamond", "cambria", "serif"]
        .iter()
        .any(|f| family.contains(f))
        && !family.contains("sans");
    let mono = ["courier", "consolas", "mono", "menlo"]
        .iter()
        .any(|f| family.contains(f));

    match (mono, serif, flags.bold, flags.italic) {
        (true, _, false, false) => Font::Courier,
        (true, _, true, false) => Font::CourierBold,
        (true, _, false, true) => Font::CourierItalic,
        (true, _, true, true) => Font::CourierBoldItalic,
        (false, true, false, false) => Font::Times,
        (false, true, true, false) => Font::TimesBold,
        (false, true, false, true) => Font::TimesItalic,
        (false, true, true, true) => Font::TimesBoldItalic,
        (false, false, false, false) => Font::Helvetica,
        (false, false, true, false) => Font::HelveticaBold,
        (false, false, false, true) => Font::HelveticaItalic,
        (false, false, true, true) => Font::HelveticaBoldItalic,
    }
}
