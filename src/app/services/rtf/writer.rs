use std::fmt::Write as _;

use crate::app::domain::rich_text::StyledText;
use crate::app::domain::style::{CharStyle, FontSpec, Rgb};

const SYMBOL_FONT: &str = "Symbol";

/// Serialize styled text as RTF. `base` names the font of an empty document.
pub fn encode(text: &StyledText, base: &FontSpec) -> Vec<u8> {
    let tables = Tables::collect(text, base);
    let mut out = String::with_capacity(text.text().len() * 2 + 256);

    out.push_str("{\\rtf1\\ansi\\ansicpg1252\\deff0\\uc1");
    tables.write(&mut out);
    out.push_str("\\viewkind4\r\n");

    let mut current: Option<&CharStyle> = None;
    let mut paragraph = 0;
    write_paragraph_start(&mut out, text, paragraph, &tables);

    for (segment, style) in text.segments() {
        for ch in segment.chars() {
            if current != Some(style) {
                write_style_delta(&mut out, current, style, &tables);
                current = Some(style);
            }
            if ch == '\n' {
                out.push_str("\\par\r\n");
                paragraph += 1;
                write_paragraph_start(&mut out, text, paragraph, &tables);
            } else {
                write_char(&mut out, ch);
            }
        }
    }

    if current.is_none() {
        // Empty document: still record the base font and size.
        write_style_delta(&mut out, None, &CharStyle::plain(base), &tables);
    }
    out.push_str("\\par\r\n}\r\n");
    out.into_bytes()
}

struct Tables {
    fonts: Vec<String>,
    colors: Vec<Rgb>,
    symbol_font: Option<usize>,
}

impl Tables {
    fn collect(text: &StyledText, base: &FontSpec) -> Self {
        let mut fonts: Vec<String> = Vec::new();
        let mut colors: Vec<Rgb> = Vec::new();
        for run in text.runs() {
            if !fonts.contains(&run.style.font.family) {
                fonts.push(run.style.font.family.clone());
            }
            if !colors.contains(&run.style.color) {
                colors.push(run.style.color);
            }
        }
        if fonts.is_empty() {
            fonts.push(base.family.clone());
            colors.push(Rgb::BLACK);
        }
        let symbol_font = text.bullets().iter().any(|b| *b).then(|| {
            fonts.push(SYMBOL_FONT.to_string());
            fonts.len() - 1
        });
        Self {
            fonts,
            colors,
            symbol_font,
        }
    }

    fn font_index(&self, family: &str) -> usize {
        self.fonts.iter().position(|f| f == family).unwrap_or(0)
    }

    /// Index 0 is the "auto" colour entry.
    fn color_index(&self, color: Rgb) -> usize {
        self.colors.iter().position(|c| *c == color).map_or(0, |i| i + 1)
    }

    fn write(&self, out: &mut String) {
        out.push_str("{\\fonttbl");
        for (i, family) in self.fonts.iter().enumerate() {
            let charset = if Some(i) == self.symbol_font { 2 } else { 0 };
            let _ = write!(out, "{{\\f{}\\fnil\\fcharset{} ", i, charset);
            for ch in family.chars() {
                if ch == ';' {
                    out.push_str("\\'3b");
                } else {
                    write_char(out, ch);
                }
            }
            out.push_str(";}");
        }
        out.push_str("}\r\n{\\colortbl ;");
        for color in &self.colors {
            let _ = write!(out, "\\red{}\\green{}\\blue{};", color.r, color.g, color.b);
        }
        out.push_str("}\r\n");
    }
}

fn write_paragraph_start(out: &mut String, text: &StyledText, paragraph: usize, tables: &Tables) {
    out.push_str("\\pard");
    let bulleted = text.bullets().get(paragraph).copied().unwrap_or(false);
    if let (true, Some(symbol)) = (bulleted, tables.symbol_font) {
        let _ = write!(
            out,
            "{{\\pntext\\f{symbol}\\'B7\\tab}}{{\\*\\pn\\pnlvlblt\\pnf{symbol}\\pnindent0{{\\pntxtb\\'B7}}}}\\fi-360\\li720"
        );
    }
    out.push(' ');
}

fn write_style_delta(out: &mut String, prev: Option<&CharStyle>, next: &CharStyle, tables: &Tables) {
    let mut wrote = false;
    let mut word = |out: &mut String, w: &str| {
        out.push_str(w);
        wrote = true;
    };

    if prev.is_none_or(|p| p.font.family != next.font.family) {
        word(out, &format!("\\f{}", tables.font_index(&next.font.family)));
    }
    let half_points = next.font.size.half_points();
    if prev.is_none_or(|p| p.font.size != next.font.size) {
        word(out, &format!("\\fs{}", half_points));
    }
    if prev.is_none_or(|p| p.color != next.color) {
        word(out, &format!("\\cf{}", tables.color_index(next.color)));
    }

    let prev_flags = prev.map(|p| p.font.flags).unwrap_or_default();
    let flags = next.font.flags;
    if prev_flags.bold != flags.bold {
        word(out, if flags.bold { "\\b" } else { "\\b0" });
    }
    if prev_flags.italic != flags.italic {
        word(out, if flags.italic { "\\i" } else { "\\i0" });
    }
    if prev_flags.underline != flags.underline {
        word(out, if flags.underline { "\\ul" } else { "\\ulnone" });
    }

    if wrote {
        out.push(' ');
    }
}

fn write_char(out: &mut String, ch: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '{' => out.push_str("\\{"),
        '}' => out.push_str("\\}"),
        '\t' => out.push_str("\\tab "),
        ' '..='~' => out.push(ch),
        _ => {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{}?", *unit as i16);
            }
        }
    }
}
