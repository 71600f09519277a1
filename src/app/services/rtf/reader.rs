use std::collections::HashMap;

use super::{DEFAULT_HALF_POINTS, RtfError};
use crate::app::domain::rich_text::StyledText;
use crate::app::domain::style::{CharStyle, FontSize, FontSpec, Rgb, StyleFlags};

/// Parse an RTF payload into styled text. `base` supplies the font family
/// and size for text the document does not assign a font to.
pub fn decode(bytes: &[u8], base: &FontSpec) -> Result<StyledText, RtfError> {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    if !bytes[start..].starts_with(b"{\\rtf") {
        return Err(RtfError::Malformed("missing rtf header".to_string()));
    }
    let mut parser = Parser::new(base);
    let mut lexer = Lexer {
        bytes,
        pos: start,
    };
    while let Some(token) = lexer.next_token()? {
        if parser.handle(token)? {
            return Ok(parser.finish());
        }
    }
    Err(RtfError::Malformed("unexpected end of document".to_string()))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    GroupStart,
    GroupEnd,
    Word(String, Option<i32>),
    Symbol(u8),
    Hex(u8),
    Text(u8),
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn next_token(&mut self) -> Result<Option<Token>, RtfError> {
        loop {
            let Some(b) = self.bump() else {
                return Ok(None);
            };
            return Ok(Some(match b {
                b'{' => Token::GroupStart,
                b'}' => Token::GroupEnd,
                b'\\' => self.control()?,
                b'\r' | b'\n' => continue,
                _ => Token::Text(b),
            }));
        }
    }

    fn control(&mut self) -> Result<Token, RtfError> {
        let Some(b) = self.bump() else {
            return Err(RtfError::Malformed("dangling backslash".to_string()));
        };
        match b {
            b'a'..=b'z' | b'A'..=b'Z' => {
                let start = self.pos - 1;
                while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                    self.pos += 1;
                }
                let name = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
                let param = self.param();
                if self.peek() == Some(b' ') {
                    self.pos += 1;
                }
                Ok(Token::Word(name, param))
            }
            b'\'' => {
                let hex = self
                    .bytes
                    .get(self.pos..self.pos + 2)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| RtfError::Malformed("invalid hex escape".to_string()))?;
                self.pos += 2;
                Ok(Token::Hex(hex))
            }
            b'\r' | b'\n' => Ok(Token::Word("par".to_string(), None)),
            _ => Ok(Token::Symbol(b)),
        }
    }

    fn param(&mut self) -> Option<i32> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let digits = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits {
            self.pos = start;
            return None;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
        let value: i64 = text.parse().ok()?;
        Some(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Body,
    FontTable,
    ColorTable,
    /// Paragraph numbering definition: control words count, text does not.
    Numbering,
    Skip,
}

#[derive(Debug, Clone)]
struct GroupState {
    destination: Destination,
    font: Option<i32>,
    half_points: u32,
    flags: StyleFlags,
    color: usize,
    unicode_skip: usize,
}

struct Parser<'a> {
    base: &'a FontSpec,
    stack: Vec<GroupState>,
    state: GroupState,
    started: bool,
    ignorable: bool,
    default_font: i32,
    fonts: HashMap<i32, String>,
    font_id: Option<i32>,
    font_name: String,
    colors: Vec<Option<Rgb>>,
    color: (u8, u8, u8, bool),
    bullet: bool,
    skip: usize,
    high_surrogate: Option<u16>,
    out: StyledText,
    pending: String,
    pending_style: Option<CharStyle>,
    paragraph: usize,
    ended_with_par: bool,
}

impl<'a> Parser<'a> {
    fn new(base: &'a FontSpec) -> Self {
        Self {
            base,
            stack: Vec::new(),
            state: GroupState {
                destination: Destination::Body,
                font: None,
                half_points: DEFAULT_HALF_POINTS,
                flags: StyleFlags::REGULAR,
                color: 0,
                unicode_skip: 1,
            },
            started: false,
            ignorable: false,
            default_font: 0,
            fonts: HashMap::new(),
            font_id: None,
            font_name: String::new(),
            colors: Vec::new(),
            color: (0, 0, 0, false),
            bullet: false,
            skip: 0,
            high_surrogate: None,
            out: StyledText::empty(),
            pending: String::new(),
            pending_style: None,
            paragraph: 0,
            ended_with_par: false,
        }
    }

    /// Returns true once the outermost group has closed.
    fn handle(&mut self, token: Token) -> Result<bool, RtfError> {
        match token {
            Token::GroupStart => {
                self.skip = 0;
                self.stack.push(self.state.clone());
                self.started = true;
            }
            Token::GroupEnd => {
                self.skip = 0;
                self.ignorable = false;
                if self.state.destination == Destination::FontTable {
                    self.commit_font();
                }
                let Some(state) = self.stack.pop() else {
                    return Err(RtfError::Malformed("unbalanced closing brace".to_string()));
                };
                self.state = state;
                if self.stack.is_empty() {
                    return Ok(self.started);
                }
            }
            Token::Word(name, param) => {
                self.skip = 0;
                self.word(&name, param);
            }
            Token::Symbol(b) => {
                self.skip = 0;
                self.symbol(b);
            }
            Token::Hex(b) => {
                if self.skip > 0 {
                    self.skip -= 1;
                } else {
                    self.escaped_char(decode_cp1252(b));
                }
            }
            Token::Text(b) => {
                if self.skip > 0 {
                    self.skip -= 1;
                } else {
                    self.text_char(decode_cp1252(b));
                }
            }
        }
        Ok(false)
    }

    fn word(&mut self, name: &str, param: Option<i32>) {
        let ignorable = std::mem::take(&mut self.ignorable);
        if self.state.destination == Destination::Skip {
            return;
        }

        match name {
            "fonttbl" => self.state.destination = Destination::FontTable,
            "colortbl" => self.state.destination = Destination::ColorTable,
            "pn" => self.state.destination = Destination::Numbering,
            "pntext" | "listtext" | "pntxtb" | "pntxta" | "stylesheet" | "info" | "pict"
            | "object" | "header" | "headerl" | "headerr" | "headerf" | "footer" | "footerl"
            | "footerr" | "footerf" | "footnote" | "fldinst" | "listtable"
            | "listoverridetable" | "rsidtbl" | "xmlnstbl" | "themedata"
            | "colorschememapping" | "latentstyles" | "datastore" | "generator" => {
                self.state.destination = Destination::Skip;
            }
            _ if ignorable => self.state.destination = Destination::Skip,

            "deff" => self.default_font = param.unwrap_or(0),
            "f" if self.state.destination == Destination::FontTable => {
                self.commit_font();
                self.font_id = param;
            }
            "red" if self.state.destination == Destination::ColorTable => {
                self.color.0 = clamp_u8(param);
                self.color.3 = true;
            }
            "green" if self.state.destination == Destination::ColorTable => {
                self.color.1 = clamp_u8(param);
                self.color.3 = true;
            }
            "blue" if self.state.destination == Destination::ColorTable => {
                self.color.2 = clamp_u8(param);
                self.color.3 = true;
            }

            "pnlvlblt" => self.bullet = true,
            "ls" => self.bullet = param.unwrap_or(0) > 0,
            "pard" => self.bullet = false,

            "plain" => {
                self.state.font = None;
                self.state.half_points = DEFAULT_HALF_POINTS;
                self.state.flags = StyleFlags::REGULAR;
                self.state.color = 0;
            }
            "f" => self.state.font = param,
            "fs" => {
                self.state.half_points = match param {
                    Some(p) if p > 0 => p as u32,
                    _ => DEFAULT_HALF_POINTS,
                }
            }
            "b" => self.state.flags.bold = param != Some(0),
            "i" => self.state.flags.italic = param != Some(0),
            "ul" | "uld" | "uldash" | "uldb" | "ulth" | "ulw" | "ulwave" => {
                self.state.flags.underline = param != Some(0)
            }
            "ulnone" => self.state.flags.underline = false,
            "cf" => self.state.color = param.unwrap_or(0).max(0) as usize,
            "uc" => self.state.unicode_skip = param.unwrap_or(1).max(0) as usize,
            "u" => {
                if let Some(p) = param {
                    self.unicode(p);
                }
            }

            "par" | "line" => self.paragraph_break(),
            "tab" => self.text_char('\t'),
            "bullet" => self.text_char('\u{2022}'),
            "emdash" => self.text_char('\u{2014}'),
            "endash" => self.text_char('\u{2013}'),
            "lquote" => self.text_char('\u{2018}'),
            "rquote" => self.text_char('\u{2019}'),
            "ldblquote" => self.text_char('\u{201C}'),
            "rdblquote" => self.text_char('\u{201D}'),
            "emspace" | "enspace" | "qmspace" => self.text_char(' '),
            _ => {}
        }
    }

    fn symbol(&mut self, b: u8) {
        match b {
            b'*' => self.ignorable = true,
            b'\\' | b'{' | b'}' => self.text_char(b as char),
            b'~' => self.text_char('\u{00A0}'),
            b'_' => self.text_char('\u{2011}'),
            _ => {}
        }
    }

    fn unicode(&mut self, param: i32) {
        let unit = if param < 0 { (param + 65536) as u16 } else { param as u16 };
        match unit {
            0xD800..=0xDBFF => self.high_surrogate = Some(unit),
            0xDC00..=0xDFFF => {
                if let Some(high) = self.high_surrogate.take() {
                    let code = 0x10000 + (((high as u32) - 0xD800) << 10) + ((unit as u32) - 0xDC00);
                    self.escaped_char(char::from_u32(code).unwrap_or('\u{FFFD}'));
                }
            }
            _ => self.escaped_char(char::from_u32(unit as u32).unwrap_or('\u{FFFD}')),
        }
        // Set after emitting: the fallback characters that follow are dropped.
        self.skip = self.state.unicode_skip;
    }

    /// Characters written as `\'hh` or `\uN` never end a table entry.
    fn escaped_char(&mut self, ch: char) {
        if self.state.destination == Destination::FontTable {
            self.font_name.push(ch);
        } else {
            self.text_char(ch);
        }
    }

    fn text_char(&mut self, ch: char) {
        match self.state.destination {
            Destination::Body => {
                let style = self.current_style();
                if self.pending_style.as_ref() != Some(&style) {
                    self.flush();
                    self.pending_style = Some(style);
                }
                self.pending.push(ch);
                self.ended_with_par = false;
            }
            Destination::FontTable => {
                if ch == ';' {
                    self.commit_font();
                } else {
                    self.font_name.push(ch);
                }
            }
            Destination::ColorTable => {
                if ch == ';' {
                    let (r, g, b, set) = std::mem::take(&mut self.color);
                    self.colors.push(set.then_some(Rgb::new(r, g, b)));
                }
            }
            Destination::Numbering | Destination::Skip => {}
        }
    }

    fn paragraph_break(&mut self) {
        if self.state.destination != Destination::Body {
            return;
        }
        self.text_char('\n');
        self.flush();
        self.out.set_paragraph_bullet(self.paragraph, self.bullet);
        self.paragraph += 1;
        self.ended_with_par = true;
    }

    fn commit_font(&mut self) {
        let name = std::mem::take(&mut self.font_name);
        if let Some(id) = self.font_id.take() {
            let name = name.trim();
            if !name.is_empty() {
                self.fonts.insert(id, name.to_string());
            }
        }
    }

    fn current_style(&self) -> CharStyle {
        let font_id = self.state.font.unwrap_or(self.default_font);
        let family = self
            .fonts
            .get(&font_id)
            .cloned()
            .unwrap_or_else(|| self.base.family.clone());
        let size = FontSize::from_half_points(self.state.half_points).unwrap_or(self.base.size);
        let color = self
            .colors
            .get(self.state.color)
            .copied()
            .flatten()
            .unwrap_or(Rgb::BLACK);
        CharStyle::new(FontSpec::new(family, size, self.state.flags), color)
    }

    fn flush(&mut self) {
        if let Some(style) = self.pending_style.as_ref() {
            self.out.push(&self.pending, style);
        }
        self.pending.clear();
    }

    fn finish(mut self) -> StyledText {
        self.flush();
        self.out.set_paragraph_bullet(self.paragraph, self.bullet);
        if self.ended_with_par {
            self.out.pop_trailing_newline();
        }
        self.out
    }
}

fn clamp_u8(param: Option<i32>) -> u8 {
    param.unwrap_or(0).clamp(0, 255) as u8
}

/// Windows-1252, the code page `\ansi` documents use.
fn decode_cp1252(b: u8) -> char {
    const HIGH: [char; 32] = [
        '\u{20AC}', '\u{FFFD}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}',
        '\u{2021}', '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{FFFD}',
        '\u{017D}', '\u{FFFD}', '\u{FFFD}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
        '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
        '\u{0153}', '\u{FFFD}', '\u{017E}', '\u{0178}',
    ];
    match b {
        0x80..=0x9F => HIGH[(b - 0x80) as usize],
        _ => b as char,
    }
}
