use std::ops::{Range, RangeInclusive};

use super::style::CharStyle;
use crate::app::services::text_ops::normalize_newlines;

/// A stretch of consecutive chars sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub len: usize,
    pub style: CharStyle,
}

/// Text plus its character runs and paragraph bullet flags.
///
/// Invariants kept by every method:
/// - run lengths sum to the char count of `text` and none is zero;
/// - adjacent runs have different styles;
/// - there is one bullet flag per paragraph (`'\n'` count + 1).
///
/// All positions are char indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    text: String,
    runs: Vec<Run>,
    bullets: Vec<bool>,
}

impl Default for StyledText {
    fn default() -> Self {
        Self::empty()
    }
}

impl StyledText {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            runs: Vec::new(),
            bullets: vec![false],
        }
    }

    pub fn plain(text: &str, style: &CharStyle) -> Self {
        let mut styled = Self::empty();
        styled.push(text, style);
        styled
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn bullets(&self) -> &[bool] {
        &self.bullets
    }

    pub fn len(&self) -> usize {
        self.runs.iter().map(|r| r.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text slices paired with their style, in document order.
    pub fn segments(&self) -> impl Iterator<Item = (&str, &CharStyle)> {
        let mut rest = self.text.as_str();
        self.runs.iter().map(move |run| {
            let split = byte_offset(rest, run.len);
            let (head, tail) = rest.split_at(split);
            rest = tail;
            (head, &run.style)
        })
    }

    /// Appends text; new paragraphs start without a bullet.
    pub fn push(&mut self, text: &str, style: &CharStyle) {
        let text = normalize_newlines(text);
        if text.is_empty() {
            return;
        }
        let len = text.chars().count();
        let newlines = text.matches('\n').count();
        self.text.push_str(&text);
        match self.runs.last_mut() {
            Some(last) if last.style == *style => last.len += len,
            _ => self.runs.push(Run {
                len,
                style: style.clone(),
            }),
        }
        self.bullets.extend(std::iter::repeat_n(false, newlines));
    }

    pub fn set_paragraph_bullet(&mut self, paragraph: usize, bulleted: bool) {
        if let Some(flag) = self.bullets.get_mut(paragraph) {
            *flag = bulleted;
        }
    }

    /// Drops a final `'\n'` and the empty paragraph after it.
    pub fn pop_trailing_newline(&mut self) -> bool {
        if !self.text.ends_with('\n') {
            return false;
        }
        self.text.pop();
        self.bullets.pop();
        if let Some(last) = self.runs.last_mut() {
            last.len -= 1;
            if last.len == 0 {
                self.runs.pop();
            }
        }
        true
    }

    pub fn style_at(&self, index: usize) -> Option<&CharStyle> {
        let mut offset = 0;
        for run in &self.runs {
            if index < offset + run.len {
                return Some(&run.style);
            }
            offset += run.len;
        }
        None
    }

    /// Styles of every run overlapping `range`.
    pub fn styles_in(&self, range: Range<usize>) -> impl Iterator<Item = &CharStyle> {
        let mut offset = 0;
        self.runs.iter().filter_map(move |run| {
            let start = offset;
            offset += run.len;
            (start < range.end && offset > range.start).then_some(&run.style)
        })
    }

    pub fn restyle(&mut self, range: Range<usize>, f: impl Fn(&CharStyle) -> CharStyle) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            run.style = f(&run.style);
        }
        self.normalize();
    }

    pub fn insert(&mut self, at: usize, text: &str, style: &CharStyle) -> usize {
        let text = normalize_newlines(text);
        if text.is_empty() {
            return 0;
        }
        let at = at.min(self.len());
        let len = text.chars().count();

        let paragraph = self.paragraph_of(at);
        let inherited = self.bullets[paragraph];
        let newlines = text.matches('\n').count();
        self.bullets.splice(
            paragraph + 1..paragraph + 1,
            std::iter::repeat_n(inherited, newlines),
        );

        let byte = byte_offset(&self.text, at);
        self.text.insert_str(byte, &text);

        let index = self.split_at(at);
        self.runs.insert(
            index,
            Run {
                len,
                style: style.clone(),
            },
        );
        self.normalize();
        len
    }

    pub fn remove(&mut self, range: Range<usize>) -> usize {
        let range = self.clamp(range);
        if range.is_empty() {
            return 0;
        }
        let start = byte_offset(&self.text, range.start);
        let end = byte_offset(&self.text, range.end);

        let paragraph = self.paragraph_of(range.start);
        let newlines = self.text[start..end].matches('\n').count();
        self.bullets.drain(paragraph + 1..paragraph + 1 + newlines);

        self.text.replace_range(start..end, "");

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);
        self.normalize();
        range.len()
    }

    pub fn paragraph_of(&self, index: usize) -> usize {
        self.text.chars().take(index).filter(|c| *c == '\n').count()
    }

    /// Paragraphs touched by a range. A caret touches the paragraph it is in.
    pub fn paragraph_span(&self, range: Range<usize>) -> RangeInclusive<usize> {
        let range = self.clamp(range);
        let first = self.paragraph_of(range.start);
        let last = if range.is_empty() {
            first
        } else {
            self.paragraph_of(range.end - 1)
        };
        first..=last
    }

    pub fn set_bullets(&mut self, span: RangeInclusive<usize>, bulleted: bool) {
        for paragraph in span {
            self.set_paragraph_bullet(paragraph, bulleted);
        }
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len();
        range.start.min(len)..range.end.min(len)
    }

    /// Makes a run boundary at `at` and returns the index of the run starting there.
    fn split_at(&mut self, at: usize) -> usize {
        let mut offset = 0;
        for i in 0..self.runs.len() {
            if offset == at {
                return i;
            }
            let len = self.runs[i].len;
            if at < offset + len {
                let head = at - offset;
                let tail = Run {
                    len: len - head,
                    style: self.runs[i].style.clone(),
                };
                self.runs[i].len = head;
                self.runs.insert(i + 1, tail);
                return i + 1;
            }
            offset += len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == run.style => last.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
