//! Host buffer capabilities.
//!
//! The engine never owns text. Everything it knows about the buffer flows
//! through the [`TextView`] trait: a narrow query surface over the text
//! around the caret, and a mutate surface the edit planner drives. Hosts
//! embedding the engine implement this for their own buffer type;
//! [`RopeBuffer`] is the provided implementation over a [`ropey::Rope`] and
//! is what the tests drive.
//!
//! # Query contract
//!
//! `char_before`/`char_after` and the `line_text_*` queries are *line
//! scoped*: a caret at the start of a line has no previous character, and a
//! caret at the end of a line has no next character, even when more text
//! follows on other lines. `text_before` is the only whole-document query
//! and exists for XML tag resolution.
//!
//! # Mutate contract
//!
//! Offsets handed to the mutate surface are char indices already validated
//! by the planner. Implementations are free to panic on out-of-range input
//! the way `ropey` does; the planner never produces such offsets.

use std::borrow::Cow;

use ropey::Rope;
use typewise_core::{
  chars::char_is_line_ending,
  grapheme::ensure_grapheme_boundary_prev,
  line_ending::{
    LineEnding,
    NATIVE_LINE_ENDING,
    line_end_char_index,
  },
};

use crate::indent::IndentStyle;

pub trait TextView {
  /// Total buffer length in chars.
  fn len_chars(&self) -> usize;

  /// The character before `offset` on the same line, if any.
  fn char_before(&self, offset: usize) -> Option<char>;

  /// The character at `offset` on the same line, if any.
  fn char_after(&self, offset: usize) -> Option<char>;

  /// Text of the current line strictly before `offset`.
  fn line_text_before(&self, offset: usize) -> String;

  /// Text of the current line from `offset` to the line end, excluding the
  /// line break.
  fn line_text_after(&self, offset: usize) -> String;

  /// The whole document prefix strictly before `offset`.
  fn text_before(&self, offset: usize) -> String;

  /// Bounds of the current selection, normalized, `None` when empty.
  fn selection(&self) -> Option<(usize, usize)>;

  /// One indent level, materialized.
  fn indent_unit(&self) -> Cow<'static, str>;

  /// The line break convention planned inserts should use.
  fn line_ending(&self) -> LineEnding {
    NATIVE_LINE_ENDING
  }

  fn insert_at(&mut self, offset: usize, text: &str);

  fn delete_range(&mut self, from: usize, to: usize);

  /// Move the caret. Implementations must keep the caret on a grapheme
  /// boundary; positions inside a cluster are snapped.
  fn set_caret(&mut self, offset: usize);
}

/// A rope-backed [`TextView`] owning caret and selection state.
#[derive(Debug, Clone)]
pub struct RopeBuffer {
  text:        Rope,
  caret:       usize,
  selection:   Option<(usize, usize)>,
  indent:      IndentStyle,
  line_ending: LineEnding,
}

impl RopeBuffer {
  pub fn new(text: impl Into<Rope>) -> Self {
    Self {
      text:        text.into(),
      caret:       0,
      selection:   None,
      indent:      IndentStyle::default(),
      line_ending: NATIVE_LINE_ENDING,
    }
  }

  pub fn with_caret(mut self, caret: usize) -> Self {
    self.set_caret(caret);
    self
  }

  pub fn with_selection(mut self, from: usize, to: usize) -> Self {
    self.selection = Some((from.min(to), from.max(to)));
    self
  }

  pub fn with_indent(mut self, indent: IndentStyle) -> Self {
    self.indent = indent;
    self
  }

  pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
    self.line_ending = line_ending;
    self
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  pub fn caret(&self) -> usize {
    self.caret
  }

  /// Char range of the line containing `offset`, excluding the line break.
  fn line_bounds(&self, offset: usize) -> (usize, usize) {
    let offset = offset.min(self.text.len_chars());
    let line_idx = self.text.char_to_line(offset);
    let start = self.text.line_to_char(line_idx);
    let end = start + line_end_char_index(&self.text.line(line_idx));
    (start, end.max(offset))
  }
}

impl TextView for RopeBuffer {
  fn len_chars(&self) -> usize {
    self.text.len_chars()
  }

  fn char_before(&self, offset: usize) -> Option<char> {
    let (start, _) = self.line_bounds(offset);
    if offset == start || offset > self.text.len_chars() {
      return None;
    }
    let ch = self.text.char(offset - 1);
    (!char_is_line_ending(ch)).then_some(ch)
  }

  fn char_after(&self, offset: usize) -> Option<char> {
    let (_, end) = self.line_bounds(offset);
    (offset < end).then(|| self.text.char(offset))
  }

  fn line_text_before(&self, offset: usize) -> String {
    let offset = offset.min(self.text.len_chars());
    let (start, _) = self.line_bounds(offset);
    self.text.slice(start..offset).to_string()
  }

  fn line_text_after(&self, offset: usize) -> String {
    let offset = offset.min(self.text.len_chars());
    let (_, end) = self.line_bounds(offset);
    self.text.slice(offset..end).to_string()
  }

  fn text_before(&self, offset: usize) -> String {
    self.text.slice(..offset.min(self.text.len_chars())).to_string()
  }

  fn selection(&self) -> Option<(usize, usize)> {
    self.selection.filter(|(from, to)| from != to)
  }

  fn indent_unit(&self) -> Cow<'static, str> {
    Cow::Borrowed(self.indent.as_str())
  }

  fn line_ending(&self) -> LineEnding {
    self.line_ending
  }

  fn insert_at(&mut self, offset: usize, text: &str) {
    self.text.insert(offset, text);
    self.selection = None;
  }

  fn delete_range(&mut self, from: usize, to: usize) {
    self.text.remove(from..to);
    self.selection = None;
  }

  fn set_caret(&mut self, offset: usize) {
    self.caret = ensure_grapheme_boundary_prev(self.text.slice(..), offset);
    self.selection = None;
  }
}
