//! Per-keystroke derivation of the text surrounding the caret.

use typewise_core::chars::char_is_indent_whitespace;

use crate::view::TextView;

/// Everything a rule needs to know about the caret's surroundings.
///
/// Recomputed from the [`TextView`] on every keystroke and discarded after
/// the call; nothing here survives between events. Extraction is a pure
/// read and is total over boundary caret positions: at a line start
/// `prev_char` is `None`, at a line end `next_char` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineContext {
  pub prev_char:          Option<char>,
  pub next_char:          Option<char>,
  pub preceding_line:     String,
  pub trailing_line:      String,
  /// Maximal prefix of `preceding_line` made of tabs and spaces only.
  pub leading_whitespace: String,
  pub selection:          Option<(usize, usize)>,
}

impl LineContext {
  pub fn extract(view: &impl TextView, caret: usize) -> Self {
    let preceding_line = view.line_text_before(caret);
    let leading_whitespace: String = preceding_line
      .chars()
      .take_while(|&ch| char_is_indent_whitespace(ch))
      .collect();

    Self {
      prev_char: view.char_before(caret),
      next_char: view.char_after(caret),
      trailing_line: view.line_text_after(caret),
      selection: view.selection(),
      preceding_line,
      leading_whitespace,
    }
  }

  pub fn has_selection(&self) -> bool {
    self.selection.is_some()
  }

  /// The preceding line with its leading whitespace removed.
  pub fn stripped_preceding(&self) -> &str {
    // Indent whitespace is ASCII, so the char count is also the byte count.
    &self.preceding_line[self.leading_whitespace.len()..]
  }
}
