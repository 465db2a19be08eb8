//! Nearest-unclosed-tag resolution for XML completion.
//!
//! Typing `/` right after `<` asks for the closing tag of the nearest
//! ancestor element that is still open in the text before the caret. The
//! resolver scans tag-like substrings in reverse document order, keeping a
//! stack of closing tags seen on the way out; the first opening tag that
//! doesn't cancel against the stack is the answer. Declarations (`<!...>`),
//! processing instructions (`<?...>`) and self-closing tags (`<.../>`)
//! never participate. Malformed markup degrades to "no answer" and the
//! keystroke passes through.

use smallvec::SmallVec;
use typewise_core::chars::{
  char_is_line_ending,
  char_is_whitespace,
};

use crate::{
  Tendril,
  context::LineContext,
  plan::{
    Decision,
    EditPlan,
  },
  view::TextView,
};

/// Decide the XML group for a typed `/`. `None` when the trigger position
/// (`prev_char == '<'`) doesn't hold.
pub fn on_slash(view: &impl TextView, caret: usize, cx: &LineContext) -> Option<Decision> {
  if cx.prev_char != Some('<') {
    return None;
  }

  let prefix = view.text_before(caret);
  match closing_tag_name(&prefix) {
    Some(name) => {
      tracing::trace!(tag = %name, "completing closing tag");
      let mut before = Tendril::new();
      before.push('/');
      before.push_str(&name);
      before.push('>');
      Some(Decision::consume(EditPlan::insert(before, Tendril::new())))
    },
    // Nothing to close: the host still inserts the typed '/' itself.
    None => Some(Decision::pass_through()),
  }
}

/// Name of the nearest unclosed opening tag in `text`, if any.
pub fn closing_tag_name(text: &str) -> Option<Tendril> {
  let tags = scan_tags(text);
  let mut closed: SmallVec<[&str; 8]> = SmallVec::new();

  for tag in tags.iter().rev() {
    let inner = &tag[1..tag.len() - 1];
    if inner.ends_with('/') {
      // Self-closing.
      continue;
    }
    if inner.starts_with('!') || inner.starts_with('?') {
      // Declaration or processing instruction.
      continue;
    }
    if let Some(rest) = inner.strip_prefix('/') {
      closed.push(tag_name(rest));
      continue;
    }

    let name = tag_name(inner);
    if name.is_empty() {
      continue;
    }
    // Cancel against closings seen further down; closers that don't match
    // anything are discarded on the way.
    loop {
      let Some(close) = closed.pop() else {
        return Some(Tendril::from(name));
      };
      if tag_names_equal(close, name) {
        break;
      }
    }
  }

  None
}

/// Tag-like substrings (`<...>`) in document order. Tags never span line
/// breaks; a `<` without a `>` on its line starts nothing.
fn scan_tags(text: &str) -> Vec<&str> {
  let mut tags = Vec::new();
  let mut start = None;

  for (idx, ch) in text.char_indices() {
    if char_is_line_ending(ch) {
      start = None;
    } else if ch == '<' && start.is_none() {
      start = Some(idx);
    } else if ch == '>'
      && let Some(from) = start.take()
    {
      tags.push(&text[from..idx + 1]);
    }
  }

  tags
}

/// The name part of a tag's inner text: leading whitespace dropped, then
/// everything up to the first whitespace.
fn tag_name(inner: &str) -> &str {
  let inner = inner.trim_start_matches(char_is_whitespace);
  match inner.find(char_is_whitespace) {
    Some(end) => &inner[..end],
    None => inner,
  }
}

fn tag_names_equal(a: &str, b: &str) -> bool {
  a.to_lowercase() == b.to_lowercase()
}
