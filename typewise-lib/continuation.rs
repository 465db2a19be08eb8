//! Return-key line continuation rules.
//!
//! All three rules fire only on a confirm keystroke and only one fires per
//! Return: list bullet continuation, block-comment continuation, and
//! post-bracket/post-colon auto-indentation, in that order.

use tracing::trace;
use typewise_core::line_ending::LineEnding;

use crate::{
  Tendril,
  context::LineContext,
  plan::{
    Decision,
    EditPlan,
  },
};

/// Recognized list bullets, in match order. Each is a literal line prefix
/// sitting immediately after the leading whitespace.
pub const LIST_BULLETS: &[&str] = &["* ", "- ", "$ ", "> ", "+ ", "~ "];

/// Comment openers that continue as a block when Return is pressed right
/// after them, with their continuation and closing suffixes.
const BLOCK_COMMENTS: &[(&str, &str, &str)] = &[("/**", " * ", " */"), ("/*", " * ", " */")];

/// Openers that deepen indentation, with the closer that gets relocated
/// below the new line. A colon has no closer; everything trailing moves.
const INDENT_TRIGGERS: &[(char, Option<char>)] = &[
  ('(', Some(')')),
  ('{', Some('}')),
  ('[', Some(']')),
  (':', None),
];

/// List bullet continuation and termination.
///
/// A Return on a bullet line repeats the bullet at the same indent on the
/// next line. A Return on an *empty* bullet line deletes the bullet
/// instead — typing Return twice ends the list. `"* "` is exempt from
/// termination since a lone star line is often deliberate.
pub fn continue_list(cx: &LineContext, caret: usize, eol: LineEnding) -> Option<Decision> {
  let stripped = cx.stripped_preceding();
  let bullet = LIST_BULLETS
    .iter()
    .copied()
    .find(|bullet| stripped.starts_with(bullet))?;

  if stripped == bullet && bullet != "* " {
    trace!(bullet, "terminating empty list item");
    return Some(Decision::consume(EditPlan::Delete {
      from: caret - bullet.chars().count(),
      to:   caret,
    }));
  }

  trace!(bullet, "continuing list");
  let mut before = Tendril::from(eol.as_str());
  before.push_str(&cx.leading_whitespace);
  before.push_str(bullet);
  Some(Decision::consume(EditPlan::insert(before, Tendril::new())))
}

/// Block-comment continuation: Return directly after `/*` or `/**` opens
/// the comment body and closes the block below the caret.
pub fn continue_block_comment(cx: &LineContext, eol: LineEnding) -> Option<Decision> {
  let stripped = cx.stripped_preceding();
  let (_, middle, end) = BLOCK_COMMENTS
    .iter()
    .find(|(start, ..)| stripped == *start)?;

  trace!("continuing block comment");
  let mut before = Tendril::from(eol.as_str());
  before.push_str(&cx.leading_whitespace);
  before.push_str(middle);
  let mut after = Tendril::from(eol.as_str());
  after.push_str(&cx.leading_whitespace);
  after.push_str(end);
  Some(Decision::consume(EditPlan::Insert {
    before,
    after,
    replacing: 0,
  }))
}

/// Post-bracket/post-colon auto-indent.
///
/// With trailing text, everything up to the matching closer moves onto the
/// new indented line (trimmed), and the closer comes back on its own line
/// at the original indent. With nothing trailing, just open an indented
/// line.
pub fn indent_after_opener(
  cx: &LineContext,
  eol: LineEnding,
  indent_unit: &str,
) -> Option<Decision> {
  let prev = cx.prev_char?;
  let (_, closer) = INDENT_TRIGGERS
    .iter()
    .copied()
    .find(|(trigger, _)| *trigger == prev)?;

  let mut before = Tendril::from(eol.as_str());
  before.push_str(&cx.leading_whitespace);
  before.push_str(indent_unit);

  if cx.trailing_line.is_empty() {
    trace!(%prev, "opening indented line");
    return Some(Decision::consume(EditPlan::insert(before, Tendril::new())));
  }

  let ending_pos = closer
    .and_then(|closer| cx.trailing_line.chars().position(|ch| ch == closer))
    .unwrap_or_else(|| cx.trailing_line.chars().count());
  let ending_text: String = cx.trailing_line.chars().take(ending_pos).collect();

  trace!(%prev, moved = ending_text.trim(), "indenting with relocated text");
  let mut after = Tendril::from(ending_text.trim());
  after.push_str(eol.as_str());
  after.push_str(&cx.leading_whitespace);
  Some(Decision::consume(EditPlan::Insert {
    before,
    after,
    replacing: ending_pos,
  }))
}

#[cfg(test)]
mod test {
  use super::*;

  fn cx(preceding: &str, trailing: &str) -> LineContext {
    LineContext {
      prev_char:          preceding.chars().last(),
      next_char:          trailing.chars().next(),
      preceding_line:     preceding.into(),
      trailing_line:      trailing.into(),
      leading_whitespace: preceding
        .chars()
        .take_while(|&c| c == ' ' || c == '\t')
        .collect(),
      selection:          None,
    }
  }

  fn insert_of(decision: &Decision) -> (String, String, usize) {
    match &decision.plan {
      Some(EditPlan::Insert {
        before,
        after,
        replacing,
      }) => (before.to_string(), after.to_string(), *replacing),
      other => panic!("expected insert plan, got {other:?}"),
    }
  }

  #[test]
  fn bullet_lines_continue() {
    let context = cx("  * item", "");
    let decision = continue_list(&context, 8, LineEnding::LF).unwrap();
    assert!(decision.consumed);
    assert_eq!(insert_of(&decision), ("\n  * ".into(), String::new(), 0));
  }

  #[test]
  fn every_bullet_kind_is_recognized() {
    for bullet in LIST_BULLETS {
      let line = format!("{bullet}text");
      let context = cx(&line, "");
      assert!(
        continue_list(&context, line.chars().count(), LineEnding::LF).is_some(),
        "bullet {bullet:?} not recognized"
      );
    }
  }

  #[test]
  fn empty_bullet_terminates_the_list() {
    let context = cx("  - ", "");
    let decision = continue_list(&context, 4, LineEnding::LF).unwrap();
    assert!(decision.consumed);
    assert_eq!(decision.plan, Some(EditPlan::Delete { from: 2, to: 4 }));
  }

  #[test]
  fn empty_star_bullet_keeps_going() {
    let context = cx("  * ", "");
    let decision = continue_list(&context, 4, LineEnding::LF).unwrap();
    assert_eq!(insert_of(&decision).0, "\n  * ");
  }

  #[test]
  fn plain_lines_are_not_lists() {
    assert_eq!(continue_list(&cx("text", ""), 4, LineEnding::LF), None);
    // The bullet must sit right after the indent.
    assert_eq!(continue_list(&cx("x * y", ""), 5, LineEnding::LF), None);
  }

  #[test]
  fn block_comment_opens_and_closes() {
    let decision = continue_block_comment(&cx("  /*", ""), LineEnding::LF).unwrap();
    let (before, after, _) = insert_of(&decision);
    assert_eq!(before, "\n   * ");
    assert_eq!(after, "\n   */");

    let decision = continue_block_comment(&cx("/**", ""), LineEnding::LF).unwrap();
    assert_eq!(insert_of(&decision).0, "\n * ");
  }

  #[test]
  fn comment_continuation_requires_a_bare_opener() {
    assert_eq!(continue_block_comment(&cx("/* x", ""), LineEnding::LF), None);
    assert_eq!(continue_block_comment(&cx("x /*", ""), LineEnding::LF), None);
  }

  #[test]
  fn indent_opens_a_fresh_line() {
    let decision = indent_after_opener(&cx("  foo(", ""), LineEnding::LF, "    ").unwrap();
    assert_eq!(insert_of(&decision), ("\n      ".into(), String::new(), 0));
  }

  #[test]
  fn indent_relocates_the_closer() {
    let decision = indent_after_opener(&cx("foo(", ")"), LineEnding::LF, "\t").unwrap();
    assert_eq!(insert_of(&decision), ("\n\t".into(), "\n".into(), 0));

    let decision = indent_after_opener(&cx("foo(", " bar )"), LineEnding::LF, "\t").unwrap();
    assert_eq!(insert_of(&decision), ("\n\t".into(), "bar\n".into(), 5));
  }

  #[test]
  fn colon_moves_everything_trailing() {
    let decision = indent_after_opener(&cx("def f():", " pass"), LineEnding::LF, "    ").unwrap();
    assert_eq!(
      insert_of(&decision),
      ("\n    ".into(), "pass\n".into(), 5)
    );
  }

  #[test]
  fn indent_respects_crlf() {
    let decision = indent_after_opener(&cx("{", ""), LineEnding::Crlf, "  ").unwrap();
    assert_eq!(insert_of(&decision).0, "\r\n  ");
  }

  #[test]
  fn no_trigger_no_indent() {
    assert_eq!(indent_after_opener(&cx("foo", ""), LineEnding::LF, "  "), None);
    assert_eq!(indent_after_opener(&cx("", ""), LineEnding::LF, "  "), None);
  }
}
