//! Automatic bracket and quote pairing.
//!
//! For each typed character the matcher decides between three outcomes:
//!
//! 1. **Skip close** - the character ahead of the caret is the closer the
//!    user just typed; advance over it instead of inserting a duplicate
//! 2. **Insert pair** - insert both halves, placing the caret between them
//! 3. **Stay silent** - the position doesn't license pairing; the host
//!    inserts the character as typed
//!
//! Quotes are their own closers, so a typed quote is ambiguous: local
//! parity on the current line decides whether it opens a new span or
//! closes an existing one. Brackets are asymmetric and a closer ahead of
//! the caret is only skipped when line-local bracket counts suggest it was
//! auto-generated rather than typed by the user; the comparison is
//! deliberately kept exactly as the shipped heuristic computes it, uneven
//! tie-breaks included, because editors have disagreed on it for years and
//! muscle memory is calibrated to this one.
//!
//! Backspace between the two halves of an empty pair deletes the closer
//! and leaves the opener for the host's own backspace, so abandoned pairs
//! don't strand a lone closer.

use tracing::trace;

use crate::{
  Tendril,
  context::LineContext,
  plan::{
    Decision,
    EditPlan,
  },
};

/// Fixed opener→closer table: quotes are symmetric, brackets asymmetric.
pub const DEFAULT_PAIRS: &[(char, char)] = &[
  ('"', '"'),
  ('\'', '\''),
  ('(', ')'),
  ('{', '}'),
  ('[', ']'),
];

/// Characters that may sit immediately left of the caret without the
/// position counting as inside running text.
const NON_TEXT_LEFT: &str = " \t\n\r,=+*:;.?!$&@%~<(){}[]-\"'";

/// Same judgement for the character immediately right of the caret.
const NON_TEXT_RIGHT: &str = " \t\n\r,=+*:;.?&@%~>)}]";

/// One opener/closer pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
  pub open:  char,
  pub close: char,
}

impl Pair {
  /// true if open == close
  pub const fn same(&self) -> bool {
    self.open == self.close
  }
}

impl From<(char, char)> for Pair {
  fn from((open, close): (char, char)) -> Self {
    Self { open, close }
  }
}

impl From<&(char, char)> for Pair {
  fn from(&(open, close): &(char, char)) -> Self {
    Self { open, close }
  }
}

/// The set of pairs the matcher recognizes, plus the optional
/// triple-delimiter convention (`"""`-style doc strings).
#[derive(Debug, Clone)]
pub struct PairTable {
  pairs:            Vec<Pair>,
  triple_delimiter: Option<char>,
}

impl PairTable {
  pub fn new<V, A>(pairs: V) -> Self
  where
    V: IntoIterator<Item = A>,
    A: Into<Pair>,
  {
    Self {
      pairs:            pairs.into_iter().map(Into::into).collect(),
      triple_delimiter: None,
    }
  }

  /// Enable triple-delimiter completion for `delimiter`.
  pub fn with_triple_delimiter(mut self, delimiter: char) -> Self {
    self.triple_delimiter = Some(delimiter);
    self
  }

  pub fn pairs(&self) -> &[Pair] {
    &self.pairs
  }

  pub fn pair_for_open(&self, ch: char) -> Option<&Pair> {
    self.pairs.iter().find(|pair| pair.open == ch)
  }

  pub fn pair_for_close(&self, ch: char) -> Option<&Pair> {
    self.pairs.iter().find(|pair| pair.close == ch)
  }
}

impl Default for PairTable {
  fn default() -> Self {
    PairTable::new(DEFAULT_PAIRS.iter().copied()).with_triple_delimiter('"')
  }
}

/// Decide the bracket/quote group for a typed character. `None` means the
/// group stays silent and later rule groups may evaluate.
pub fn on_char(cx: &LineContext, ch: char, table: &PairTable) -> Option<Decision> {
  // A backslash right before the caret makes the typed character an
  // escaped literal; pairing logic stands down entirely.
  if cx.prev_char == Some('\\') {
    return None;
  }

  if let Some(decision) = complete_triple_delimiter(cx, ch, table) {
    trace!(%ch, "completing triple delimiter");
    return Some(decision);
  }

  if let Some(decision) = skip_over_closer(cx, ch, table) {
    trace!(%ch, "skipping over existing closer");
    return Some(decision);
  }

  if let Some(decision) = insert_pair(cx, ch, table) {
    trace!(%ch, "auto-inserting pair");
    return Some(decision);
  }

  None
}

/// Backspace between the halves of a pair deletes the closer. The opener
/// is left for the host's normal backspace, so the decision is never
/// consumed.
pub fn on_backspace(cx: &LineContext, caret: usize, table: &PairTable) -> Option<Decision> {
  let prev = cx.prev_char?;
  let pair = table.pair_for_open(prev)?;
  if cx.next_char != Some(pair.close) {
    return None;
  }
  trace!(open = %pair.open, "collapsing empty pair on backspace");
  Some(Decision {
    plan:     Some(EditPlan::Delete {
      from: caret,
      to:   caret + 1,
    }),
    consumed: false,
  })
}

/// Typing an opener with a live selection wraps the selected text.
pub fn wrap_selection(cx: &LineContext, ch: char, table: &PairTable) -> Option<Decision> {
  let (from, to) = cx.selection?;
  let pair = table.pair_for_open(ch)?;
  trace!(open = %pair.open, from, to, "wrapping selection");
  Some(Decision::consume(EditPlan::Surround {
    from,
    to,
    open: pair.open,
    close: pair.close,
  }))
}

fn skip_over_closer(cx: &LineContext, ch: char, table: &PairTable) -> Option<Decision> {
  let pair = table.pair_for_close(ch)?;
  if cx.next_char != Some(ch) {
    return None;
  }
  if !pair.same() && !closer_looks_auto_generated(cx, pair) {
    // Probably the user's own closer: fall through to normal insertion
    // handling for this character.
    return None;
  }
  Some(Decision::consume(EditPlan::Skip { chars: 1 }))
}

/// Line-local judgement of whether the closer ahead of the caret came from
/// a previous auto-insertion. Kept comparison-for-comparison with the
/// shipped heuristic.
fn closer_looks_auto_generated(cx: &LineContext, pair: &Pair) -> bool {
  let preceding_opens = count_char(&cx.preceding_line, pair.open) as isize;
  let preceding_closes = count_char(&cx.preceding_line, pair.close) as isize;
  let trailing_opens = count_char(&cx.trailing_line, pair.open);
  let trailing_closes = count_char(&cx.trailing_line, pair.close) as isize;

  // More outstanding openers behind the caret than closers ahead of it:
  // the closer ahead is accounted for and was probably typed by hand.
  if preceding_opens - preceding_closes > trailing_closes {
    return false;
  }
  // Any further opener ahead makes the line too tangled to judge.
  if trailing_opens > 0 {
    return false;
  }
  true
}

fn insert_pair(cx: &LineContext, ch: char, table: &PairTable) -> Option<Decision> {
  let pair = table.pair_for_open(ch)?;

  if pair.same() {
    // An odd count on either side of the caret means the typed quote
    // closes an existing span rather than opening a new one.
    if count_char(&cx.preceding_line, ch) % 2 == 1 {
      return None;
    }
    if count_char(&cx.trailing_line, ch) % 2 == 1 {
      return None;
    }
  }

  if !position_licenses_insertion(cx, pair) {
    return None;
  }

  let mut before = Tendril::new();
  before.push(pair.open);
  let mut after = Tendril::new();
  after.push(pair.close);
  Some(Decision::consume(EditPlan::Insert {
    before,
    after,
    replacing: 0,
  }))
}

/// The caret must sit at a delimiter boundary, not inside running text,
/// for an auto-insertion to fire.
fn position_licenses_insertion(cx: &LineContext, pair: &Pair) -> bool {
  let prev_ok = cx.prev_char.is_none_or(is_non_text_left);
  let next_ok = cx.next_char.is_none_or(is_non_text_right);

  // Typing at the end of the line is fine for everything but quotes,
  // which close words too often (don't, can't, ...).
  if cx.next_char.is_none() && !matches!(pair.open, '\'' | '"') {
    return true;
  }
  // Nothing or non-text on both sides.
  if prev_ok && next_ok {
    return true;
  }
  // An asymmetric opener only cares about what follows it.
  if !pair.same() && next_ok {
    return true;
  }
  false
}

fn complete_triple_delimiter(cx: &LineContext, ch: char, table: &PairTable) -> Option<Decision> {
  let delimiter = table.triple_delimiter?;
  if ch != delimiter || !cx.trailing_line.is_empty() {
    return None;
  }
  // The preceding line must end in exactly two delimiters, with an even
  // run anywhere before them: the typed character is the third.
  let trailing_run = cx
    .preceding_line
    .chars()
    .rev()
    .take_while(|&c| c == delimiter)
    .count();
  if trailing_run != 2 {
    return None;
  }
  if (count_char(&cx.preceding_line, delimiter) - 2) % 2 == 1 {
    return None;
  }

  let mut before = Tendril::new();
  before.push(delimiter);
  before.push(' ');
  let mut after = Tendril::new();
  after.push(' ');
  for _ in 0..3 {
    after.push(delimiter);
  }
  Some(Decision::consume(EditPlan::Insert {
    before,
    after,
    replacing: 0,
  }))
}

fn is_non_text_left(ch: char) -> bool {
  NON_TEXT_LEFT.contains(ch)
}

fn is_non_text_right(ch: char) -> bool {
  NON_TEXT_RIGHT.contains(ch)
}

fn count_char(text: &str, ch: char) -> usize {
  text.chars().filter(|&c| c == ch).count()
}
