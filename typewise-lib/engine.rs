//! The per-keystroke decision engine.
//!
//! One call per keystroke, synchronous, no state carried between calls.
//! [`Engine::decide`] derives a [`LineContext`], then walks an ordered
//! table of rule groups — selection wrap, bracket/quote, XML tag, list,
//! block comment, auto-indent — and returns the first group's decision.
//! [`Engine::apply`] runs the edit planner; [`Engine::handle`] composes
//! both and reports whether the host should suppress its default handling.
//!
//! A live selection short-circuits everything: only the bracket/quote wrap
//! may fire, any other input passes through untouched. Anything unexpected
//! (caret out of range, inputs the engine doesn't model) degrades to
//! pass-through; the engine never surfaces an error for a keystroke.

use tracing::trace;

use crate::{
  config::FeatureFlags,
  context::LineContext,
  continuation,
  input::KeyInput,
  pairs::{
    self,
    PairTable,
  },
  plan::{
    self,
    Decision,
  },
  view::TextView,
};

/// The decision engine. Holds only the pair table; feature flags are
/// injected per call.
#[derive(Debug, Clone, Default)]
pub struct Engine {
  pairs: PairTable,
}

impl Engine {
  pub fn new(pairs: PairTable) -> Self {
    Self { pairs }
  }

  pub fn pairs(&self) -> &PairTable {
    &self.pairs
  }

  /// Decide what to do about one keystroke. Pure: the view is only read.
  pub fn decide(
    &self,
    view: &impl TextView,
    caret: usize,
    key: KeyInput,
    flags: &FeatureFlags,
  ) -> Decision {
    if caret > view.len_chars() {
      trace!(caret, len = view.len_chars(), "caret out of range");
      return Decision::pass_through();
    }
    if key == KeyInput::Other {
      return Decision::pass_through();
    }

    let cx = LineContext::extract(view, caret);
    let eol = view.line_ending();

    // A live selection short-circuits the rule table: wrap or nothing.
    if cx.has_selection() {
      if flags.close_brackets_and_quotes
        && let KeyInput::Char(ch) = key
        && let Some(decision) = pairs::wrap_selection(&cx, ch, &self.pairs)
      {
        return decision;
      }
      return Decision::pass_through();
    }

    let bracket_quote = || match key {
      KeyInput::Char(ch) => pairs::on_char(&cx, ch, &self.pairs),
      KeyInput::Backspace => pairs::on_backspace(&cx, caret, &self.pairs),
      _ => None,
    };
    let xml_tag = || match key {
      KeyInput::Char('/') => crate::xml::on_slash(view, caret, &cx),
      _ => None,
    };
    let list = || match key {
      KeyInput::Return => continuation::continue_list(&cx, caret, eol),
      _ => None,
    };
    let block_comment = || match key {
      KeyInput::Return => continuation::continue_block_comment(&cx, eol),
      _ => None,
    };
    let auto_indent = || match key {
      KeyInput::Return => {
        let unit = view.indent_unit();
        continuation::indent_after_opener(&cx, eol, &unit)
      },
      _ => None,
    };

    // Fixed priority order; the first group with an opinion decides.
    let groups: [(&'static str, bool, &dyn Fn() -> Option<Decision>); 5] = [
      (
        "bracket-quote",
        flags.close_brackets_and_quotes,
        &bracket_quote,
      ),
      ("xml-tag", flags.complete_xml, &xml_tag),
      ("list", flags.detect_lists, &list),
      ("block-comment", true, &block_comment),
      (
        "auto-indent",
        flags.autoindent_after_function_or_list,
        &auto_indent,
      ),
    ];

    for (name, enabled, run) in groups {
      if !enabled {
        continue;
      }
      if let Some(decision) = run() {
        trace!(rule = name, consumed = decision.consumed, "rule decided");
        return decision;
      }
    }

    Decision::pass_through()
  }

  /// Apply a previously made decision.
  pub fn apply(
    &self,
    view: &mut impl TextView,
    caret: usize,
    decision: &Decision,
  ) -> plan::Result<bool> {
    plan::apply(view, caret, decision)
  }

  /// Decide and apply in one step. Returns `true` when the keystroke was
  /// fully handled and the host must not also insert it.
  pub fn handle(
    &self,
    view: &mut impl TextView,
    caret: usize,
    key: KeyInput,
    flags: &FeatureFlags,
  ) -> bool {
    let decision = self.decide(view, caret, key, flags);
    match plan::apply(view, caret, &decision) {
      Ok(consumed) => consumed,
      Err(err) => {
        // A refused plan means the buffer moved out from under us; the
        // keystroke falls back to the host untouched.
        tracing::warn!(%err, "discarding edit plan");
        false
      },
    }
  }
}
