//! Edit planning and application.
//!
//! A rule never touches the buffer. It produces an [`EditPlan`], a single
//! atomic mutation, wrapped in a [`Decision`] that also records whether the
//! keystroke was consumed. [`apply`] validates the plan against the buffer
//! first and only then mutates, so a rejected plan leaves the buffer and
//! caret untouched.
//!
//! The `consumed` flag is independent of the plan on purpose: backspace
//! pair collapse deletes the closing half but still reports "not consumed"
//! so the host's own backspace removes the opening half.

use thiserror::Error;

use crate::{
  Tendril,
  view::TextView,
};

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
  #[error("offset {offset} is out of bounds for buffer length {len}")]
  OffsetOutOfBounds { offset: usize, len: usize },
  #[error("invalid range: start {from} is after end {to}")]
  InvalidRange { from: usize, to: usize },
  #[error("range {from}..{to} is out of bounds for buffer length {len}")]
  RangeOutOfBounds {
    from: usize,
    to:   usize,
    len:  usize,
  },
}

/// One atomic buffer mutation, caret-relative where possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPlan {
  /// Insert `before` then `after` at the caret, leaving the caret between
  /// the two pieces. `replacing` chars following the caret are removed
  /// first (0 for a plain insertion).
  Insert {
    before:    Tendril,
    after:     Tendril,
    replacing: usize,
  },
  /// Delete the half-open char range `from..to`.
  Delete { from: usize, to: usize },
  /// Advance the caret over `chars` existing characters without mutating.
  Skip { chars: usize },
  /// Wrap the char range `from..to` in a pair, caret ending after the
  /// inserted closer.
  Surround {
    from:  usize,
    to:    usize,
    open:  char,
    close: char,
  },
}

impl EditPlan {
  pub fn insert(before: impl Into<Tendril>, after: impl Into<Tendril>) -> Self {
    EditPlan::Insert {
      before:    before.into(),
      after:     after.into(),
      replacing: 0,
    }
  }
}

/// What the engine decided about one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
  pub plan:     Option<EditPlan>,
  pub consumed: bool,
}

impl Decision {
  /// Nothing special happens; the host performs its default handling.
  pub const fn pass_through() -> Self {
    Self {
      plan:     None,
      consumed: false,
    }
  }

  /// Apply `plan` and suppress the host's default handling.
  pub const fn consume(plan: EditPlan) -> Self {
    Self {
      plan:     Some(plan),
      consumed: true,
    }
  }

  pub fn is_pass_through(&self) -> bool {
    self.plan.is_none() && !self.consumed
  }
}

/// Apply a decision's plan to the view and report the consumed flag.
///
/// Validation happens before any mutation; on error the buffer is
/// guaranteed unchanged.
pub fn apply(view: &mut impl TextView, caret: usize, decision: &Decision) -> Result<bool> {
  let Some(plan) = &decision.plan else {
    return Ok(decision.consumed);
  };

  let len = view.len_chars();
  match plan {
    EditPlan::Insert {
      before,
      after,
      replacing,
    } => {
      if caret > len {
        return Err(PlanError::OffsetOutOfBounds { offset: caret, len });
      }
      if caret + replacing > len {
        return Err(PlanError::RangeOutOfBounds {
          from: caret,
          to: caret + replacing,
          len,
        });
      }
      if *replacing > 0 {
        view.delete_range(caret, caret + replacing);
      }
      let mut text = before.clone();
      text.push_str(after);
      view.insert_at(caret, &text);
      view.set_caret(caret + before.chars().count());
    },
    EditPlan::Delete { from, to } => {
      check_range(*from, *to, len)?;
      view.delete_range(*from, *to);
      let caret = if caret <= *from {
        caret
      } else if caret >= *to {
        caret - (to - from)
      } else {
        *from
      };
      view.set_caret(caret);
    },
    EditPlan::Skip { chars } => {
      if caret + chars > len {
        return Err(PlanError::OffsetOutOfBounds {
          offset: caret + chars,
          len,
        });
      }
      view.set_caret(caret + chars);
    },
    EditPlan::Surround {
      from,
      to,
      open,
      close,
    } => {
      check_range(*from, *to, len)?;
      // Closer first so the opener's insertion doesn't shift `to`.
      let mut piece = Tendril::new();
      piece.push(*close);
      view.insert_at(*to, &piece);
      piece.clear();
      piece.push(*open);
      view.insert_at(*from, &piece);
      view.set_caret(to + 2);
    },
  }

  Ok(decision.consumed)
}

fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
  if from > to {
    return Err(PlanError::InvalidRange { from, to });
  }
  if to > len {
    return Err(PlanError::RangeOutOfBounds { from, to, len });
  }
  Ok(())
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::view::RopeBuffer;

  #[test]
  fn insert_places_caret_between() {
    let mut buf = RopeBuffer::new("ab");
    let consumed = apply(&mut buf, 1, &Decision::consume(EditPlan::insert("(", ")"))).unwrap();
    assert!(consumed);
    assert_eq!(buf.text().to_string(), "a()b");
    assert_eq!(buf.caret(), 2);
  }

  #[test]
  fn insert_with_replacement() {
    let mut buf = RopeBuffer::new("foo(bar)");
    let plan = EditPlan::Insert {
      before:    "\n    ".into(),
      after:     "bar\n".into(),
      replacing: 3,
    };
    apply(&mut buf, 4, &Decision::consume(plan)).unwrap();
    assert_eq!(buf.text().to_string(), "foo(\n    bar\n)");
    assert_eq!(buf.caret(), 9);
  }

  #[test]
  fn delete_maps_caret() {
    let mut buf = RopeBuffer::new("abcdef");
    let plan = EditPlan::Delete { from: 1, to: 4 };
    // Caret after the range shifts left by the deleted length.
    apply(&mut buf, 5, &Decision::consume(plan.clone())).unwrap();
    assert_eq!(buf.text().to_string(), "aef");
    assert_eq!(buf.caret(), 2);
    // Caret inside the range collapses to its start.
    let mut buf = RopeBuffer::new("abcdef");
    apply(&mut buf, 2, &Decision::consume(plan)).unwrap();
    assert_eq!(buf.caret(), 1);
  }

  #[test]
  fn skip_advances_without_mutation() {
    let mut buf = RopeBuffer::new("()");
    let consumed = apply(
      &mut buf,
      1,
      &Decision::consume(EditPlan::Skip { chars: 1 }),
    )
    .unwrap();
    assert!(consumed);
    assert_eq!(buf.text().to_string(), "()");
    assert_eq!(buf.caret(), 2);
  }

  #[test]
  fn surround_wraps_range() {
    let mut buf = RopeBuffer::new("hello world");
    let plan = EditPlan::Surround {
      from:  0,
      to:    5,
      open:  '(',
      close: ')',
    };
    apply(&mut buf, 0, &Decision::consume(plan)).unwrap();
    assert_eq!(buf.text().to_string(), "(hello) world");
    assert_eq!(buf.caret(), 7);
  }

  #[test]
  fn invalid_plans_leave_the_buffer_alone() {
    let mut buf = RopeBuffer::new("ab");
    let plan = EditPlan::Delete { from: 1, to: 9 };
    let err = apply(&mut buf, 0, &Decision::consume(plan)).unwrap_err();
    assert_eq!(
      err,
      PlanError::RangeOutOfBounds {
        from: 1,
        to:   9,
        len:  2,
      }
    );
    assert_eq!(buf.text().to_string(), "ab");
    assert_eq!(buf.caret(), 0);
  }

  #[test]
  fn pass_through_applies_nothing() {
    let mut buf = RopeBuffer::new("ab");
    let consumed = apply(&mut buf, 1, &Decision::pass_through()).unwrap();
    assert!(!consumed);
    assert_eq!(buf.text().to_string(), "ab");
    assert_eq!(buf.caret(), 0);
  }
}
