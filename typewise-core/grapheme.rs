//! Utility functions to traverse the unicode graphemes of a `Rope`'s text
//! contents.
//!
//! Caret positions handed to the edit layer must never land inside a
//! multi-codepoint cluster; these helpers find and enforce the nearest
//! legal boundaries.

use ropey::{RopeSlice, str_utils::byte_to_char_idx};
use unicode_segmentation::{GraphemeCursor, GraphemeIncomplete};

#[must_use]
pub fn nth_prev_grapheme_boundary(slice: RopeSlice, char_idx: usize, n: usize) -> usize {
  assert!(char_idx <= slice.len_chars());

  let mut byte_idx = slice.char_to_byte(char_idx);
  let (mut chunk, mut chunk_byte_idx, mut chunk_char_idx, _) = slice.chunk_at_byte(byte_idx);
  let mut gc = GraphemeCursor::new(byte_idx, slice.len_bytes(), true);

  for _ in 0..n {
    loop {
      match gc.prev_boundary(chunk, chunk_byte_idx) {
        Ok(None) => return 0,
        Ok(Some(n)) => {
          byte_idx = n;
          break;
        },
        Err(GraphemeIncomplete::PrevChunk) => {
          let (a, b, c, _) = slice.chunk_at_byte(chunk_byte_idx - 1);
          chunk = a;
          chunk_byte_idx = b;
          chunk_char_idx = c;
        },
        Err(GraphemeIncomplete::PreContext(n)) => {
          let ctx_chunk = slice.chunk_at_byte(n - 1).0;
          gc.provide_context(ctx_chunk, n - ctx_chunk.len());
        },
        _ => unreachable!(),
      }
    }
  }
  let tmp = byte_to_char_idx(chunk, byte_idx - chunk_byte_idx);
  chunk_char_idx + tmp
}

#[must_use]
pub fn nth_next_grapheme_boundary(slice: RopeSlice, char_idx: usize, n: usize) -> usize {
  assert!(char_idx <= slice.len_chars());

  let mut byte_idx = slice.char_to_byte(char_idx);
  let (mut chunk, mut chunk_byte_idx, mut chunk_char_idx, _) = slice.chunk_at_byte(byte_idx);
  let mut gc = GraphemeCursor::new(byte_idx, slice.len_bytes(), true);

  for _ in 0..n {
    loop {
      match gc.next_boundary(chunk, chunk_byte_idx) {
        Ok(None) => return slice.len_chars(),
        Ok(Some(n)) => {
          byte_idx = n;
          break;
        },
        Err(GraphemeIncomplete::NextChunk) => {
          chunk_byte_idx += chunk.len();
          let (a, _, c, _) = slice.chunk_at_byte(chunk_byte_idx);
          chunk = a;
          chunk_char_idx = c;
        },
        Err(GraphemeIncomplete::PreContext(n)) => {
          let ctx_chunk = slice.chunk_at_byte(n - 1).0;
          gc.provide_context(ctx_chunk, n - ctx_chunk.len());
        },
        _ => unreachable!(),
      }
    }
  }

  let tmp = byte_to_char_idx(chunk, byte_idx - chunk_byte_idx);
  chunk_char_idx + tmp
}

/// Finds the next grapheme boundary after the given char position.
#[must_use]
#[inline(always)]
pub fn next_grapheme_boundary(slice: RopeSlice, char_idx: usize) -> usize {
  nth_next_grapheme_boundary(slice, char_idx, 1)
}

/// Finds the previous grapheme boundary before the given char position.
#[must_use]
#[inline(always)]
pub fn prev_grapheme_boundary(slice: RopeSlice, char_idx: usize) -> usize {
  nth_prev_grapheme_boundary(slice, char_idx, 1)
}

/// Returns the passed char index if it's already a grapheme boundary,
/// or the next grapheme boundary char index if not.
#[must_use]
#[inline]
pub fn ensure_grapheme_boundary_next(slice: RopeSlice, char_idx: usize) -> usize {
  // Clamp to valid range
  let char_idx = char_idx.min(slice.len_chars());

  if char_idx == 0 {
    char_idx
  } else {
    next_grapheme_boundary(slice, char_idx - 1)
  }
}

/// Returns the passed char index if it's already a grapheme boundary,
/// or the prev grapheme boundary char index if not.
#[must_use]
#[inline]
pub fn ensure_grapheme_boundary_prev(slice: RopeSlice, char_idx: usize) -> usize {
  // Clamp to valid range
  let char_idx = char_idx.min(slice.len_chars());

  if char_idx == slice.len_chars() {
    char_idx
  } else {
    prev_grapheme_boundary(slice, char_idx + 1)
  }
}
