use ropey::RopeSlice;

#[cfg(target_os = "windows")]
pub const NATIVE_LINE_ENDING: LineEnding = LineEnding::Crlf;

#[cfg(not(target_os = "windows"))]
pub const NATIVE_LINE_ENDING: LineEnding = LineEnding::LF;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,

  /// U+000A -- LineFeed
  LF,
}

impl LineEnding {
  #[inline]
  pub const fn len_chars(&self) -> usize {
    match self {
      Self::Crlf => 2,
      Self::LF => 1,
    }
  }

  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Crlf => "\u{000D}\u{000A}",
      Self::LF => "\u{000A}",
    }
  }

  #[inline]
  pub const fn from_char(ch: char) -> Option<LineEnding> {
    match ch {
      '\u{000A}' => Some(LineEnding::LF),
      _ => None,
    }
  }

  // Normally we'd want to implement the FromStr trait, but in this case
  // that would force us into a different return type than from_char,
  // which would be weird.
  #[allow(clippy::should_implement_trait)]
  #[inline]
  pub fn from_str(g: &str) -> Option<LineEnding> {
    match g {
      "\u{000D}\u{000A}" => Some(LineEnding::Crlf),
      "\u{000A}" => Some(LineEnding::LF),
      _ => None,
    }
  }
}

/// Returns the line ending at the end of the given line slice, if any.
pub fn get_line_ending(line: &RopeSlice) -> Option<LineEnding> {
  // Last one and two characters as str, or empty str if they're not
  // contiguous in the rope. It's fine to punt on the non-contiguous case,
  // because a negative result in that case still means a negative result.
  let g1 = line
    .slice(line.len_chars().saturating_sub(1)..)
    .as_str()
    .unwrap_or("");
  let g2 = line
    .slice(line.len_chars().saturating_sub(2)..)
    .as_str()
    .unwrap_or("");

  // First check the two-character case, then fall back to the one-character
  // case.
  LineEnding::from_str(g2).or_else(|| LineEnding::from_str(g1))
}

/// Length of the given line without its line ending.
pub fn line_end_char_index(line: &RopeSlice) -> usize {
  line.len_chars()
    - get_line_ending(line)
      .map(|le| le.len_chars())
      .unwrap_or(0)
}
