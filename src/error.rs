//! Shared error utilities used across the compilation pipeline.
//!
//! Every failure is built as a value and handed back up to `main`, which is
//! the only place that prints and exits. Located errors render the input
//! line with a caret under the offending character.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  #[snafu(display("{program}: invalid number of arguments"))]
  Usage { program: String },

  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Lex {
    expr_line: String,
    marker: String,
    message: String,
    loc: usize,
  },

  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Syntax {
    expr_line: String,
    marker: String,
    message: String,
    loc: usize,
  },
}

impl CompileError {
  /// An unrecognised character at byte offset `loc`.
  pub fn lex_at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (loc, marker) = caret(expr, loc);
    Self::Lex {
      expr_line: expr.to_string(),
      marker,
      message: message.into(),
      loc,
    }
  }

  /// A token that does not fit the grammar at byte offset `loc`.
  pub fn syntax_at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (loc, marker) = caret(expr, loc);
    Self::Syntax {
      expr_line: expr.to_string(),
      marker,
      message: message.into(),
      loc,
    }
  }

  pub fn usage(program: impl Into<String>) -> Self {
    Self::Usage {
      program: program.into(),
    }
  }

  /// Byte offset the diagnostic points at, if it has one.
  pub fn loc(&self) -> Option<usize> {
    match self {
      Self::Lex { loc, .. } | Self::Syntax { loc, .. } => Some(*loc),
      Self::Usage { .. } => None,
    }
  }

  pub fn message(&self) -> Option<&str> {
    match self {
      Self::Lex { message, .. } | Self::Syntax { message, .. } => Some(message),
      Self::Usage { .. } => None,
    }
  }
}

fn caret(expr: &str, loc: usize) -> (usize, String) {
  let mut safe_loc = loc.min(expr.len());
  while !expr.is_char_boundary(safe_loc) {
    safe_loc -= 1;
  }
  let char_offset = expr[..safe_loc].chars().count();
  (safe_loc, format!("{}^", " ".repeat(char_offset)))
}
