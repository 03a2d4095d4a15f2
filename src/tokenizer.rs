//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer knows nothing about the grammar beyond recognising
//! punctuators and integer literals. `==` is matched before the
//! single-character punctuators.

use tracing::trace;

use crate::error::{CompileError, CompileResult};

const PUNCTUATORS: &[u8] = b"+-*/()";

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Punctuator,
  Num(i64),
  Eof,
}

/// A token and the span of source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  pub fn new(kind: TokenKind, loc: usize, len: usize) -> Self {
    Self { kind, loc, len }
  }
}

/// Lex the input into a flat vector of tokens terminated by an `Eof` marker.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    // is_ascii_whitespace leaves out vertical tab.
    if c.is_ascii_whitespace() || c == b'\x0b' {
      i += 1;
      continue;
    }

    if input[i..].starts_with("==") {
      push(&mut tokens, Token::new(TokenKind::Punctuator, i, 2));
      i += 2;
      continue;
    }

    if PUNCTUATORS.contains(&c) {
      push(&mut tokens, Token::new(TokenKind::Punctuator, i, 1));
      i += 1;
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let value = input[start..i]
        .parse::<i64>()
        .map_err(|err| CompileError::lex_at(input, start, format!("invalid number: {err}")))?;
      push(&mut tokens, Token::new(TokenKind::Num(value), start, i - start));
      continue;
    }

    let invalid_char = input[i..].chars().next().unwrap_or('\0');
    return Err(CompileError::lex_at(
      input,
      i,
      format!("invalid token: '{invalid_char}'"),
    ));
  }

  push(&mut tokens, Token::new(TokenKind::Eof, input.len(), 0));
  Ok(tokens)
}

fn push(tokens: &mut Vec<Token>, token: Token) {
  trace!(kind = ?token.kind, loc = token.loc, len = token.len, "lexed token");
  tokens.push(token);
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  &source[token.loc..token.loc + token.len]
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: Option<&Token>, source: &str) -> String {
  match token {
    Some(Token {
      kind: TokenKind::Eof,
      ..
    })
    | None => "EOF".to_string(),
    Some(t) => token_text(t, source).to_string(),
  }
}
