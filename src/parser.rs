//! Recursive-descent parser producing an expression AST.
//!
//! Each precedence level is one helper, from loosest to tightest:
//! equality, additive, multiplicative, unary, primary. Same-level operators
//! fold to the left so `8-3-2` groups as `(8-3)-2`.

use crate::ast::{AstNode, BinaryOp};
use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Deepest run of open parentheses accepted.
const MAX_NESTING: usize = 256;

/// Tallest expression tree accepted; code generation recurses once per level.
const MAX_DEPTH: usize = 4096;

/// A subtree together with its height, tracked while folding so the limit is
/// checked before the tree is ever walked.
struct Parsed {
  node: AstNode,
  depth: usize,
}

impl Parsed {
  fn leaf(value: i64) -> Self {
    Self {
      node: AstNode::number(value),
      depth: 1,
    }
  }

  fn join(
    self,
    op: BinaryOp,
    rhs: Parsed,
    stream: &TokenStream,
    loc: usize,
  ) -> CompileResult<Parsed> {
    let depth = 1 + self.depth.max(rhs.depth);
    if depth > MAX_DEPTH {
      return Err(CompileError::syntax_at(
        stream.source,
        loc,
        "expression nested too deeply",
      ));
    }
    Ok(Self {
      node: AstNode::binary(op, self.node, rhs.node),
      depth,
    })
  }
}

/// Parse one complete expression; the whole token stream must be consumed.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<AstNode> {
  let mut stream = TokenStream::new(tokens, source);

  let parsed = parse_expr(&mut stream)?;

  if !stream.is_eof() {
    let token = stream.current().ok_or_else(|| {
      CompileError::syntax_at(
        source,
        source.len(),
        "unexpected end of input after expression",
      )
    })?;
    let got = describe_token(Some(token), source);
    return Err(CompileError::syntax_at(
      source,
      token.loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  Ok(parsed.node)
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<Parsed> {
  parse_equality(stream)
}

fn parse_equality(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut node = parse_add(stream)?;

  while let Some((op, loc)) = stream.consume_op(&[BinaryOp::Eq]) {
    let rhs = parse_add(stream)?;
    node = node.join(op, rhs, stream, loc)?;
  }

  Ok(node)
}

fn parse_add(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut node = parse_mul(stream)?;

  while let Some((op, loc)) = stream.consume_op(&[BinaryOp::Add, BinaryOp::Sub]) {
    let rhs = parse_mul(stream)?;
    node = node.join(op, rhs, stream, loc)?;
  }

  Ok(node)
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut node = parse_unary(stream)?;

  while let Some((op, loc)) = stream.consume_op(&[BinaryOp::Mul, BinaryOp::Div]) {
    let rhs = parse_unary(stream)?;
    node = node.join(op, rhs, stream, loc)?;
  }

  Ok(node)
}

fn parse_unary(stream: &mut TokenStream) -> CompileResult<Parsed> {
  if stream.equal("+") {
    return parse_primary(stream);
  }

  // -x is lowered to 0 - x.
  let loc = stream.loc();
  if stream.equal("-") {
    let operand = parse_primary(stream)?;
    return Parsed::leaf(0).join(BinaryOp::Sub, operand, stream, loc);
  }

  parse_primary(stream)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let loc = stream.loc();
  if stream.equal("(") {
    stream.nesting += 1;
    if stream.nesting > MAX_NESTING {
      return Err(CompileError::syntax_at(
        stream.source,
        loc,
        "expression nested too deeply",
      ));
    }
    let node = parse_expr(stream)?;
    stream.skip(")")?;
    stream.nesting -= 1;
    return Ok(node);
  }

  let value = stream.get_number()?;
  Ok(Parsed::leaf(value))
}

/// Forward-only cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
  nesting: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
      nesting: 0,
    }
  }

  fn current(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Consume the current token if it matches the provided punctuator.
  fn equal(&mut self, op: &str) -> bool {
    if let Some(token) = self.current()
      && token.kind == TokenKind::Punctuator
      && token.len == op.len()
      && token_text(token, self.source) == op
    {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Byte offset of the current token.
  fn loc(&self) -> usize {
    self.current().map_or(self.source.len(), |token| token.loc)
  }

  /// Consume the first operator in `ops` that matches the current token,
  /// returning it with its location.
  fn consume_op(&mut self, ops: &[BinaryOp]) -> Option<(BinaryOp, usize)> {
    let loc = self.loc();
    ops
      .iter()
      .copied()
      .find(|op| self.equal(op.symbol()))
      .map(|op| (op, loc))
  }

  fn skip(&mut self, s: &str) -> CompileResult<()> {
    if self.equal(s) {
      return Ok(());
    }

    let (loc, got) = match self.current() {
      Some(token) => (token.loc, describe_token(Some(token), self.source)),
      None => (self.source.len(), "EOF".to_string()),
    };
    Err(CompileError::syntax_at(
      self.source,
      loc,
      format!("expected \"{s}\", but got \"{got}\""),
    ))
  }

  /// Consume the current token as an integer literal and return its value.
  fn get_number(&mut self) -> CompileResult<i64> {
    let Some(token) = self.current() else {
      return Err(CompileError::syntax_at(
        self.source,
        self.source.len(),
        "expected a number, but reached end of input",
      ));
    };

    if let TokenKind::Num(value) = token.kind {
      self.pos += 1;
      return Ok(value);
    }

    let got = describe_token(Some(token), self.source);
    Err(CompileError::syntax_at(
      self.source,
      token.loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  fn is_eof(&self) -> bool {
    matches!(self.current().map(|token| token.kind), Some(TokenKind::Eof))
  }
}
