//! Expression tree shared by the parser and the code generator.

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
}

impl BinaryOp {
  /// Source spelling of the operator.
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Add => "+",
      Self::Sub => "-",
      Self::Mul => "*",
      Self::Div => "/",
      Self::Eq => "==",
    }
  }
}

/// Expression tree produced by the parser. Leaves are always literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
  Num {
    value: i64,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<AstNode>,
    rhs: Box<AstNode>,
  },
}

impl AstNode {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }

  /// Height of the tree; a lone literal has depth 1.
  pub fn depth(&self) -> usize {
    match self {
      Self::Num { .. } => 1,
      Self::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
    }
  }
}
