//! Code generation: lower the parsed AST into Intel-syntax x86-64 assembly.
//!
//! The emitter is a simple stack machine: every node leaves exactly one
//! value on the stack. Binary nodes evaluate the left operand first, pop the
//! right operand into `rdi` and the left into `rax`, and push the result.

use crate::ast::{AstNode, BinaryOp};

/// Emit the instruction sequence for an expression. The result is left on
/// top of the stack; the caller owns the prologue and epilogue.
pub fn generate(node: &AstNode) -> String {
  let mut asm = String::new();
  emit_expr(node, &mut asm);
  asm
}

/// Emit stack-based code for a single expression node.
fn emit_expr(node: &AstNode, asm: &mut String) {
  match node {
    AstNode::Num { value } => {
      // push only takes a sign-extended 32-bit immediate.
      if i32::try_from(*value).is_ok() {
        asm.push_str(&format!("\tpush {value}\n"));
      } else {
        asm.push_str(&format!("\tmov rax, {value}\n"));
        asm.push_str("\tpush rax\n");
      }
    }
    AstNode::Binary { op, lhs, rhs } => {
      emit_expr(lhs, asm);
      emit_expr(rhs, asm);
      asm.push_str("\tpop rdi\n");
      asm.push_str("\tpop rax\n");
      match op {
        BinaryOp::Add => asm.push_str("\tadd rax, rdi\n"),
        BinaryOp::Sub => asm.push_str("\tsub rax, rdi\n"),
        BinaryOp::Mul => asm.push_str("\timul rax, rdi\n"),
        BinaryOp::Div => {
          asm.push_str("\tcqo\n");
          asm.push_str("\tidiv rdi\n");
        }
        BinaryOp::Eq => {
          asm.push_str("\tcmp rax, rdi\n");
          asm.push_str("\tsete al\n");
          asm.push_str("\tmovzb rax, al\n");
        }
      }
      asm.push_str("\tpush rax\n");
    }
  }
}
