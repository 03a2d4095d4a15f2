//! Crate root: wires together the compilation pipeline.
//!
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the expression tree.
//! - `ast` is the tree shared by the parser and the code generator.
//! - `codegen` lowers the tree into Intel-syntax x86-64 assembly.
//! - `error` holds the diagnostics shared by the other modules.

pub mod ast;
pub mod error;
pub mod parser;
pub mod tokenizer;

mod codegen;

use tracing::debug;

pub use error::{CompileError, CompileResult};

/// Compile a source string into a complete assembly listing for `main`.
pub fn generate_assembly(expr: &str) -> CompileResult<String> {
  let tokens = tokenizer::tokenize(expr)?;
  debug!(tokens = tokens.len(), "tokenized input");

  let node = parser::parse(tokens, expr)?;
  debug!(depth = node.depth(), "parsed expression");

  let body = codegen::generate(&node);
  debug!(instructions = body.lines().count(), "generated code");

  let mut asm = String::new();
  asm.push_str(".intel_syntax noprefix\n");
  asm.push_str(".global main\n");
  asm.push_str("main:\n");
  asm.push_str(&body);
  asm.push_str("\tpop rax\n");
  asm.push_str("\tret\n");
  Ok(asm)
}

/// Validate the command line (program name followed by exactly one source
/// argument) and compile it.
pub fn run<I>(args: I) -> CompileResult<String>
where
  I: IntoIterator<Item = String>,
{
  let args: Vec<String> = args.into_iter().collect();
  let [_, expr] = args.as_slice() else {
    let program = args
      .first()
      .cloned()
      .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    return Err(CompileError::usage(program));
  };

  generate_assembly(expr)
}
