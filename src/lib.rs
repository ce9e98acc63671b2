//! exprasm - infix arithmetic to x86-64 assembly.
//!
//! exprasm translates a space separated infix expression over non-negative
//! integer literals and `+`, `-`, `*` into AT&T assembly for a register
//! machine, then appends a fixed epilogue that prints the result and exits.
//! Parsing, register allocation and emission happen in one pass.
//!
//! # Primary Usage
//!
//! ```
//! use exprasm::{compile, CompilerConfig};
//!
//! let program = compile("1 + 2 * 3", &CompilerConfig::default()).unwrap();
//! assert!(program.render().contains("imulq %r13, %r14"));
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Register pool, allocator, session, assembler, errors
//! - [`expr`] - Tokenizer and shunting-yard compiler
//! - [`x64`] - Instruction model and the default register catalog
//! - [`templates`] - Prologue and epilogue text

pub mod core;
pub mod expr;
pub mod templates;
pub mod x64;

pub use crate::core::{
    // Register allocation
    AllocError, RegisterAllocator, Register, RegisterCatalog,
    // Sessions and output
    CompilationSession, CompiledExpression, Program, ProgramAssembler, SessionStats,
    // Configuration and errors
    CompileError, CompileResult, CompilerConfig,
};
pub use expr::{BinaryOp, TokenMode};
pub use templates::ProgramTemplate;
pub use x64::Instruction;

/// Compile an expression to its body instructions, without templates.
pub fn compile_body(expr: &str, config: &CompilerConfig) -> CompileResult<CompiledExpression> {
    let mut session = CompilationSession::new(config);
    let result = expr::compile_into(&mut session, expr)?;
    log::debug!("result computed in {}", result);
    session.finish()
}

/// Compile an expression into a complete program listing.
pub fn compile(expr: &str, config: &CompilerConfig) -> CompileResult<Program> {
    let body = compile_body(expr, config)?;
    Ok(ProgramAssembler::new(&config.template).assemble(body.instructions))
}
