// This module implements the expression compiler: a single forward pass over the token
// stream that combines shunting-yard operator precedence parsing with immediate code
// emission. Literals are loaded into freshly allocated registers and pushed on the operand
// stack. Operators wait on the operator stack until an incoming operator of lower or equal
// precedence forces them to reduce, which gives left associativity. A reduction pops two
// operand registers, emits a two-address instruction that leaves the result in the left
// operand's register, frees the right operand's register and pushes the left one back.
// Once the input is consumed the remaining operators are reduced, the single surviving
// register is moved into the output register used by the print template and released.

//! Expression compiler.
//!
//! ```text
//! 2 + 3 * 4
//!   movq $2, %r15
//!   movq $3, %r14
//!   movq $4, %r13
//!   imulq %r13, %r14
//!   addq %r14, %r15
//!   movq %r15, %rsi
//! ```

use std::sync::Arc;

use super::token::{self, BinaryOp, Token};
use crate::core::error::{CompileError, CompileResult};
use crate::core::register_file::Register;
use crate::core::session::CompilationSession;
use crate::x64::Instruction;

/// Compiles one expression into a session's instruction buffer.
pub struct ExpressionCompiler<'s, 'cfg> {
    session: &'s mut CompilationSession<'cfg>,
    operands: Vec<Register>,
    operators: Vec<BinaryOp>,
}

impl<'s, 'cfg> ExpressionCompiler<'s, 'cfg> {
    pub fn new(session: &'s mut CompilationSession<'cfg>) -> Self {
        Self {
            session,
            operands: Vec::new(),
            operators: Vec::new(),
        }
    }

    /// Compile `expr`, returning the register that held the result.
    ///
    /// The register has already been moved to the output register and freed
    /// when this returns.
    pub fn compile_expression(mut self, expr: &str) -> CompileResult<Register> {
        let config = self.session.config();
        log::debug!("compiling expression {:?}", expr);

        let tokens = token::recognized(token::tokenize(expr), config.token_mode)?;
        if config.check_arity {
            token::check_arity(&tokens)?;
        }

        for token in tokens {
            match token {
                Token::Literal(text) => self.load_literal(text)?,
                Token::Operator(op) => self.push_operator(op)?,
                // `recognized` has already rejected or dropped these.
                Token::Unknown(_) => continue,
            }
        }

        while let Some(op) = self.operators.pop() {
            self.reduce(op)?;
        }

        self.emit_result()
    }

    fn load_literal(&mut self, text: &str) -> CompileResult<()> {
        let reg = self.session.allocator_mut().allocate()?;
        self.session.emit(Instruction::load_immediate(text, reg.clone()));
        self.operands.push(reg);
        Ok(())
    }

    fn push_operator(&mut self, op: BinaryOp) -> CompileResult<()> {
        while let Some(&top) = self.operators.last() {
            if top.precedence() < op.precedence() {
                break;
            }
            self.operators.pop();
            self.reduce(top)?;
        }
        self.operators.push(op);
        Ok(())
    }

    /// Pop two operands, emit `lhs := lhs <op> rhs` and push `lhs` back.
    fn reduce(&mut self, op: BinaryOp) -> CompileResult<()> {
        let rhs = self.pop_operand(op)?;
        let lhs = self.pop_operand(op)?;
        log::trace!("reduce {} {} {}", lhs, op, rhs);

        self.session.emit(Instruction::binary(op, rhs.clone(), lhs.clone()));
        self.session.allocator_mut().free(&rhs)?;
        self.operands.push(lhs);
        Ok(())
    }

    fn pop_operand(&mut self, op: BinaryOp) -> CompileResult<Register> {
        self.operands.pop().ok_or_else(|| {
            CompileError::malformed(format!("operator `{op}` is missing an operand"))
        })
    }

    fn emit_result(mut self) -> CompileResult<Register> {
        let result = self
            .operands
            .pop()
            .ok_or_else(|| CompileError::malformed("expression produced no value"))?;
        if !self.operands.is_empty() {
            return Err(CompileError::malformed(format!(
                "{} operands left without an operator",
                self.operands.len() + 1
            )));
        }

        let output = Arc::from(self.session.config().template.output_register.as_str());
        self.session.emit(Instruction::MoveToOutput {
            src: result.clone(),
            dst: output,
        });
        self.session.allocator_mut().free(&result)?;
        Ok(result)
    }
}

/// Compile `expr` into `session`.
pub fn compile_into(session: &mut CompilationSession<'_>, expr: &str) -> CompileResult<Register> {
    ExpressionCompiler::new(session).compile_expression(expr)
}
