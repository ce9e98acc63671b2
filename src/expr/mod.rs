//! Expression front end.
//!
//! - `token` splits and classifies the input
//! - `compiler` runs the shunting-yard pass and emits code as it reduces

pub mod compiler;
pub mod token;

pub use compiler::{compile_into, ExpressionCompiler};
pub use token::{BinaryOp, Token, TokenMode};
