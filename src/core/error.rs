// This module defines error types for the exprasm compiler using the thiserror crate for
// idiomatic Rust error handling. CompileError is the main error enum covering every way a
// compilation can fail: register exhaustion (there is no spill fallback), bookkeeping
// violations in the allocator, unsupported operator symbols, ill-formed token sequences
// and invalid register catalogs supplied as configuration. Each variant carries enough
// context (register names, token positions, capacities) to explain the failure. All of
// them are terminal: no partial instruction list is ever returned alongside an error.

//! Error types for the exprasm compiler.
//!
//! Using thiserror for more idiomatic error handling.

use thiserror::Error;

use super::allocator::AllocError;
use super::register_file::CatalogError;

/// Main error type for expression compilation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("No available registers: all {capacity} catalog registers are live")]
    ResourceExhausted {
        capacity: usize,
    },

    #[error("Invalid register state: {reason}")]
    InvalidState {
        reason: String,
    },

    #[error("Unsupported operator: {symbol}")]
    UnsupportedOperator {
        symbol: String,
    },

    #[error("Malformed expression: {reason}")]
    MalformedExpression {
        reason: String,
    },

    #[error("Invalid register catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
}

impl CompileError {
    /// Shorthand for a [`CompileError::MalformedExpression`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedExpression {
            reason: reason.into(),
        }
    }
}

impl From<AllocError> for CompileError {
    fn from(err: AllocError) -> Self {
        match err {
            AllocError::ResourceExhausted { capacity } => Self::ResourceExhausted { capacity },
            AllocError::InvalidState { .. } => Self::InvalidState {
                reason: err.to_string(),
            },
        }
    }
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
