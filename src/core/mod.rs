// This module serves as the central hub for exprasm's core infrastructure: the register
// pool (catalog plus in-use bitset), the first-fit allocator with ownership bookkeeping,
// the per-call compilation session that owns the allocator and the instruction buffer,
// configuration, error types and the program assembler that wraps a compiled body with
// the fixed templates. None of these hold process-wide state; every compilation builds
// its own instances from a CompilerConfig.

//! Core exprasm infrastructure.
//!
//! # Key Components
//!
//! ## Register Pool (`register_file`)
//! - Fixed, ordered register catalog supplied as configuration
//! - In-use tracking with a bitset, first-fit scan in catalog order
//!
//! ## Register Allocation (`allocator`)
//! - `allocate`/`free` with explicit errors, no spilling
//! - Owner and usage statistics for each register
//!
//! ## Session Management (`session`)
//! - One allocator and one instruction buffer per compilation
//!
//! ## Assembly (`assembler`)
//! - Prologue, body, print and exit templates concatenated verbatim

pub mod allocator;
pub mod assembler;
pub mod config;
pub mod error;
pub mod register_file;
pub mod session;

pub use allocator::{AllocError, AllocStats, RegisterAllocator, ValueId};
pub use assembler::{Program, ProgramAssembler};
pub use config::CompilerConfig;
pub use error::{CompileError, CompileResult};
pub use register_file::{CatalogError, RegBitSet, RegId, Register, RegisterCatalog, RegisterFile};
pub use session::{CompilationSession, CompiledExpression, SessionStats};
