//! x86-64 architecture-specific components.
//!
//! This module contains all x86-64 specific code:
//! - AT&T syntax instruction model and rendering
//! - The default general purpose register catalog

pub mod instruction;
pub mod registers;

pub use instruction::Instruction;
pub use registers::X86_64_CATALOG;
