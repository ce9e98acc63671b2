//! Default x86-64 register catalog.

use crate::core::register_file::RegisterCatalog;

/// Register names in allocation order.
///
/// The list is the full 64-bit general purpose file, high numbered registers
/// first. It includes `rsp`, `rbp` and the printf argument registers, so deep
/// expressions can clobber them; callers who care supply their own catalog.
pub const X86_64_CATALOG: [&str; 16] = [
    "r15", "r14", "r13", "r12", "r11", "r10",
    "r9", "r8", "rsp", "rbp", "rdi", "rsi",
    "rdx", "rcx", "rbx", "rax",
];

impl RegisterCatalog {
    /// The 16-entry x86-64 catalog.
    pub fn x86_64() -> Self {
        Self::new(X86_64_CATALOG).unwrap_or_else(|_| unreachable!("builtin catalog is valid"))
    }
}
