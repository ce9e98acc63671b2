// This module provides per-call compilation state. CompilationSession is created for
// exactly one expression: it owns a fresh RegisterAllocator built from the configured
// catalog and the append-only instruction buffer the expression compiler writes into.
// Nothing in a session outlives the call that created it and sessions are never shared,
// which keeps repeated or concurrent compilations independent of each other.
// SessionStats records what the compilation did (literals loaded, operations reduced,
// peak register pressure) so callers and tests can check register hygiene.

//! Per-compilation session state.

use std::fmt;

use super::allocator::RegisterAllocator;
use super::config::CompilerConfig;
use super::error::{CompileError, CompileResult};
use crate::x64::Instruction;

/// Compilation statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub literals_loaded: u32,
    pub operations_reduced: u32,
    pub peak_registers: usize,
    /// Registers still allocated when the session finished.
    pub live_registers: usize,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loads, {} operations, peak {} registers, {} live",
            self.literals_loaded, self.operations_reduced, self.peak_registers, self.live_registers
        )
    }
}

/// The emitted body of one expression, without templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledExpression {
    pub instructions: Vec<Instruction>,
    pub stats: SessionStats,
}

/// State owned by a single compilation.
pub struct CompilationSession<'cfg> {
    config: &'cfg CompilerConfig,
    allocator: RegisterAllocator,
    body: Vec<Instruction>,
    stats: SessionStats,
}

impl<'cfg> CompilationSession<'cfg> {
    pub fn new(config: &'cfg CompilerConfig) -> Self {
        Self {
            config,
            allocator: RegisterAllocator::new(config.catalog.clone()),
            body: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn config(&self) -> &'cfg CompilerConfig {
        self.config
    }

    pub fn allocator(&self) -> &RegisterAllocator {
        &self.allocator
    }

    pub fn allocator_mut(&mut self) -> &mut RegisterAllocator {
        &mut self.allocator
    }

    /// Append an instruction to the body.
    pub fn emit(&mut self, inst: Instruction) {
        log::trace!("emit: {}", inst);
        match inst {
            Instruction::LoadImmediate { .. } => self.stats.literals_loaded += 1,
            Instruction::Binary { .. } => self.stats.operations_reduced += 1,
            _ => {}
        }
        self.body.push(inst);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.body
    }

    /// Close the session, handing over the body.
    ///
    /// Fails if any register is still allocated.
    pub fn finish(mut self) -> CompileResult<CompiledExpression> {
        self.stats.peak_registers = self.allocator.stats().peak_in_use;
        self.stats.live_registers = self.allocator.in_use_count();

        if self.stats.live_registers != 0 {
            let live: Vec<String> = self
                .allocator
                .live_registers()
                .iter()
                .map(|r| r.to_string())
                .collect();
            return Err(CompileError::InvalidState {
                reason: format!("registers still allocated at end of compilation: {}", live.join(", ")),
            });
        }

        log::debug!("session finished: {}", self.stats);
        Ok(CompiledExpression {
            instructions: self.body,
            stats: self.stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::register_file::RegisterCatalog;

    #[test]
    fn test_finish_rejects_leaked_register() {
        let config = CompilerConfig::default().with_catalog(RegisterCatalog::new(["a", "b"]).unwrap());
        let mut session = CompilationSession::new(&config);
        let reg = session.allocator_mut().allocate().unwrap();
        session.emit(Instruction::load_immediate("1", reg));

        let err = session.finish().unwrap_err();
        assert!(matches!(err, CompileError::InvalidState { .. }));
        assert!(err.to_string().contains("a"));
    }

    #[test]
    fn test_sessions_are_independent() {
        let config = CompilerConfig::default();
        let mut first = CompilationSession::new(&config);
        first.allocator_mut().allocate().unwrap();

        let second = CompilationSession::new(&config);
        assert_eq!(second.allocator().in_use_count(), 0);
        assert!(second.instructions().is_empty());
    }
}
