//! Register allocation on top of the [`RegisterFile`].
//!
//! The allocator hands out registers first-fit in catalog order and records
//! which value owns each one. Running out of registers is fatal: there is no
//! spill slot to fall back on.

use thiserror::Error;

use super::register_file::{Register, RegisterCatalog, RegisterFile};

/// Identifier handed to each value that receives a register.
pub type ValueId = u32;

/// Error types for register allocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// Every catalog register is currently live.
    #[error("no available registers ({capacity} in use)")]
    ResourceExhausted { capacity: usize },

    /// A register was released that is not held.
    #[error("register {register} is {reason}")]
    InvalidState {
        register: String,
        reason: &'static str,
    },
}

/// Counters describing how the allocator was used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: u32,
    pub frees: u32,
    pub peak_in_use: usize,
}

/// Allocator for a single compilation.
///
/// Construct a fresh one per expression; instances are never shared.
#[derive(Debug)]
pub struct RegisterAllocator {
    file: RegisterFile,
    /// Which value owns each catalog slot.
    owners: Vec<Option<ValueId>>,
    next_value: ValueId,
    stats: AllocStats,
}

impl RegisterAllocator {
    pub fn new(catalog: RegisterCatalog) -> Self {
        let owners = vec![None; catalog.len()];
        Self {
            file: RegisterFile::new(catalog),
            owners,
            next_value: 0,
            stats: AllocStats::default(),
        }
    }

    /// Allocate the first free register in catalog order.
    pub fn allocate(&mut self) -> Result<Register, AllocError> {
        let Some(reg) = self.file.claim_first_free() else {
            log::debug!("register file exhausted ({} live)", self.file.capacity());
            return Err(AllocError::ResourceExhausted {
                capacity: self.file.capacity(),
            });
        };

        let value = self.next_value;
        self.next_value += 1;
        self.owners[reg.id as usize] = Some(value);

        self.stats.allocations += 1;
        self.stats.peak_in_use = self.stats.peak_in_use.max(self.file.in_use_count());

        log::trace!("allocate {} -> v{}", reg, value);
        Ok(reg)
    }

    /// Release a register previously returned by [`allocate`](Self::allocate).
    pub fn free(&mut self, reg: &Register) -> Result<(), AllocError> {
        self.file.release(reg)?;
        let owner = self.owners[reg.id as usize].take();
        self.stats.frees += 1;

        log::trace!("free {} (was v{})", reg, owner.unwrap_or_default());
        Ok(())
    }

    /// Value currently holding the register, if any.
    pub fn owner(&self, reg: &Register) -> Option<ValueId> {
        if !self.file.is_in_use(reg) {
            return None;
        }
        self.owners[reg.id as usize]
    }

    pub fn is_allocated(&self, reg: &Register) -> bool {
        self.file.is_in_use(reg)
    }

    pub fn in_use_count(&self) -> usize {
        self.file.in_use_count()
    }

    pub fn live_registers(&self) -> Vec<Register> {
        self.file.live_registers()
    }

    pub fn catalog(&self) -> &RegisterCatalog {
        self.file.catalog()
    }

    pub fn stats(&self) -> AllocStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_allocator(size: usize) -> RegisterAllocator {
        let names: Vec<String> = (0..size).map(|i| format!("r{i}")).collect();
        RegisterAllocator::new(RegisterCatalog::new(&names).unwrap())
    }

    #[test]
    fn test_register_allocation() {
        let mut alloc = create_test_allocator(4);

        let reg1 = alloc.allocate().unwrap();
        let reg2 = alloc.allocate().unwrap();
        assert_eq!(reg1.name(), "r0");
        assert_eq!(reg2.name(), "r1");
        assert!(alloc.is_allocated(&reg1));

        assert_eq!(alloc.owner(&reg1), Some(0));
        assert_eq!(alloc.owner(&reg2), Some(1));
    }

    #[test]
    fn test_exhaustion() {
        let mut alloc = create_test_allocator(2);
        alloc.allocate().unwrap();
        alloc.allocate().unwrap();

        assert_eq!(
            alloc.allocate(),
            Err(AllocError::ResourceExhausted { capacity: 2 })
        );
        assert_eq!(alloc.in_use_count(), 2);
    }

    #[test]
    fn test_double_free() {
        let mut alloc = create_test_allocator(2);
        let reg = alloc.allocate().unwrap();

        alloc.free(&reg).unwrap();
        assert!(matches!(
            alloc.free(&reg),
            Err(AllocError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_free_before_allocate() {
        let mut alloc = create_test_allocator(3);
        let never_claimed = alloc.catalog().get(2).unwrap();

        assert!(matches!(
            alloc.free(&never_claimed),
            Err(AllocError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_reuse_prefers_lowest_slot() {
        let mut alloc = create_test_allocator(4);
        let r0 = alloc.allocate().unwrap();
        let r1 = alloc.allocate().unwrap();
        let r2 = alloc.allocate().unwrap();

        alloc.free(&r2).unwrap();
        alloc.free(&r0).unwrap();

        // r0 was freed last but sits earlier in the catalog.
        assert_eq!(alloc.allocate().unwrap(), r0);
        assert_eq!(alloc.allocate().unwrap(), r2);
        assert!(alloc.is_allocated(&r1));
    }

    #[test]
    fn test_stats_track_peak() {
        let mut alloc = create_test_allocator(4);
        let a = alloc.allocate().unwrap();
        let b = alloc.allocate().unwrap();
        alloc.free(&b).unwrap();
        alloc.free(&a).unwrap();
        alloc.allocate().unwrap();

        let stats = alloc.stats();
        assert_eq!(stats.allocations, 3);
        assert_eq!(stats.frees, 2);
        assert_eq!(stats.peak_in_use, 2);
        assert_eq!(alloc.owner(&a), Some(2));
    }
}
