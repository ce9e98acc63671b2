//! Register pool.
//!
//! This module holds the fixed, ordered register catalog and the bitset that
//! records which catalog entries currently hold a live value. Allocation is a
//! first-fit scan in ascending catalog order; there is no eviction and no
//! spilling, so a full file is simply full.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashSet;
use thiserror::Error;

use super::allocator::AllocError;

/// Maximum number of registers a catalog may hold (width of [`RegBitSet`]).
pub const MAX_CATALOG_REGISTERS: usize = 64;

/// Type for register indices within a catalog.
pub type RegId = u8;

/// A machine register drawn from a [`RegisterCatalog`].
///
/// The id is the position in the catalog and decides allocation order; the
/// name is what ends up in the emitted assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Register {
    pub id: RegId,
    name: Arc<str>,
}

impl Register {
    /// Bare register name, e.g. `r15`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// AT&T operand form, e.g. `%r15`.
    pub fn operand(&self) -> String {
        format!("%{}", self.name)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Errors raised while building a catalog from configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog must contain at least one register")]
    Empty,

    #[error("catalog has {len} registers, at most {max} are supported")]
    TooLarge { len: usize, max: usize },

    #[error("register name at position {index} is blank")]
    BlankName { index: usize },

    #[error("register `{name}` appears more than once")]
    Duplicate { name: String },
}

/// Ordered, immutable list of allocatable register names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCatalog {
    names: Vec<Arc<str>>,
}

impl RegisterCatalog {
    /// Build a catalog, rejecting empty, oversized or ambiguous lists.
    pub fn new<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out: Vec<Arc<str>> = Vec::new();

        for (index, name) in names.into_iter().enumerate() {
            let name = name.as_ref().trim().trim_start_matches('%');
            if name.is_empty() {
                return Err(CatalogError::BlankName { index });
            }
            if !seen.insert(name.to_string()) {
                return Err(CatalogError::Duplicate {
                    name: name.to_string(),
                });
            }
            out.push(Arc::from(name));
        }

        if out.is_empty() {
            return Err(CatalogError::Empty);
        }
        if out.len() > MAX_CATALOG_REGISTERS {
            return Err(CatalogError::TooLarge {
                len: out.len(),
                max: MAX_CATALOG_REGISTERS,
            });
        }

        Ok(Self { names: out })
    }

    /// Number of registers in the catalog.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Register at the given catalog position.
    pub fn get(&self, id: RegId) -> Option<Register> {
        self.names.get(id as usize).map(|name| Register {
            id,
            name: Arc::clone(name),
        })
    }

    /// Look a register up by name (with or without the `%` sigil).
    pub fn find(&self, name: &str) -> Option<Register> {
        let name = name.trim_start_matches('%');
        self.names
            .iter()
            .position(|n| &**n == name)
            .and_then(|idx| self.get(idx as RegId))
    }

    /// Check that a register handle was issued by this catalog.
    pub fn contains(&self, reg: &Register) -> bool {
        self.names
            .get(reg.id as usize)
            .is_some_and(|name| **name == *reg.name)
    }

    /// All registers in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = Register> + '_ {
        self.names.iter().enumerate().map(|(idx, name)| Register {
            id: idx as RegId,
            name: Arc::clone(name),
        })
    }
}

/// Bit set for tracking which catalog entries are in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegBitSet {
    bits: u64,
}

impl RegBitSet {
    /// Create empty register set.
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn contains(&self, id: RegId) -> bool {
        (id as usize) < MAX_CATALOG_REGISTERS && self.bits & (1u64 << id) != 0
    }

    pub fn set(&mut self, id: RegId) {
        if (id as usize) < MAX_CATALOG_REGISTERS {
            self.bits |= 1u64 << id;
        }
    }

    pub fn clear(&mut self, id: RegId) {
        if (id as usize) < MAX_CATALOG_REGISTERS {
            self.bits &= !(1u64 << id);
        }
    }

    /// Number of set registers.
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Lowest clear id strictly below `limit`.
    pub fn first_clear_below(&self, limit: usize) -> Option<RegId> {
        let free = !self.bits;
        if free == 0 {
            return None;
        }
        let id = free.trailing_zeros() as usize;
        (id < limit).then_some(id as RegId)
    }

    pub fn clear_all(&mut self) {
        self.bits = 0;
    }
}

/// RegisterFile tracks which catalog registers currently hold live values.
#[derive(Debug, Clone)]
pub struct RegisterFile {
    catalog: RegisterCatalog,
    used: RegBitSet,
}

impl RegisterFile {
    /// Create a register file with every catalog register free.
    pub fn new(catalog: RegisterCatalog) -> Self {
        Self {
            catalog,
            used: RegBitSet::new(),
        }
    }

    pub fn catalog(&self) -> &RegisterCatalog {
        &self.catalog
    }

    /// Claim the first free register in catalog order.
    pub fn claim_first_free(&mut self) -> Option<Register> {
        let id = self.used.first_clear_below(self.catalog.len())?;
        self.used.set(id);
        self.catalog.get(id)
    }

    /// Return a register to the pool.
    pub fn release(&mut self, reg: &Register) -> Result<(), AllocError> {
        if !self.catalog.contains(reg) {
            return Err(AllocError::InvalidState {
                register: reg.name().to_string(),
                reason: "not part of the register catalog",
            });
        }
        if !self.used.contains(reg.id) {
            return Err(AllocError::InvalidState {
                register: reg.name().to_string(),
                reason: "not currently allocated",
            });
        }

        self.used.clear(reg.id);
        Ok(())
    }

    pub fn is_in_use(&self, reg: &Register) -> bool {
        self.catalog.contains(reg) && self.used.contains(reg.id)
    }

    pub fn in_use_count(&self) -> usize {
        self.used.count() as usize
    }

    pub fn capacity(&self) -> usize {
        self.catalog.len()
    }

    /// Live registers in catalog order.
    pub fn live_registers(&self) -> Vec<Register> {
        self.catalog
            .iter()
            .filter(|reg| self.used.contains(reg.id))
            .collect()
    }

    /// Release everything.
    pub fn reset(&mut self) {
        self.used.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> RegisterCatalog {
        RegisterCatalog::new(["a", "b", "c"]).unwrap()
    }

    #[test]
    fn test_regbitset_operations() {
        let mut set = RegBitSet::new();

        assert!(!set.contains(5));
        set.set(5);
        assert!(set.contains(5));
        assert_eq!(set.count(), 1);
        set.clear(5);
        assert!(!set.contains(5));
    }

    #[test]
    fn test_first_clear_respects_limit() {
        let mut set = RegBitSet::new();
        set.set(0);
        set.set(1);
        assert_eq!(set.first_clear_below(3), Some(2));
        set.set(2);
        assert_eq!(set.first_clear_below(3), None);
    }

    #[test]
    fn test_catalog_rejects_bad_input() {
        let empty: [&str; 0] = [];
        assert_eq!(RegisterCatalog::new(empty), Err(CatalogError::Empty));
        assert_eq!(
            RegisterCatalog::new(["rax", "rbx", "rax"]),
            Err(CatalogError::Duplicate {
                name: "rax".to_string()
            })
        );
        assert_eq!(
            RegisterCatalog::new(["rax", " "]),
            Err(CatalogError::BlankName { index: 1 })
        );

        let many: Vec<String> = (0..65).map(|i| format!("v{i}")).collect();
        assert!(matches!(
            RegisterCatalog::new(&many),
            Err(CatalogError::TooLarge { len: 65, .. })
        ));
    }

    #[test]
    fn test_catalog_strips_sigil() {
        let catalog = RegisterCatalog::new(["%rax", "rbx"]).unwrap();
        let rax = catalog.find("rax").unwrap();
        assert_eq!(rax.id, 0);
        assert_eq!(rax.operand(), "%rax");
        assert_eq!(catalog.find("%rbx").map(|r| r.id), Some(1));
        assert!(catalog.find("rcx").is_none());
    }

    #[test]
    fn test_claim_in_catalog_order() {
        let mut file = RegisterFile::new(small_catalog());

        let a = file.claim_first_free().unwrap();
        let b = file.claim_first_free().unwrap();
        assert_eq!((a.name(), b.name()), ("a", "b"));

        file.release(&a).unwrap();
        // The lowest free slot wins, not the most recently released one.
        let next = file.claim_first_free().unwrap();
        assert_eq!(next.name(), "a");
    }

    #[test]
    fn test_release_unknown_register() {
        let mut file = RegisterFile::new(small_catalog());
        let foreign = RegisterCatalog::new(["zz"]).unwrap().get(0).unwrap();

        assert!(matches!(
            file.release(&foreign),
            Err(AllocError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_live_registers_and_reset() {
        let mut file = RegisterFile::new(small_catalog());
        let a = file.claim_first_free().unwrap();
        let _b = file.claim_first_free().unwrap();
        let _c = file.claim_first_free().unwrap();
        assert!(file.claim_first_free().is_none());

        file.release(&a).unwrap();
        let live: Vec<_> = file.live_registers().iter().map(|r| r.to_string()).collect();
        assert_eq!(live, ["b", "c"]);
        assert_eq!(file.in_use_count(), 2);

        file.reset();
        assert_eq!(file.in_use_count(), 0);
    }
}
