//! Compiler configuration.
//!
//! Everything that the compiler treats as fixed input lives here: the
//! register catalog, the program templates and the front-end policies.

use super::error::CompileResult;
use super::register_file::RegisterCatalog;
use crate::expr::token::TokenMode;
use crate::templates::ProgramTemplate;

/// Options for a compilation. Cheap to clone and never mutated by a compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub catalog: RegisterCatalog,
    pub template: ProgramTemplate,
    pub token_mode: TokenMode,
    /// Reject `operand (operator operand)*` violations before allocating.
    pub check_arity: bool,
}

impl CompilerConfig {
    pub fn with_catalog(mut self, catalog: RegisterCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the catalog with registers named in allocation order.
    pub fn with_register_names<I, S>(self, names: I) -> CompileResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with_catalog(RegisterCatalog::new(names)?))
    }

    pub fn with_template(mut self, template: ProgramTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_token_mode(mut self, mode: TokenMode) -> Self {
        self.token_mode = mode;
        self
    }

    pub fn with_arity_check(mut self, enabled: bool) -> Self {
        self.check_arity = enabled;
        self
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            catalog: RegisterCatalog::x86_64(),
            template: ProgramTemplate::default(),
            token_mode: TokenMode::Strict,
            check_arity: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CompileError;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.catalog.len(), 16);
        assert_eq!(config.token_mode, TokenMode::Strict);
        assert!(config.check_arity);
        assert_eq!(config.template.output_register, "rsi");
    }

    #[test]
    fn test_register_names() {
        let config = CompilerConfig::default()
            .with_register_names(["rax", "rbx"])
            .unwrap();
        assert_eq!(config.catalog.len(), 2);

        let err = CompilerConfig::default()
            .with_register_names(["rax", "rax"])
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidCatalog(_)));
    }
}
