//! AT&T syntax instruction model.
//!
//! Every emitted line is an [`Instruction`]. Rendering goes through
//! `Display`, which produces exactly the text that ends up in the listing.

use std::fmt;
use std::sync::Arc;

use crate::core::register_file::Register;
use crate::expr::token::BinaryOp;

impl BinaryOp {
    /// Quadword mnemonic implementing `dst := dst <op> src`.
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "addq",
            BinaryOp::Sub => "subq",
            BinaryOp::Mul => "imulq",
        }
    }
}

/// A single emitted instruction or a verbatim template block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `movq $N, %dst`
    LoadImmediate { value: String, dst: Register },
    /// `addq|subq|imulq %src, %dst`
    Binary {
        op: BinaryOp,
        src: Register,
        dst: Register,
    },
    /// `movq %src, %out`, hands the result to the print template.
    MoveToOutput { src: Register, dst: Arc<str> },
    /// Fixed text copied into the listing untouched.
    Template(Arc<str>),
}

impl Instruction {
    pub fn load_immediate(value: impl Into<String>, dst: Register) -> Self {
        Self::LoadImmediate {
            value: value.into(),
            dst,
        }
    }

    pub fn binary(op: BinaryOp, src: Register, dst: Register) -> Self {
        Self::Binary { op, src, dst }
    }

    pub fn template(text: &str) -> Self {
        Self::Template(Arc::from(text.trim_end_matches('\n')))
    }

    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template(_))
    }

    /// Text lines this instruction contributes to the listing.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Template(text) if text.is_empty() => Vec::new(),
            Self::Template(text) => text.lines().map(str::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadImmediate { value, dst } => write!(f, "movq ${value}, {}", dst.operand()),
            Self::Binary { op, src, dst } => {
                write!(f, "{} {}, {}", op.mnemonic(), src.operand(), dst.operand())
            }
            Self::MoveToOutput { src, dst } => write!(f, "movq {}, %{dst}", src.operand()),
            Self::Template(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::register_file::RegisterCatalog;

    #[test]
    fn test_instruction_text() {
        let catalog = RegisterCatalog::new(["r15", "r14"]).unwrap();
        let r15 = catalog.get(0).unwrap();
        let r14 = catalog.get(1).unwrap();

        assert_eq!(
            Instruction::load_immediate("42", r15.clone()).to_string(),
            "movq $42, %r15"
        );
        assert_eq!(
            Instruction::binary(BinaryOp::Sub, r14.clone(), r15.clone()).to_string(),
            "subq %r14, %r15"
        );
        assert_eq!(
            Instruction::binary(BinaryOp::Mul, r14, r15.clone()).to_string(),
            "imulq %r14, %r15"
        );
        assert_eq!(
            Instruction::MoveToOutput {
                src: r15,
                dst: Arc::from("rsi"),
            }
            .to_string(),
            "movq %r15, %rsi"
        );
    }

    #[test]
    fn test_template_lines() {
        let block = Instruction::template("movq $60, %rax\nxor %rdi, %rdi\nsyscall\n");
        assert!(block.is_template());
        assert_eq!(block.lines(), ["movq $60, %rax", "xor %rdi, %rdi", "syscall"]);
        assert!(Instruction::template("").lines().is_empty());
    }
}
