//! Program assembly.
//!
//! The assembler wraps a compiled body with the configured templates:
//! prologue, body, print epilogue, exit epilogue, in that order. Template
//! text is copied untouched.

use std::fmt;

use crate::templates::ProgramTemplate;
use crate::x64::Instruction;

/// A finished listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    body_range: std::ops::Range<usize>,
}

impl Program {
    /// Every element of the listing, templates included.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Only the generated part of the listing.
    pub fn body(&self) -> &[Instruction] {
        &self.instructions[self.body_range.clone()]
    }

    /// Listing as individual text lines.
    pub fn lines(&self) -> Vec<String> {
        self.instructions.iter().flat_map(Instruction::lines).collect()
    }

    /// Listing as text, one line per row with a trailing newline each.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Concatenates templates and a compiled body.
pub struct ProgramAssembler<'t> {
    template: &'t ProgramTemplate,
}

impl<'t> ProgramAssembler<'t> {
    pub fn new(template: &'t ProgramTemplate) -> Self {
        Self { template }
    }

    pub fn assemble(&self, body: Vec<Instruction>) -> Program {
        let mut instructions = Vec::with_capacity(body.len() + 3);
        instructions.push(Instruction::template(&self.template.prologue));
        let start = instructions.len();
        instructions.extend(body);
        let end = instructions.len();
        instructions.push(Instruction::template(&self.template.print_epilogue));
        instructions.push(Instruction::template(&self.template.exit_epilogue));

        log::debug!("assembled program with {} body instructions", end - start);
        Program {
            instructions,
            body_range: start..end,
        }
    }
}
