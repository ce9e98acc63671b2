// src/templates/mod.rs
// Fixed program templates wrapped around every compiled expression.

//! Program templates.
//!
//! The prologue, the print epilogue and the exit epilogue are configuration,
//! not generated code. The assembler copies them into the listing verbatim.
//! The defaults target Linux x86-64: the result is printed with `printf`
//! using a `%d\n` format string and the process exits through `syscall` 60.

/// Data section with the format string plus the `_start` entry label.
pub const DEFAULT_PROLOGUE: &str = r#".section .rodata
fmt:
    .asciz "%d\n"
.section .text
.globl _start
_start:
"#;

/// Loads the format string and calls `printf` with the result in `%rsi`.
pub const DEFAULT_PRINT_EPILOGUE: &str = "movq $fmt, %rdi
movq $0, %rax
call printf
";

/// `exit(0)` via the raw syscall.
pub const DEFAULT_EXIT_EPILOGUE: &str = "movq $60, %rax
xor %rdi, %rdi
syscall
";

/// Register the print template reads the result from.
pub const DEFAULT_OUTPUT_REGISTER: &str = "rsi";

/// The fixed text surrounding a compiled expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramTemplate {
    pub prologue: String,
    pub print_epilogue: String,
    pub exit_epilogue: String,
    /// Bare register name (no `%`) the result is moved into.
    pub output_register: String,
}

impl ProgramTemplate {
    /// Replace the output register, accepting either `rsi` or `%rsi`.
    pub fn with_output_register(mut self, name: &str) -> Self {
        self.output_register = name.trim().trim_start_matches('%').to_string();
        self
    }
}

impl Default for ProgramTemplate {
    fn default() -> Self {
        Self {
            prologue: DEFAULT_PROLOGUE.to_string(),
            print_epilogue: DEFAULT_PRINT_EPILOGUE.to_string(),
            exit_epilogue: DEFAULT_EXIT_EPILOGUE.to_string(),
            output_register: DEFAULT_OUTPUT_REGISTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prologue_keeps_escape() {
        // The format string is emitted as the two characters `\` `n`.
        assert!(DEFAULT_PROLOGUE.contains(r#".asciz "%d\n""#));
        assert!(DEFAULT_PROLOGUE.ends_with("_start:\n"));
    }

    #[test]
    fn test_output_register_override() {
        let tpl = ProgramTemplate::default().with_output_register("%rdx");
        assert_eq!(tpl.output_register, "rdx");
        assert_eq!(tpl.prologue, DEFAULT_PROLOGUE);
    }
}
