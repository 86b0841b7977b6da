//! Non-fatal warnings emitted by pass one and pass two
//!
//! Every variant's `Display` impl produces exactly one warning line,
//! byte-for-byte.

use std::fmt;

/// A warning emitted during pass one or pass two. Never terminal.
#[derive(Debug, Clone)]
pub enum Warning {
    /// A definition's relative address fell outside its module's bounds.
    OutOfBoundsDefinition {
        module_number: usize,
        name: String,
        printed_addr: i64,
        max_valid: i64,
    },
    /// A symbol name was defined more than once.
    RedefinitionIgnored { module_number: usize, name: String },
    /// A use-list entry was never referenced by an `E`-mode instruction.
    UseListUnused {
        module_number: usize,
        index: usize,
        name: String,
    },
    /// A defined symbol was never referenced by any module's use list.
    DefinedButUnused { module_number: usize, name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::OutOfBoundsDefinition {
                module_number,
                name,
                printed_addr,
                max_valid,
            } => write!(
                f,
                "Warning: Module {}: {}={} valid=[0..{}] assume zero relative",
                module_number - 1,
                name,
                printed_addr,
                max_valid
            ),
            Warning::RedefinitionIgnored { module_number, name } => write!(
                f,
                "Warning: Module {}: {} redefinition ignored",
                module_number - 1,
                name
            ),
            Warning::UseListUnused {
                module_number,
                index,
                name,
            } => write!(
                f,
                "Warning: Module {}: uselist[{}]={} was not used",
                module_number - 1,
                index,
                name
            ),
            Warning::DefinedButUnused { module_number, name } => write!(
                f,
                "Warning: Module {}: {} was defined but never used",
                module_number - 1,
                name
            ),
        }
    }
}
