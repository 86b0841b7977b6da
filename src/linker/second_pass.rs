//! Pass two: re-tokenize the same buffer, rewrite addressing modes, and
//! build the memory map

use std::collections::HashSet;
use std::fmt;

use super::diagnostics::{ParseError, ParseErrorCode};
use super::module_table::{Module, ModuleTable};
use super::symbol_table::SymbolTable;
use super::token::Tokenizer;
use super::validators::{read_integer, read_marie, read_symbol};
use super::warnings::Warning;

const MAX_INSTR_PER_MODULE: i64 = 512;

/// A rewrite-rule failure attached to one memory-map line. Never fatal:
/// the module still gets a `final_word`, this is just the inline note.
#[derive(Debug, Clone)]
pub enum RewriteError {
    IllegalOpcode,
    IllegalModuleOperand,
    AbsoluteOverflow,
    RelativeOverflow,
    IllegalImmediate,
    ExternalOperandOutOfRange,
    UndefinedExternal { name: String },
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::IllegalOpcode => write!(f, "Error: Illegal opcode; treated as 9999"),
            RewriteError::IllegalModuleOperand => {
                write!(f, "Error: Illegal module operand ; treated as module=0")
            }
            RewriteError::AbsoluteOverflow => {
                write!(f, "Error: Absolute address exceeds machine size; zero used")
            }
            RewriteError::RelativeOverflow => write!(
                f,
                "Error: Relative address exceeds module size; relative zero used"
            ),
            RewriteError::IllegalImmediate => {
                write!(f, "Error: Illegal immediate operand; treated as 999")
            }
            RewriteError::ExternalOperandOutOfRange => write!(
                f,
                "Error: External operand exceeds length of uselist; treated as relative=0"
            ),
            RewriteError::UndefinedExternal { name } => {
                write!(f, "Error: {} is not defined; zero used", name)
            }
        }
    }
}

/// One resolved line of the memory map.
#[derive(Debug, Clone)]
pub struct MemoryMapLine {
    index: usize,
    word: i64,
    error: Option<RewriteError>,
}

impl MemoryMapLine {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn word(&self) -> i64 {
        self.word
    }

    pub fn error(&self) -> Option<&RewriteError> {
        self.error.as_ref()
    }
}

impl fmt::Display for MemoryMapLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}: {:04}", self.index, self.word)?;
        if let Some(err) = &self.error {
            write!(f, " {}", err)?;
        }
        Ok(())
    }
}

/// One module's slice of the memory map plus the uselist-unused warnings
/// it produced, kept together so the CLI shell can print them adjacent to
/// each other without having to re-derive module boundaries from a flat
/// instruction list; these warnings must immediately follow that module's
/// last instruction line.
#[derive(Debug, Clone, Default)]
pub struct ModuleReport {
    pub lines: Vec<MemoryMapLine>,
    pub uselist_warnings: Vec<Warning>,
}

/// Re-drive a fresh tokenizer over `source`, producing one [`ModuleReport`]
/// per module plus the defined-but-unused warnings emitted once at the end.
/// `symbol_table` is the one built (and already post-pass-adjusted) by pass
/// one; `E`-mode resolution marks its entries used as it goes.
pub fn second_pass(
    source: &str,
    symbol_table: &mut SymbolTable,
    module_table: &ModuleTable,
) -> Result<(Vec<ModuleReport>, Vec<Warning>), ParseError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut module_reports = Vec::new();
    let mut global_index: usize = 0;
    let num_modules = module_table.len();

    let mut current = tokenizer.next();
    let mut module_number: usize = 0;
    while !current.is_eof() {
        module_number += 1;
        let module = module_table
            .get(module_number)
            .expect("pass two's module count must match pass one's")
            .clone();

        let def_count = read_integer(&current, &tokenizer.last_meaningful())?;
        current = tokenizer.next();
        for _ in 0..def_count {
            read_symbol(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();
            read_integer(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();
        }

        let use_count = read_integer(&current, &tokenizer.last_meaningful())?;
        current = tokenizer.next();
        let mut use_list: Vec<String> = Vec::with_capacity(use_count.max(0) as usize);
        for _ in 0..use_count {
            let name = read_symbol(&current, &tokenizer.last_meaningful())?;
            use_list.push(name);
            current = tokenizer.next();
        }
        let mut referenced_indices: HashSet<usize> = HashSet::new();
        let mut lines = Vec::new();

        let instr_count_token = current.clone();
        let instr_count = read_integer(&current, &tokenizer.last_meaningful())?;
        current = tokenizer.next();
        if instr_count > MAX_INSTR_PER_MODULE {
            return Err(ParseError::new(ParseErrorCode::TooManyInstr, &instr_count_token));
        }

        for _ in 0..instr_count {
            let mode = read_marie(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();
            let word = read_integer(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();

            let (final_word, error) = apply_rewrite(
                mode,
                word,
                &module,
                num_modules,
                instr_count,
                &use_list,
                symbol_table,
                &mut referenced_indices,
                module_table,
            );

            lines.push(MemoryMapLine {
                index: global_index,
                word: final_word,
                error,
            });
            global_index += 1;
        }

        let mut uselist_warnings = Vec::new();
        for (index, name) in use_list.iter().enumerate() {
            if !referenced_indices.contains(&index) {
                uselist_warnings.push(Warning::UseListUnused {
                    module_number,
                    index,
                    name: name.clone(),
                });
            }
        }

        module_reports.push(ModuleReport { lines, uselist_warnings });
    }

    let mut defined_but_unused = Vec::new();
    for symbol in symbol_table.iter() {
        if !symbol.used() {
            defined_but_unused.push(Warning::DefinedButUnused {
                module_number: symbol.module_number(),
                name: symbol.name().to_string(),
            });
        }
    }

    Ok((module_reports, defined_but_unused))
}

/// Apply the addressing-mode rewrite rule table to one instruction word,
/// checking illegal opcode first, then the mode-specific bounds check.
#[allow(clippy::too_many_arguments)]
fn apply_rewrite(
    mode: char,
    word: i64,
    module: &Module,
    num_modules: usize,
    instr_count: i64,
    use_list: &[String],
    symbol_table: &mut SymbolTable,
    referenced_indices: &mut HashSet<usize>,
    module_table: &ModuleTable,
) -> (i64, Option<RewriteError>) {
    if word > 9999 {
        return (9999, Some(RewriteError::IllegalOpcode));
    }

    let opcode = word / 1000;
    let operand = word % 1000;

    match mode {
        'M' => {
            if operand < 0 || operand > num_modules as i64 - 1 {
                (opcode * 1000, Some(RewriteError::IllegalModuleOperand))
            } else {
                let target = module_table
                    .get(operand as usize + 1)
                    .expect("operand already bounds-checked against num_modules");
                (opcode * 1000 + target.base_addr(), None)
            }
        }
        'A' => {
            if operand >= 512 {
                (opcode * 1000, Some(RewriteError::AbsoluteOverflow))
            } else {
                (word, None)
            }
        }
        'R' => {
            if operand >= instr_count {
                (module.base_addr() + opcode * 1000, Some(RewriteError::RelativeOverflow))
            } else {
                (module.base_addr() + opcode * 1000 + operand, None)
            }
        }
        'I' => {
            if operand >= 900 {
                (opcode * 1000 + 999, Some(RewriteError::IllegalImmediate))
            } else {
                (word, None)
            }
        }
        'E' => {
            if operand < 0 || operand >= use_list.len() as i64 {
                (
                    opcode * 1000 + module.base_addr(),
                    Some(RewriteError::ExternalOperandOutOfRange),
                )
            } else {
                referenced_indices.insert(operand as usize);
                let name = &use_list[operand as usize];
                match symbol_table.find_mut(name) {
                    Some(symbol) => {
                        symbol.mark_used();
                        (opcode * 1000 + symbol.absolute_addr(), None)
                    }
                    None => (
                        opcode * 1000,
                        Some(RewriteError::UndefinedExternal { name: name.clone() }),
                    ),
                }
            }
        }
        other => unreachable!("read_marie only yields M/A/R/I/E, got {other}"),
    }
}
