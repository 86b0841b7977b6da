//! Pass one: build the Module Table and Symbol Table

use super::diagnostics::{ParseError, ParseErrorCode};
use super::module_table::{Module, ModuleTable};
use super::symbol_table::{DefinitionLog, SymbolTable};
use super::token::Tokenizer;
use super::validators::{read_integer, read_marie, read_symbol};
use super::warnings::Warning;

const MAX_DEFS_PER_MODULE: i64 = 16;
const MAX_USES_PER_MODULE: i64 = 16;
const MAX_TOTAL_INSTRUCTIONS: i64 = 512;

/// Drive the tokenizer through every module, building the Module Table and
/// Symbol Table and returning the post-pass warnings (redefinitions and
/// out-of-module-bounds definitions) in Definition Log order.
pub fn first_pass(source: &str) -> Result<(SymbolTable, ModuleTable, Vec<Warning>), ParseError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut symbol_table = SymbolTable::new();
    let mut def_log = DefinitionLog::new();
    let mut module_table = ModuleTable::new();

    let mut base_addr: i64 = 0;
    let mut module_number: usize = 0;
    let mut total_instructions: i64 = 0;

    let mut current = tokenizer.next();
    while !current.is_eof() {
        module_number += 1;

        let def_count_token = current.clone();
        let def_count = read_integer(&current, &tokenizer.last_meaningful())?;
        if def_count > MAX_DEFS_PER_MODULE {
            return Err(ParseError::new(
                ParseErrorCode::TooManyDefInModule,
                &def_count_token,
            ));
        }
        current = tokenizer.next();

        for _ in 0..def_count {
            let name = read_symbol(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();
            let relative_addr = read_integer(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();

            let absolute_addr = relative_addr + base_addr;
            let already_defined = symbol_table.find(&name).is_some();
            symbol_table.record_definition(&name, relative_addr, absolute_addr, module_number);
            def_log.push(&name, relative_addr, absolute_addr, module_number, already_defined);
        }

        let use_count_token = current.clone();
        let use_count = read_integer(&current, &tokenizer.last_meaningful())?;
        if use_count > MAX_USES_PER_MODULE {
            return Err(ParseError::new(
                ParseErrorCode::TooManyUseInModule,
                &use_count_token,
            ));
        }
        current = tokenizer.next();

        // Pass one validates the use list but does not record it.
        for _ in 0..use_count {
            read_symbol(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();
        }

        let instr_count_token = current.clone();
        let instr_count = read_integer(&current, &tokenizer.last_meaningful())?;
        total_instructions += instr_count;
        current = tokenizer.next();
        if total_instructions > MAX_TOTAL_INSTRUCTIONS {
            return Err(ParseError::new(ParseErrorCode::TooManyInstr, &instr_count_token));
        }

        // Pass one validates and discards the instruction stream.
        for _ in 0..instr_count {
            read_marie(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();
            read_integer(&current, &tokenizer.last_meaningful())?;
            current = tokenizer.next();
        }

        module_table.push(Module::new(base_addr, instr_count));
        base_addr += instr_count;
    }

    let warnings = post_pass_warnings(&def_log, &module_table, &mut symbol_table);
    Ok((symbol_table, module_table, warnings))
}

/// Sweep the Definition Log once, in order, checking both warning
/// conditions per entry in a single sweep — only a name's first Definition
/// Log entry can ever trigger the out-of-bounds branch, since later entries
/// for the same name are always `already_defined`.
fn post_pass_warnings(
    def_log: &DefinitionLog,
    module_table: &ModuleTable,
    symbol_table: &mut SymbolTable,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for entry in def_log.iter() {
        let owning_module = module_table
            .get(entry.module_number())
            .expect("every definition log entry belongs to a recorded module");

        if entry.relative_addr() > owning_module.size() - 1 && !entry.already_defined() {
            let mut printed_addr = entry.absolute_addr();
            if entry.module_number() > 1 {
                printed_addr -= owning_module.base_addr();
            }
            warnings.push(Warning::OutOfBoundsDefinition {
                module_number: entry.module_number(),
                name: entry.name().to_string(),
                printed_addr,
                max_valid: owning_module.size() - 1,
            });
            symbol_table.reset_absolute_addr(entry.name(), owning_module.base_addr());
        }

        if entry.already_defined() {
            warnings.push(Warning::RedefinitionIgnored {
                module_number: entry.module_number(),
                name: entry.name().to_string(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_module_one_def_one_use() {
        let (symbols, modules, warnings) =
            first_pass("1 A 0  1 A  1 E 1000").expect("valid input");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules.get(1).unwrap().size(), 1);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols.find("A").unwrap().absolute_addr(), 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn redefinition_is_flagged_and_first_address_wins() {
        let (symbols, _modules, warnings) =
            first_pass("2 A 0 A 5  0  1 A 1000").expect("valid input");
        let sym = symbols.find("A").unwrap();
        assert_eq!(sym.absolute_addr(), 0);
        assert!(sym.already_defined());
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            format!("{}", warnings[0]),
            "Warning: Module 0: A redefinition ignored"
        );
    }

    #[test]
    fn out_of_bounds_definition_resets_to_module_base() {
        // module has 2 instructions (size=2), so valid relative range is [0,1]
        let (symbols, _modules, warnings) =
            first_pass("1 A 5  0  2 A 1000 A 1000").expect("valid input");
        let sym = symbols.find("A").unwrap();
        assert_eq!(sym.absolute_addr(), 0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            format!("{}", warnings[0]),
            "Warning: Module 0: A=5 valid=[0..1] assume zero relative"
        );
    }

    #[test]
    fn too_many_defs_is_rejected() {
        let input = "17 ".to_string() + &"A 0 ".repeat(17) + " 0  0";
        let err = first_pass(&input).unwrap_err();
        assert_eq!(format!("{err}"), "Parse Error line 1 offset 1: TOO_MANY_DEF_IN_MODULE");
    }

    #[test]
    fn too_many_instructions_is_rejected() {
        let input = "0  0  513 ".to_string() + &"A 1000 ".repeat(513);
        let err = first_pass(&input).unwrap_err();
        assert!(format!("{err}").contains("TOO_MANY_INSTR"));
    }
}
