//! Two-pass linker for the MARIE-derived toy assembly dialect.
//!
//! [`link`] and [`link_from_file`] are the only two entry points most
//! callers need: each runs the full tokenize → pass-one → pass-two
//! pipeline and returns a [`LinkResult`] bundling the Symbol Table, the
//! Memory Map, and every warning in emission order.

pub mod diagnostics;
pub mod first_pass;
pub mod module_table;
pub mod second_pass;
pub mod symbol_table;
pub mod token;
pub mod validators;
pub mod warnings;

use diagnostics::Error;
use module_table::ModuleTable;
use second_pass::ModuleReport;
use symbol_table::SymbolTable;
use warnings::Warning;

/// Everything pass one and pass two produced, in the order the CLI shell
/// prints it: pass-one warnings, then the symbol table, then the memory
/// map (one [`ModuleReport`] per module, each carrying its own
/// uselist-unused warnings), then the defined-but-unused warnings.
pub struct LinkResult {
    pub symbol_table: SymbolTable,
    pub module_table: ModuleTable,
    pub pass_one_warnings: Vec<Warning>,
    pub module_reports: Vec<ModuleReport>,
    pub defined_but_unused: Vec<Warning>,
}

/// Run both passes over in-memory source text.
pub fn link(source: &str) -> Result<LinkResult, Error> {
    let (mut symbol_table, module_table, pass_one_warnings) = first_pass::first_pass(source)?;
    let (module_reports, defined_but_unused) =
        second_pass::second_pass(source, &mut symbol_table, &module_table)?;

    Ok(LinkResult {
        symbol_table,
        module_table,
        pass_one_warnings,
        module_reports,
        defined_but_unused,
    })
}

/// Read `path` and run [`link`] over its contents.
pub fn link_from_file(path: &str) -> Result<LinkResult, Error> {
    let source = std::fs::read_to_string(path).map_err(|_| Error::ReadError {
        path: path.to_string(),
    })?;
    link(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_end_to_end() {
        let result = link("1 A 0  1 A  1 E 1000").expect("valid input");
        assert_eq!(result.symbol_table.find("A").unwrap().absolute_addr(), 0);
        assert!(result.pass_one_warnings.is_empty());
        assert_eq!(result.module_reports.len(), 1);
        assert_eq!(result.module_reports[0].lines.len(), 1);
        assert_eq!(format!("{}", result.module_reports[0].lines[0]), "000: 1000");
        assert!(result.module_reports[0].uselist_warnings.is_empty());
        assert!(result.defined_but_unused.is_empty());
    }

    #[test]
    fn s6_too_many_defs_is_a_parse_error() {
        let input = "17 ".to_string() + &"A 0 ".repeat(17) + " 0  0";
        let err = link(&input).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "Parse Error line 1 offset 1: TOO_MANY_DEF_IN_MODULE"
        );
    }

    #[test]
    fn unreadable_file_reports_read_error() {
        let err = link_from_file("/nonexistent/path/does/not/exist.obj").unwrap_err();
        assert_eq!(
            format!("{err}"),
            "Unable to open file /nonexistent/path/does/not/exist.obj"
        );
    }
}
