use std::env;
use std::process;

use marie_linker::linker::diagnostics::Error;
use marie_linker::linker::{self, LinkResult};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        println!("Usage: {} <input-file>", args[0]);
        process::exit(1);
    }

    let result = match linker::link_from_file(&args[1]) {
        Ok(result) => result,
        Err(Error::ReadError { path }) => {
            println!("Unable to open file {}", path);
            process::exit(0);
        }
        Err(e @ Error::Parse(_)) => {
            println!("{}", e);
            process::exit(1);
        }
    };

    print_report(&result);
}

/// Print the linker's output in the exact order the byte-compared test
/// contract requires: pass-one warnings, the symbol table, a blank line,
/// the memory map header, then each module's instruction lines followed
/// immediately by that module's uselist-unused warnings, a blank line,
/// then the defined-but-unused warnings.
fn print_report(result: &LinkResult) {
    for warning in &result.pass_one_warnings {
        println!("{}", warning);
    }

    println!("Symbol Table");
    for symbol in result.symbol_table.iter() {
        if symbol.already_defined() {
            println!(
                "{}={} Error: This variable is multiple times defined; first value used",
                symbol.name(),
                symbol.absolute_addr()
            );
        } else {
            println!("{}={}", symbol.name(), symbol.absolute_addr());
        }
    }

    println!();
    println!("Memory Map");

    for report in &result.module_reports {
        for line in &report.lines {
            println!("{}", line);
        }
        for warning in &report.uselist_warnings {
            println!("{}", warning);
        }
    }

    println!();
    for warning in &result.defined_but_unused {
        println!("{}", warning);
    }
}
