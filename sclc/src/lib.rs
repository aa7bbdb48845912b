pub mod check;
pub mod codegen;
pub mod config;
pub mod error;
pub mod fasm;
pub mod grammer;
pub mod util;

pub use check::SymbolTable;
pub use config::Config;
pub use error::{Diagnostic, Diagnostics, Error, Severity, Sources};
pub use grammer::ast::Program;
pub use grammer::lexer::Lexer;
pub use grammer::parsercore::Parser;

use color_print::cprintln;
use std::path::Path;
use util::display;

/// Result of running the front end and code generator over one input
#[derive(Debug)]
pub struct Compilation {
    pub sources: Sources,
    pub diags: Diagnostics,
    /// None when a stage reported errors
    pub asm: Option<String>,
}

/// Lex, parse, resolve, type check and generate code.
/// Each stage runs only if the previous ones reported no errors.
pub fn compile(name: &str, code: &str, include_dir: &Path, verbose: bool) -> Compilation {
    let mut sources = Sources::new();
    let mut diags = Diagnostics::new();

    macro_rules! checkpoint {
        () => {
            if diags.has_errors() {
                return Compilation {
                    sources,
                    diags,
                    asm: None,
                };
            }
        };
    }

    // 1. Lex
    if verbose {
        cprintln!("<s>1. Lex</>");
    }
    let (tokens, lex_diags) = Lexer::new(&mut sources, include_dir).tokenize(name, code);
    diags.extend(lex_diags);
    if verbose {
        display::print_tokens(&tokens, &sources);
    }
    checkpoint!();

    // 2. Parse
    if verbose {
        cprintln!("<s>2. Parse</>");
    }
    let (program, parse_diags) = Parser::new(tokens).parse();
    diags.extend(parse_diags);
    if verbose {
        display::print_program(&program);
    }
    checkpoint!();

    // 3. Resolve
    if verbose {
        cprintln!("<s>3. Resolve</>");
    }
    let (symbols, resolve_diags) = check::resolve(&program);
    diags.extend(resolve_diags);
    if verbose {
        display::print_symbols(&symbols);
    }
    checkpoint!();

    // 4. Type check
    if verbose {
        cprintln!("<s>4. Type check</>");
    }
    diags.extend(check::typecheck(&program, &symbols));
    checkpoint!();

    // 5. Generate
    if verbose {
        cprintln!("<s>5. Generate</>");
    }
    let (asm, gen_diags) = codegen::generate(&program, &symbols);
    diags.extend(gen_diags);
    checkpoint!();

    Compilation {
        sources,
        diags,
        asm: Some(asm),
    }
}
