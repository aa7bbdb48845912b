mod constexpr;
mod labels;
mod layout;
mod resolve;
mod symbols;
mod typeck;

pub use constexpr::eval as const_eval;
pub use layout::{FrameLayout, ELEM_SIZE, SLOT_SIZE};
pub use symbols::{Storage, SymbolTable, Variable};
pub use typeck::type_of;

use crate::error::Diagnostics;
use crate::grammer::ast::Program;

/// Declarations, stack offsets, variable references and labels
pub fn resolve(program: &Program) -> (SymbolTable, Diagnostics) {
    let (mut symbols, mut diags) = resolve::Resolver::new().run(program);
    labels::check(program, &mut symbols, &mut diags);
    (symbols, diags)
}

/// Type rules over a resolved program
pub fn typecheck(program: &Program, symbols: &SymbolTable) -> Diagnostics {
    typeck::TypeChecker::new(symbols).run(&program.instrs)
}
