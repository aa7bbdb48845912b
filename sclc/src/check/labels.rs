use super::symbols::SymbolTable;
use crate::error::{Diagnostics, Error};
use crate::grammer::ast::{walk, InstrKind, Program};

/// Collect every label, then check every goto against them
pub fn check(program: &Program, symbols: &mut SymbolTable, diags: &mut Diagnostics) {
    walk(&program.instrs, &mut |instr| {
        if let InstrKind::Label(name) = &instr.kind {
            if let Err(first) = symbols.add_label(name, instr.pos) {
                diags.error(Error::DuplicateLabel(name.clone()), instr.pos);
                diags.note(Error::DeclaredHere, first);
            }
        }
    });

    walk(&program.instrs, &mut |instr| {
        if let InstrKind::Goto(name) = &instr.kind {
            if symbols.label(name).is_none() {
                diags.error(Error::UndeclaredLabel(name.clone()), instr.pos);
            }
        }
    });
}
