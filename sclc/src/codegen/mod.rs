mod expr;
mod runtime;
mod stmt;

use crate::check::{SymbolTable, Variable};
use crate::error::{Diagnostics, Error};
use crate::grammer::ast::{walk, InstrKind, Program, VarRef};
use itertools::chain;

/// Emit a FASM program for a resolved and type-checked program
pub fn generate(program: &Program, symbols: &SymbolTable) -> (String, Diagnostics) {
    let mut codegen = CodeGen::new(symbols);

    let mut defines = Vec::new();
    walk(&program.instrs, &mut |instr| {
        if let InstrKind::FasmDefine(content) = &instr.kind {
            defines.push(content.clone());
        }
    });

    let frame = symbols.frame_size();
    codegen.label("main");
    codegen.inst("push rbp");
    codegen.inst("mov rbp, rsp");
    codegen.inst(format!("sub rsp, {frame}"));
    codegen.instrs(&program.instrs);
    codegen.inst(format!("add rsp, {frame}"));
    codegen.inst("pop rbp");
    codegen.inst("ret");

    let strings = codegen
        .strings
        .iter()
        .enumerate()
        .map(|(idx, text)| runtime::string_data(idx, text));

    let lines: Vec<String> = chain!(
        [runtime::HEADER.to_string(), String::new()],
        defines,
        [String::new()],
        codegen.output,
        [String::new(), runtime::START.to_string()],
        [String::new(), runtime::ROUTINES.to_string()],
        [String::new(), runtime::DATA.to_string()],
        strings,
    )
    .collect();

    (lines.join("\n") + "\n", codegen.diags)
}

#[derive(Debug, Clone, Copy)]
enum Resume {
    Start,
    Test,
}

#[derive(Debug, Clone, Copy)]
struct LoopContext {
    id: usize,
    resume: Resume,
}

struct CodeGen<'a> {
    symbols: &'a SymbolTable,
    output: Vec<String>,
    if_counter: usize,
    loops: Vec<LoopContext>, // innermost last
    strings: Vec<String>,
    diags: Diagnostics,
}

impl<'a> CodeGen<'a> {
    fn new(symbols: &'a SymbolTable) -> Self {
        CodeGen {
            symbols,
            output: Vec::new(),
            if_counter: 0,
            loops: Vec::new(),
            strings: Vec::new(),
            diags: Diagnostics::new(),
        }
    }

    fn inst(&mut self, line: impl AsRef<str>) {
        self.output.push(format!("    {}", line.as_ref()));
    }

    fn label(&mut self, name: impl AsRef<str>) {
        self.output.push(format!("{}:", name.as_ref()));
    }

    fn fresh_if(&mut self) -> usize {
        let id = self.if_counter;
        self.if_counter += 1;
        id
    }

    fn intern(&mut self, text: &str) -> String {
        self.strings.push(text.to_string());
        runtime::string_label(self.strings.len() - 1)
    }

    /// Look up a variable. A miss here means analysis let something through.
    fn var(&mut self, var: &VarRef) -> Option<&'a Variable> {
        let symbols = self.symbols;
        let found = symbols.get(&var.name);
        if found.is_none() {
            self.diags
                .error(Error::UnresolvedSymbol(var.name.clone()), var.pos);
        }
        found
    }
}
