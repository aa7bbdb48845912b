use super::constexpr;
use super::symbols::{Storage, SymbolTable};
use crate::error::{Diagnostics, Error};
use crate::grammer::ast::{
    Expr, Instr, InstrKind, LoopKind, Output, Program, Rel, Term, TermKind, VarDecl, VarRef,
};

/// Declaration and reference resolution
pub struct Resolver {
    symbols: SymbolTable,
    diags: Diagnostics,
    loop_depth: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            diags: Diagnostics::new(),
            loop_depth: 0,
        }
    }

    pub fn run(mut self, program: &Program) -> (SymbolTable, Diagnostics) {
        self.instrs(&program.instrs);
        (self.symbols, self.diags)
    }
}

// ------------------------------------------------------------------------
// Instructions
// ------------------------------------------------------------------------

impl Resolver {
    fn instrs(&mut self, instrs: &[Instr]) {
        for instr in instrs {
            self.instr(instr);
        }
    }

    fn instr(&mut self, instr: &Instr) {
        match &instr.kind {
            InstrKind::Declare(decl) => self.declare(decl, Storage::Scalar),

            // The value is resolved before the name exists
            InstrKind::Initialize(decl, value) => {
                self.expr(value);
                self.declare(decl, Storage::Scalar);
            }

            InstrKind::DeclareArray(decl, size) => self.declare_array(decl, size, 0),

            InstrKind::InitializeArray(decl, size, elements) => {
                for element in elements {
                    self.expr(element);
                }
                self.declare_array(decl, size, elements.len());
            }

            InstrKind::Assign(place, value) => {
                self.var(place.var());
                self.expr(value);
            }

            InstrKind::AssignToArraySubscript(var, index, value) => {
                self.var(var);
                self.expr(index);
                self.expr(value);
            }

            InstrKind::If(rel, body) => {
                self.rel(rel);
                self.instrs(body.instrs());
            }

            InstrKind::Fasm(_, Some(var)) => self.var(var),

            InstrKind::Loop(lp) => {
                if let LoopKind::While(rel) = &lp.kind {
                    self.rel(rel);
                }
                self.loop_depth += 1;
                self.instrs(&lp.body);
                self.loop_depth -= 1;
                if let LoopKind::DoWhile(rel) = &lp.kind {
                    self.rel(rel);
                }
            }

            InstrKind::LoopBreak if self.loop_depth == 0 => {
                self.diags.error(Error::OutsideLoop("break"), instr.pos);
            }

            InstrKind::LoopContinue if self.loop_depth == 0 => {
                self.diags.error(Error::OutsideLoop("continue"), instr.pos);
            }

            InstrKind::Output(Output::Expr(expr)) => self.expr(expr),

            InstrKind::Goto(_)
            | InstrKind::Label(_)
            | InstrKind::FasmDefine(_)
            | InstrKind::Fasm(_, None)
            | InstrKind::LoopBreak
            | InstrKind::LoopContinue
            | InstrKind::Output(Output::Text(_)) => {}
        }
    }

    fn declare(&mut self, decl: &VarDecl, storage: Storage) {
        if let Some(first) = self.symbols.get(&decl.name) {
            let first = first.pos;
            self.diags
                .warn(Error::Redeclaration(decl.name.clone()), decl.pos);
            self.diags.note(Error::DeclaredHere, first);
            return;
        }
        if self.symbols.declare(decl, storage).is_none() {
            self.diags.error(Error::ArraySizeOverflow, decl.pos);
        }
    }

    fn declare_array(&mut self, decl: &VarDecl, size: &Expr, initializers: usize) {
        let len = match constexpr::eval(size) {
            Ok(len) if len > 0 => len as usize,
            Ok(len) => {
                self.diags.error(Error::NonPositiveArraySize(len), size.pos());
                1
            }
            Err(e) => {
                self.diags.error(e, size.pos());
                1
            }
        };
        if initializers > len {
            self.diags.error(
                Error::TooManyInitializers(decl.name.clone(), initializers, len),
                decl.pos,
            );
        }
        // A bad size still declares the name so later uses resolve
        self.declare(decl, Storage::Array(len));
    }
}

// ------------------------------------------------------------------------
// References
// ------------------------------------------------------------------------

impl Resolver {
    fn var(&mut self, var: &VarRef) {
        if !self.symbols.contains(&var.name) {
            self.diags
                .error(Error::UndeclaredVariable(var.name.clone()), var.pos);
        }
    }

    fn rel(&mut self, rel: &Rel) {
        self.term(&rel.lhs);
        self.term(&rel.rhs);
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Term(term) => self.term(term),
            Expr::Binary(_, lhs, rhs, _) => {
                self.expr(lhs);
                self.expr(rhs);
            }
        }
    }

    fn term(&mut self, term: &Term) {
        match &term.kind {
            TermKind::Ident(var) | TermKind::Deref(var) | TermKind::AddressOf(var) => {
                self.var(var)
            }
            TermKind::ArrayAccess(var, index) => {
                self.var(var);
                self.expr(index);
            }
            TermKind::ArrayLiteral(elements) => {
                for element in elements {
                    self.expr(element);
                }
            }
            TermKind::Input | TermKind::Int(_) | TermKind::Char(_) => {}
        }
    }
}
