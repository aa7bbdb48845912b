use super::symbols::SymbolTable;
use crate::error::{Diagnostics, Error};
use crate::grammer::ast::{
    Expr, Instr, InstrKind, LoopKind, Output, Place, Rel, Term, TermKind, Type, VarRef,
};

pub struct TypeChecker<'a> {
    symbols: &'a SymbolTable,
    diags: Diagnostics,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            diags: Diagnostics::new(),
        }
    }

    pub fn run(mut self, instrs: &[Instr]) -> Diagnostics {
        self.instrs(instrs);
        self.diags
    }
}

// ------------------------------------------------------------------------
// Instructions
// ------------------------------------------------------------------------

impl<'a> TypeChecker<'a> {
    fn instrs(&mut self, instrs: &[Instr]) {
        for instr in instrs {
            self.instr(instr);
        }
    }

    fn instr(&mut self, instr: &Instr) {
        match &instr.kind {
            InstrKind::Initialize(decl, value) => {
                let target = self.type_of_name(&decl.name);
                let actual = self.expr(value);
                if !assignable(target, actual) {
                    self.diags.error(
                        Error::InitializeMismatch(
                            decl.name.clone(),
                            actual.to_string(),
                            target.to_string(),
                        ),
                        value.pos(),
                    );
                }
            }

            InstrKind::InitializeArray(decl, _, elements) => {
                let target = self.type_of_name(&decl.name);
                for (idx, element) in elements.iter().enumerate() {
                    let actual = self.expr(element);
                    if !assignable(target, actual) {
                        self.diags.error(
                            Error::ArrayElementMismatch(
                                idx,
                                actual.to_string(),
                                target.to_string(),
                            ),
                            element.pos(),
                        );
                    }
                }
            }

            InstrKind::Assign(place, value) => {
                match place {
                    Place::Var(var) => self.scalar(var),
                    Place::Deref(var) => self.pointer(var),
                }
                let var = place.var();
                let target = self.type_of_name(&var.name);
                let actual = self.expr(value);
                if !assignable(target, actual) {
                    self.diags.error(
                        Error::AssignMismatch(
                            var.name.clone(),
                            actual.to_string(),
                            target.to_string(),
                        ),
                        instr.pos,
                    );
                }
            }

            InstrKind::AssignToArraySubscript(var, index, value) => {
                self.array(var);
                self.index(index);
                let target = self.type_of_name(&var.name);
                let actual = self.expr(value);
                if !assignable(target, actual) {
                    self.diags.error(
                        Error::ArrayAssignMismatch(
                            var.name.clone(),
                            actual.to_string(),
                            target.to_string(),
                        ),
                        instr.pos,
                    );
                }
            }

            InstrKind::If(rel, body) => {
                self.rel(rel);
                self.instrs(body.instrs());
            }

            InstrKind::Loop(lp) => {
                if let LoopKind::While(rel) | LoopKind::DoWhile(rel) = &lp.kind {
                    self.rel(rel);
                }
                self.instrs(&lp.body);
            }

            InstrKind::Output(Output::Expr(expr)) => {
                self.expr(expr);
            }

            InstrKind::Declare(_)
            | InstrKind::DeclareArray(_, _)
            | InstrKind::Goto(_)
            | InstrKind::Label(_)
            | InstrKind::FasmDefine(_)
            | InstrKind::Fasm(_, _)
            | InstrKind::LoopBreak
            | InstrKind::LoopContinue
            | InstrKind::Output(Output::Text(_)) => {}
        }
    }

    fn rel(&mut self, rel: &Rel) {
        let lhs = self.term(&rel.lhs);
        let rhs = self.term(&rel.rhs);
        if lhs != rhs {
            self.diags.error(
                Error::ConditionMismatch(lhs.to_string(), rhs.to_string()),
                rel.pos,
            );
        }
    }
}

// ------------------------------------------------------------------------
// Expressions
// ------------------------------------------------------------------------

impl<'a> TypeChecker<'a> {
    /// Type of an expression. Mismatched operands are reported and the left type wins.
    fn expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Term(term) => self.term(term),
            Expr::Binary(_, lhs, rhs, pos) => {
                let lt = self.expr(lhs);
                let rt = self.expr(rhs);
                if lt != rt {
                    self.diags.error(
                        Error::ArithmeticMismatch(lt.to_string(), rt.to_string()),
                        *pos,
                    );
                }
                lt
            }
        }
    }

    fn term(&mut self, term: &Term) -> Type {
        match &term.kind {
            TermKind::Input | TermKind::Int(_) => Type::Int,
            TermKind::Char(_) => Type::Char,
            TermKind::Deref(var) => {
                self.pointer(var);
                self.type_of_name(&var.name)
            }
            TermKind::Ident(var) | TermKind::AddressOf(var) => self.type_of_name(&var.name),
            TermKind::ArrayAccess(var, index) => {
                self.array(var);
                self.index(index);
                self.type_of_name(&var.name)
            }
            TermKind::ArrayLiteral(_) => {
                self.diags.error(Error::ArrayLiteralInExpr, term.pos);
                Type::Void
            }
        }
    }

    fn index(&mut self, index: &Expr) {
        let ty = self.expr(index);
        if ty != Type::Int {
            self.diags
                .error(Error::IndexNotInt(ty.to_string()), index.pos());
        }
    }

    fn array(&mut self, var: &VarRef) {
        if let Some(v) = self.symbols.get(&var.name) {
            if !v.is_array() {
                self.diags.error(Error::NotAnArray(var.name.clone()), var.pos);
            }
        }
    }

    fn scalar(&mut self, var: &VarRef) {
        if let Some(v) = self.symbols.get(&var.name) {
            if v.is_array() {
                self.diags.error(Error::NotAScalar(var.name.clone()), var.pos);
            }
        }
    }

    fn pointer(&mut self, var: &VarRef) {
        if let Some(v) = self.symbols.get(&var.name) {
            if v.ty != Type::Pointer {
                self.diags.error(Error::NotAPointer(var.name.clone()), var.pos);
            }
        }
    }

    fn type_of_name(&self, name: &str) -> Type {
        self.symbols.get(name).map(|v| v.ty).unwrap_or(Type::Void)
    }
}

/// Type of an expression without reporting anything
pub fn type_of(expr: &Expr, symbols: &SymbolTable) -> Type {
    TypeChecker::new(symbols).expr(expr)
}

/// Pointer targets accept any value
fn assignable(target: Type, actual: Type) -> bool {
    target == Type::Pointer || target == actual
}
