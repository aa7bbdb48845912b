use super::CodeGen;
use crate::error::Error;
use crate::grammer::ast::{BinaryOp, Expr, Rel, RelOp, Term, TermKind};

// Expressions evaluate into rax. Intermediate values live on the machine stack.

impl<'a> CodeGen<'a> {
    pub(super) fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Term(term) => self.term(term),
            Expr::Binary(op, lhs, rhs, _) => {
                self.expr(lhs);
                self.inst("push rax");
                self.expr(rhs);
                match op {
                    BinaryOp::Add => {
                        self.inst("pop rdx");
                        self.inst("add rax, rdx");
                    }
                    BinaryOp::Sub => {
                        self.inst("mov rdx, rax");
                        self.inst("pop rax");
                        self.inst("sub rax, rdx");
                    }
                    BinaryOp::Mul => {
                        self.inst("pop rdx");
                        self.inst("imul rax, rdx");
                    }
                    BinaryOp::Div | BinaryOp::Mod => {
                        self.inst("mov rcx, rax");
                        self.inst("pop rax");
                        self.inst("cqo");
                        self.inst("idiv rcx");
                        if *op == BinaryOp::Mod {
                            self.inst("mov rax, rdx");
                        }
                    }
                }
            }
        }
    }

    pub(super) fn term(&mut self, term: &Term) {
        match &term.kind {
            TermKind::Int(n) => self.inst(format!("mov rax, {n}")),
            TermKind::Char(c) => self.inst(format!("mov rax, {}", *c as u32)),
            TermKind::Input => self.inst("call read_int"),

            // An array name alone is its address
            TermKind::Ident(var) => {
                if let Some(v) = self.var(var) {
                    if v.is_array() {
                        self.inst(format!("lea rax, [rbp - {}]", v.stack_offset));
                    } else {
                        self.inst(format!("mov rax, qword [rbp - {}]", v.stack_offset));
                    }
                }
            }

            TermKind::Deref(var) => {
                if let Some(v) = self.var(var) {
                    self.inst(format!("mov rcx, qword [rbp - {}]", v.stack_offset));
                    self.inst("mov rax, qword [rcx]");
                }
            }

            TermKind::AddressOf(var) => {
                if let Some(v) = self.var(var) {
                    self.inst(format!("lea rax, [rbp - {}]", v.stack_offset));
                }
            }

            TermKind::ArrayAccess(var, index) => {
                self.expr(index);
                if let Some(v) = self.var(var) {
                    self.inst(format!("lea rdx, [rbp - {}]", v.stack_offset));
                    self.inst("movsxd rax, dword [rdx + rax*4]");
                }
            }

            TermKind::ArrayLiteral(_) => {
                self.diags.error(Error::ArrayLiteralInExpr, term.pos);
            }
        }
    }

    /// Leaves 1 or 0 in rax
    pub(super) fn rel(&mut self, rel: &Rel) {
        self.term(&rel.lhs);
        self.inst("push rax");
        self.term(&rel.rhs);
        self.inst("pop rdx");
        self.inst("cmp rdx, rax");
        let set = match rel.op {
            RelOp::Eq => "sete",
            RelOp::Ne => "setne",
            RelOp::Lt => "setl",
            RelOp::Le => "setle",
            RelOp::Gt => "setg",
            RelOp::Ge => "setge",
        };
        self.inst(format!("{set} al"));
        self.inst("movzx rax, al");
    }
}
