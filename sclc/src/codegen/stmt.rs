use super::{CodeGen, LoopContext, Resume};
use crate::check::{self, Storage, ELEM_SIZE};
use crate::error::Error;
use crate::grammer::ast::{Instr, InstrKind, Loop, LoopKind, Output, Place, Type};

impl<'a> CodeGen<'a> {
    pub(super) fn instrs(&mut self, instrs: &[Instr]) {
        for instr in instrs {
            self.instr(instr);
        }
    }

    fn instr(&mut self, instr: &Instr) {
        match &instr.kind {
            // Storage is reserved by the frame
            InstrKind::Declare(_) | InstrKind::DeclareArray(_, _) => {}

            // Emitted ahead of main
            InstrKind::FasmDefine(_) => {}

            InstrKind::Initialize(decl, value) => {
                self.expr(value);
                let symbols = self.symbols;
                if let Some(v) = symbols.get(&decl.name) {
                    self.inst(format!("mov qword [rbp - {}], rax", v.stack_offset));
                }
            }

            InstrKind::InitializeArray(decl, _, elements) => {
                let symbols = self.symbols;
                let Some(v) = symbols.get(&decl.name) else {
                    return;
                };
                let len = match v.storage {
                    Storage::Array(len) => len,
                    Storage::Scalar => 0,
                };
                for (idx, element) in elements.iter().take(len).enumerate() {
                    self.expr(element);
                    let disp = v.stack_offset - idx * ELEM_SIZE;
                    self.inst(format!("mov dword [rbp - {disp}], eax"));
                }
            }

            InstrKind::Assign(Place::Var(var), value) => {
                self.expr(value);
                if let Some(v) = self.var(var) {
                    self.inst(format!("mov qword [rbp - {}], rax", v.stack_offset));
                }
            }

            InstrKind::Assign(Place::Deref(var), value) => {
                self.expr(value);
                if let Some(v) = self.var(var) {
                    self.inst(format!("mov rcx, qword [rbp - {}]", v.stack_offset));
                    self.inst("mov qword [rcx], rax");
                }
            }

            InstrKind::AssignToArraySubscript(var, index, value) => {
                self.expr(value);
                self.inst("push rax");
                self.expr(index);
                self.inst("mov rcx, rax");
                if let Some(v) = self.var(var) {
                    self.inst(format!("lea rdx, [rbp - {}]", v.stack_offset));
                }
                self.inst("pop rax");
                self.inst("mov dword [rdx + rcx*4], eax");
            }

            InstrKind::If(rel, body) => {
                self.rel(rel);
                let id = self.fresh_if();
                self.inst("test rax, rax");
                self.inst(format!("jz .endif{id}"));
                self.instrs(body.instrs());
                self.label(format!(".endif{id}"));
            }

            InstrKind::Goto(label) => self.inst(format!("jmp {}", user_label(label))),
            InstrKind::Label(label) => self.label(user_label(label)),

            InstrKind::Fasm(content, None) => self.inst(content),
            InstrKind::Fasm(content, Some(var)) => {
                if let Some(v) = self.var(var) {
                    let line = content.replacen("%d", &v.stack_offset.to_string(), 1);
                    self.inst(line);
                }
            }

            InstrKind::Loop(lp) => self.emit_loop(lp),

            InstrKind::LoopBreak => match self.loops.last() {
                Some(ctx) => {
                    let id = ctx.id;
                    self.inst(format!("jmp .loop_{id}_end"));
                }
                None => self.diags.error(Error::OutsideLoop("break"), instr.pos),
            },

            InstrKind::LoopContinue => match self.loops.last().copied() {
                Some(LoopContext {
                    id,
                    resume: Resume::Start,
                }) => self.inst(format!("jmp .loop_{id}_start")),
                Some(LoopContext {
                    id,
                    resume: Resume::Test,
                }) => self.inst(format!("jmp .loop_{id}_test")),
                None => self.diags.error(Error::OutsideLoop("continue"), instr.pos),
            },

            InstrKind::Output(Output::Expr(expr)) => {
                self.expr(expr);
                match check::type_of(expr, self.symbols) {
                    Type::Char => self.inst("call print_char"),
                    _ => self.inst("call print_int"),
                }
            }

            InstrKind::Output(Output::Text(text)) => {
                let label = self.intern(text);
                self.inst(format!("mov rsi, {label}"));
                self.inst("call print_str");
            }
        }
    }

    fn emit_loop(&mut self, lp: &Loop) {
        let id = lp.id;
        let resume = match lp.kind {
            LoopKind::Unconditional => Resume::Start,
            LoopKind::While(_) | LoopKind::DoWhile(_) => Resume::Test,
        };
        self.loops.push(LoopContext { id, resume });

        match &lp.kind {
            LoopKind::Unconditional => {
                self.label(format!(".loop_{id}_start"));
                self.instrs(&lp.body);
                self.inst(format!("jmp .loop_{id}_start"));
                self.label(format!(".loop_{id}_end"));
            }
            LoopKind::While(rel) | LoopKind::DoWhile(rel) => {
                if let LoopKind::While(_) = lp.kind {
                    self.inst(format!("jmp .loop_{id}_test"));
                }
                self.label(format!(".loop_{id}_start"));
                self.instrs(&lp.body);
                self.label(format!(".loop_{id}_test"));
                self.rel(rel);
                self.inst("test rax, rax");
                self.inst(format!("jz .loop_{id}_end"));
                self.inst(format!("jmp .loop_{id}_start"));
                self.label(format!(".loop_{id}_end"));
            }
        }

        self.loops.pop();
    }
}

/// User labels get their own prefix so they never meet `.endifN` or `.loop_N_*`
fn user_label(name: &str) -> String {
    format!(".L_{name}")
}
