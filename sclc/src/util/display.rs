use crate::check::{Storage, SymbolTable};
use crate::error::Sources;
use crate::grammer::ast::{
    BinaryOp, Expr, Instr, InstrKind, LoopKind, Output, Place, Program, Rel, RelOp, Term,
    TermKind,
};
use crate::grammer::token::Token;
use color_print::cprintln;
use itertools::Itertools;

pub fn print_tokens(tokens: &[Token], sources: &Sources) {
    println!("+-[Tokens]-------------------------------------------------------------------");
    for (file, group) in &tokens.iter().chunk_by(|t| t.pos.file) {
        let name = sources.get_index(file).map(|(n, _)| n.as_str()).unwrap_or("?");
        cprintln!("| <underline>{}</>", name);
        for (line, tokens) in &group.chunk_by(|t| t.pos.line) {
            let text = tokens.map(|t| t.kind.to_string()).join(" ");
            cprintln!("| <blue>{:>4}</> {}", line, text);
        }
    }
    println!("+----------------------------------------------------------------------------");
}

pub fn print_program(program: &Program) {
    println!("+-[AST]----------------------------------------------------------------------");
    for instr in &program.instrs {
        print_instr(instr, 0);
    }
    println!("+----------------------------------------------------------------------------");
}

pub fn print_symbols(symbols: &SymbolTable) {
    println!("+-[Symbols]------------------------------------------------------------------");
    for var in symbols.iter() {
        let storage = match var.storage {
            Storage::Scalar => String::new(),
            Storage::Array(len) => format!("[{len}]"),
        };
        cprintln!(
            "| <green>{}</>{} : {} @ [rbp - {}]",
            var.name,
            storage,
            var.ty,
            var.stack_offset
        );
    }
    for (label, pos) in symbols.labels() {
        cprintln!("| <m>:{}</> line {}", label, pos.line);
    }
    cprintln!("| frame {} bytes", symbols.frame_size());
    println!("+----------------------------------------------------------------------------");
}

fn print_instr(instr: &Instr, depth: usize) {
    let indent = "  ".repeat(depth);
    match &instr.kind {
        InstrKind::Declare(decl) => {
            cprintln!("| {}<b>{}</> {}", indent, decl.ty, decl.name)
        }
        InstrKind::Initialize(decl, value) => {
            cprintln!("| {}<b>{}</> {} = {}", indent, decl.ty, decl.name, fmt_expr(value))
        }
        InstrKind::DeclareArray(decl, size) => {
            cprintln!("| {}<b>{}</> {}[{}]", indent, decl.ty, decl.name, fmt_expr(size))
        }
        InstrKind::InitializeArray(decl, size, elements) => cprintln!(
            "| {}<b>{}</> {}[{}] = {{{}}}",
            indent,
            decl.ty,
            decl.name,
            fmt_expr(size),
            elements.iter().map(fmt_expr).join(", ")
        ),
        InstrKind::Assign(place, value) => {
            let target = match place {
                Place::Var(var) => var.name.clone(),
                Place::Deref(var) => format!("*{}", var.name),
            };
            cprintln!("| {}{} = {}", indent, target, fmt_expr(value))
        }
        InstrKind::AssignToArraySubscript(var, index, value) => cprintln!(
            "| {}{}[{}] = {}",
            indent,
            var.name,
            fmt_expr(index),
            fmt_expr(value)
        ),
        InstrKind::If(rel, body) => {
            cprintln!("| {}<b>if</> {} <b>then</>", indent, fmt_rel(rel));
            for instr in body.instrs() {
                print_instr(instr, depth + 1);
            }
        }
        InstrKind::Goto(label) => cprintln!("| {}<b>goto</> <m>:{}</>", indent, label),
        InstrKind::Label(label) => cprintln!("| {}<m>:{}</>", indent, label),
        InstrKind::FasmDefine(content) => {
            cprintln!("| {}<b>fasm_define</> {:?}", indent, content)
        }
        InstrKind::Fasm(content, arg) => match arg {
            Some(var) => cprintln!("| {}<b>fasm</> {:?}, {}", indent, content, var.name),
            None => cprintln!("| {}<b>fasm</> {:?}", indent, content),
        },
        InstrKind::Loop(lp) => {
            let head = match &lp.kind {
                LoopKind::Unconditional => String::new(),
                LoopKind::While(rel) => format!(" while {}", fmt_rel(rel)),
                LoopKind::DoWhile(rel) => format!(" do-while {}", fmt_rel(rel)),
            };
            cprintln!("| {}<b>loop</> #{}{}", indent, lp.id, head);
            for instr in &lp.body {
                print_instr(instr, depth + 1);
            }
        }
        InstrKind::LoopBreak => cprintln!("| {}<b>break</>", indent),
        InstrKind::LoopContinue => cprintln!("| {}<b>continue</>", indent),
        InstrKind::Output(Output::Expr(expr)) => {
            cprintln!("| {}<b>output</> {}", indent, fmt_expr(expr))
        }
        InstrKind::Output(Output::Text(text)) => {
            cprintln!("| {}<b>output</> {:?}", indent, text)
        }
    }
}

fn fmt_rel(rel: &Rel) -> String {
    let op = match rel.op {
        RelOp::Eq => "==",
        RelOp::Ne => "!=",
        RelOp::Lt => "<",
        RelOp::Le => "<=",
        RelOp::Gt => ">",
        RelOp::Ge => ">=",
    };
    format!("{} {} {}", fmt_term(&rel.lhs), op, fmt_term(&rel.rhs))
}

/// Fully parenthesized
pub fn fmt_expr(expr: &Expr) -> String {
    match expr {
        Expr::Term(term) => fmt_term(term),
        Expr::Binary(op, lhs, rhs, _) => {
            let op = match op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::Div => "/",
                BinaryOp::Mod => "%",
            };
            format!("({} {} {})", fmt_expr(lhs), op, fmt_expr(rhs))
        }
    }
}

fn fmt_term(term: &Term) -> String {
    match &term.kind {
        TermKind::Input => "input".to_string(),
        TermKind::Int(n) => n.to_string(),
        TermKind::Char(c) => format!("{c:?}"),
        TermKind::Ident(var) => var.name.clone(),
        TermKind::Deref(var) => format!("*{}", var.name),
        TermKind::AddressOf(var) => format!("&{}", var.name),
        TermKind::ArrayAccess(var, index) => format!("{}[{}]", var.name, fmt_expr(index)),
        TermKind::ArrayLiteral(elements) => {
            format!("{{{}}}", elements.iter().map(fmt_expr).join(", "))
        }
    }
}
