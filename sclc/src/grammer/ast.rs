use super::token::Pos;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Program {
    pub loop_counter: usize,
    pub instrs: Vec<Instr>, // { instr }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,     // "int"
    Char,    // "char"
    Pointer, // "int" *ident | "char" *ident
    Void,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Char => write!(f, "char"),
            Type::Pointer => write!(f, "pointer"),
            Type::Void => write!(f, "void"),
        }
    }
}

/// Declared variable: ("int" | "char") ( ident | *ident )
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: Type,
    pub name: String,
    pub pos: Pos,
}

/// Use of a variable by name
#[derive(Debug, Clone, PartialEq)]
pub struct VarRef {
    pub name: String,
    pub pos: Pos,
}

impl VarRef {
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        VarRef {
            name: name.into(),
            pos,
        }
    }
}

/// Assignment target
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    Var(VarRef),   // ident
    Deref(VarRef), // *ident
}

impl Place {
    pub fn var(&self) -> &VarRef {
        match self {
            Place::Var(var) | Place::Deref(var) => var,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub kind: TermKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    Input,                            // "input"
    Int(i64),                         // int
    Char(char),                       // char
    Ident(VarRef),                    // ident
    Deref(VarRef),                    // *ident
    AddressOf(VarRef),                // &ident
    ArrayAccess(VarRef, Box<Expr>),   // ident "[" expr "]"
    ArrayLiteral(Vec<Expr>),          // "{" [ expr { "," expr } ] "}"
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Term(Term),
    Binary(BinaryOp, Box<Expr>, Box<Expr>, Pos), // expr (binop) expr
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Term(term) => term.pos,
            Expr::Binary(_, _, _, pos) => *pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, // "+"
    Sub, // "-"
    Mul, // "*"
    Div, // "/"
    Mod, // "%"
}

/// rterm relop rterm
#[derive(Debug, Clone, PartialEq)]
pub struct Rel {
    pub op: RelOp,
    pub lhs: Term,
    pub rhs: Term,
    pub pos: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq, // "=="
    Ne, // "!="
    Lt, // "<"
    Le, // "<="
    Gt, // ">"
    Ge, // ">="
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instr {
    pub kind: InstrKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstrKind {
    Declare(VarDecl),                             // type name
    Initialize(VarDecl, Expr),                    // type name "=" expr
    DeclareArray(VarDecl, Expr),                  // type name "[" expr "]"
    InitializeArray(VarDecl, Expr, Vec<Expr>),    // type name "[" expr "]" "=" "{" .. "}"
    Assign(Place, Expr),                          // place "=" expr
    AssignToArraySubscript(VarRef, Expr, Expr),   // ident "[" expr "]" "=" expr
    If(Rel, IfBody),                              // "if" rel "then" body
    Goto(String),                                 // "goto" :label
    Label(String),                                // :label
    FasmDefine(String),                           // "fasm_define" string
    Fasm(String, Option<VarRef>),                 // "fasm" string [ "," ident ]
    Loop(Loop),                                   // "loop" ..
    LoopBreak,                                    // "break"
    LoopContinue,                                 // "continue"
    Output(Output),                               // "output" ( string | expr )
}

#[derive(Debug, Clone, PartialEq)]
pub enum IfBody {
    Single(Box<Instr>), // instr
    Block(Vec<Instr>),  // "{" { instr } "}"
}

impl IfBody {
    pub fn instrs(&self) -> &[Instr] {
        match self {
            IfBody::Single(instr) => std::slice::from_ref(instr.as_ref()),
            IfBody::Block(instrs) => instrs,
        }
    }
}

/// Visit every instruction, including those nested in if and loop bodies
pub fn walk<'a, F: FnMut(&'a Instr)>(instrs: &'a [Instr], f: &mut F) {
    for instr in instrs {
        f(instr);
        match &instr.kind {
            InstrKind::If(_, body) => walk(body.instrs(), f),
            InstrKind::Loop(lp) => walk(&lp.body, f),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub id: usize,
    pub kind: LoopKind,
    pub body: Vec<Instr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopKind {
    Unconditional, // "loop" "{" .. "}"
    While(Rel),    // "loop" rel "{" .. "}"
    DoWhile(Rel),  // "loop" "{" .. "}" rel
}

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Expr(Expr),   // expr
    Text(String), // string
}
