use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwGoto,       // "goto"
    KwIf,         // "if"
    KwThen,       // "then"
    KwInt,        // "int"
    KwChar,       // "char"
    KwFasmDefine, // "fasm_define"
    KwFasm,       // "fasm"
    KwLoop,       // "loop"
    KwContinue,   // "continue"
    KwBreak,      // "break"
    KwInput,      // "input"
    KwOutput,     // "output"

    // Directive, consumed by the lexer
    Include, // "-include"

    // Literals
    Ident(String),     // name
    Label(String),     // ":name"
    Int(i64),          // 42
    Char(char),        // 'a'
    Str(String),       // "text"
    Pointer(String),   // "*name"
    AddressOf(String), // "&name"

    // Brackets
    LParen,   // '('
    RParen,   // ')'
    LCurly,   // '{'
    RCurly,   // '}'
    LBracket, // '['
    RBracket, // ']'

    // Delimiters
    Comma, // ','

    // Arithmetic operators
    Equal,   // '='
    Plus,    // '+'
    Minus,   // '-'
    Star,    // '*'
    Slash,   // '/'
    Percent, // '%'

    // Relational operators
    EqualEqual,  // "=="
    ExclEqual,   // "!="
    LAngle,      // '<'
    LAngleEqual, // "<="
    RAngle,      // '>'
    RAngleEqual, // ">="

    // Special
    Invalid(String),
    End,
}

/// Position of a token: index into the source map and 1-based line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub file: usize,
    pub line: usize,
}

impl Pos {
    pub fn new(file: usize, line: usize) -> Self {
        Pos { file, line }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        match self {
            KwGoto => write!(f, "`goto`"),
            KwIf => write!(f, "`if`"),
            KwThen => write!(f, "`then`"),
            KwInt => write!(f, "`int`"),
            KwChar => write!(f, "`char`"),
            KwFasmDefine => write!(f, "`fasm_define`"),
            KwFasm => write!(f, "`fasm`"),
            KwLoop => write!(f, "`loop`"),
            KwContinue => write!(f, "`continue`"),
            KwBreak => write!(f, "`break`"),
            KwInput => write!(f, "`input`"),
            KwOutput => write!(f, "`output`"),
            Include => write!(f, "`-include`"),
            Ident(name) => write!(f, "identifier `{name}`"),
            Label(name) => write!(f, "label `:{name}`"),
            Int(n) => write!(f, "int `{n}`"),
            Char(c) => write!(f, "char {c:?}"),
            Str(s) => write!(f, "string {s:?}"),
            Pointer(name) => write!(f, "pointer `*{name}`"),
            AddressOf(name) => write!(f, "address `&{name}`"),
            LParen => write!(f, "`(`"),
            RParen => write!(f, "`)`"),
            LCurly => write!(f, "`{{`"),
            RCurly => write!(f, "`}}`"),
            LBracket => write!(f, "`[`"),
            RBracket => write!(f, "`]`"),
            Comma => write!(f, "`,`"),
            Equal => write!(f, "`=`"),
            Plus => write!(f, "`+`"),
            Minus => write!(f, "`-`"),
            Star => write!(f, "`*`"),
            Slash => write!(f, "`/`"),
            Percent => write!(f, "`%`"),
            EqualEqual => write!(f, "`==`"),
            ExclEqual => write!(f, "`!=`"),
            LAngle => write!(f, "`<`"),
            LAngleEqual => write!(f, "`<=`"),
            RAngle => write!(f, "`>`"),
            RAngleEqual => write!(f, "`>=`"),
            Invalid(s) => write!(f, "invalid `{s}`"),
            End => write!(f, "end of file"),
        }
    }
}
