use crate::grammer::token::{Pos, TokenKind};
use color_print::ceprintln;
use indexmap::IndexMap;
use std::path::PathBuf;
use thiserror::Error;

// Unified error type for sclc
#[derive(Debug, Error)]
pub enum Error {
    // Lex errors
    #[error("Invalid character: `{0}`")]
    InvalidCharacter(String),

    #[error("Invalid escape sequence: `\\{0}`")]
    InvalidEscape(char),

    #[error("Unterminated character literal")]
    UnterminatedChar,

    #[error("Unterminated string literal")]
    UnterminatedString,

    #[error("Unterminated block comment")]
    UnterminatedComment,

    #[error("Integer literal out of range: {0}")]
    IntegerOverflow(String),

    #[error("Expected a file name after -include, found {0}")]
    IncludeWithoutPath(TokenKind),

    #[error("Recursive include of {0}")]
    RecursiveInclude(String),

    #[error("Failed to include {0}")]
    IncludeRead(String, #[source] std::io::Error),

    // Parse errors
    #[error("Unexpected token: {0}")]
    UnexpectedToken(TokenKind),

    #[error("Unexpected end of file")]
    UnexpectedEOF,

    #[error("Expected {0}, found {1}")]
    Expected(&'static str, TokenKind),

    #[error("Expected a term (int, char, input, identifier, *pointer, &address), found {0}")]
    ExpectedTerm(TokenKind),

    #[error("Expected a relation (==, !=, <, <=, >, >=), found {0}")]
    ExpectedRelation(TokenKind),

    #[error("Array initializer must be an array literal")]
    ArrayInitializer,

    #[error("Nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    // Semantic errors
    #[error("Use of undeclared variable: {0}")]
    UndeclaredVariable(String),

    #[error("Use of undeclared label: {0}")]
    UndeclaredLabel(String),

    #[error("Duplicate label declaration: {0}")]
    DuplicateLabel(String),

    #[error("Redeclaration of `{0}` is ignored")]
    Redeclaration(String),

    #[error("First declared here")]
    DeclaredHere,

    #[error("Type mismatch in arithmetic expression: {0} vs {1}")]
    ArithmeticMismatch(String, String),

    #[error("Type mismatch in conditional statement: {0} vs {1}")]
    ConditionMismatch(String, String),

    #[error("Type mismatch in initialization to {0} - {1} to {2}")]
    InitializeMismatch(String, String, String),

    #[error("Type mismatch in assignment to {0} - {1} to {2}")]
    AssignMismatch(String, String, String),

    #[error("Type mismatch in array assignment to {0} - {1} to {2}")]
    ArrayAssignMismatch(String, String, String),

    #[error("Type mismatch in array initialization - element {0} is {1} but array is {2}")]
    ArrayElementMismatch(usize, String, String),

    #[error("Array index must be of type int, got {0}")]
    IndexNotInt(String),

    #[error("`{0}` is not an array")]
    NotAnArray(String),

    #[error("`{0}` is an array and cannot be assigned as a whole")]
    NotAScalar(String),

    #[error("`{0}` is not a pointer")]
    NotAPointer(String),

    #[error("Array literal cannot be used in expressions")]
    ArrayLiteralInExpr,

    #[error("Array size must be a constant expression")]
    NonConstantArraySize,

    #[error("Division by zero in array size")]
    DivisionByZero,

    #[error("Modulo by zero in array size")]
    ModuloByZero,

    #[error("Arithmetic overflow in array size")]
    ArraySizeOverflow,

    #[error("Array size must be positive, got {0}")]
    NonPositiveArraySize(i64),

    #[error("Too many initializers for {0}: {1} elements for length {2}")]
    TooManyInitializers(String, usize, usize),

    #[error("`{0}` used outside of a loop")]
    OutsideLoop(&'static str),

    // Codegen / driver errors
    #[error("Unresolved symbol: {0}")]
    UnresolvedSymbol(String),

    #[error("Failed to read file: {0}")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to run fasm")]
    AssemblerSpawn(#[source] std::io::Error),

    #[error("Assembly failed with {0}")]
    AssemblerFailed(String),

    #[error("Include directory does not exist: {0}")]
    IncludeDirMissing(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warn,
    Note,
}

#[derive(Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: Error,
    pub pos: Option<Pos>,
}

/// File name -> source lines, in the order the lexer first read them.
/// `Pos::file` indexes into this map.
pub type Sources = IndexMap<String, Vec<String>>;

/// Diagnostics collected by one compiler stage.
#[derive(Debug, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn error(&mut self, error: Error, pos: impl Into<Option<Pos>>) {
        self.push(Severity::Error, error, pos.into());
    }

    pub fn warn(&mut self, error: Error, pos: impl Into<Option<Pos>>) {
        self.push(Severity::Warn, error, pos.into());
    }

    pub fn note(&mut self, error: Error, pos: impl Into<Option<Pos>>) {
        self.push(Severity::Note, error, pos.into());
    }

    fn push(&mut self, severity: Severity, error: Error, pos: Option<Pos>) {
        self.0.push(Diagnostic {
            severity,
            error,
            pos,
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.0
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Print every diagnostic to stderr with its source line
    pub fn dump(&self, sources: &Sources) {
        for diag in &self.0 {
            diag.print(sources);
        }
    }
}

impl Diagnostic {
    pub fn print(&self, sources: &Sources) {
        match self.severity {
            Severity::Error => ceprintln!("<red,bold>error</>: {}", self.error),
            Severity::Warn => ceprintln!("<yellow,bold>warning</>: {}", self.error),
            Severity::Note => ceprintln!("<green,bold>note</>: {}", self.error),
        }

        let Some(pos) = self.pos else {
            return;
        };
        let Some((file, lines)) = sources.get_index(pos.file) else {
            return;
        };

        // line is 1-based, the stored lines are 0-based
        let line_content = pos
            .line
            .checked_sub(1)
            .and_then(|idx| lines.get(idx))
            .map(|s| s.as_str())
            .unwrap_or("");

        ceprintln!("     <blue>--></> <underline>{}:{}</>", file, pos.line);
        ceprintln!("      <blue>|</>");
        ceprintln!(" <blue>{:>4} |</> {}", pos.line, line_content);
        ceprintln!("      <blue>|</>");
    }
}
