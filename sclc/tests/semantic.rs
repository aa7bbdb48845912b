use sclc::check::{self, Storage};
use sclc::grammer::ast::Type;
use sclc::{Diagnostics, Error, Lexer, Parser, Severity, Sources, SymbolTable};

/// Resolve then type check, the way the driver does
fn analyze(code: &str) -> (SymbolTable, Diagnostics) {
    let mut sources = Sources::new();
    let (tokens, lex_diags) = Lexer::new(&mut sources, ".").tokenize("test", code);
    assert!(!lex_diags.has_errors(), "lex errors in {code:?}");
    let (program, parse_diags) = Parser::new(tokens).parse();
    assert!(!parse_diags.has_errors(), "parse errors in {code:?}");

    let (symbols, mut diags) = check::resolve(&program);
    if !diags.has_errors() {
        diags.extend(check::typecheck(&program, &symbols));
    }
    (symbols, diags)
}

fn assert(code: &str) {
    let (_, diags) = analyze(code);
    let errors: Vec<String> = diags.errors().map(|e| e.to_string()).collect();
    assert!(errors.is_empty(), "{code:?}: {errors:?}");
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
    ($name:ident, $code:expr, $expect:pat $(if $guard:expr)?) => {
        #[test]
        fn $name() {
            let (_, diags) = analyze($code);
            let errors: Vec<&Error> = diags.errors().collect();
            assert_eq!(errors.len(), 1, "{errors:?}");
            assert!(matches!(errors[0], $expect $(if $guard)?), "{errors:?}");
        }
    };
}

// ---- Well-formed ----
case!(declare_then_assign, "int x\nx = 1");
case!(initialize_from_expr, "int x = 1 + 2");
case!(char_variable, "char c = 'a'\noutput c");
case!(pointer_takes_anything, "int x\nint *p = &x\np = 'a'\n*p = 3");
case!(array_use, "int a[3] = {1, 2, 3}\nint i = 1\na[i] = a[0] + 2");
case!(input_is_int, "int x = input");
case!(labels_anywhere, "goto end\nloop { :inner break }\ngoto inner\n:end");
case!(goto_label_declared_later, "if 1 < 2 then goto skip\noutput 1\n:skip");
case!(break_in_nested_if, "loop { if 1 == 1 then break }");
case!(continue_in_do_while, "int i = 0\nloop { i = i + 1 continue } i < 3");
case!(fasm_argument, "int x\nfasm \"mov rax, [rbp - %d]\", x");
case!(constant_array_size, "int a[(2 + 3) * 4 - 18 / 3 % 4]");

// ---- Resolution ----
case!(
    undeclared_variable,
    "y = 1",
    Error::UndeclaredVariable(name) if name == "y"
);
case!(
    self_reference_in_initializer,
    "int x = x",
    Error::UndeclaredVariable(_)
);
case!(
    use_before_declaration,
    "output n\nint n",
    Error::UndeclaredVariable(_)
);
case!(
    undeclared_in_rel,
    "if q < 1 then output 1",
    Error::UndeclaredVariable(name) if name == "q"
);
case!(
    undeclared_fasm_argument,
    "fasm \"mov rax, %d\", q",
    Error::UndeclaredVariable(_)
);
case!(
    undeclared_label,
    "goto nowhere",
    Error::UndeclaredLabel(name) if name == "nowhere"
);
case!(
    undeclared_label_in_if,
    "if 1 < 2 then goto nowhere",
    Error::UndeclaredLabel(_)
);
case!(
    undeclared_label_in_loop,
    "loop { goto nowhere }",
    Error::UndeclaredLabel(_)
);
case!(
    duplicate_label,
    ":here\n:here",
    Error::DuplicateLabel(name) if name == "here"
);
case!(break_outside_loop, "break", Error::OutsideLoop("break"));
case!(
    continue_outside_loop,
    "if 1 < 2 then continue",
    Error::OutsideLoop("continue")
);

// ---- Array sizes ----
case!(
    zero_array_size,
    "int a[0]",
    Error::NonPositiveArraySize(0)
);
case!(
    negative_array_size,
    "int a[1 - 3]",
    Error::NonPositiveArraySize(-2)
);
case!(division_by_zero, "int a[1 / 0]", Error::DivisionByZero);
case!(modulo_by_zero, "int a[5 % 0]", Error::ModuloByZero);
case!(
    non_constant_size,
    "int n = 3\nint a[n]",
    Error::NonConstantArraySize
);
case!(
    size_overflow,
    "int a[9223372036854775807 * 2]",
    Error::ArraySizeOverflow
);
case!(
    too_many_initializers,
    "int a[2] = {1, 2, 3}",
    Error::TooManyInitializers(name, 3, 2) if name == "a"
);

// ---- Types ----
case!(
    initialize_mismatch,
    "int x = 'c'",
    Error::InitializeMismatch(..)
);
case!(
    assign_mismatch,
    "char c\nint x\nx = c",
    Error::AssignMismatch(..)
);
case!(
    condition_mismatch,
    "int x\nchar c\nif x < c then x = 1",
    Error::ConditionMismatch(..)
);
case!(
    arithmetic_mismatch,
    "int x = 1 + 'a'",
    Error::ArithmeticMismatch(..)
);
case!(
    array_element_mismatch,
    "char a[2] = {'a', 1}",
    Error::ArrayElementMismatch(1, ..)
);
case!(
    array_assign_mismatch,
    "int a[3]\na[0] = 'c'",
    Error::ArrayAssignMismatch(..)
);
case!(
    index_not_int,
    "int a[3]\nchar c = 'x'\nint y = a[c]",
    Error::IndexNotInt(..)
);
case!(
    not_an_array,
    "int x\nint y = x[0]",
    Error::NotAnArray(name) if name == "x"
);

case!(
    assign_to_whole_array,
    "int a[3]\na = 5",
    Error::NotAScalar(name) if name == "a"
);
case!(
    store_through_non_pointer,
    "int x\n*x = 1",
    Error::NotAPointer(name) if name == "x"
);
case!(
    load_through_non_pointer,
    "char c\noutput *c",
    Error::NotAPointer(name) if name == "c"
);
case!(element_assign_still_allowed, "int a[3]\na[1] = 5\nint *p = a\n*p = a[1]");

#[test]
fn array_literal_in_expression() {
    let (_, diags) = analyze("int x = {1}");
    assert!(diags
        .errors()
        .any(|e| matches!(e, Error::ArrayLiteralInExpr)));
}

#[test]
fn mismatch_message() {
    let (_, diags) = analyze("int x = 'c'");
    let message = diags.errors().next().map(|e| e.to_string());
    assert_eq!(
        message.as_deref(),
        Some("Type mismatch in initialization to x - char to int")
    );
}

// ---- Symbol table ----
#[test]
fn scalar_offsets() {
    let (symbols, _) = analyze("int a\nint b\nint c");
    let offsets: Vec<usize> = symbols.iter().map(|v| v.stack_offset).collect();
    assert_eq!(offsets, vec![8, 16, 24]);
    assert_eq!(symbols.frame_size(), 32);
}

#[test]
fn array_offsets() {
    let (symbols, _) = analyze("int a\nint arr[5]\nint b");
    let arr = symbols.get("arr").unwrap();
    assert_eq!(arr.storage, Storage::Array(5));
    assert_eq!(arr.stack_offset, 28);
    assert_eq!(symbols.get("a").unwrap().stack_offset, 8);
    assert_eq!(symbols.get("b").unwrap().stack_offset, 40);
    assert_eq!(symbols.frame_size(), 48);
}

#[test]
fn declared_types() {
    let (symbols, _) = analyze("int x\nchar c\nint *p\nchar s[4]");
    assert_eq!(symbols.get("x").unwrap().ty, Type::Int);
    assert_eq!(symbols.get("c").unwrap().ty, Type::Char);
    assert_eq!(symbols.get("p").unwrap().ty, Type::Pointer);
    assert_eq!(symbols.get("s").unwrap().ty, Type::Char);
}

#[test]
fn declarations_inside_bodies_are_global() {
    let (symbols, diags) = analyze("loop { int i break }\ni = 2");
    assert!(!diags.has_errors());
    assert!(symbols.contains("i"));
}

#[test]
fn redeclaration_is_a_warning() {
    let (symbols, diags) = analyze("int x\nchar x");
    assert!(!diags.has_errors());

    let severities: Vec<Severity> = diags.iter().map(|d| d.severity).collect();
    assert_eq!(severities, vec![Severity::Warn, Severity::Note]);

    // The first declaration wins
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols.get("x").unwrap().ty, Type::Int);
}

#[test]
fn bad_size_still_declares() {
    let (symbols, diags) = analyze("int a[0]\na[0] = 1");
    assert_eq!(diags.error_count(), 1);
    assert_eq!(symbols.get("a").unwrap().storage, Storage::Array(1));
}

#[test]
fn frame_overflow_still_declares() {
    let (symbols, diags) = analyze("int big[2000000000]\nbig[0] = 1\nint x\nx = 2");
    let errors: Vec<&Error> = diags.errors().collect();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(matches!(errors[0], Error::ArraySizeOverflow));
    assert!(symbols.contains("big"));
    assert_eq!(symbols.get("x").unwrap().stack_offset, 8);
}

#[test]
fn scalar_after_odd_array_is_aligned() {
    let (symbols, _) = analyze("int a[3]\nint x");
    assert_eq!(symbols.get("a").unwrap().stack_offset, 12);
    assert_eq!(symbols.get("x").unwrap().stack_offset, 24);
    assert_eq!(symbols.frame_size(), 32);
}

#[test]
fn labels_recorded() {
    let (symbols, _) = analyze(":top\nif 1 < 2 then { :inside }");
    let names: Vec<&str> = symbols.labels().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["top", "inside"]);
    assert_eq!(symbols.label("inside").map(|p| p.line), Some(2));
}
