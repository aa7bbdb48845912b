use sclc::{compile, Error, Severity};
use std::path::{Path, PathBuf};
use std::process::Command;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sclc_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sclc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sclc"))
}

// ---- Library ----
#[test]
fn success_produces_assembly() {
    let compilation = compile("main", "int x = 5\noutput x", Path::new("."), false);
    assert!(compilation.diags.is_empty());
    let asm = compilation.asm.unwrap();
    assert!(asm.starts_with("format ELF64 executable 3"));
    assert!(asm.contains("call print_int"));
}

#[test]
fn undeclared_variable_stops_compilation() {
    let compilation = compile("main", "int x = 1\noutput z", Path::new("."), false);
    assert!(compilation.asm.is_none());
    assert_eq!(compilation.diags.error_count(), 1);

    let error = compilation.diags.errors().next().unwrap();
    assert!(matches!(error, Error::UndeclaredVariable(name) if name == "z"));
    assert_eq!(error.to_string(), "Use of undeclared variable: z");
}

#[test]
fn lex_errors_stop_before_parsing() {
    let compilation = compile("main", "int x = $", Path::new("."), false);
    assert!(compilation.asm.is_none());
    assert_eq!(compilation.diags.error_count(), 1);
    assert!(matches!(
        compilation.diags.errors().next(),
        Some(Error::InvalidCharacter(_))
    ));
}

#[test]
fn parse_errors_stop_before_resolution() {
    let compilation = compile("main", "int x = then\noutput z", Path::new("."), false);
    assert!(compilation.asm.is_none());
    assert!(!compilation
        .diags
        .errors()
        .any(|e| matches!(e, Error::UndeclaredVariable(_))));
}

#[test]
fn resolve_errors_stop_before_type_check() {
    let compilation = compile("main", "int x = 'c'\noutput q", Path::new("."), false);
    assert_eq!(compilation.diags.error_count(), 1);
    assert!(matches!(
        compilation.diags.errors().next(),
        Some(Error::UndeclaredVariable(_))
    ));
}

#[test]
fn warnings_do_not_stop_compilation() {
    let compilation = compile("main", "int x\nint x\noutput x", Path::new("."), false);
    assert!(compilation.asm.is_some());
    assert_eq!(compilation.diags.error_count(), 0);
    assert!(compilation
        .diags
        .iter()
        .any(|d| d.severity == Severity::Warn));
}

#[test]
fn diagnostics_point_at_source() {
    let compilation = compile("main", "int x\n\nx = y", Path::new("."), false);
    let diag = compilation.diags.iter().next().unwrap();
    let pos = diag.pos.unwrap();
    assert_eq!(pos.line, 3);
    let (name, lines) = compilation.sources.get_index(pos.file).unwrap();
    assert_eq!(name, "main");
    assert_eq!(lines[pos.line - 1], "x = y");
}

#[test]
fn include_through_compile() {
    let dir = scratch("pipeline_include");
    std::fs::write(dir.join("consts.sclc"), "int limit = 3\n").unwrap();

    let code = "-include \"consts.sclc\"\nint i = 0\nloop i < limit { i = i + 1 }\noutput i";
    let compilation = compile("main", code, &dir, false);
    assert_eq!(compilation.diags.error_count(), 0);
    assert_eq!(compilation.sources.len(), 2);
    assert!(compilation.asm.is_some());
}

#[test]
fn countdown_program() {
    let code = "\
-- print 3 2 1 then done
int n = 3
loop n > 0 {
    output n
    n = n - 1
}
output \"done\"
";
    let compilation = compile("main", code, Path::new("."), false);
    assert!(compilation.diags.is_empty());
    let asm = compilation.asm.unwrap();
    assert!(asm.contains("setg al"));
    assert!(asm.contains("str_0 db 100, 111, 110, 101, 0"));
}

// ---- Command line ----
#[test]
fn cli_help() {
    let out = sclc().arg("--help").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("include_dir"));
}

#[test]
fn cli_no_input() {
    let out = sclc().output().unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_two_inputs() {
    let out = sclc().args(["a.sclc", "b.sclc"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_unknown_option() {
    let out = sclc().args(["--frobnicate", "a.sclc"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_missing_include_dir() {
    let out = sclc()
        .args(["a.sclc", "-i", "/nonexistent/sclc/include"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_missing_input() {
    let dir = scratch("cli_missing_input");
    let out = sclc().arg(dir.join("absent.sclc")).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Failed to read file"));
}

#[test]
fn cli_reports_errors() {
    let dir = scratch("cli_reports_errors");
    let input = dir.join("bad.sclc");
    std::fs::write(&input, "int x = 1\noutput z\n").unwrap();

    let out = sclc().arg(&input).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("undeclared variable: z"));
    assert!(stderr.contains("1 error(s) found"));
    assert!(!dir.join("bad.s").exists());
}
