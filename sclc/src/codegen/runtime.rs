//! Runtime routines and data linked into every program.
//!
//! Calling convention: the argument is in `rax` (`rsi` for `print_str`), results come
//! back in `rax`. Only caller-saved registers are clobbered.

use itertools::Itertools;

pub const HEADER: &str = "\
format ELF64 executable 3
LINE_MAX equ 1024
entry _start
segment readable executable";

pub const START: &str = "\
_start:
    call main
    mov rax, 60
    xor rdi, rdi
    syscall";

/// print_int: signed decimal of rax followed by a newline
/// print_char: low byte of rax
/// print_str: zero-terminated string at rsi
/// read_int: one line of stdin parsed as a signed decimal into rax
pub const ROUTINES: &str = "\
print_int:
    mov r9, line + LINE_MAX
    mov byte [r9 - 1], 10
    lea rsi, [r9 - 1]
    mov rcx, 10
    mov r8, rax
    test rax, rax
    jns .digits
    neg rax
.digits:
    xor rdx, rdx
    div rcx
    add dl, '0'
    dec rsi
    mov [rsi], dl
    test rax, rax
    jnz .digits
    test r8, r8
    jns .write
    dec rsi
    mov byte [rsi], '-'
.write:
    mov rax, 1
    mov rdi, 1
    mov rdx, r9
    sub rdx, rsi
    syscall
    ret

print_char:
    mov [char_buf], al
    mov rax, 1
    mov rdi, 1
    mov rsi, char_buf
    mov rdx, 1
    syscall
    ret

print_str:
    mov rdx, rsi
.scan:
    cmp byte [rdx], 0
    je .write
    inc rdx
    jmp .scan
.write:
    sub rdx, rsi
    mov rax, 1
    mov rdi, 1
    syscall
    ret

read_int:
    mov rax, 0
    mov rdi, 0
    mov rsi, line
    mov rdx, LINE_MAX
    syscall
    mov rcx, rax
    mov rsi, line
    xor rax, rax
    xor r8, r8
    test rcx, rcx
    jle .done
    cmp byte [rsi], '-'
    jne .digit
    mov r8, 1
    inc rsi
    dec rcx
.digit:
    test rcx, rcx
    jz .sign
    movzx rdx, byte [rsi]
    sub rdx, '0'
    cmp rdx, 9
    ja .sign
    imul rax, rax, 10
    add rax, rdx
    inc rsi
    dec rcx
    jmp .digit
.sign:
    test r8, r8
    jz .done
    neg rax
.done:
    ret";

pub const DATA: &str = "\
segment readable writeable
line rb LINE_MAX
newline db 10, 0
char_buf db 0, 0";

/// Label of the n-th string literal in the data segment
pub fn string_label(idx: usize) -> String {
    format!("str_{idx}")
}

/// `str_N db 104, 105, 0`
pub fn string_data(idx: usize, text: &str) -> String {
    let bytes = text.bytes().chain(std::iter::once(0)).join(", ");
    format!("{} db {}", string_label(idx), bytes)
}
