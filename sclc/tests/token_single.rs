use sclc::grammer::token::{TokenKind, TokenKind::*};
use sclc::{Lexer, Sources};

fn assert(code: &str, expect: TokenKind) {
    let mut sources = Sources::new();
    let (tokens, _) = Lexer::new(&mut sources, ".").tokenize("test", code);
    assert_eq!(tokens[0].kind, expect);
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&End));
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert($code, $expect);
        }
    };
}

// ---- Double-char operators ----
case!(equal_equal, "==", EqualEqual);
case!(excl_equal, "!=", ExclEqual);
case!(langle_equal, "<=", LAngleEqual);
case!(rangle_equal, ">=", RAngleEqual);

// ---- Single-char operators ----
case!(equal, "=", Equal);
case!(plus, "+", Plus);
case!(minus, "-", Minus);
case!(star, "*", Star);
case!(star_before_digit, "*3", Star);
case!(slash, "/", Slash);
case!(percent, "%", Percent);
case!(comma, ",", Comma);
case!(lparen, "(", LParen);
case!(rparen, ")", RParen);
case!(lbracket, "[", LBracket);
case!(rbracket, "]", RBracket);
case!(lcurly, "{", LCurly);
case!(rcurly, "}", RCurly);
case!(langle, "<", LAngle);
case!(rangle, ">", RAngle);

// ---- Keywords ----
case!(kw_goto, "goto", KwGoto);
case!(kw_if, "if", KwIf);
case!(kw_then, "then", KwThen);
case!(kw_int, "int", KwInt);
case!(kw_char, "char", KwChar);
case!(kw_fasm_define, "fasm_define", KwFasmDefine);
case!(kw_fasm, "fasm", KwFasm);
case!(kw_loop, "loop", KwLoop);
case!(kw_continue, "continue", KwContinue);
case!(kw_break, "break", KwBreak);
case!(kw_input, "input", KwInput);
case!(kw_output, "output", KwOutput);

// ---- Literals ----
case!(ident, "counter", Ident(format!("counter")));
case!(ident_underscore, "_tmp1", Ident(format!("_tmp1")));
case!(ident_keyword_prefix, "iffy", Ident(format!("iffy")));
case!(label, ":end", Label(format!("end")));
case!(pointer, "*ptr", Pointer(format!("ptr")));
case!(address_of, "&value", AddressOf(format!("value")));
case!(int_zero, "0", Int(0));
case!(int_max, "9223372036854775807", Int(i64::MAX));
case!(char_lit, "'a'", Char('a'));
case!(char_newline, "'\\n'", Char('\n'));
case!(char_tab, "'\\t'", Char('\t'));
case!(char_nul, "'\\0'", Char('\0'));
case!(char_quote, "'\\''", Char('\''));
case!(char_backslash, "'\\\\'", Char('\\'));
case!(text, "\"hello\"", Str(format!("hello")));
case!(text_escapes, "\"a\\tb\\n\"", Str(format!("a\tb\n")));
case!(text_quote, "\"say \\\"hi\\\"\"", Str(format!("say \"hi\"")));

// ---- Invalid ----
case!(lone_excl, "!", Invalid(format!("!")));
case!(lone_ampersand, "&", Invalid(format!("&")));
case!(lone_colon, ":", Invalid(format!(":")));
case!(unknown_char, "$", Invalid(format!("$")));
case!(
    int_overflow,
    "9223372036854775808",
    Invalid(format!("9223372036854775808"))
);
case!(bad_escape, "'\\q'", Invalid(format!("q")));
case!(unterminated_text, "\"abc", Invalid(format!("\"abc")));
case!(unterminated_block_comment, "-* never closed", Invalid(format!("-*")));
case!(empty, "", End);
