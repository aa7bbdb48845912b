use super::token::{Pos, Token, TokenKind};
use crate::error::{Diagnostics, Error, Sources};
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

/// Tokenizes a source file and every file it pulls in with `-include`.
pub struct Lexer<'a> {
    sources: &'a mut Sources,
    include_dir: PathBuf,
    chain: Vec<PathBuf>,
    diags: Diagnostics,
}

impl<'a> Lexer<'a> {
    pub fn new(sources: &'a mut Sources, include_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            include_dir: include_dir.into(),
            chain: Vec::new(),
            diags: Diagnostics::new(),
        }
    }

    /// Tokenize `code` registered under `name`. The result always ends with `End`.
    pub fn tokenize(mut self, name: &str, code: &str) -> (Vec<Token>, Diagnostics) {
        if let Ok(path) = Path::new(name).canonicalize() {
            self.chain.push(path);
        }
        let tokens = self.tokenize_file(name, code);
        (tokens, self.diags)
    }

    fn tokenize_file(&mut self, name: &str, code: &str) -> Vec<Token> {
        let lines = code.lines().map(String::from).collect();
        let (file, _) = self.sources.insert_full(name.to_string(), lines);

        let mut lexer = FileLexer::new(code, file);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            self.diags.extend(std::mem::take(&mut lexer.diags));
            match token.kind {
                TokenKind::Include => {
                    let arg = lexer.next_token();
                    self.diags.extend(std::mem::take(&mut lexer.diags));
                    match arg.kind {
                        TokenKind::Str(path) => tokens.extend(self.include(&path, token.pos)),
                        TokenKind::End => {
                            self.diags
                                .error(Error::IncludeWithoutPath(TokenKind::End), token.pos);
                            tokens.push(arg);
                            break;
                        }
                        other => {
                            self.diags
                                .error(Error::IncludeWithoutPath(other.clone()), token.pos);
                            tokens.push(Token::new(other, arg.pos));
                        }
                    }
                }
                TokenKind::End => {
                    tokens.push(token);
                    break;
                }
                _ => tokens.push(token),
            }
        }
        tokens
    }

    /// Tokens of an included file, without its `End`
    fn include(&mut self, path: &str, pos: Pos) -> Vec<Token> {
        let full = self.include_dir.join(path);
        let name = full.display().to_string();
        let canonical = full.canonicalize().unwrap_or_else(|_| full.clone());

        if self.chain.contains(&canonical) {
            self.diags.error(Error::RecursiveInclude(name), pos);
            return Vec::new();
        }

        let code = match std::fs::read_to_string(&full) {
            Ok(code) => code,
            Err(e) => {
                self.diags.error(Error::IncludeRead(name, e), pos);
                return Vec::new();
            }
        };

        self.chain.push(canonical);
        let mut tokens = self.tokenize_file(&name, &code);
        self.chain.pop();

        tokens.pop(); // End
        tokens
    }
}

// ----------------------------------------------------------------------------
// Single file
// ----------------------------------------------------------------------------

struct FileLexer<'a> {
    iter: Peekable<Chars<'a>>,
    file: usize,
    line: usize,
    diags: Diagnostics,
}

impl<'a> FileLexer<'a> {
    fn new(code: &'a str, file: usize) -> Self {
        Self {
            iter: code.chars().peekable(),
            file,
            line: 1,
            diags: Diagnostics::new(),
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> FileLexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next();
        if ch == Some('\n') {
            self.line += 1;
        }
        ch
    }

    /// Identifier run starting `n` characters ahead, without consuming it
    fn peek_word(&self, n: usize) -> String {
        self.iter.clone().skip(n).take_while(|c| is_ident(*c)).collect()
    }

    fn take_word(&mut self) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.iter.next_if(|c| is_ident(*c)) {
            lexeme.push(ch);
        }
        lexeme
    }

    fn invalid(&mut self, error: Error, lexeme: String, pos: Pos) -> Token {
        self.diags.error(error, pos);
        Token::new(TokenKind::Invalid(lexeme), pos)
    }
}

// ----------------------------------------------------------------------------
// Lexer
// ----------------------------------------------------------------------------

impl<'a> FileLexer<'a> {
    fn next_token(&mut self) -> Token {
        loop {
            // 0. Skip whitespaces
            while self.iter.next_if(|c| c.is_whitespace() && *c != '\n').is_some() {}
            if self.peek_nth(0) == Some('\n') {
                self.consume();
                continue;
            }

            let pos = Pos::new(self.file, self.line);
            let Some(ch0) = self.peek_nth(0) else {
                return Token::new(TokenKind::End, pos);
            };

            // 1. Comments and directives
            if ch0 == '-' {
                match self.peek_nth(1) {
                    Some('-') => {
                        while self.iter.next_if(|c| *c != '\n').is_some() {}
                        continue;
                    }
                    Some('*') => {
                        self.consume(); // consume '-'
                        self.consume(); // consume '*'
                        if self.skip_block_comment() {
                            continue;
                        }
                        return self.invalid(Error::UnterminatedComment, "-*".into(), pos);
                    }
                    Some(_) if self.peek_word(1) == "include" => {
                        self.consume(); // consume '-'
                        self.take_word();
                        return Token::new(TokenKind::Include, pos);
                    }
                    _ => {}
                }
            }

            // 2. Double character token
            if let Some(ch1) = self.peek_nth(1) {
                if let Some(kind) = double_char_token(ch0, ch1) {
                    self.consume();
                    self.consume();
                    return Token::new(kind, pos);
                }
            }

            // 3. Prefixed names: *ptr &addr :label
            if matches!(ch0, '*' | '&' | ':') {
                self.consume();
                if self.peek_nth(0).is_some_and(is_ident_start) {
                    let name = self.take_word();
                    let kind = match ch0 {
                        '*' => TokenKind::Pointer(name),
                        '&' => TokenKind::AddressOf(name),
                        _ => TokenKind::Label(name),
                    };
                    return Token::new(kind, pos);
                }
                if ch0 == '*' {
                    return Token::new(TokenKind::Star, pos);
                }
                return self.invalid(Error::InvalidCharacter(ch0.into()), ch0.into(), pos);
            }

            // 4. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                return Token::new(kind, pos);
            }

            // 5. Number literal
            if ch0.is_ascii_digit() {
                return self.parse_number(pos);
            }

            // 6. Char literal
            if ch0 == '\'' {
                return self.parse_char(pos);
            }

            // 7. String literal
            if ch0 == '"' {
                return self.parse_text(pos);
            }

            // 8. Identifier or keyword
            if is_ident_start(ch0) {
                let lexeme = self.take_word();
                let kind = keyword(&lexeme).unwrap_or(TokenKind::Ident(lexeme));
                return Token::new(kind, pos);
            }

            // Error
            self.consume();
            return self.invalid(Error::InvalidCharacter(ch0.into()), ch0.into(), pos);
        }
    }

    /// Skip until the closing "*-". Returns false at end of input.
    fn skip_block_comment(&mut self) -> bool {
        while let Some(ch) = self.consume() {
            if ch == '*' && self.peek_nth(0) == Some('-') {
                self.consume();
                return true;
            }
        }
        false
    }

    fn parse_number(&mut self, pos: Pos) -> Token {
        let mut lexeme = String::new();
        while let Some(ch) = self.iter.next_if(|c| c.is_ascii_digit()) {
            lexeme.push(ch);
        }
        match lexeme.parse::<i64>() {
            Ok(num) => Token::new(TokenKind::Int(num), pos),
            Err(_) => self.invalid(Error::IntegerOverflow(lexeme.clone()), lexeme, pos),
        }
    }

    // Char: 'a' '\n'
    fn parse_char(&mut self, pos: Pos) -> Token {
        self.consume(); // consume opening '

        let value = match self.consume() {
            Some('\\') => match self.consume() {
                Some(ch) => match escape(ch) {
                    Some(value) => value,
                    None => {
                        self.skip_char_rest();
                        return self.invalid(Error::InvalidEscape(ch), ch.into(), pos);
                    }
                },
                None => return self.invalid(Error::UnterminatedChar, "'".into(), pos),
            },
            Some(ch) => ch,
            None => return self.invalid(Error::UnterminatedChar, "'".into(), pos),
        };

        match self.peek_nth(0) {
            Some('\'') => {
                self.consume();
                Token::new(TokenKind::Char(value), pos)
            }
            Some(ch) => {
                self.skip_char_rest();
                self.invalid(Error::UnterminatedChar, ch.into(), pos)
            }
            None => self.invalid(Error::UnterminatedChar, value.into(), pos),
        }
    }

    /// Skip the rest of a broken char literal through its closing `'` on the same line
    fn skip_char_rest(&mut self) {
        while self.iter.next_if(|c| *c != '\'' && *c != '\n').is_some() {}
        self.iter.next_if(|c| *c == '\'');
    }

    // Text: "hoge\nfuga"
    fn parse_text(&mut self, pos: Pos) -> Token {
        self.consume(); // consume opening "

        let mut lexeme = String::new();
        let mut bad_escape = None;
        loop {
            match self.consume() {
                None => {
                    return self.invalid(Error::UnterminatedString, format!("\"{lexeme}"), pos)
                }
                Some('"') => break,
                Some('\\') => match self.consume() {
                    Some('"') => lexeme.push('"'),
                    Some(ch) => match escape(ch) {
                        Some(value) => lexeme.push(value),
                        None => {
                            bad_escape.get_or_insert(ch);
                        }
                    },
                    None => {
                        return self.invalid(Error::UnterminatedString, format!("\"{lexeme}"), pos)
                    }
                },
                Some(ch) => lexeme.push(ch),
            }
        }

        match bad_escape {
            Some(ch) => self.invalid(Error::InvalidEscape(ch), format!("\"{lexeme}\""), pos),
            None => Token::new(TokenKind::Str(lexeme), pos),
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn escape(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '0' => Some('\0'),
        _ => None,
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::EqualEqual),
        ('!', '=') => Some(TokenKind::ExclEqual),
        ('<', '=') => Some(TokenKind::LAngleEqual),
        ('>', '=') => Some(TokenKind::RAngleEqual),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '/' => Some(TokenKind::Slash),
        '%' => Some(TokenKind::Percent),
        ',' => Some(TokenKind::Comma),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '{' => Some(TokenKind::LCurly),
        '}' => Some(TokenKind::RCurly),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        _ => None,
    }
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "goto" => Some(TokenKind::KwGoto),
        "if" => Some(TokenKind::KwIf),
        "then" => Some(TokenKind::KwThen),
        "int" => Some(TokenKind::KwInt),
        "char" => Some(TokenKind::KwChar),
        "fasm_define" => Some(TokenKind::KwFasmDefine),
        "fasm" => Some(TokenKind::KwFasm),
        "loop" => Some(TokenKind::KwLoop),
        "continue" => Some(TokenKind::KwContinue),
        "break" => Some(TokenKind::KwBreak),
        "input" => Some(TokenKind::KwInput),
        "output" => Some(TokenKind::KwOutput),
        _ => None,
    }
}
