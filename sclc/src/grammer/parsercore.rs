use super::token::{Pos, Token, TokenKind};
use crate::error::{Diagnostics, Error};

/// Maximum depth of nested blocks and parentheses
pub const MAX_NESTING: usize = 256;

/// Fatal parse error: the parse stops and returns what it has
pub type PResult<T> = Result<T, (Error, Pos)>;

pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
    pub(super) loop_counter: usize,
    diags: Diagnostics,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::End, .. })) {
            let pos = tokens.last().map(|t| t.pos).unwrap_or_default();
            tokens.push(Token::new(TokenKind::End, pos));
        }
        Parser {
            tokens,
            cursor: 0,
            depth: 0,
            loop_counter: 0,
            diags: Diagnostics::new(),
        }
    }

    /// Record a non-fatal error
    pub fn error(&mut self, e: Error, pos: Pos) {
        self.diags.error(e, pos);
    }

    pub(super) fn take_diags(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diags)
    }
}

impl Parser {
    /// Peek : Watch next token without consuming it
    pub fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// Peek n tokens ahead. Past the end, this is the `End` token.
    pub fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.cursor + n).min(last)]
    }

    /// Next : Consume next token and return it. `End` is never consumed.
    pub fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::End {
            self.cursor += 1;
        }
        token
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        cond(self.peek())
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        if self.check_if(cond) {
            Some(self.next())
        } else {
            None
        }
    }

    /// Next token must be match with condition
    pub fn expect_tobe<F: Fn(&Token) -> bool>(
        &mut self,
        cond: F,
        what: &'static str,
    ) -> PResult<Token> {
        let token = self.peek().clone();
        if cond(&token) {
            Ok(self.next())
        } else if token.kind == TokenKind::End {
            Err((Error::UnexpectedEOF, token.pos))
        } else {
            Err((Error::Expected(what, token.kind), token.pos))
        }
    }

    /// Next token must be accepted by `f`, which also extracts its payload
    pub fn expect_with<T, F: FnOnce(&TokenKind) -> Option<T>>(
        &mut self,
        what: &'static str,
        f: F,
    ) -> PResult<T> {
        let token = self.peek().clone();
        match f(&token.kind) {
            Some(value) => {
                self.next();
                Ok(value)
            }
            None if token.kind == TokenKind::End => Err((Error::UnexpectedEOF, token.pos)),
            None => Err((Error::Expected(what, token.kind), token.pos)),
        }
    }

    /// Consume the token if it matches. Otherwise record an error and go on without consuming.
    pub fn require_tobe<F: Fn(&Token) -> bool>(&mut self, cond: F, what: &'static str) {
        if self.consume_if(cond).is_none() {
            let token = self.peek().clone();
            self.error(Error::Expected(what, token.kind), token.pos);
        }
    }

    /// Enter a nested block or parenthesis
    pub fn enter(&mut self) -> PResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err((Error::NestingTooDeep(MAX_NESTING), self.peek().pos));
        }
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth -= 1;
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat, $what:expr) => {
        $parser.expect_tobe(|token| matches!(&token.kind, $kind), $what)
    };
}

#[macro_export]
macro_rules! require {
    ($parser:expr, $kind:pat, $what:expr) => {
        $parser.require_tobe(|token| matches!(&token.kind, $kind), $what)
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}
