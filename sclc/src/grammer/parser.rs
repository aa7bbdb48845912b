use super::ast::{
    BinaryOp, Expr, IfBody, Instr, InstrKind, Loop, LoopKind, Output, Place, Program, Rel, RelOp,
    Term, TermKind, Type, VarDecl, VarRef,
};
use super::parsercore::{PResult, Parser};
use super::token::{Token, TokenKind::*};
use crate::error::{Diagnostics, Error};
use crate::{check, expect, optional, require};

impl Parser {
    pub fn parse(mut self) -> (Program, Diagnostics) {
        let program = self.parse_program();
        (program, self.take_diags())
    }
}

// ------------------------------------------------------------------------
// Parsers
// ------------------------------------------------------------------------

impl Parser {
    /// program = { instr } End
    fn parse_program(&mut self) -> Program {
        let mut instrs = Vec::new();
        while !check!(self, End) {
            match self.parse_instr() {
                Ok(instr) => instrs.push(instr),
                Err((e, pos)) => {
                    self.error(e, pos);
                    break;
                }
            }
        }
        Program {
            loop_counter: self.loop_counter,
            instrs,
        }
    }

    /// instr = declare | assign | if | goto | label | fasm_def | fasm | loop
    ///       | "break" | "continue" | output
    fn parse_instr(&mut self) -> PResult<Instr> {
        let token = self.peek().clone();
        let pos = token.pos;
        let kind = match token.kind {
            // declare = ("int"|"char") (ident | *ident) [ "[" expr "]" ] [ "=" expr ]
            KwInt | KwChar => self.parse_declare()?,

            // assign = ident "=" expr | ident "[" expr "]" "=" expr
            Ident(name) => {
                self.next();
                let var = VarRef::new(name, pos);
                if optional!(self, LBracket).is_some() {
                    let index = self.parse_subscript()?;
                    require!(self, Equal, "`=`");
                    let value = self.parse_expr()?;
                    InstrKind::AssignToArraySubscript(var, index, value)
                } else {
                    require!(self, Equal, "`=`");
                    let value = self.parse_expr()?;
                    InstrKind::Assign(Place::Var(var), value)
                }
            }

            // assign = *ident "=" expr
            Pointer(name) => {
                self.next();
                require!(self, Equal, "`=`");
                let value = self.parse_expr()?;
                InstrKind::Assign(Place::Deref(VarRef::new(name, pos)), value)
            }

            // if = "if" rel "then" ( "{" { instr } "}" | instr )
            KwIf => {
                self.next();
                let rel = self.parse_rel()?;
                require!(self, KwThen, "`then`");
                let body = if check!(self, LCurly) {
                    IfBody::Block(self.parse_block()?)
                } else {
                    self.enter()?;
                    let instr = self.parse_instr()?;
                    self.leave();
                    IfBody::Single(Box::new(instr))
                };
                InstrKind::If(rel, body)
            }

            // goto = "goto" ( :label | ident )
            KwGoto => {
                self.next();
                let target = self.expect_with("a label", |kind| match kind {
                    Label(name) | Ident(name) => Some(name.clone()),
                    _ => None,
                })?;
                InstrKind::Goto(target)
            }

            // label = :label
            Label(name) => {
                self.next();
                InstrKind::Label(name)
            }

            // fasm_def = "fasm_define" string
            KwFasmDefine => {
                self.next();
                InstrKind::FasmDefine(self.parse_string()?)
            }

            // fasm = "fasm" string [ "," ident ]
            KwFasm => {
                self.next();
                let content = self.parse_string()?;
                let arg = match optional!(self, Comma) {
                    Some(_) => {
                        let pos = self.peek().pos;
                        let name = self.expect_with("a variable name", |kind| match kind {
                            Ident(name) => Some(name.clone()),
                            _ => None,
                        })?;
                        Some(VarRef::new(name, pos))
                    }
                    None => None,
                };
                InstrKind::Fasm(content, arg)
            }

            // loop = "loop" [ rel ] "{" { instr } "}" [ rel ]
            KwLoop => self.parse_loop()?,

            KwBreak => {
                self.next();
                InstrKind::LoopBreak
            }

            KwContinue => {
                self.next();
                InstrKind::LoopContinue
            }

            // output = "output" ( string | expr )
            KwOutput => {
                self.next();
                match self.peek().kind.clone() {
                    Str(text) => {
                        self.next();
                        InstrKind::Output(Output::Text(text))
                    }
                    _ => InstrKind::Output(Output::Expr(self.parse_expr()?)),
                }
            }

            End => return Err((Error::UnexpectedEOF, pos)),
            kind => return Err((Error::UnexpectedToken(kind), pos)),
        };
        Ok(Instr { kind, pos })
    }

    /// declare = ("int"|"char") (ident | *ident) [ "[" expr "]" ] [ "=" expr ]
    fn parse_declare(&mut self) -> PResult<InstrKind> {
        let base = match self.next().kind {
            KwChar => Type::Char,
            _ => Type::Int,
        };
        let pos = self.peek().pos;
        let (ty, name) = self.expect_with("a variable name", |kind| match kind {
            Ident(name) => Some((base, name.clone())),
            Pointer(name) => Some((Type::Pointer, name.clone())),
            _ => None,
        })?;
        let decl = VarDecl { ty, name, pos };

        // Array: "[" expr "]" [ "=" "{" .. "}" ]
        if optional!(self, LBracket).is_some() {
            let size = self.parse_subscript()?;
            if let Some(eq) = optional!(self, Equal) {
                return match self.parse_expr()? {
                    Expr::Term(Term {
                        kind: TermKind::ArrayLiteral(elements),
                        ..
                    }) => Ok(InstrKind::InitializeArray(decl, size, elements)),
                    _ => {
                        self.error(Error::ArrayInitializer, eq.pos);
                        Ok(InstrKind::DeclareArray(decl, size))
                    }
                };
            }
            return Ok(InstrKind::DeclareArray(decl, size));
        }

        if optional!(self, Equal).is_some() {
            let value = self.parse_expr()?;
            return Ok(InstrKind::Initialize(decl, value));
        }
        Ok(InstrKind::Declare(decl))
    }

    /// loop = "loop" "{" { instr } "}"
    ///      | "loop" rel "{" { instr } "}"
    ///      | "loop" "{" { instr } "}" rel
    fn parse_loop(&mut self) -> PResult<InstrKind> {
        expect!(self, KwLoop, "`loop`")?;
        let id = self.loop_counter;
        self.loop_counter += 1;

        let (kind, body) = if check!(self, LCurly) {
            let body = self.parse_block()?;
            if self.rel_follows() {
                (LoopKind::DoWhile(self.parse_rel()?), body)
            } else {
                (LoopKind::Unconditional, body)
            }
        } else {
            let rel = self.parse_rel()?;
            (LoopKind::While(rel), self.parse_block()?)
        };
        Ok(InstrKind::Loop(Loop { id, kind, body }))
    }

    /// block = "{" { instr } "}"
    fn parse_block(&mut self) -> PResult<Vec<Instr>> {
        expect!(self, LCurly, "`{`")?;
        self.enter()?;
        let mut instrs = Vec::new();
        while optional!(self, RCurly).is_none() {
            instrs.push(self.parse_instr()?);
        }
        self.leave();
        Ok(instrs)
    }

    /// rel = rterm ( "==" | "!=" | "<" | "<=" | ">" | ">=" ) rterm
    fn parse_rel(&mut self) -> PResult<Rel> {
        let lhs = self.parse_rterm()?;
        let token = self.peek().clone();
        let op = relop(&token).ok_or((Error::ExpectedRelation(token.kind), token.pos))?;
        self.next();
        let rhs = self.parse_rterm()?;
        Ok(Rel {
            op,
            pos: lhs.pos,
            lhs,
            rhs,
        })
    }

    /// rterm = int | char | "input" | ident [ "[" expr "]" ] | *ident | &ident
    fn parse_rterm(&mut self) -> PResult<Term> {
        let token = self.peek().clone();
        let pos = token.pos;
        let kind = match token.kind {
            Int(n) => TermKind::Int(n),
            Char(c) => TermKind::Char(c),
            KwInput => TermKind::Input,
            Pointer(name) => TermKind::Deref(VarRef::new(name, pos)),
            AddressOf(name) => TermKind::AddressOf(VarRef::new(name, pos)),
            Ident(name) => {
                self.next();
                let var = VarRef::new(name, pos);
                if optional!(self, LBracket).is_some() {
                    let index = self.parse_subscript()?;
                    return Ok(Term {
                        kind: TermKind::ArrayAccess(var, Box::new(index)),
                        pos,
                    });
                }
                return Ok(Term {
                    kind: TermKind::Ident(var),
                    pos,
                });
            }
            End => return Err((Error::UnexpectedEOF, pos)),
            kind => return Err((Error::ExpectedTerm(kind), pos)),
        };
        self.next();
        Ok(Term { kind, pos })
    }

    /// expr = term { ( "+" | "-" ) term }
    fn parse_expr(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let token = self.peek();
            let op = match token.kind {
                Plus => BinaryOp::Add,
                Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            let pos = token.pos;
            self.next();
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs), pos);
        }
    }

    /// term = factor { ( "*" | "/" | "%" ) factor }
    fn parse_term(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_factor()?;
        loop {
            let token = self.peek();
            let op = match token.kind {
                Star => BinaryOp::Mul,
                Slash => BinaryOp::Div,
                Percent => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            let pos = token.pos;
            self.next();
            let rhs = self.parse_factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs), pos);
        }
    }

    /// factor = rterm | "(" expr ")" | "{" [ expr { "," expr } ] "}"
    fn parse_factor(&mut self) -> PResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            // Parenthesized: "(" expr ")"
            LParen => {
                self.next();
                self.enter()?;
                let expr = self.parse_expr()?;
                expect!(self, RParen, "`)`")?;
                self.leave();
                Ok(expr)
            }

            // Array literal: "{" [ expr { "," expr } ] "}"
            LCurly => {
                self.next();
                self.enter()?;
                let mut elements = Vec::new();
                if !check!(self, RCurly) {
                    elements.push(self.parse_expr()?);
                    while optional!(self, Comma).is_some() {
                        elements.push(self.parse_expr()?);
                    }
                }
                expect!(self, RCurly, "`}`")?;
                self.leave();
                Ok(Expr::Term(Term {
                    kind: TermKind::ArrayLiteral(elements),
                    pos: token.pos,
                }))
            }

            _ => Ok(Expr::Term(self.parse_rterm()?)),
        }
    }

    /// subscript = expr "]"   (after the opening "[")
    fn parse_subscript(&mut self) -> PResult<Expr> {
        self.enter()?;
        let expr = self.parse_expr()?;
        require!(self, RBracket, "`]`");
        self.leave();
        Ok(expr)
    }

    fn parse_string(&mut self) -> PResult<String> {
        self.expect_with("a string", |kind| match kind {
            Str(s) => Some(s.clone()),
            _ => None,
        })
    }
}

// ------------------------------------------------------------------------
// Helpers
// ------------------------------------------------------------------------

impl Parser {
    /// Lookahead for the condition of a do-while loop:
    /// a relation term followed by a relation operator
    fn rel_follows(&self) -> bool {
        let after = match &self.peek().kind {
            Int(_) | Char(_) | KwInput | Pointer(_) | AddressOf(_) => 1,
            Ident(_) if self.peek_nth(1).kind == LBracket => {
                // Skip over the subscript: ident "[" .. "]"
                let mut depth = 0;
                let mut n = 1;
                loop {
                    match self.peek_nth(n).kind {
                        LBracket => depth += 1,
                        RBracket if depth == 1 => break n + 1,
                        RBracket => depth -= 1,
                        End => return false,
                        _ => {}
                    }
                    n += 1;
                }
            }
            Ident(_) => 1,
            _ => return false,
        };
        relop(self.peek_nth(after)).is_some()
    }
}

fn relop(token: &Token) -> Option<RelOp> {
    match token.kind {
        EqualEqual => Some(RelOp::Eq),
        ExclEqual => Some(RelOp::Ne),
        LAngle => Some(RelOp::Lt),
        LAngleEqual => Some(RelOp::Le),
        RAngle => Some(RelOp::Gt),
        RAngleEqual => Some(RelOp::Ge),
        _ => None,
    }
}
