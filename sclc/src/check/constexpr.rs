use crate::error::Error;
use crate::grammer::ast::{BinaryOp, Expr, TermKind};

/// Evaluate an integer constant expression (array sizes)
pub fn eval(expr: &Expr) -> Result<i64, Error> {
    match expr {
        Expr::Term(term) => match term.kind {
            TermKind::Int(n) => Ok(n),
            _ => Err(Error::NonConstantArraySize),
        },
        Expr::Binary(op, lhs, rhs, _) => {
            let (lhs, rhs) = (eval(lhs)?, eval(rhs)?);
            let result = match op {
                BinaryOp::Add => lhs.checked_add(rhs),
                BinaryOp::Sub => lhs.checked_sub(rhs),
                BinaryOp::Mul => lhs.checked_mul(rhs),
                BinaryOp::Div if rhs == 0 => return Err(Error::DivisionByZero),
                BinaryOp::Div => lhs.checked_div(rhs),
                BinaryOp::Mod if rhs == 0 => return Err(Error::ModuloByZero),
                BinaryOp::Mod => lhs.checked_rem(rhs),
            };
            result.ok_or(Error::ArraySizeOverflow)
        }
    }
}
