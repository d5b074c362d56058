//! Pretty printer for the surface AST
//!
//! Renders terms back to the concrete grammar with minimal
//! parenthesization.

use std::fmt::{self, Display};

use crate::ast::expression::{BinOpKind, Expression};

/// Binding strength, loosest to tightest; a child rendered at a looser
/// level than its context gets parentheses.
const PREC_TERM: u8 = 0;
const PREC_CONCAT: u8 = 1;
const PREC_ADD: u8 = 2;
const PREC_MUL: u8 = 3;
const PREC_CALL: u8 = 4;

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_expression(self, f, PREC_TERM)
    }
}

fn format_expression(expr: &Expression, f: &mut fmt::Formatter<'_>, prec: u8) -> fmt::Result {
    match expr {
        Expression::Ident(ident) => write!(f, "{}", ident.value),
        Expression::Integer(int) => write!(f, "{}", int.value),
        Expression::Boolean(b) => write!(f, "{}", b.value),

        Expression::Lambda(lambda) => {
            open_paren(f, prec > PREC_TERM)?;
            match &lambda.annotation {
                Some(ty) => write!(f, r"\({}: {}) => ", lambda.param.value, ty)?,
                None => write!(f, r"\{} => ", lambda.param.value)?,
            }
            format_expression(&lambda.body, f, PREC_TERM)?;
            close_paren(f, prec > PREC_TERM)
        }

        Expression::Let(let_expr) => {
            open_paren(f, prec > PREC_TERM)?;
            write!(f, "let {} = ", let_expr.name.value)?;
            format_expression(&let_expr.value, f, PREC_TERM)?;
            write!(f, " in ")?;
            format_expression(&let_expr.body, f, PREC_TERM)?;
            close_paren(f, prec > PREC_TERM)
        }

        Expression::IfThenElse(if_expr) => {
            open_paren(f, prec > PREC_TERM)?;
            write!(f, "if ")?;
            format_expression(&if_expr.condition, f, PREC_TERM)?;
            write!(f, " then ")?;
            format_expression(&if_expr.then_branch, f, PREC_TERM)?;
            write!(f, " else ")?;
            format_expression(&if_expr.else_branch, f, PREC_TERM)?;
            close_paren(f, prec > PREC_TERM)
        }

        Expression::Ascription(ascription) => {
            open_paren(f, prec > PREC_TERM)?;
            format_expression(&ascription.term, f, PREC_CONCAT)?;
            write!(f, " : {}", ascription.ty)?;
            close_paren(f, prec > PREC_TERM)
        }

        Expression::Concat(concat) => {
            open_paren(f, prec > PREC_CONCAT)?;
            format_expression(&concat.left, f, PREC_CONCAT)?;
            write!(f, " ++ ")?;
            format_expression(&concat.right, f, PREC_ADD)?;
            close_paren(f, prec > PREC_CONCAT)
        }

        Expression::BinaryOp(binop) => {
            let level = match binop.op {
                BinOpKind::Add | BinOpKind::Sub => PREC_ADD,
                BinOpKind::Mul | BinOpKind::Div => PREC_MUL,
            };
            open_paren(f, prec > level)?;
            format_expression(&binop.left, f, level)?;
            write!(f, " {} ", binop.op.symbol())?;
            format_expression(&binop.right, f, level + 1)?;
            close_paren(f, prec > level)
        }

        Expression::FunctionCall(call) => {
            format_expression(&call.func, f, PREC_CALL)?;
            write!(f, "(")?;
            format_expression(&call.arg, f, PREC_TERM)?;
            write!(f, ")")
        }

        Expression::ListLiteral(list) => {
            write!(f, "[")?;
            for (i, item) in list.items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                format_expression(item, f, PREC_TERM)?;
            }
            write!(f, "]")
        }
    }
}

fn open_paren(f: &mut fmt::Formatter<'_>, needed: bool) -> fmt::Result {
    if needed {
        write!(f, "(")?;
    }
    Ok(())
}

fn close_paren(f: &mut fmt::Formatter<'_>, needed: bool) -> fmt::Result {
    if needed {
        write!(f, ")")?;
    }
    Ok(())
}
