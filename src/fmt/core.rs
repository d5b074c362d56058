//! Pretty printer for core terms
//!
//! Renders the explicit language: every lambda parameter is annotated,
//! type abstraction prints as `/\a => e`, type application as `e [t]`.
//! An empty list literal keeps its element type visible, everything else
//! reads like the surface syntax.

use std::fmt::{self, Display};

use crate::ast::expression::BinOpKind;
use crate::core::CoreTerm;

const PREC_TERM: u8 = 0;
const PREC_CONCAT: u8 = 1;
const PREC_ADD: u8 = 2;
const PREC_MUL: u8 = 3;
const PREC_CALL: u8 = 4;

impl Display for CoreTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_term(self, f, PREC_TERM)
    }
}

fn format_term(term: &CoreTerm, f: &mut fmt::Formatter<'_>, prec: u8) -> fmt::Result {
    match term {
        CoreTerm::Var(name) => write!(f, "{}", name),
        CoreTerm::Integer(value) => write!(f, "{}", value),
        CoreTerm::Boolean(value) => write!(f, "{}", value),

        CoreTerm::Lambda {
            param,
            param_ty,
            body,
        } => {
            open_paren(f, prec > PREC_TERM)?;
            write!(f, r"\({}: {}) => ", param, param_ty)?;
            format_term(body, f, PREC_TERM)?;
            close_paren(f, prec > PREC_TERM)
        }

        CoreTerm::TyAbs(var, body) => {
            open_paren(f, prec > PREC_TERM)?;
            write!(f, r"/\{} => ", var)?;
            format_term(body, f, PREC_TERM)?;
            close_paren(f, prec > PREC_TERM)
        }

        CoreTerm::TyApp(inner, ty) => {
            open_paren(f, prec > PREC_CALL)?;
            format_term(inner, f, PREC_CALL)?;
            write!(f, " [{}]", ty)?;
            close_paren(f, prec > PREC_CALL)
        }

        CoreTerm::App(func, arg) => {
            format_term(func, f, PREC_CALL)?;
            write!(f, "(")?;
            format_term(arg, f, PREC_TERM)?;
            write!(f, ")")
        }

        CoreTerm::BinaryOp { op, left, right } => {
            let level = match op {
                BinOpKind::Add | BinOpKind::Sub => PREC_ADD,
                BinOpKind::Mul | BinOpKind::Div => PREC_MUL,
            };
            open_paren(f, prec > level)?;
            format_term(left, f, level)?;
            write!(f, " {} ", op.symbol())?;
            format_term(right, f, level + 1)?;
            close_paren(f, prec > level)
        }

        CoreTerm::IfThenElse {
            condition,
            then_branch,
            else_branch,
        } => {
            open_paren(f, prec > PREC_TERM)?;
            write!(f, "if ")?;
            format_term(condition, f, PREC_TERM)?;
            write!(f, " then ")?;
            format_term(then_branch, f, PREC_TERM)?;
            write!(f, " else ")?;
            format_term(else_branch, f, PREC_TERM)?;
            close_paren(f, prec > PREC_TERM)
        }

        CoreTerm::ListLiteral { elem_ty, items } => {
            if items.is_empty() {
                // Keep the element type visible on an empty literal
                return write!(f, "([] : [{}])", elem_ty);
            }
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                format_term(item, f, PREC_TERM)?;
            }
            write!(f, "]")
        }

        CoreTerm::Concat(left, right) => {
            open_paren(f, prec > PREC_CONCAT)?;
            format_term(left, f, PREC_CONCAT)?;
            write!(f, " ++ ")?;
            format_term(right, f, PREC_ADD)?;
            close_paren(f, prec > PREC_CONCAT)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Name, Type};

    #[test]
    fn test_format_identity_elaboration() {
        let term = CoreTerm::ty_abs(
            Name::Auto(0),
            CoreTerm::lambda(
                "x",
                Type::Var(Name::Auto(0)),
                CoreTerm::var("x"),
            ),
        );
        assert_eq!(term.to_string(), r"/\'t0 => \(x: 't0) => x");
    }

    #[test]
    fn test_format_type_application() {
        let term = CoreTerm::app(
            CoreTerm::ty_app(CoreTerm::var("id"), Type::int()),
            CoreTerm::Integer(42),
        );
        assert_eq!(term.to_string(), "id [Int](42)");
    }

    #[test]
    fn test_format_empty_list_keeps_type() {
        let term = CoreTerm::ListLiteral {
            elem_ty: Type::int(),
            items: vec![],
        };
        assert_eq!(term.to_string(), "([] : [Int])");
    }
}
