//! Simplifier - type-preserving cleanup of elaborated terms.
//!
//! Inference is systematic about inserting type abstractions and
//! applications, which leaves harmless but noisy patterns behind. The
//! simplifier removes them:
//!
//! ```text
//! /\a => e [a]      ==>  e              (a not free in e)
//! (/\a => e) [t]    ==>  e[a := t]      (then simplified again)
//! ```
//!
//! Everything else is congruence. The rewrite never changes the type of
//! the term, and running it on its own output is the identity.

use crate::types::Type;

use super::CoreTerm;

/// Simplify an elaborated term.
pub fn simplify(term: &CoreTerm) -> CoreTerm {
    match term {
        CoreTerm::TyAbs(var, body) => {
            let body = simplify(body);
            // eta: the abstraction immediately re-applies its own variable
            if let CoreTerm::TyApp(inner, Type::Var(v)) = &body {
                if v == var && !inner.free_type_vars().contains(var) {
                    return (**inner).clone();
                }
            }
            CoreTerm::ty_abs(var.clone(), body)
        }

        CoreTerm::TyApp(inner, ty) => {
            let inner = simplify(inner);
            // beta: instantiation of a literal type abstraction
            if let CoreTerm::TyAbs(var, body) = inner {
                return simplify(&body.subst_ty_var(&var, ty));
            }
            CoreTerm::ty_app(inner, ty.clone())
        }

        CoreTerm::Var(_) | CoreTerm::Boolean(_) | CoreTerm::Integer(_) => term.clone(),

        CoreTerm::Lambda {
            param,
            param_ty,
            body,
        } => CoreTerm::Lambda {
            param: param.clone(),
            param_ty: param_ty.clone(),
            body: Box::new(simplify(body)),
        },

        CoreTerm::App(func, arg) => CoreTerm::app(simplify(func), simplify(arg)),

        CoreTerm::BinaryOp { op, left, right } => {
            CoreTerm::binop(*op, simplify(left), simplify(right))
        }

        CoreTerm::IfThenElse {
            condition,
            then_branch,
            else_branch,
        } => CoreTerm::if_then_else(
            simplify(condition),
            simplify(then_branch),
            simplify(else_branch),
        ),

        CoreTerm::ListLiteral { elem_ty, items } => CoreTerm::ListLiteral {
            elem_ty: elem_ty.clone(),
            items: items.iter().map(simplify).collect(),
        },

        CoreTerm::Concat(left, right) => CoreTerm::concat(simplify(left), simplify(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Name;

    fn tvar(id: usize) -> Type {
        Type::Var(Name::Auto(id))
    }

    #[test]
    fn test_eta_contraction() {
        // /\a => x [a]  ==>  x
        let term = CoreTerm::ty_abs(
            Name::Auto(0),
            CoreTerm::ty_app(CoreTerm::var("x"), tvar(0)),
        );
        assert_eq!(simplify(&term), CoreTerm::var("x"));
    }

    #[test]
    fn test_eta_blocked_by_free_occurrence() {
        // /\a => (\y: a => y) [a] keeps its abstraction: a is free in the body
        let inner = CoreTerm::lambda("y", tvar(0), CoreTerm::var("y"));
        let term = CoreTerm::ty_abs(Name::Auto(0), CoreTerm::ty_app(inner, tvar(0)));
        assert_eq!(simplify(&term), term);
    }

    #[test]
    fn test_beta_reduction() {
        // (/\a => \x: a => x) [Int]  ==>  \x: Int => x
        let abs = CoreTerm::ty_abs(
            Name::Auto(0),
            CoreTerm::lambda("x", tvar(0), CoreTerm::var("x")),
        );
        let term = CoreTerm::ty_app(abs, Type::int());
        assert_eq!(
            simplify(&term),
            CoreTerm::lambda("x", Type::int(), CoreTerm::var("x"))
        );
    }

    #[test]
    fn test_beta_result_resimplified() {
        // (/\a => /\b => x [b] [a]) [Int] needs a second round after
        // substitution
        let inner = CoreTerm::ty_abs(
            Name::Auto(1),
            CoreTerm::ty_app(CoreTerm::ty_app(CoreTerm::var("x"), tvar(1)), tvar(0)),
        );
        let term = CoreTerm::ty_app(CoreTerm::ty_abs(Name::Auto(0), inner), Type::int());
        // ==> /\b => x [b] [Int]
        let expected = CoreTerm::ty_abs(
            Name::Auto(1),
            CoreTerm::ty_app(CoreTerm::ty_app(CoreTerm::var("x"), tvar(1)), Type::int()),
        );
        assert_eq!(simplify(&term), expected);
    }

    #[test]
    fn test_congruence() {
        let redex = CoreTerm::ty_abs(
            Name::Auto(0),
            CoreTerm::ty_app(CoreTerm::var("f"), tvar(0)),
        );
        let term = CoreTerm::app(redex, CoreTerm::Integer(1));
        assert_eq!(
            simplify(&term),
            CoreTerm::app(CoreTerm::var("f"), CoreTerm::Integer(1))
        );
    }

    #[test]
    fn test_simplify_idempotent() {
        let abs = CoreTerm::ty_abs(
            Name::Auto(0),
            CoreTerm::lambda("x", tvar(0), CoreTerm::var("x")),
        );
        let term = CoreTerm::app(
            CoreTerm::ty_app(abs, Type::int()),
            CoreTerm::Integer(42),
        );
        let once = simplify(&term);
        assert_eq!(simplify(&once), once);
    }
}
