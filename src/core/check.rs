//! Type checking for core terms.
//!
//! Core terms carry enough annotations to be checked without inference:
//! lambdas have parameter types, type abstraction and application are
//! explicit, list literals know their element type. This checker is the
//! independent judgement against which elaboration is validated - an error
//! here means the elaborator produced an ill-typed term, not that the user
//! wrote a bad program.
//!
//! Types are compared up to alpha-equivalence throughout; elaboration
//! freely renames quantified variables.

use std::collections::HashMap;
use std::fmt;

use crate::types::{Name, Type};
use crate::types::ty::LIST;

use super::CoreTerm;

/// Error in an elaborated term. These indicate elaborator bugs.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreTypeError {
    UnboundVariable { name: String },
    NotAFunction { ty: Type },
    NotAQuantifier { ty: Type },
    NotAList { ty: Type },
    Mismatch { expected: Type, found: Type },
}

impl fmt::Display for CoreTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoreTypeError::UnboundVariable { name } => {
                write!(f, "core term error: unbound variable {}", name)
            }
            CoreTypeError::NotAFunction { ty } => {
                write!(f, "core term error: applied a non-function of type {}", ty)
            }
            CoreTypeError::NotAQuantifier { ty } => {
                write!(
                    f,
                    "core term error: type application of a non-quantified type {}",
                    ty
                )
            }
            CoreTypeError::NotAList { ty } => {
                write!(f, "core term error: concatenated a non-list of type {}", ty)
            }
            CoreTypeError::Mismatch { expected, found } => {
                write!(
                    f,
                    "core term error: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for CoreTypeError {}

/// Type a closed core term.
pub fn check_term(term: &CoreTerm) -> Result<Type, CoreTypeError> {
    check(&mut HashMap::new(), term)
}

fn check(env: &mut HashMap<String, Type>, term: &CoreTerm) -> Result<Type, CoreTypeError> {
    match term {
        CoreTerm::Var(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| CoreTypeError::UnboundVariable { name: name.clone() }),

        CoreTerm::Lambda {
            param,
            param_ty,
            body,
        } => {
            let previous = env.insert(param.clone(), param_ty.clone());
            let body_ty = check(env, body);
            match previous {
                Some(ty) => {
                    env.insert(param.clone(), ty);
                }
                None => {
                    env.remove(param);
                }
            }
            Ok(Type::func(param_ty.clone(), body_ty?))
        }

        CoreTerm::App(func, arg) => {
            let func_ty = check(env, func)?;
            let Some((dom, cod)) = func_ty.split_func() else {
                return Err(CoreTypeError::NotAFunction { ty: func_ty.clone() });
            };
            let arg_ty = check(env, arg)?;
            if !arg_ty.alpha_eq(dom) {
                return Err(CoreTypeError::Mismatch {
                    expected: dom.clone(),
                    found: arg_ty,
                });
            }
            Ok(cod.clone())
        }

        CoreTerm::TyAbs(var, body) => {
            let body_ty = check(env, body)?;
            Ok(Type::ForAll(var.clone(), Box::new(body_ty)))
        }

        CoreTerm::TyApp(inner, ty) => {
            let inner_ty = check(env, inner)?;
            match inner_ty {
                Type::ForAll(var, body) => Ok(body.subst_var(&var, ty)),
                other => Err(CoreTypeError::NotAQuantifier { ty: other }),
            }
        }

        CoreTerm::Boolean(_) => Ok(Type::bool()),
        CoreTerm::Integer(_) => Ok(Type::int()),

        CoreTerm::BinaryOp { left, right, .. } => {
            for operand in [left, right] {
                let ty = check(env, operand)?;
                if !ty.alpha_eq(&Type::int()) {
                    return Err(CoreTypeError::Mismatch {
                        expected: Type::int(),
                        found: ty,
                    });
                }
            }
            Ok(Type::int())
        }

        CoreTerm::IfThenElse {
            condition,
            then_branch,
            else_branch,
        } => {
            let cond_ty = check(env, condition)?;
            if !cond_ty.alpha_eq(&Type::bool()) {
                return Err(CoreTypeError::Mismatch {
                    expected: Type::bool(),
                    found: cond_ty,
                });
            }
            let then_ty = check(env, then_branch)?;
            let else_ty = check(env, else_branch)?;
            if !then_ty.alpha_eq(&else_ty) {
                return Err(CoreTypeError::Mismatch {
                    expected: then_ty,
                    found: else_ty,
                });
            }
            Ok(then_ty)
        }

        CoreTerm::ListLiteral { elem_ty, items } => {
            for item in items {
                let ty = check(env, item)?;
                if !ty.alpha_eq(elem_ty) {
                    return Err(CoreTypeError::Mismatch {
                        expected: elem_ty.clone(),
                        found: ty,
                    });
                }
            }
            Ok(Type::list(elem_ty.clone()))
        }

        CoreTerm::Concat(left, right) => {
            let left_ty = check(env, left)?;
            if !is_list(&left_ty) {
                return Err(CoreTypeError::NotAList { ty: left_ty });
            }
            let right_ty = check(env, right)?;
            if !left_ty.alpha_eq(&right_ty) {
                return Err(CoreTypeError::Mismatch {
                    expected: left_ty,
                    found: right_ty,
                });
            }
            Ok(left_ty)
        }
    }
}

fn is_list(ty: &Type) -> bool {
    matches!(ty, Type::Con(Name::Named(name), args) if name == LIST && args.len() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tvar(id: usize) -> Type {
        Type::Var(Name::Auto(id))
    }

    #[test]
    fn test_check_literal() {
        assert_eq!(check_term(&CoreTerm::Boolean(true)), Ok(Type::bool()));
        assert_eq!(check_term(&CoreTerm::Integer(42)), Ok(Type::int()));
    }

    #[test]
    fn test_check_identity() {
        // /\a => \x: a => x  :  forall a. a -> a
        let term = CoreTerm::ty_abs(
            Name::Auto(0),
            CoreTerm::lambda("x", tvar(0), CoreTerm::var("x")),
        );
        let ty = check_term(&term).unwrap();
        let expected = Type::ForAll(Name::Auto(0), Box::new(Type::func(tvar(0), tvar(0))));
        assert!(ty.alpha_eq(&expected));
    }

    #[test]
    fn test_check_type_application() {
        let id = CoreTerm::ty_abs(
            Name::Auto(0),
            CoreTerm::lambda("x", tvar(0), CoreTerm::var("x")),
        );
        let term = CoreTerm::app(
            CoreTerm::ty_app(id, Type::int()),
            CoreTerm::Integer(1),
        );
        assert_eq!(check_term(&term), Ok(Type::int()));
    }

    #[test]
    fn test_check_unbound_variable() {
        let result = check_term(&CoreTerm::var("x"));
        assert!(matches!(
            result,
            Err(CoreTypeError::UnboundVariable { .. })
        ));
    }

    #[test]
    fn test_check_application_mismatch() {
        let f = CoreTerm::lambda("x", Type::int(), CoreTerm::var("x"));
        let term = CoreTerm::app(f, CoreTerm::Boolean(true));
        assert!(matches!(result_of(term), Err(CoreTypeError::Mismatch { .. })));
    }

    #[test]
    fn test_check_non_function_application() {
        let term = CoreTerm::app(CoreTerm::Integer(1), CoreTerm::Integer(2));
        assert!(matches!(
            result_of(term),
            Err(CoreTypeError::NotAFunction { .. })
        ));
    }

    #[test]
    fn test_check_branch_types_up_to_alpha() {
        // Both branches are identity functions with differently named binders
        let id = |var: usize| {
            CoreTerm::ty_abs(
                Name::Auto(var),
                CoreTerm::lambda("x", tvar(var), CoreTerm::var("x")),
            )
        };
        let term = CoreTerm::if_then_else(CoreTerm::Boolean(true), id(0), id(1));
        assert!(check_term(&term).is_ok());
    }

    #[test]
    fn test_check_empty_list() {
        let term = CoreTerm::ListLiteral {
            elem_ty: Type::int(),
            items: vec![],
        };
        assert_eq!(check_term(&term), Ok(Type::list(Type::int())));
    }

    #[test]
    fn test_check_list_element_mismatch() {
        let term = CoreTerm::ListLiteral {
            elem_ty: Type::int(),
            items: vec![CoreTerm::Boolean(true)],
        };
        assert!(matches!(result_of(term), Err(CoreTypeError::Mismatch { .. })));
    }

    #[test]
    fn test_check_concat() {
        let nil = CoreTerm::ListLiteral {
            elem_ty: Type::int(),
            items: vec![],
        };
        let term = CoreTerm::concat(nil.clone(), nil);
        assert_eq!(check_term(&term), Ok(Type::list(Type::int())));
    }

    #[test]
    fn test_check_concat_non_list() {
        let term = CoreTerm::concat(CoreTerm::Integer(1), CoreTerm::Integer(2));
        assert!(matches!(result_of(term), Err(CoreTypeError::NotAList { .. })));
    }

    fn result_of(term: CoreTerm) -> Result<Type, CoreTypeError> {
        check_term(&term)
    }
}
