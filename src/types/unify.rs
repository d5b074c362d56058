//! Most general unification, including under quantifiers.
//!
//! `unify` computes a most general unifier of two types and, in the same
//! step, applies every binding it discovers to the term environment - no
//! inference step ever sees a half-updated context.
//!
//! Quantified types are compared by skolemization: both bodies are
//! instantiated with one fresh rigid constructor, and the bodies must
//! unify without that constructor leaking into the resulting
//! substitution.
//!
//! There is no separate occurs check: a variable is only ever bound when
//! it does not occur in the other side, and every remaining case
//! (including the would-be infinite types) falls through to the shape
//! mismatch at the end.

use lachs::Span;

use super::error::TypeError;
use super::infer::Infer;
use super::subst::Substitution;
use super::ty::{Name, Type};

fn occurs_in(var: &Name, ty: &Type) -> bool {
    ty.free_type_vars().contains(var)
}

impl Infer {
    /// Unify two types, returning their most general unifier.
    ///
    /// The resulting substitution has already been applied to the
    /// environment when this returns. `t1` is the found type, `t2` the
    /// expected one; both appear in the diagnostic on failure.
    pub fn unify(
        &mut self,
        t1: &Type,
        t2: &Type,
        span: &Span,
    ) -> Result<Substitution, TypeError> {
        match (t1, t2) {
            // Identical variables unify with the empty substitution
            (Type::Var(v1), Type::Var(v2)) if v1 == v2 => Ok(Substitution::empty()),

            // A variable on either side is bound, provided the binding
            // would not be recursive
            (Type::Var(var), ty) | (ty, Type::Var(var)) if !occurs_in(var, ty) => {
                let subst = Substitution::singleton(var.clone(), ty.clone());
                self.env.apply_subst(&subst);
                Ok(subst)
            }

            // Same constructor at the same arity: unify the arguments
            // left to right, threading the accumulated substitution
            (Type::Con(c1, args1), Type::Con(c2, args2))
                if c1 == c2 && args1.len() == args2.len() =>
            {
                let mut subst = Substitution::empty();
                for (a1, a2) in args1.iter().zip(args2) {
                    let s = self.unify(&subst.apply(a1), &subst.apply(a2), span)?;
                    subst = subst.compose(&s);
                }
                Ok(subst)
            }

            // Two quantifiers: skolemize both bodies with one fresh rigid
            // constructor; the constructor must not survive into the
            // unifier, or the quantifiers were not equivalent
            (Type::ForAll(v1, b1), Type::ForAll(v2, b2)) => {
                let skolem = self.fresh_skolem();
                let skolem_ty = Type::Con(skolem.clone(), vec![]);
                let subst = self.unify(
                    &b1.subst_var(v1, &skolem_ty),
                    &b2.subst_var(v2, &skolem_ty),
                    span,
                )?;
                if subst.contains_con(&skolem) {
                    return Err(TypeError::mismatch(t2.clone(), t1.clone(), span.clone()));
                }
                Ok(subst)
            }

            _ => Err(TypeError::mismatch(t2.clone(), t1.clone(), span.clone())),
        }
    }
}
