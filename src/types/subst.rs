//! # Type Substitutions
//!
//! This module implements the substitutions produced by unification and
//! subsumption: finite mappings from type variables to types.
//!
//! ## Idempotence
//!
//! Every substitution in the engine is kept *idempotent*: no variable in
//! the domain occurs free in any type of the codomain, so applying a
//! substitution twice is the same as applying it once. Construction
//! asserts this invariant; violating it is an internal error, never a
//! user-facing diagnostic.
//!
//! ## Composition
//!
//! `compose` is diagrammatic: `s1.compose(&s2)` first acts as `s1`, then
//! as `s2`.
//!
//! ```text
//! s1 = {a := b}
//! s2 = {b := Int}
//!
//! s1.compose(&s2) = {a := Int, b := Int}
//! ```
//!
//! Composition is used throughout inference to accumulate the solutions
//! discovered by successive unifications. It is not commutative.
//!
//! ## Related Modules
//!
//! - [`crate::types::ty`] - Type definitions that substitutions apply to
//! - [`crate::types::unify`] - Unification, which produces substitutions
//! - [`crate::types::env`] - Environments, which substitutions update

use std::collections::HashMap;

use super::ty::{Name, Type};

/// A finite, idempotent mapping from type variables to types.
///
/// # Example
///
/// ```text
/// let subst = Substitution::singleton(a, Type::int());
/// subst.apply(&Type::func(Type::Var(a), Type::bool()))
///     // Int -> Bool
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution(HashMap<Name, Type>);

impl Substitution {
    /// Create an empty substitution (the identity).
    pub fn empty() -> Self {
        Substitution(HashMap::new())
    }

    /// Create a substitution with a single mapping `var := ty`.
    ///
    /// # Panics
    ///
    /// Panics if `var` occurs free in `ty`: the caller has violated the
    /// occurs check, and the binding would not be idempotent.
    pub fn singleton(var: Name, ty: Type) -> Self {
        let mut map = HashMap::new();
        map.insert(var, ty);
        let subst = Substitution(map);
        subst.assert_idempotent();
        subst
    }

    /// True when this substitution has no mappings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the mapping for a variable, if any.
    pub fn get(&self, var: &Name) -> Option<&Type> {
        self.0.get(var)
    }

    /// Apply this substitution to a type.
    ///
    /// Replaces every free variable of the type that has a mapping; a
    /// quantifier shadows any mapping for its bound variable.
    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(v) => self.0.get(v).cloned().unwrap_or_else(|| ty.clone()),
            Type::Con(name, args) => {
                Type::Con(name.clone(), args.iter().map(|a| self.apply(a)).collect())
            }
            Type::ForAll(v, body) => {
                if self.0.contains_key(v) {
                    let shadowed = self.remove_keys(std::slice::from_ref(v));
                    Type::ForAll(v.clone(), Box::new(shadowed.apply(body)))
                } else {
                    Type::ForAll(v.clone(), Box::new(self.apply(body)))
                }
            }
        }
    }

    /// Compose this substitution with another, diagrammatically: the
    /// result first acts as `self`, then as `other`.
    ///
    /// The domain is the union of both domains; a variable bound by both
    /// maps to `other.apply(self(var))`. Identity bindings that arise are
    /// dropped, and the result is asserted idempotent.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut map = HashMap::new();

        // Map `other` over the codomain of `self`
        for (var, ty) in &self.0 {
            let ty = other.apply(ty);
            if !matches!(&ty, Type::Var(v) if v == var) {
                map.insert(var.clone(), ty);
            }
        }

        // Union with `other`'s own bindings
        for (var, ty) in &other.0 {
            if !map.contains_key(var) && !self.0.contains_key(var) {
                map.insert(var.clone(), ty.clone());
            }
        }

        let subst = Substitution(map);
        subst.assert_idempotent();
        subst
    }

    /// Restrict this substitution to the complement of `keys`.
    pub fn remove_keys(&self, keys: &[Name]) -> Substitution {
        Substitution(
            self.0
                .iter()
                .filter(|(var, _)| !keys.contains(var))
                .map(|(var, ty)| (var.clone(), ty.clone()))
                .collect(),
        )
    }

    /// Check whether the constructor `con` occurs in the codomain.
    ///
    /// This is the escape check for skolem constants: a skolem that shows
    /// up in a substitution has leaked out of the judgement that created
    /// it.
    pub fn contains_con(&self, con: &Name) -> bool {
        self.0.values().any(|ty| ty.contains_con(con))
    }

    fn assert_idempotent(&self) {
        for ty in self.0.values() {
            for var in ty.free_type_vars() {
                assert!(
                    !self.0.contains_key(&var),
                    "internal error: substitution is not idempotent, {} is bound and free",
                    var
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto(id: usize) -> Name {
        Name::Auto(id)
    }

    #[test]
    fn test_empty_substitution() {
        let subst = Substitution::empty();
        let ty = Type::int();
        assert_eq!(subst.apply(&ty), ty);
    }

    #[test]
    fn test_singleton_substitution() {
        let subst = Substitution::singleton(auto(0), Type::int());
        assert_eq!(subst.apply(&Type::Var(auto(0))), Type::int());
    }

    #[test]
    #[should_panic(expected = "not idempotent")]
    fn test_singleton_occurs_violation() {
        Substitution::singleton(auto(0), Type::list(Type::Var(auto(0))));
    }

    #[test]
    fn test_apply_to_function() {
        let subst = Substitution::singleton(auto(0), Type::int());
        let ty = Type::func(Type::Var(auto(0)), Type::bool());
        assert_eq!(subst.apply(&ty), Type::func(Type::int(), Type::bool()));
    }

    #[test]
    fn test_apply_preserves_unbound_vars() {
        let subst = Substitution::singleton(auto(0), Type::int());
        let ty = Type::Var(auto(1));
        assert_eq!(subst.apply(&ty), ty);
    }

    #[test]
    fn test_apply_respects_quantifier_shadowing() {
        let subst = Substitution::singleton(auto(0), Type::int());
        let ty = Type::ForAll(auto(0), Box::new(Type::Var(auto(0))));
        assert_eq!(subst.apply(&ty), ty);
    }

    #[test]
    fn test_apply_under_quantifier() {
        let subst = Substitution::singleton(auto(0), Type::int());
        let ty = Type::ForAll(
            auto(1),
            Box::new(Type::func(Type::Var(auto(1)), Type::Var(auto(0)))),
        );
        let expected = Type::ForAll(
            auto(1),
            Box::new(Type::func(Type::Var(auto(1)), Type::int())),
        );
        assert_eq!(subst.apply(&ty), expected);
    }

    #[test]
    fn test_compose_substitutions() {
        let s1 = Substitution::singleton(auto(0), Type::Var(auto(1)));
        let s2 = Substitution::singleton(auto(1), Type::int());

        let composed = s1.compose(&s2);

        assert_eq!(composed.apply(&Type::Var(auto(0))), Type::int());
        assert_eq!(composed.apply(&Type::Var(auto(1))), Type::int());
    }

    #[test]
    fn test_compose_is_idempotent() {
        let s1 = Substitution::singleton(auto(0), Type::list(Type::Var(auto(1))));
        let s2 = Substitution::singleton(auto(1), Type::int());
        let composed = s1.compose(&s2);

        let ty = Type::func(Type::Var(auto(0)), Type::Var(auto(1)));
        let once = composed.apply(&ty);
        assert_eq!(composed.apply(&once), once);
    }

    #[test]
    fn test_compose_drops_identity_bindings() {
        let s1 = Substitution::singleton(auto(0), Type::Var(auto(1)));
        let s2 = Substitution::singleton(auto(1), Type::Var(auto(0)));
        // a := b then b := a collapses to b := a only
        let composed = s1.compose(&s2);
        assert_eq!(composed.get(&auto(0)), None);
        assert_eq!(composed.get(&auto(1)), Some(&Type::Var(auto(0))));
    }

    #[test]
    fn test_remove_keys() {
        let s1 = Substitution::singleton(auto(0), Type::int());
        let s2 = Substitution::singleton(auto(1), Type::bool());
        let subst = s1.compose(&s2);

        let restricted = subst.remove_keys(&[auto(0)]);
        assert_eq!(restricted.get(&auto(0)), None);
        assert_eq!(restricted.get(&auto(1)), Some(&Type::bool()));
    }

    #[test]
    fn test_contains_con() {
        let skolem = auto(9);
        let subst = Substitution::singleton(auto(0), Type::Con(skolem.clone(), vec![]));
        assert!(subst.contains_con(&skolem));
        assert!(!subst.contains_con(&auto(8)));
    }
}
