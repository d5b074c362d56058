//! # Term Environment
//!
//! The typing context of the inference engine: a finite mapping from term
//! variables to their types.
//!
//! ## Design
//!
//! The environment is a single flat map, mutated in place:
//!
//! - entering a binder extends it, leaving the binder (on success *or*
//!   failure) removes the entry again;
//! - rebinding a name that is already bound is a scope error, raised by
//!   the caller before extending - shadowing is not allowed, so no parent
//!   chain is needed;
//! - whenever unification solves a variable, the solution is pushed
//!   through every stored type via [`TypeEnv::apply_subst`].
//!
//! Because there are no type schemes in HMF, the environment stores plain
//! [`Type`] values; a polymorphic binding is simply a stored `forall`.
//!
//! ## Free Type Variables
//!
//! Generalization quantifies the variables of a type that are *not* free
//! in the environment. [`TypeEnv::free_type_vars`] provides that set.
//!
//! ## Related Modules
//!
//! - [`crate::types::infer`] - Inference, which owns one environment per run
//! - [`crate::types::subst`] - Substitutions applied to the environment

use std::collections::{HashMap, HashSet};

use super::subst::Substitution;
use super::ty::{Name, Type};

/// Typing context mapping term-variable names to types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeEnv {
    bindings: HashMap<String, Type>,
}

impl TypeEnv {
    /// Create a new empty environment.
    pub fn empty() -> Self {
        TypeEnv {
            bindings: HashMap::new(),
        }
    }

    /// Look up a name.
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    /// True when `name` is bound.
    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bind `name` to `ty`.
    ///
    /// The caller is responsible for rejecting duplicates first (rebinding
    /// a user name is a scope error with its own diagnostic).
    pub fn bind(&mut self, name: String, ty: Type) {
        self.bindings.insert(name, ty);
    }

    /// Remove the binding for `name`.
    ///
    /// Called on every exit path of a binder, so a failed inference never
    /// leaves a stale entry behind.
    pub fn remove(&mut self, name: &str) {
        self.bindings.remove(name);
    }

    /// Get the set of type variables free in any stored type.
    pub fn free_type_vars(&self) -> HashSet<Name> {
        let mut free = HashSet::new();
        for ty in self.bindings.values() {
            free.extend(ty.free_type_vars());
        }
        free
    }

    /// Apply a substitution to every stored type, in place.
    ///
    /// Unification calls this in the same step that produces a binding, so
    /// no inference step ever observes a partially updated context.
    pub fn apply_subst(&mut self, subst: &Substitution) {
        if subst.is_empty() {
            return;
        }
        for ty in self.bindings.values_mut() {
            *ty = subst.apply(ty);
        }
    }
}
