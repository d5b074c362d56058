//! # Core Type System Definitions
//!
//! This module defines the foundational types of the HMF inference engine:
//! names, types, and the structural operations on them (free variables,
//! substitution of single variables and constructors, alpha-equivalence).
//!
//! ## Overview
//!
//! Unlike plain Hindley-Milner there is no separate "type scheme": a
//! quantifier is an ordinary type former and may appear anywhere in a type.
//!
//! - **Name** - A user-written or generated name (type variables and type
//!   constructors each draw from their own namespace of these)
//! - **Type** - Variables, constructor applications, and quantified types
//!
//! ## Types
//!
//! The primitive constructors are:
//!
//! - `Bool` (arity 0)
//! - `Int` (arity 0)
//! - `List` (arity 1)
//! - `Arrow` (arity 2) - the function arrow, uniformly a binary constructor
//!
//! Example types:
//!
//! ```text
//! Con("Int", [])                                  // Int
//! Con("Arrow", [Int, Bool])                       // Int -> Bool
//! Con("List", [Var(a)])                           // [a]
//! ForAll(a, Con("Arrow", [Var(a), Var(a)]))       // forall a. a -> a
//! ```
//!
//! ## Names
//!
//! A name is either user-supplied (`Named`) or generated from a counter
//! (`Auto`). Generated names can never collide with user names, which the
//! inference engine relies on: fresh unification variables and skolem
//! constructors are always `Auto`.
//!
//! ## Related Modules
//!
//! - [`crate::types::subst`] - Finite substitutions over these types
//! - [`crate::types::infer`] - Type inference producing these types
//! - [`crate::types::env`] - Term environment storing these types

use std::fmt;

/// The constructor name of the boolean type.
pub const BOOL: &str = "Bool";
/// The constructor name of the integer type.
pub const INT: &str = "Int";
/// The constructor name of the list type (arity 1).
pub const LIST: &str = "List";
/// The constructor name of the function arrow (arity 2).
pub const ARROW: &str = "Arrow";

/// A name with two origins: written by the user, or generated by the
/// engine from a counter.
///
/// Names are used for type variables and for type constructors (each kind
/// keeps to its own namespace, so a variable named `a` and a constructor
/// named `a` never meet). The two origins are disjoint by construction:
/// no sequence of fresh-name allocations can produce a `Named`.
///
/// # Example
///
/// ```text
/// Name::named("a")   // user-written
/// Name::Auto(3)      // third generated name
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Name {
    Named(String),
    Auto(usize),
}

impl Name {
    /// Create a user-supplied name.
    pub fn named(name: impl Into<String>) -> Self {
        Name::Named(name.into())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Name::Named(name) => write!(f, "{}", name),
            Name::Auto(id) => write!(f, "'t{}", id),
        }
    }
}

/// All possible types.
///
/// # Variants
///
/// * `Var` - A type variable; during inference either a unification
///   variable or a variable bound by an enclosing `ForAll`
/// * `Con` - A type constructor applied to exactly as many arguments as
///   its declared arity
/// * `ForAll` - Universal quantification, binding one variable in the body
///
/// # Examples
///
/// ```text
/// Type::int()                            // Int
/// Type::func(Type::int(), Type::bool()) // Int -> Bool
/// Type::list(Type::int())               // [Int]
/// Type::ForAll(a, ...)                  // forall a. ...
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Var(Name),
    Con(Name, Vec<Type>),
    ForAll(Name, Box<Type>),
}

impl Type {
    /// The boolean type.
    pub fn bool() -> Self {
        Type::Con(Name::named(BOOL), vec![])
    }

    /// The integer type.
    pub fn int() -> Self {
        Type::Con(Name::named(INT), vec![])
    }

    /// The list type with the given element type.
    pub fn list(elem: Type) -> Self {
        Type::Con(Name::named(LIST), vec![elem])
    }

    /// Create a function type from parameter and return types.
    pub fn func(t1: Type, t2: Type) -> Self {
        Type::Con(Name::named(ARROW), vec![t1, t2])
    }

    /// A type variable with the given user-supplied name.
    pub fn var(name: impl Into<String>) -> Self {
        Type::Var(Name::named(name))
    }

    /// Split a function type into parameter and return type.
    ///
    /// Returns `None` when the type is not headed by the arrow constructor.
    pub fn split_func(&self) -> Option<(&Type, &Type)> {
        match self {
            Type::Con(Name::Named(name), args) if name == ARROW && args.len() == 2 => {
                Some((&args[0], &args[1]))
            }
            _ => None,
        }
    }

    /// Strip all outer quantifiers, returning the bound variables
    /// (outermost first) and the quantifier-free body.
    pub fn peel_quantifiers(&self) -> (Vec<Name>, &Type) {
        let mut vars = Vec::new();
        let mut body = self;
        while let Type::ForAll(var, inner) = body {
            vars.push(var.clone());
            body = inner;
        }
        (vars, body)
    }

    /// Get the free type variables of this type.
    ///
    /// The result is deduplicated and ordered by first occurrence
    /// (left-to-right, outside-in). Generalization's binder order is
    /// defined by this, so it deliberately returns a `Vec` and not a set.
    ///
    /// # Examples
    ///
    /// ```text
    /// (a -> b).free_type_vars()            // [a, b]
    /// (b -> a -> b).free_type_vars()       // [b, a]
    /// (forall a. a -> b).free_type_vars()  // [b]
    /// ```
    pub fn free_type_vars(&self) -> Vec<Name> {
        let mut free = Vec::new();
        let mut bound = Vec::new();
        self.collect_free(&mut bound, &mut free);
        free
    }

    pub(crate) fn collect_free(&self, bound: &mut Vec<Name>, free: &mut Vec<Name>) {
        match self {
            Type::Var(v) => {
                if !bound.contains(v) && !free.contains(v) {
                    free.push(v.clone());
                }
            }
            Type::Con(_, args) => {
                for arg in args {
                    arg.collect_free(bound, free);
                }
            }
            Type::ForAll(var, body) => {
                bound.push(var.clone());
                body.collect_free(bound, free);
                bound.pop();
            }
        }
    }

    /// Substitute `replacement` for every free occurrence of the type
    /// variable `var`.
    ///
    /// Substitution stops at a quantifier that rebinds `var`. No renaming
    /// is performed: every binder in play is fresh by construction
    /// (annotations are sanitized before use, generated names are unique),
    /// so capture cannot occur.
    pub fn subst_var(&self, var: &Name, replacement: &Type) -> Type {
        match self {
            Type::Var(v) if v == var => replacement.clone(),
            Type::Var(_) => self.clone(),
            Type::Con(name, args) => Type::Con(
                name.clone(),
                args.iter().map(|a| a.subst_var(var, replacement)).collect(),
            ),
            Type::ForAll(v, _) if v == var => self.clone(),
            Type::ForAll(v, body) => {
                debug_assert!(
                    !replacement.free_type_vars().contains(v),
                    "substitution would capture bound variable {v}"
                );
                Type::ForAll(v.clone(), Box::new(body.subst_var(var, replacement)))
            }
        }
    }

    /// Substitute `replacement` for every occurrence of the nullary
    /// constructor `con`.
    ///
    /// Used to eliminate skolem constants: a skolem is an ordinary arity-0
    /// constructor with a generated name, and constructors are never bound,
    /// so this is a full traversal.
    pub fn subst_con(&self, con: &Name, replacement: &Type) -> Type {
        match self {
            Type::Var(_) => self.clone(),
            Type::Con(name, args) if name == con && args.is_empty() => replacement.clone(),
            Type::Con(name, args) => Type::Con(
                name.clone(),
                args.iter().map(|a| a.subst_con(con, replacement)).collect(),
            ),
            Type::ForAll(v, body) => {
                Type::ForAll(v.clone(), Box::new(body.subst_con(con, replacement)))
            }
        }
    }

    /// Check whether the constructor `con` occurs anywhere in this type.
    pub fn contains_con(&self, con: &Name) -> bool {
        match self {
            Type::Var(_) => false,
            Type::Con(name, args) => name == con || args.iter().any(|a| a.contains_con(con)),
            Type::ForAll(_, body) => body.contains_con(con),
        }
    }

    /// Structural equality up to renaming of quantified variables.
    ///
    /// ```text
    /// forall a. a -> a  =α=  forall b. b -> b
    /// forall a. a -> b  ≠α   forall b. b -> b   (b is free on the left)
    /// ```
    pub fn alpha_eq(&self, other: &Type) -> bool {
        fn go(t1: &Type, t2: &Type, pairs: &mut Vec<(Name, Name)>) -> bool {
            match (t1, t2) {
                (Type::Var(a), Type::Var(b)) => {
                    let p1 = pairs.iter().rposition(|(x, _)| x == a);
                    let p2 = pairs.iter().rposition(|(_, y)| y == b);
                    p1 == p2 && (p1.is_some() || a == b)
                }
                (Type::Con(c1, args1), Type::Con(c2, args2)) => {
                    c1 == c2
                        && args1.len() == args2.len()
                        && args1.iter().zip(args2).all(|(a1, a2)| go(a1, a2, pairs))
                }
                (Type::ForAll(a, b1), Type::ForAll(b, b2)) => {
                    pairs.push((a.clone(), b.clone()));
                    let result = go(b1, b2, pairs);
                    pairs.pop();
                    result
                }
                _ => false,
            }
        }
        go(self, other, &mut Vec::new())
    }

    /// Convert this type to its concrete-syntax representation.
    ///
    /// # Examples
    ///
    /// ```text
    /// Int.pretty()                     // "Int"
    /// (Int -> Bool).pretty()           // "Int -> Bool"
    /// ((Int -> Int) -> Bool).pretty()  // "(Int -> Int) -> Bool"
    /// [Int].pretty()                   // "[Int]"
    /// (forall a. a -> a).pretty()      // "forall a. a -> a"
    /// ```
    ///
    /// Generated type variables render as `'t0`, `'t1`, ...; generated
    /// constructors (skolems) as `#0`, `#1`, ...
    pub fn pretty(&self) -> String {
        match self {
            Type::Var(name) => name.to_string(),
            Type::Con(name, args) => match name {
                Name::Named(n) if n == ARROW && args.len() == 2 => {
                    let dom = if args[0].split_func().is_some()
                        || matches!(args[0], Type::ForAll(_, _))
                    {
                        format!("({})", args[0].pretty())
                    } else {
                        args[0].pretty()
                    };
                    format!("{} -> {}", dom, args[1].pretty())
                }
                Name::Named(n) if n == LIST && args.len() == 1 => {
                    format!("[{}]", args[0].pretty())
                }
                _ => {
                    let head = match name {
                        Name::Named(n) => n.clone(),
                        Name::Auto(id) => format!("#{}", id),
                    };
                    if args.is_empty() {
                        head
                    } else {
                        let args = args
                            .iter()
                            .map(|a| {
                                if a.atomic() {
                                    a.pretty()
                                } else {
                                    format!("({})", a.pretty())
                                }
                            })
                            .collect::<Vec<_>>()
                            .join(" ");
                        format!("{} {}", head, args)
                    }
                }
            },
            Type::ForAll(_, _) => {
                let (vars, body) = self.peel_quantifiers();
                let vars = vars
                    .iter()
                    .map(Name::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("forall {}. {}", vars, body.pretty())
            }
        }
    }

    fn atomic(&self) -> bool {
        match self {
            Type::Var(_) => true,
            Type::Con(name, args) => {
                args.is_empty() || matches!(name, Name::Named(n) if n == LIST)
            }
            Type::ForAll(_, _) => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}
