//! # Type Error Definitions
//!
//! This module defines the diagnostics of the type checking phase. An
//! inference run stops at the first failure; exactly one of these errors
//! is reported.
//!
//! The error kinds fall into three groups:
//!
//! - scope errors: a variable that is not bound (`UnboundVariable`) or a
//!   binder for a name that is already bound (`AlreadyDefined`)
//! - unification failures: two types with incompatible shapes
//!   (`Mismatch`), which also covers would-be infinite types and
//!   inequivalent quantifiers
//! - polymorphism discipline: a skolem constant escaping a subsumption
//!   (`SkolemEscape`) and an un-annotated lambda parameter that came out
//!   polymorphic (`PolymorphicParameter`)
//! - annotation validation: a constructor used at the wrong arity
//!   (`ArityMismatch`) or not declared at all (`UnknownConstructor`)
//!
//! Internal invariant violations (non-idempotent substitutions, a
//! non-arrow where the application rule guarantees an arrow) are *not*
//! represented here; they panic.
//!
//! ## Error Reporting
//!
//! Errors carry the source span of the term that was being inferred. The
//! `Display` implementation renders the source context when the span has
//! one and a plain `Type error:` line otherwise.

use std::fmt;

use lachs::Span;

use super::ty::{Name, Type};

/// Type error encountered during type inference.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeError {
    /// Reference to a variable that is not bound in the context.
    UnboundVariable { name: String, span: Span },

    /// A lambda or let binder for a name that is already bound.
    ///
    /// Shadowing a user name is rejected outright.
    AlreadyDefined { name: String, span: Span },

    /// Two types that should agree cannot be unified.
    ///
    /// Both offending types are reported. Would-be infinite types and
    /// quantifiers that are not equivalent surface as this error too.
    Mismatch {
        expected: Type,
        found: Type,
        span: Span,
    },

    /// A skolem constant escaped its subsumption judgement: the found
    /// type is not polymorphic enough for the expected one.
    SkolemEscape {
        expected: Type,
        found: Type,
        span: Span,
    },

    /// An un-annotated lambda parameter was inferred a polymorphic type.
    ///
    /// Polymorphism at a parameter position requires an explicit
    /// annotation.
    PolymorphicParameter {
        name: String,
        ty: Type,
        span: Span,
    },

    /// A type constructor applied to the wrong number of arguments.
    ArityMismatch {
        con: Name,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// A type constructor that is not declared.
    UnknownConstructor { con: Name, span: Span },
}

impl TypeError {
    pub fn unbound_variable(name: String, span: Span) -> Self {
        TypeError::UnboundVariable { name, span }
    }

    pub fn already_defined(name: String, span: Span) -> Self {
        TypeError::AlreadyDefined { name, span }
    }

    pub fn mismatch(expected: Type, found: Type, span: Span) -> Self {
        TypeError::Mismatch {
            expected,
            found,
            span,
        }
    }

    pub fn skolem_escape(expected: Type, found: Type, span: Span) -> Self {
        TypeError::SkolemEscape {
            expected,
            found,
            span,
        }
    }

    pub fn polymorphic_parameter(name: String, ty: Type, span: Span) -> Self {
        TypeError::PolymorphicParameter { name, ty, span }
    }

    pub fn arity_mismatch(con: Name, expected: usize, found: usize, span: Span) -> Self {
        TypeError::ArityMismatch {
            con,
            expected,
            found,
            span,
        }
    }

    pub fn unknown_constructor(con: Name, span: Span) -> Self {
        TypeError::UnknownConstructor { con, span }
    }

    fn span(&self) -> &Span {
        match self {
            TypeError::UnboundVariable { span, .. }
            | TypeError::AlreadyDefined { span, .. }
            | TypeError::Mismatch { span, .. }
            | TypeError::SkolemEscape { span, .. }
            | TypeError::PolymorphicParameter { span, .. }
            | TypeError::ArityMismatch { span, .. }
            | TypeError::UnknownConstructor { span, .. } => span,
        }
    }

    fn message(&self) -> String {
        match self {
            TypeError::UnboundVariable { name, .. } => {
                format!("unbound variable: {}", name)
            }
            TypeError::AlreadyDefined { name, .. } => {
                format!("variable is already defined: {}", name)
            }
            TypeError::Mismatch {
                expected, found, ..
            } => {
                format!(
                    "type mismatch: expected {}, found {}",
                    expected.pretty(),
                    found.pretty()
                )
            }
            TypeError::SkolemEscape {
                expected, found, ..
            } => {
                format!(
                    "type is not polymorphic enough: expected {}, found {}",
                    expected.pretty(),
                    found.pretty()
                )
            }
            TypeError::PolymorphicParameter { name, ty, .. } => {
                format!(
                    "parameter {} was inferred the polymorphic type {}; \
                     polymorphic parameters must be annotated",
                    name,
                    ty.pretty()
                )
            }
            TypeError::ArityMismatch {
                con,
                expected,
                found,
                ..
            } => {
                format!(
                    "type constructor {} expects {} argument(s), found {}",
                    con, expected, found
                )
            }
            TypeError::UnknownConstructor { con, .. } => {
                format!("unknown type constructor: {}", con)
            }
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = self.message();
        let span = self.span();
        if span.source.is_empty() {
            write!(f, "Type error: {}", msg)
        } else {
            write!(f, "{}", span.to_string(&msg))
        }
    }
}

impl std::error::Error for TypeError {}
