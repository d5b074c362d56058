//! Rankell - a small functional language with HMF type inference
//!
//! Hindley-Milner extended with first-class polymorphism: quantifiers may
//! appear anywhere in a type, and annotated parameters may be
//! polymorphic, but inference never guesses a polymorphic instantiation.
//!
//! The pipeline runs lexing, parsing, inference (which elaborates the
//! implicit surface term into an explicit core term), and a final
//! simplification pass over the elaboration.

pub mod ast;
pub mod core;
pub mod fmt;
pub mod lexer;
pub mod parser;
pub mod types;

use crate::core::CoreTerm;
use crate::types::Type;

/// Type check a program source, producing the elaborated core term and
/// its type. Every failure (lexing, parsing, type checking) is rendered
/// to a diagnostic string.
pub fn check_source(input: &str) -> Result<(CoreTerm, Type), String> {
    let tokens = lexer::Token::lex(input).map_err(|err| err.to_string())?;
    let mut state = parser::ParseState::new(tokens);
    let expr = parser::parse(&mut state).map_err(|err| err.to_string())?;
    types::type_check(&expr).map_err(|err| err.to_string())
}
