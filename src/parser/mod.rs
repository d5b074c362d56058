//! Parser for the surface language.
//!
//! A backtracking recursive-descent parser built from combinators; see
//! [`state`] for the state/backtracking machinery and [`grammar`] for the
//! actual rules. The parser reports the first failure, using the error at
//! the furthest position it reached.

pub mod combinators;
pub mod grammar;
pub mod state;

pub use combinators::*;
pub use grammar::*;
pub use state::{ParseError, ParseResult, ParseState, Parser};

use crate::ast::Expression;

/// Parse one complete term; trailing input is an error.
pub fn parse(state: &mut ParseState) -> Result<Expression, ParseError> {
    let expr = match grammar::expression().parse(state) {
        Ok(expr) => expr,
        Err(err) => {
            return Err(state.furthest_error().cloned().unwrap_or(err));
        }
    };
    if state.has_next() {
        return Err(state.error_here("expected end of input"));
    }
    Ok(expr)
}
