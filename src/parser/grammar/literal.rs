//! Literal parsers

use crate::ast::expression::{Boolean, Ident, Integer};
use crate::lexer::Token;

use crate::parser::combinators::BoxedParser;
use crate::parser::state::{ParseError, ParseState};

/// Parse an identifier
pub fn ident() -> BoxedParser<Ident> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(_)) => {
            if let Some(Token::Ident(id)) = state.advance() {
                Ok(Ident {
                    value: id.value,
                    position: id.position,
                })
            } else {
                unreachable!()
            }
        }
        Some(tok) => {
            let err = ParseError::new("unexpected token")
                .expected("identifier")
                .found(tok.describe())
                .at(tok.pos());
            state.record_error(err.clone());
            Err(err)
        }
        None => {
            let err = ParseError::new("unexpected end of input").expected("identifier");
            state.record_error(err.clone());
            Err(err)
        }
    })
}

/// Parse an integer literal
pub fn integer() -> BoxedParser<Integer> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Integer(_)) => {
            if let Some(Token::Integer(int)) = state.advance() {
                Ok(Integer {
                    value: int.value.parse().expect("The grammar should prevent this"),
                    position: int.position,
                })
            } else {
                unreachable!()
            }
        }
        Some(tok) => {
            let err = ParseError::new("unexpected token")
                .expected("integer")
                .found(tok.describe())
                .at(tok.pos());
            state.record_error(err.clone());
            Err(err)
        }
        None => {
            let err = ParseError::new("unexpected end of input").expected("integer");
            state.record_error(err.clone());
            Err(err)
        }
    })
}

/// Parse a boolean literal: "true" | "false"
pub fn boolean() -> BoxedParser<Boolean> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::True(_)) | Some(Token::False(_)) => {
            let token = state.advance().unwrap();
            Ok(Boolean {
                value: matches!(token, Token::True(_)),
                position: token.pos(),
            })
        }
        Some(tok) => {
            let err = ParseError::new("unexpected token")
                .expected("boolean")
                .found(tok.describe())
                .at(tok.pos());
            state.record_error(err.clone());
            Err(err)
        }
        None => {
            let err = ParseError::new("unexpected end of input").expected("boolean");
            state.record_error(err.clone());
            Err(err)
        }
    })
}
