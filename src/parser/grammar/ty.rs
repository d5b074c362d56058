//! Type parsers
//!
//! In the type grammar, the identifiers `Int` and `Bool` are the primitive
//! nullary constructors, `[t]` is the list type, `->` the right-associative
//! arrow; any other identifier is a type variable.

use crate::lexer::Token;
use crate::types::{Name, Type};

use crate::parser::combinators::{
    BoxedParser, expect_arrow, expect_dot, expect_forall, expect_lbracket, expect_lparen,
    expect_rbracket, expect_rparen, many1, optional,
};
use crate::parser::state::{ParseState, Parser};

use super::literal::ident;

/// type := "forall" ident+ "." type | arrow
pub fn type_expression() -> BoxedParser<Type> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Forall(_)) => forall_type().parse(state),
        _ => arrow_type().parse(state),
    })
}

/// forall := "forall" ident+ "." type
fn forall_type() -> BoxedParser<Type> {
    ((expect_forall() * many1(ident()) - expect_dot()) + type_expression()) >> |(vars, body)| {
        vars.into_iter().rev().fold(body, |body, var| {
            Type::ForAll(Name::named(var.value), Box::new(body))
        })
    }
}

/// arrow := ty_atom ("->" type)?
fn arrow_type() -> BoxedParser<Type> {
    BoxedParser::new(|state: &mut ParseState| {
        let dom = type_atom().parse(state)?;
        if optional(expect_arrow()).parse(state)?.is_some() {
            let cod = type_expression().parse(state)?;
            Ok(Type::func(dom, cod))
        } else {
            Ok(dom)
        }
    })
}

/// ty_atom := ident | "[" type "]" | "(" type ")"
fn type_atom() -> BoxedParser<Type> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::LBracket(_)) => {
            expect_lbracket().parse(state)?;
            let elem = type_expression().parse(state)?;
            expect_rbracket().parse(state)?;
            Ok(Type::list(elem))
        }
        Some(Token::LParen(_)) => {
            expect_lparen().parse(state)?;
            let ty = type_expression().parse(state)?;
            expect_rparen().parse(state)?;
            Ok(ty)
        }
        _ => {
            let id = ident().parse(state)?;
            Ok(match id.value.as_str() {
                "Int" => Type::int(),
                "Bool" => Type::bool(),
                _ => Type::var(id.value),
            })
        }
    })
}
