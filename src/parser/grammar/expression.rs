//! Expression parsers

use crate::ast::expression::{
    Ascription, BinOpKind, BinaryOp, Boolean, Concat, Expression, FunctionCall, Ident, IfThenElse,
    Lambda, Let, ListLiteral,
};
use crate::lexer::Token;
use crate::types::Type;

use crate::parser::combinators::{
    BoxedParser, expect_backslash, expect_colon, expect_comma, expect_else, expect_equals,
    expect_fat_arrow, expect_if, expect_in, expect_lbracket, expect_let, expect_lparen,
    expect_rbracket, expect_rparen, expect_then, optional,
};
use crate::parser::state::{ParseState, Parser};

use super::literal::{boolean, ident, integer};
use super::ty::type_expression;

/// term := lambda | let | if | ascription
pub fn expression() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Backslash(_)) => lambda().parse(state),
        Some(Token::Let(_)) => let_expression().parse(state),
        Some(Token::If(_)) => if_expression().parse(state),
        _ => ascription().parse(state),
    })
}

/// lambda := "\" param "=>" term
pub fn lambda() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_backslash().parse(state)?;
        let (param, annotation) = lambda_param().parse(state)?;
        expect_fat_arrow().parse(state)?;
        let body = expression().parse(state)?;
        Ok(Expression::Lambda(Lambda {
            param,
            annotation,
            body: Box::new(body),
            position: start.pos(),
        }))
    })
}

/// param := ident | "(" ident ":" type ")"
fn lambda_param() -> BoxedParser<(Ident, Option<Type>)> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::LParen(_)) => {
            expect_lparen().parse(state)?;
            let param = ident().parse(state)?;
            expect_colon().parse(state)?;
            let annotation = type_expression().parse(state)?;
            expect_rparen().parse(state)?;
            Ok((param, Some(annotation)))
        }
        _ => {
            let param = ident().parse(state)?;
            Ok((param, None))
        }
    })
}

/// let := "let" ident "=" term "in" term
pub fn let_expression() -> BoxedParser<Expression> {
    (((expect_let() * ident()) - expect_equals()) + expression() + (expect_in() * expression()))
        >> |((name, value), body)| {
            let position = name.position.clone();
            Expression::Let(Let {
                name,
                value: Box::new(value),
                body: Box::new(body),
                position,
            })
        }
}

/// if := "if" term "then" term "else" term
pub fn if_expression() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_if().parse(state)?;
        let condition = expression().parse(state)?;
        expect_then().parse(state)?;
        let then_branch = expression().parse(state)?;
        expect_else().parse(state)?;
        let else_branch = expression().parse(state)?;
        Ok(Expression::IfThenElse(IfThenElse {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            position: start.pos(),
        }))
    })
}

/// ascription := concat (":" type)?
fn ascription() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let term = concat().parse(state)?;
        if optional(expect_colon()).parse(state)?.is_some() {
            let ty = type_expression().parse(state)?;
            let position = term.position();
            Ok(Expression::Ascription(Ascription {
                term: Box::new(term),
                ty,
                position,
            }))
        } else {
            Ok(term)
        }
    })
}

/// concat := additive ("++" additive)*
fn concat() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut left = additive().parse(state)?;
        while matches!(state.peek(), Some(Token::PlusPlus(_))) {
            state.advance();
            let right = additive().parse(state)?;
            let position = left.position();
            left = Expression::Concat(Concat {
                left: Box::new(left),
                right: Box::new(right),
                position,
            });
        }
        Ok(left)
    })
}

/// additive := factor (("+" | "-") factor)*
fn additive() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut left = factor().parse(state)?;
        loop {
            let op = match state.peek() {
                Some(Token::Plus(_)) => BinOpKind::Add,
                Some(Token::Minus(_)) => BinOpKind::Sub,
                _ => break,
            };
            state.advance();
            let right = factor().parse(state)?;
            let position = left.position();
            left = Expression::BinaryOp(BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            });
        }
        Ok(left)
    })
}

/// factor := application (("*" | "/") application)*
fn factor() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut left = application().parse(state)?;
        loop {
            let op = match state.peek() {
                Some(Token::Star(_)) => BinOpKind::Mul,
                Some(Token::Slash(_)) => BinOpKind::Div,
                _ => break,
            };
            state.advance();
            let right = application().parse(state)?;
            let position = left.position();
            left = Expression::BinaryOp(BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            });
        }
        Ok(left)
    })
}

/// application := atom ("(" args ")")*
///
/// Multi-argument calls fold into nested single-argument applications.
fn application() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut expr = atom().parse(state)?;
        while matches!(state.peek(), Some(Token::LParen(_))) {
            expect_lparen().parse(state)?;
            let mut args = vec![expression().parse(state)?];
            while optional(expect_comma()).parse(state)?.is_some() {
                args.push(expression().parse(state)?);
            }
            expect_rparen().parse(state)?;
            for arg in args {
                let position = expr.position();
                expr = Expression::FunctionCall(FunctionCall {
                    func: Box::new(expr),
                    arg: Box::new(arg),
                    position,
                });
            }
        }
        Ok(expr)
    })
}

/// atom := ident | integer | "true" | "false" | list | "(" term ")"
fn atom() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::True(_)) | Some(Token::False(_)) => {
            (boolean() >> Expression::Boolean).parse(state)
        }
        Some(Token::Integer(_)) => (integer() >> Expression::Integer).parse(state),
        Some(Token::LBracket(_)) => list_literal().parse(state),
        Some(Token::LParen(_)) => {
            expect_lparen().parse(state)?;
            let expr = expression().parse(state)?;
            expect_rparen().parse(state)?;
            Ok(expr)
        }
        _ => (ident() >> Expression::Ident).parse(state),
    })
}

/// list := "[" [term ("," term)*] "]"
fn list_literal() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_lbracket().parse(state)?;

        let mut items = Vec::new();
        if !matches!(state.peek(), Some(Token::RBracket(_))) {
            items.push(expression().parse(state)?);
            while optional(expect_comma()).parse(state)?.is_some() {
                items.push(expression().parse(state)?);
            }
        }
        expect_rbracket().parse(state)?;

        Ok(Expression::ListLiteral(ListLiteral {
            items,
            position: start.pos(),
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::state::ParseState;

    fn parse_expr(input: &str) -> Expression {
        let tokens = crate::lexer::Token::lex(input).expect("lexing failed");
        let mut state = ParseState::new(tokens);
        expression().parse(&mut state).expect("parsing failed")
    }

    #[test]
    fn test_parse_literals() {
        assert!(matches!(parse_expr("42"), Expression::Integer(_)));
        assert!(matches!(
            parse_expr("true"),
            Expression::Boolean(Boolean { value: true, .. })
        ));
        assert!(matches!(parse_expr("x"), Expression::Ident(_)));
    }

    #[test]
    fn test_parse_lambda() {
        let Expression::Lambda(lambda) = parse_expr(r"\x => x") else {
            panic!("expected a lambda");
        };
        assert_eq!(lambda.param.value, "x");
        assert!(lambda.annotation.is_none());
    }

    #[test]
    fn test_parse_annotated_lambda() {
        let Expression::Lambda(lambda) = parse_expr(r"\(f: forall a. a -> a) => f") else {
            panic!("expected a lambda");
        };
        assert_eq!(lambda.param.value, "f");
        assert!(matches!(lambda.annotation, Some(Type::ForAll(_, _))));
    }

    #[test]
    fn test_parse_call_folds_arguments() {
        // f(1, 2) parses as f(1)(2)
        let Expression::FunctionCall(outer) = parse_expr("f(1, 2)") else {
            panic!("expected a call");
        };
        assert!(matches!(*outer.arg, Expression::Integer(_)));
        assert!(matches!(*outer.func, Expression::FunctionCall(_)));
    }

    #[test]
    fn test_parse_let() {
        let Expression::Let(let_expr) = parse_expr(r"let id = \x => x in id(1)") else {
            panic!("expected a let");
        };
        assert_eq!(let_expr.name.value, "id");
        assert!(matches!(*let_expr.value, Expression::Lambda(_)));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        // 1 + 2 * 3 groups the multiplication first
        let Expression::BinaryOp(add) = parse_expr("1 + 2 * 3") else {
            panic!("expected an addition");
        };
        assert_eq!(add.op, BinOpKind::Add);
        assert!(matches!(
            *add.right,
            Expression::BinaryOp(BinaryOp {
                op: BinOpKind::Mul,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_arithmetic_left_associative() {
        let Expression::BinaryOp(outer) = parse_expr("1 - 2 - 3") else {
            panic!("expected a subtraction");
        };
        assert!(matches!(*outer.left, Expression::BinaryOp(_)));
    }

    #[test]
    fn test_parse_concat_binds_looser_than_addition() {
        let Expression::Concat(concat) = parse_expr("xs ++ ys") else {
            panic!("expected a concat");
        };
        assert!(matches!(*concat.left, Expression::Ident(_)));

        assert!(matches!(parse_expr("[1] ++ [2]"), Expression::Concat(_)));
    }

    #[test]
    fn test_parse_list() {
        let Expression::ListLiteral(list) = parse_expr("[1, 2, 3]") else {
            panic!("expected a list");
        };
        assert_eq!(list.items.len(), 3);

        let Expression::ListLiteral(empty) = parse_expr("[]") else {
            panic!("expected a list");
        };
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_parse_if() {
        assert!(matches!(
            parse_expr("if true then 1 else 2"),
            Expression::IfThenElse(_)
        ));
    }

    #[test]
    fn test_parse_ascription() {
        let Expression::Ascription(ascription) = parse_expr(r"(\x => x) : forall a. a -> a")
        else {
            panic!("expected an ascription");
        };
        assert!(matches!(*ascription.term, Expression::Lambda(_)));
        assert!(matches!(ascription.ty, Type::ForAll(_, _)));
    }

    #[test]
    fn test_parse_lambda_body_extends_right() {
        // \x => x + 1 parses the whole sum as the body
        let Expression::Lambda(lambda) = parse_expr(r"\x => x + 1") else {
            panic!("expected a lambda");
        };
        assert!(matches!(*lambda.body, Expression::BinaryOp(_)));
    }

    #[test]
    fn test_parse_list_type_annotation() {
        let Expression::Ascription(ascription) = parse_expr("[] : [Int]") else {
            panic!("expected an ascription");
        };
        assert_eq!(ascription.ty, Type::list(Type::int()));
    }
}
