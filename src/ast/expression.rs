//! Expressions of the implicit source language.
//!
//! Terms come out of the parser with no required type information: lambda
//! parameters may carry an optional annotation, and any term can be
//! ascribed a type, but nothing is mandatory. Every node records its
//! source span for diagnostics.

use lachs::Span;

use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Ident(Ident),
    Integer(Integer),
    Boolean(Boolean),
    Lambda(Lambda),
    FunctionCall(FunctionCall),
    Let(Let),
    Ascription(Ascription),
    IfThenElse(IfThenElse),
    BinaryOp(BinaryOp),
    ListLiteral(ListLiteral),
    Concat(Concat),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub value: String,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Integer {
    pub value: i128,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boolean {
    pub value: bool,
    pub position: Span,
}

/// Lambda with exactly one parameter and an optional parameter type.
///
/// A polymorphic parameter type is only admitted when written here
/// explicitly; inference never invents one.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub param: Ident,
    pub annotation: Option<Type>,
    pub body: Box<Expression>,
    pub position: Span,
}

/// Function call with exactly one argument (multi-arg calls are folded by
/// the parser into nested calls).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub func: Box<Expression>,
    pub arg: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub name: Ident,
    pub value: Box<Expression>,
    pub body: Box<Expression>,
    pub position: Span,
}

/// A term ascribed a type: `e : t`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ascription {
    pub term: Box<Expression>,
    pub ty: Type,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfThenElse {
    pub condition: Box<Expression>,
    pub then_branch: Box<Expression>,
    pub else_branch: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
        }
    }
}

/// Integer arithmetic on two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub op: BinOpKind,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub position: Span,
}

/// List literal; element order is preserved through elaboration.
#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub items: Vec<Expression>,
    pub position: Span,
}

/// List concatenation: `xs ++ ys`.
#[derive(Debug, Clone, PartialEq)]
pub struct Concat {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub position: Span,
}

impl Expression {
    pub fn position(&self) -> Span {
        match self {
            Expression::Ident(inner) => inner.position.clone(),
            Expression::Integer(inner) => inner.position.clone(),
            Expression::Boolean(inner) => inner.position.clone(),
            Expression::Lambda(inner) => inner.position.clone(),
            Expression::FunctionCall(inner) => inner.position.clone(),
            Expression::Let(inner) => inner.position.clone(),
            Expression::Ascription(inner) => inner.position.clone(),
            Expression::IfThenElse(inner) => inner.position.clone(),
            Expression::BinaryOp(inner) => inner.position.clone(),
            Expression::ListLiteral(inner) => inner.position.clone(),
            Expression::Concat(inner) => inner.position.clone(),
        }
    }
}
