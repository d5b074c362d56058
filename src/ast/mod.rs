//! Abstract syntax of the implicit source language.

pub mod expression;

pub use expression::*;
