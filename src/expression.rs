//! Scalar expressions evaluated per row.
//!
//! This module provides:
//! - Expression AST representation
//! - Attribute name resolution with ambiguity detection
//! - The built-in function registry
//! - Expression evaluation against a row environment

pub mod eval;
pub mod expr;
pub mod function;
pub mod operator;
pub mod resolver;

pub use eval::{evaluate_expression, evaluate_predicate, Environment, ExpressionEvaluator};
pub use expr::Expression;
pub use operator::{BinaryOperator, UnaryOperator};
