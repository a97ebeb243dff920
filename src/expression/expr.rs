//! Scalar expression AST definitions.

use crate::access::Value;
use crate::expression::operator::{BinaryOperator, UnaryOperator};
use serde::{Deserialize, Serialize};

/// Scalar expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal constant value
    Literal(Value),

    /// Attribute reference, simple (`name`) or qualified (`rel.name`)
    Attribute(String),

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Function call, resolved against the function registry
    FunctionCall { name: String, args: Vec<Expression> },

    /// Expression carrying an optional output name (`expr AS alias`)
    Named {
        expr: Box<Expression>,
        alias: Option<String>,
    },
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    pub fn null() -> Self {
        Expression::Literal(Value::Null)
    }

    /// Create an attribute reference
    pub fn attribute(name: impl Into<String>) -> Self {
        Expression::Attribute(name.into())
    }

    pub fn binary_op(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary_op(op: UnaryOperator, operand: Expression) -> Self {
        Expression::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Attach an output name to this expression
    pub fn alias(self, alias: impl Into<String>) -> Self {
        Expression::Named {
            expr: Box::new(self),
            alias: Some(alias.into()),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Or, left, right)
    }

    pub fn not_expr(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::Not, operand)
    }

    pub fn neg(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::Minus, operand)
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Eq, left, right)
    }

    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Ne, left, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Lt, left, right)
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Le, left, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Gt, left, right)
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Ge, left, right)
    }

    pub fn add_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Add, left, right)
    }

    pub fn sub_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Sub, left, right)
    }

    pub fn mul_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Mul, left, right)
    }

    pub fn div_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Div, left, right)
    }

    /// The expression with any `Named` wrappers removed
    pub fn unnamed(&self) -> &Expression {
        match self {
            Expression::Named { expr, .. } => expr.unnamed(),
            other => other,
        }
    }

    /// The attribute name this expression produces in a projection: the
    /// alias if one is given, else the name of a bare attribute reference.
    pub fn output_name(&self) -> Option<&str> {
        match self {
            Expression::Named {
                alias: Some(alias), ..
            } => Some(alias),
            Expression::Named { expr, alias: None } => expr.output_name(),
            Expression::Attribute(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name() {
        assert_eq!(Expression::attribute("R.a").output_name(), Some("R.a"));
        assert_eq!(
            Expression::attribute("a").alias("b").output_name(),
            Some("b")
        );
        assert_eq!(
            Expression::add_expr(Expression::attribute("a"), Expression::literal(1))
                .output_name(),
            None
        );

        let unaliased = Expression::Named {
            expr: Box::new(Expression::attribute("x")),
            alias: None,
        };
        assert_eq!(unaliased.output_name(), Some("x"));
    }

    #[test]
    fn test_unnamed() {
        let expr = Expression::literal(5).alias("five");
        assert_eq!(expr.unnamed(), &Expression::literal(5));
    }
}
