//! Scalar expression evaluation.
//!
//! The evaluator walks the expression tree directly against a per-row
//! [`Environment`]; attribute references go through the resolver.

use crate::access::{Attribute, Value};
use crate::error::{EvalError, EvalResult};
use crate::expression::{function, resolver, BinaryOperator, Expression, UnaryOperator};
use std::cmp::Ordering;

/// Attribute bindings for one row: the owning relation's attribute list
/// paired with the row's values.
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    attributes: &'a [Attribute],
    values: &'a [Value],
}

impl<'a> Environment<'a> {
    pub fn new(attributes: &'a [Attribute], values: &'a [Value]) -> Self {
        debug_assert_eq!(attributes.len(), values.len());
        Self { attributes, values }
    }

    /// An environment with no bindings, for constant expressions
    pub fn empty() -> Environment<'static> {
        Environment {
            attributes: &[],
            values: &[],
        }
    }

    /// Look up the value bound to an attribute name
    pub fn lookup(&self, name: &str) -> EvalResult<&'a Value> {
        let idx = resolver::resolve(name, self.attributes)?;
        Ok(&self.values[idx])
    }
}

/// Evaluator for scalar expressions
pub struct ExpressionEvaluator<'a> {
    env: Environment<'a>,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(env: Environment<'a>) -> Self {
        Self { env }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expression) -> EvalResult<Value> {
        match expr {
            Expression::Literal(value) => Ok(value.clone()),

            Expression::Attribute(name) => self.env.lookup(name).cloned(),

            Expression::UnaryOp { op, operand } => {
                let operand_val = self.evaluate(operand)?;
                evaluate_unary_op(*op, operand_val)
            }

            Expression::BinaryOp { op, left, right } => match op {
                BinaryOperator::And | BinaryOperator::Or => {
                    self.evaluate_logical(*op, left, right)
                }
                _ => {
                    let left_val = self.evaluate(left)?;
                    let right_val = self.evaluate(right)?;
                    evaluate_binary_op(*op, left_val, right_val)
                }
            },

            Expression::FunctionCall { name, args } => {
                let function = function::lookup(name)?;
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                function.call(&values)
            }

            Expression::Named { expr, .. } => self.evaluate(expr),
        }
    }

    /// Three-valued `and`/`or`. The right side is skipped once the left
    /// side decides the result.
    fn evaluate_logical(
        &self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> EvalResult<Value> {
        let dominant = op == BinaryOperator::Or;

        let left_val = self.evaluate(left)?;
        let left_bool = as_logical(op, &left_val, None)?;
        if left_bool == Some(dominant) {
            return Ok(Value::Boolean(dominant));
        }

        let right_val = self.evaluate(right)?;
        combine_logical(op, &left_val, &right_val)
    }
}

/// Boolean view of a logical operand; `None` stands for null.
fn as_logical(op: BinaryOperator, value: &Value, other: Option<&Value>) -> EvalResult<Option<bool>> {
    match value {
        Value::Boolean(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        _ => Err(match other {
            Some(left) => EvalError::type_mismatch(op.as_str(), left.type_name(), value.type_name()),
            None => EvalError::type_mismatch(op.as_str(), value.type_name(), "-"),
        }),
    }
}

fn evaluate_unary_op(op: UnaryOperator, operand: Value) -> EvalResult<Value> {
    match (op, operand) {
        (_, Value::Null) => Ok(Value::Null),
        (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOperator::Minus, Value::Number(n)) => {
            n.checked_neg()
                .map(Value::Number)
                .ok_or_else(|| EvalError::NumericOverflow {
                    operator: op.as_str().to_string(),
                })
        }
        (op, operand) => Err(EvalError::type_mismatch(
            op.as_str(),
            operand.type_name(),
            "-",
        )),
    }
}

/// Evaluate a binary operator on two already evaluated operands
fn evaluate_binary_op(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
    match op {
        BinaryOperator::Eq => comparison(op, &left, &right, |o| o == Ordering::Equal),
        BinaryOperator::Ne => comparison(op, &left, &right, |o| o != Ordering::Equal),
        BinaryOperator::Lt => comparison(op, &left, &right, |o| o == Ordering::Less),
        BinaryOperator::Le => comparison(op, &left, &right, |o| o != Ordering::Greater),
        BinaryOperator::Gt => comparison(op, &left, &right, |o| o == Ordering::Greater),
        BinaryOperator::Ge => comparison(op, &left, &right, |o| o != Ordering::Less),
        BinaryOperator::Add => arithmetic(op, &left, &right, |a, b| Ok(a.checked_add(b))),
        BinaryOperator::Sub => arithmetic(op, &left, &right, |a, b| Ok(a.checked_sub(b))),
        BinaryOperator::Mul => arithmetic(op, &left, &right, |a, b| Ok(a.checked_mul(b))),
        BinaryOperator::Div => arithmetic(op, &left, &right, |a, b| {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(a.checked_div(b))
        }),
        BinaryOperator::And | BinaryOperator::Or => combine_logical(op, &left, &right),
    }
}

fn comparison(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    test: impl Fn(Ordering) -> bool,
) -> EvalResult<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let ordering = compare_values(op.as_str(), left, right)?;
    Ok(Value::Boolean(test(ordering)))
}

/// Checked integer arithmetic; `None` from `apply` means overflow
fn arithmetic(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    apply: impl Fn(i64, i64) -> EvalResult<Option<i64>>,
) -> EvalResult<Value> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
        (Value::Number(a), Value::Number(b)) => apply(*a, *b)?
            .map(Value::Number)
            .ok_or_else(|| EvalError::NumericOverflow {
                operator: op.as_str().to_string(),
            }),
        _ => Err(EvalError::type_mismatch(
            op.as_str(),
            left.type_name(),
            right.type_name(),
        )),
    }
}

/// Three-valued `and`/`or` over two evaluated operands
fn combine_logical(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    let dominant = op == BinaryOperator::Or;
    let left_bool = as_logical(op, left, None)?;
    let right_bool = as_logical(op, right, Some(left))?;

    Ok(match (left_bool, right_bool) {
        (Some(b), _) if b == dominant => Value::Boolean(dominant),
        (_, Some(b)) if b == dominant => Value::Boolean(dominant),
        (Some(_), Some(_)) => Value::Boolean(!dominant),
        _ => Value::Null,
    })
}

/// Compare two non-null values of the same kind
pub(crate) fn compare_values(operator: &str, left: &Value, right: &Value) -> EvalResult<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
        _ => Err(EvalError::type_mismatch(
            operator,
            left.type_name(),
            right.type_name(),
        )),
    }
}

/// Evaluate an expression in an environment
pub fn evaluate_expression(expr: &Expression, env: Environment<'_>) -> EvalResult<Value> {
    ExpressionEvaluator::new(env).evaluate(expr)
}

/// Evaluate a predicate. Only `true` keeps a row; null and false reject it.
pub fn evaluate_predicate(expr: &Expression, env: Environment<'_>) -> EvalResult<bool> {
    match evaluate_expression(expr, env)? {
        Value::Boolean(b) => Ok(b),
        Value::Null => Ok(false),
        other => Err(EvalError::type_mismatch(
            "predicate",
            other.type_name(),
            "-",
        )),
    }
}
