//! Projection (Π) executor.
//!
//! Evaluates a list of scalar expressions for every input row. Output rows
//! land in a set, so projecting away distinguishing attributes collapses
//! duplicates.

use crate::access::relation::check_unique;
use crate::access::{Attribute, RelationValue};
use crate::error::{EvalError, EvalResult};
use crate::expression::{Environment, Expression, ExpressionEvaluator};
use std::collections::BTreeSet;

/// Executor that evaluates a projection list against each input row
pub struct ProjectionExecutor<'a> {
    items: &'a [Expression],
}

impl<'a> ProjectionExecutor<'a> {
    pub fn new(items: &'a [Expression]) -> Self {
        Self { items }
    }

    /// Output attribute names: the alias, else the attribute name as written
    pub fn output_attributes(&self) -> EvalResult<Vec<Attribute>> {
        let attributes = self
            .items
            .iter()
            .map(|item| {
                item.output_name()
                    .map(|name| Some(name.to_string()))
                    .ok_or_else(|| EvalError::UnnamedAttribute {
                        context: "projected expression has no name".to_string(),
                    })
            })
            .collect::<EvalResult<Vec<_>>>()?;
        check_unique(&attributes)?;
        Ok(attributes)
    }

    pub fn execute(&self, input: &RelationValue) -> EvalResult<RelationValue> {
        let attributes = self.output_attributes()?;
        let mut rows = BTreeSet::new();

        for row in input.rows() {
            let evaluator =
                ExpressionEvaluator::new(Environment::new(input.attribute_names(), row));
            let projected = self
                .items
                .iter()
                .map(|item| evaluator.evaluate(item))
                .collect::<EvalResult<Vec<_>>>()?;
            rows.insert(projected);
        }

        Ok(RelationValue::from_parts(attributes, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Value;
    use crate::error::ErrorKind;
    use crate::executor::relation;

    fn input() -> RelationValue {
        relation(
            &["x", "y"],
            vec![
                vec![Value::Number(1), Value::text("a")],
                vec![Value::Number(1), Value::text("b")],
                vec![Value::Number(2), Value::text("b")],
            ],
        )
    }

    #[test]
    fn test_projection_collapses_duplicates() -> EvalResult<()> {
        let items = vec![Expression::attribute("x")];
        let result = ProjectionExecutor::new(&items).execute(&input())?;

        assert_eq!(result.attribute_names(), &[Some("x".to_string())]);
        assert_eq!(result.row_count(), 2);
        assert!(result.contains_row(&[Value::Number(1)]));
        assert!(result.contains_row(&[Value::Number(2)]));
        Ok(())
    }

    #[test]
    fn test_projection_with_expressions() -> EvalResult<()> {
        let items = vec![
            Expression::attribute("y"),
            Expression::mul_expr(Expression::attribute("x"), Expression::literal(10)).alias("tens"),
        ];
        let result = ProjectionExecutor::new(&items).execute(&input())?;

        assert_eq!(
            result.attribute_names(),
            &[Some("y".to_string()), Some("tens".to_string())]
        );
        assert!(result.contains_row(&[Value::text("b"), Value::Number(20)]));
        assert_eq!(result.row_count(), 3);
        Ok(())
    }

    #[test]
    fn test_unnamed_expression_fails() {
        let items = vec![Expression::add_expr(
            Expression::attribute("x"),
            Expression::literal(1),
        )];
        let err = ProjectionExecutor::new(&items).execute(&input()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnnamedAttributeError);
    }

    #[test]
    fn test_duplicate_output_names_fail() {
        let items = vec![
            Expression::attribute("x"),
            Expression::attribute("y").alias("x"),
        ];
        let err = ProjectionExecutor::new(&items).execute(&input()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateAttributeName);
    }
}
