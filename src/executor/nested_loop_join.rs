//! Nested loop join executor.
//!
//! Handles the cross product and every theta-join flavour. For each left row
//! the right input is scanned in full; combined rows that satisfy the
//! predicate are emitted. Outer joins then add the rows of the preserved
//! side(s) that never matched, padded with nulls.

use crate::access::{Attribute, RelationValue, Tuple, Value};
use crate::algebra::JoinKind;
use crate::error::EvalResult;
use crate::expression::{evaluate_predicate, Environment, Expression};
use std::collections::BTreeSet;

/// Executor that joins two relations with the nested loop algorithm
pub struct NestedLoopJoinExecutor<'a> {
    kind: JoinKind,
    /// Absent for a plain cross product
    predicate: Option<&'a Expression>,
}

impl<'a> NestedLoopJoinExecutor<'a> {
    pub fn new(kind: JoinKind, predicate: Option<&'a Expression>) -> Self {
        Self { kind, predicate }
    }

    /// A cross product is an inner join without a predicate
    pub fn cross_product() -> Self {
        Self::new(JoinKind::Inner, None)
    }

    /// Output attributes: left attributes followed by right attributes.
    /// The same name may appear on both sides; referencing it unqualified
    /// later is what fails.
    fn output_attributes(left: &RelationValue, right: &RelationValue) -> Vec<Attribute> {
        left.attribute_names()
            .iter()
            .chain(right.attribute_names())
            .cloned()
            .collect()
    }

    pub fn execute(&self, left: &RelationValue, right: &RelationValue) -> EvalResult<RelationValue> {
        let attributes = Self::output_attributes(left, right);
        let mut rows = BTreeSet::new();

        let right_rows: Vec<&Tuple> = right.rows().iter().collect();
        let mut right_matched = vec![false; right_rows.len()];
        let mut left_unmatched = Vec::new();

        for left_row in left.rows() {
            let mut matched = false;
            for (idx, right_row) in right_rows.iter().enumerate() {
                let mut combined = left_row.clone();
                combined.extend(right_row.iter().cloned());

                let passes = match self.predicate {
                    Some(predicate) => {
                        evaluate_predicate(predicate, Environment::new(&attributes, &combined))?
                    }
                    None => true,
                };
                if passes {
                    matched = true;
                    right_matched[idx] = true;
                    rows.insert(combined);
                }
            }
            if !matched {
                left_unmatched.push(left_row);
            }
        }

        if matches!(self.kind, JoinKind::LeftOuter | JoinKind::FullOuter) {
            for left_row in left_unmatched {
                let mut padded = left_row.clone();
                padded.extend(nulls(right.attribute_count()));
                rows.insert(padded);
            }
        }

        if matches!(self.kind, JoinKind::RightOuter | JoinKind::FullOuter) {
            for (right_row, _) in right_rows
                .iter()
                .zip(&right_matched)
                .filter(|(_, matched)| !**matched)
            {
                let mut padded: Tuple = nulls(left.attribute_count()).collect();
                padded.extend(right_row.iter().cloned());
                rows.insert(padded);
            }
        }

        Ok(RelationValue::from_parts(attributes, rows))
    }
}

fn nulls(count: usize) -> impl Iterator<Item = Value> {
    std::iter::repeat(Value::Null).take(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::executor::relation;

    fn employees() -> RelationValue {
        relation(
            &["E.name", "E.dept"],
            vec![
                vec![Value::text("Ann"), Value::Number(1)],
                vec![Value::text("Ben"), Value::Number(2)],
                vec![Value::text("Cid"), Value::Null],
            ],
        )
    }

    fn departments() -> RelationValue {
        relation(
            &["D.id", "D.title"],
            vec![
                vec![Value::Number(1), Value::text("Sales")],
                vec![Value::Number(3), Value::text("Legal")],
            ],
        )
    }

    fn on_dept() -> Expression {
        Expression::eq(Expression::attribute("dept"), Expression::attribute("id"))
    }

    #[test]
    fn test_cross_product() -> EvalResult<()> {
        let result = NestedLoopJoinExecutor::cross_product().execute(&employees(), &departments())?;
        assert_eq!(result.attribute_count(), 4);
        assert_eq!(result.row_count(), 6);
        for row in result.rows() {
            assert_eq!(row.len(), result.attribute_count());
        }
        Ok(())
    }

    #[test]
    fn test_inner_join() -> EvalResult<()> {
        let predicate = on_dept();
        let result = NestedLoopJoinExecutor::new(JoinKind::Inner, Some(&predicate))
            .execute(&employees(), &departments())?;

        assert_eq!(result.row_count(), 1);
        assert!(result.contains_row(&[
            Value::text("Ann"),
            Value::Number(1),
            Value::Number(1),
            Value::text("Sales")
        ]));
        Ok(())
    }

    #[test]
    fn test_left_outer_join() -> EvalResult<()> {
        let predicate = on_dept();
        let result = NestedLoopJoinExecutor::new(JoinKind::LeftOuter, Some(&predicate))
            .execute(&employees(), &departments())?;

        assert_eq!(result.row_count(), 3);
        assert!(result.contains_row(&[Value::text("Ben"), Value::Number(2), Value::Null, Value::Null]));
        assert!(result.contains_row(&[Value::text("Cid"), Value::Null, Value::Null, Value::Null]));
        Ok(())
    }

    #[test]
    fn test_right_outer_join() -> EvalResult<()> {
        let predicate = on_dept();
        let result = NestedLoopJoinExecutor::new(JoinKind::RightOuter, Some(&predicate))
            .execute(&employees(), &departments())?;

        assert_eq!(result.row_count(), 2);
        assert!(result.contains_row(&[Value::Null, Value::Null, Value::Number(3), Value::text("Legal")]));
        Ok(())
    }

    #[test]
    fn test_full_outer_join() -> EvalResult<()> {
        let predicate = on_dept();
        let result = NestedLoopJoinExecutor::new(JoinKind::FullOuter, Some(&predicate))
            .execute(&employees(), &departments())?;

        // One match, two unmatched employees, one unmatched department.
        assert_eq!(result.row_count(), 4);
        Ok(())
    }

    #[test]
    fn test_left_outer_join_with_empty_right() -> EvalResult<()> {
        let left = relation(&["A", "B"], vec![vec![Value::Number(1), Value::text("x")]]);
        let right = relation(&["C"], vec![]);
        let result = NestedLoopJoinExecutor::new(JoinKind::LeftOuter, None).execute(&left, &right)?;

        assert_eq!(result.attribute_count(), 3);
        assert_eq!(result.row_count(), 1);
        assert!(result.contains_row(&[Value::Number(1), Value::text("x"), Value::Null]));
        Ok(())
    }

    #[test]
    fn test_ambiguous_predicate() {
        let left = relation(&["R.a"], vec![vec![Value::Number(1)]]);
        let right = relation(&["S.a"], vec![vec![Value::Number(1)]]);
        let predicate = Expression::eq(Expression::attribute("a"), Expression::literal(1));

        let err = NestedLoopJoinExecutor::new(JoinKind::Inner, Some(&predicate))
            .execute(&left, &right)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousAttribute);
    }
}
