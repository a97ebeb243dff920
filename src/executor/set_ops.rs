//! Union, intersection and difference of union-compatible relations.

use crate::access::RelationValue;
use crate::algebra::SetOpKind;
use crate::error::{EvalError, EvalResult};

/// Executor for the three set operators. The result keeps the left
/// operand's attribute names.
pub struct SetOperationExecutor {
    kind: SetOpKind,
}

impl SetOperationExecutor {
    pub fn new(kind: SetOpKind) -> Self {
        Self { kind }
    }

    pub fn execute(&self, left: &RelationValue, right: &RelationValue) -> EvalResult<RelationValue> {
        if left.attribute_count() != right.attribute_count() {
            return Err(EvalError::arity(
                self.kind.as_str(),
                left.attribute_count(),
                right.attribute_count(),
            ));
        }

        let (l, r) = (left.rows(), right.rows());
        let rows = match self.kind {
            SetOpKind::Union => l.union(r).cloned().collect(),
            SetOpKind::Intersect => l.intersection(r).cloned().collect(),
            SetOpKind::Difference => l.difference(r).cloned().collect(),
        };

        Ok(RelationValue::from_parts(
            left.attribute_names().to_vec(),
            rows,
        ))
    }
}
