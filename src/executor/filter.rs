//! Selection (σ) executor.
//!
//! Keeps the rows of its input for which the predicate evaluates to `true`.
//! Rows where the predicate is false or null are dropped.

use crate::access::RelationValue;
use crate::error::EvalResult;
use crate::expression::{evaluate_predicate, Environment, Expression};
use std::collections::BTreeSet;

/// Executor that filters rows based on an expression
pub struct FilterExecutor<'a> {
    predicate: &'a Expression,
}

impl<'a> FilterExecutor<'a> {
    pub fn new(predicate: &'a Expression) -> Self {
        Self { predicate }
    }

    pub fn execute(&self, input: &RelationValue) -> EvalResult<RelationValue> {
        let attributes = input.attribute_names();
        let mut rows = BTreeSet::new();

        for row in input.rows() {
            let env = Environment::new(attributes, row);
            if evaluate_predicate(self.predicate, env)? {
                rows.insert(row.clone());
            }
        }

        Ok(RelationValue::from_parts(attributes.to_vec(), rows))
    }
}
