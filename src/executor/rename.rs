//! Rename (ρ) executor.

use crate::access::relation::check_unique;
use crate::access::RelationValue;
use crate::algebra::RenameMapping;
use crate::error::{EvalError, EvalResult};
use crate::expression::resolver;
use std::collections::HashSet;

/// Executor that renames attributes, leaving rows untouched
pub struct RenameExecutor<'a> {
    mappings: &'a [RenameMapping],
}

impl<'a> RenameExecutor<'a> {
    pub fn new(mappings: &'a [RenameMapping]) -> Self {
        Self { mappings }
    }

    /// All sources are resolved against the input's attribute list before
    /// any name changes, so `a AS b, b AS a` swaps the two attributes.
    /// Two mappings may not rename the same attribute.
    pub fn execute(&self, input: &RelationValue) -> EvalResult<RelationValue> {
        let mut attributes = input.attribute_names().to_vec();

        let targets = self
            .mappings
            .iter()
            .map(|m| resolver::resolve(&m.from, input.attribute_names()).map(|idx| (idx, &m.to)))
            .collect::<EvalResult<Vec<_>>>()?;

        let mut renamed = HashSet::new();
        for &(idx, _) in &targets {
            if !renamed.insert(idx) {
                return Err(EvalError::DuplicateAttributeName {
                    name: input.attribute_names()[idx].clone().unwrap_or_default(),
                });
            }
        }

        for (idx, to) in targets {
            attributes[idx] = Some(to.clone());
        }
        check_unique(&attributes)?;

        Ok(RelationValue::from_parts(attributes, input.rows().clone()))
    }
}
