//! Relational division (R ÷ S).
//!
//! Every attribute of the divisor is matched by local name to exactly one
//! dividend attribute. The quotient keeps the remaining dividend attributes,
//! and holds the quotient tuples that appear in the dividend paired with
//! every divisor row.

use crate::access::{RelationValue, Tuple};
use crate::error::{EvalError, EvalResult};
use crate::expression::resolver::{self, local_name};
use std::collections::{BTreeSet, HashMap, HashSet};

pub struct DivisionExecutor;

impl DivisionExecutor {
    /// Dividend indices of the divisor's attributes, in divisor order
    fn divisor_indices(dividend: &RelationValue, divisor: &RelationValue) -> EvalResult<Vec<usize>> {
        let mut indices = Vec::with_capacity(divisor.attribute_count());
        for attr in divisor.attribute_names() {
            let name = attr.as_deref().ok_or_else(|| EvalError::DivisionIncompatibleSchema {
                attribute: "unnamed".to_string(),
            })?;
            let idx = resolver::resolve(local_name(name), dividend.attribute_names()).map_err(
                |_| EvalError::DivisionIncompatibleSchema {
                    attribute: name.to_string(),
                },
            )?;
            if indices.contains(&idx) {
                return Err(EvalError::DivisionIncompatibleSchema {
                    attribute: name.to_string(),
                });
            }
            indices.push(idx);
        }
        Ok(indices)
    }

    pub fn execute(dividend: &RelationValue, divisor: &RelationValue) -> EvalResult<RelationValue> {
        let divisor_indices = Self::divisor_indices(dividend, divisor)?;
        let quotient_indices: Vec<usize> = (0..dividend.attribute_count())
            .filter(|idx| !divisor_indices.contains(idx))
            .collect();

        let pick = |row: &Tuple, indices: &[usize]| -> Tuple {
            indices.iter().map(|&i| row[i].clone()).collect()
        };

        // Quotient candidate -> divisor-shaped tuples it is paired with
        let mut pairings: HashMap<Tuple, HashSet<Tuple>> = HashMap::new();
        for row in dividend.rows() {
            pairings
                .entry(pick(row, &quotient_indices))
                .or_default()
                .insert(pick(row, &divisor_indices));
        }

        let rows: BTreeSet<Tuple> = pairings
            .into_iter()
            .filter(|(_, paired)| divisor.rows().iter().all(|s| paired.contains(s)))
            .map(|(quotient, _)| quotient)
            .collect();

        let attributes = quotient_indices
            .iter()
            .map(|&i| dividend.attribute_names()[i].clone())
            .collect();

        Ok(RelationValue::from_parts(attributes, rows))
    }
}
