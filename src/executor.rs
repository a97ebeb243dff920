//! Executor layer for relational algebra evaluation.
//!
//! The [`Evaluator`] walks a [`RelExpr`] tree bottom-up. Each operator is
//! implemented by its own executor, which takes fully materialized input
//! relation values and builds a fresh output value; inputs are never
//! mutated.

use crate::access::RelationValue;
use crate::algebra::{ProjectItem, RelExpr};
use crate::database::Database;
use crate::error::{EvalError, EvalResult};
use crate::expression::{Environment, Expression, ExpressionEvaluator};
use log::{debug, log, Level};

pub mod aggregate;
pub mod division;
pub mod filter;
pub mod nested_loop_join;
pub mod projection;
pub mod rename;
pub mod schema_ops;
pub mod set_ops;

// Re-export executors
pub use aggregate::{AggregateFunction, AggregateSpec, HashAggregateExecutor};
pub use division::DivisionExecutor;
pub use filter::FilterExecutor;
pub use nested_loop_join::NestedLoopJoinExecutor;
pub use projection::ProjectionExecutor;
pub use rename::RenameExecutor;
pub use schema_ops::evaluate_schema;
pub use set_ops::SetOperationExecutor;

/// Configuration for the evaluator.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorConfig {
    /// Upper bound on the row count of any intermediate or final result.
    pub max_rows: Option<usize>,
    /// Log operator output cardinalities at debug level instead of trace.
    pub trace_operators: bool,
}

impl EvaluatorConfig {
    /// Bound every operator's result to `max` rows.
    pub fn with_max_rows(mut self, max: usize) -> Self {
        self.max_rows = Some(max);
        self
    }

    /// Enable or disable operator tracing.
    pub fn with_trace(mut self, enable: bool) -> Self {
        self.trace_operators = enable;
        self
    }
}

/// Evaluates relational expressions against a database.
pub struct Evaluator<'a> {
    database: &'a Database,
    config: EvaluatorConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(database: &'a Database) -> Self {
        Self::with_config(database, EvaluatorConfig::default())
    }

    pub fn with_config(database: &'a Database, config: EvaluatorConfig) -> Self {
        Self { database, config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate an expression to a relation value.
    pub fn evaluate(&self, expr: &RelExpr) -> EvalResult<RelationValue> {
        let result = self.evaluate_operator(expr).map_err(|e| {
            debug!("{} failed: {}", expr.operator_name(), e);
            e
        })?;
        self.check_row_limit(expr, &result)?;

        let level = if self.config.trace_operators {
            Level::Debug
        } else {
            Level::Trace
        };
        log!(
            level,
            "{} produced {} rows over {} attributes",
            expr.operator_name(),
            result.row_count(),
            result.attribute_count()
        );
        Ok(result)
    }

    fn evaluate_operator(&self, expr: &RelExpr) -> EvalResult<RelationValue> {
        match expr {
            RelExpr::RelationVariable(name) => self.database.get(name).cloned().ok_or_else(|| {
                EvalError::UnknownRelationVariable {
                    name: name.clone(),
                }
            }),

            RelExpr::ConstantRelation(rows) => {
                let evaluator = ExpressionEvaluator::new(Environment::empty());
                let mut relation = RelationValue::new();
                for row in rows {
                    let values = row
                        .iter()
                        .map(|cell| evaluator.evaluate(cell))
                        .collect::<EvalResult<Vec<_>>>()?;
                    relation.add_row(values)?;
                }
                Ok(relation)
            }

            RelExpr::Rename { mappings, input } => {
                RenameExecutor::new(mappings).execute(&self.evaluate(input)?)
            }

            RelExpr::Projection { items, input } => {
                let input = self.evaluate(input)?;
                let exprs = self.expand_projection(items)?;
                ProjectionExecutor::new(&exprs).execute(&input)
            }

            RelExpr::Selection { predicate, input } => {
                FilterExecutor::new(predicate).execute(&self.evaluate(input)?)
            }

            RelExpr::CrossProduct { left, right } => {
                let (left, right) = (self.evaluate(left)?, self.evaluate(right)?);
                NestedLoopJoinExecutor::cross_product().execute(&left, &right)
            }

            RelExpr::SetOp { kind, left, right } => {
                let (left, right) = (self.evaluate(left)?, self.evaluate(right)?);
                SetOperationExecutor::new(*kind).execute(&left, &right)
            }

            RelExpr::Join {
                kind,
                predicate,
                left,
                right,
            } => {
                let (left, right) = (self.evaluate(left)?, self.evaluate(right)?);
                NestedLoopJoinExecutor::new(*kind, predicate.as_ref()).execute(&left, &right)
            }

            RelExpr::Division { left, right } => {
                let (left, right) = (self.evaluate(left)?, self.evaluate(right)?);
                DivisionExecutor::execute(&left, &right)
            }

            RelExpr::GroupAggregate {
                groups,
                aggregates,
                input,
            } => {
                let executor = HashAggregateExecutor::new(groups, aggregates)?;
                executor.execute(&self.evaluate(input)?)
            }

            RelExpr::Parenthesized(inner) => self.evaluate(inner),
        }
    }

    /// Replace schema entries of a projection list by attribute references
    fn expand_projection(&self, items: &[ProjectItem]) -> EvalResult<Vec<Expression>> {
        let mut exprs = Vec::with_capacity(items.len());
        for item in items {
            match item {
                ProjectItem::Expr(expr) => exprs.push(expr.clone()),
                ProjectItem::Schema(schema) => exprs.extend(
                    evaluate_schema(schema, self.database)?
                        .into_iter()
                        .map(Expression::attribute),
                ),
            }
        }
        Ok(exprs)
    }

    fn check_row_limit(&self, expr: &RelExpr, result: &RelationValue) -> EvalResult<()> {
        match self.config.max_rows {
            Some(limit) if result.row_count() > limit => Err(EvalError::RowLimitExceeded {
                operator: expr.operator_name().to_string(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

/// Build a named relation value for tests.
#[cfg(test)]
pub(crate) fn relation(names: &[&str], rows: Vec<Vec<crate::access::Value>>) -> RelationValue {
    let mut rel = RelationValue::named(names.iter().copied()).expect("unique attribute names");
    for row in rows {
        rel.add_row(row).expect("row matches attribute count");
    }
    rel
}
