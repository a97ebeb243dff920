//! Statement execution against a caller-owned database.

use crate::access::RelationValue;
use crate::algebra::Statement;
use crate::database::Database;
use crate::error::{EvalError, EvalResult};
use crate::executor::{Evaluator, EvaluatorConfig};
use log::{debug, warn};

/// Result of executing one statement
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// Value of an assignment or a bare expression
    Relation(RelationValue),
    /// A schema template was declared
    Schema {
        name: String,
        attributes: Vec<String>,
    },
}

impl StatementOutcome {
    pub fn relation(&self) -> Option<&RelationValue> {
        match self {
            StatementOutcome::Relation(value) => Some(value),
            StatementOutcome::Schema { .. } => None,
        }
    }
}

/// Executes statements against a database borrowed for the session's lifetime.
pub struct Session<'a> {
    database: &'a mut Database,
    config: EvaluatorConfig,
}

impl<'a> Session<'a> {
    pub fn new(database: &'a mut Database) -> Self {
        Self::with_config(database, EvaluatorConfig::default())
    }

    pub fn with_config(database: &'a mut Database, config: EvaluatorConfig) -> Self {
        Self { database, config }
    }

    pub fn database(&self) -> &Database {
        &*self.database
    }

    /// Execute a single statement.
    ///
    /// The database is only touched once the statement's expression has
    /// been evaluated in full, so a failing statement leaves it unchanged.
    pub fn execute(&mut self, statement: &Statement) -> EvalResult<StatementOutcome> {
        match statement {
            Statement::Assign {
                relvar,
                attributes,
                expr,
            } => {
                let value = self.evaluator().evaluate(expr)?;
                let value = self.name_for_assignment(relvar, attributes.as_deref(), value)?;
                self.database.set(relvar, value.clone())?;
                debug!("{} := {} rows", relvar, value.row_count());
                Ok(StatementOutcome::Relation(value))
            }
            Statement::NoAssign(expr) => {
                let value = self.evaluator().evaluate(expr)?;
                debug!("expression produced {} rows", value.row_count());
                Ok(StatementOutcome::Relation(value))
            }
            Statement::SchemaDecl { schema, attributes } => {
                self.database.declare_schema(schema, attributes.clone())?;
                Ok(StatementOutcome::Schema {
                    name: schema.clone(),
                    attributes: attributes.clone(),
                })
            }
        }
    }

    /// Execute statements in order. A failure is recorded for its own
    /// statement and execution continues with the next one.
    pub fn execute_batch(&mut self, statements: &[Statement]) -> Vec<EvalResult<StatementOutcome>> {
        statements
            .iter()
            .enumerate()
            .map(|(idx, statement)| {
                let outcome = self.execute(statement);
                if let Err(e) = &outcome {
                    warn!("statement {} failed: {}", idx + 1, e);
                }
                outcome
            })
            .collect()
    }

    /// Remove a relation variable, returning its last value
    pub fn delete_relvar(&mut self, name: &str) -> EvalResult<RelationValue> {
        self.database.delete(name)
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::with_config(&*self.database, self.config.clone())
    }

    /// Give the right-hand side of an assignment attribute names qualified
    /// by the relation variable.
    fn name_for_assignment(
        &self,
        relvar: &str,
        explicit: Option<&[String]>,
        mut value: RelationValue,
    ) -> EvalResult<RelationValue> {
        if let Some(names) = explicit {
            if value.attribute_count() != names.len() && !value.attribute_names().is_empty() {
                return Err(EvalError::arity(
                    format!("assignment to {}", relvar),
                    value.attribute_count(),
                    names.len(),
                ));
            }
            value.set_attribute_names(names.iter().map(|n| format!("{}.{}", relvar, n)))?;
            return Ok(value);
        }

        if value.arity_established() && !value.has_unnamed_attributes() {
            return value.qualified(relvar);
        }

        match self.database.get(relvar) {
            Some(prior) => {
                value.set_attributes(prior.attribute_names().to_vec())?;
                Ok(value)
            }
            None => Err(EvalError::UnnamedAttribute {
                context: format!("assignment to {} needs attribute names", relvar),
            }),
        }
    }
}
