use crate::access::RelationValue;
use crate::error::{EvalError, EvalResult};
use log::debug;
use std::collections::{BTreeMap, HashSet};

/// In-memory store of relation variables and schema templates.
///
/// The database is owned by the caller for the length of one session.
/// Evaluation only reads it; assignment and deletion are the only
/// mutation points.
#[derive(Debug, Clone, Default)]
pub struct Database {
    relation_variables: BTreeMap<String, RelationValue>,
    schemas: BTreeMap<String, Vec<String>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a relation variable
    pub fn get(&self, name: &str) -> Option<&RelationValue> {
        self.relation_variables.get(name)
    }

    /// Store a relation variable. Every attribute must be named.
    pub fn set(&mut self, name: &str, value: RelationValue) -> EvalResult<()> {
        if value.has_unnamed_attributes() {
            return Err(EvalError::UnnamedAttribute {
                context: format!("cannot store {}", name),
            });
        }
        debug!(
            "storing relation variable {} ({} rows)",
            name,
            value.row_count()
        );
        self.relation_variables.insert(name.to_string(), value);
        Ok(())
    }

    /// Remove a relation variable, returning its last value
    pub fn delete(&mut self, name: &str) -> EvalResult<RelationValue> {
        self.relation_variables
            .remove(name)
            .ok_or_else(|| EvalError::UnknownRelationVariable {
                name: name.to_string(),
            })
    }

    /// Names of all stored relation variables, in sorted order
    pub fn names(&self) -> Vec<String> {
        self.relation_variables.keys().cloned().collect()
    }

    pub fn get_relvar(&self, name: &str) -> Option<&RelationValue> {
        self.get(name)
    }

    pub fn set_relvar(&mut self, name: &str, value: RelationValue) -> EvalResult<()> {
        self.set(name, value)
    }

    pub fn delete_relvar(&mut self, name: &str) -> EvalResult<RelationValue> {
        self.delete(name)
    }

    pub fn list_relvar_names(&self) -> Vec<String> {
        self.names()
    }

    /// Declare (or redeclare) a named schema template
    pub fn declare_schema(&mut self, name: &str, attributes: Vec<String>) -> EvalResult<()> {
        let mut seen = HashSet::new();
        for attr in &attributes {
            if !seen.insert(attr.as_str()) {
                return Err(EvalError::DuplicateAttributeName { name: attr.clone() });
            }
        }
        debug!("declaring schema {} = ({})", name, attributes.join(", "));
        self.schemas.insert(name.to_string(), attributes);
        Ok(())
    }

    /// Attribute names of a declared schema template
    pub fn schema(&self, name: &str) -> EvalResult<&[String]> {
        self.schemas
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| EvalError::UnknownSchema {
                name: name.to_string(),
            })
    }

    pub fn schema_names(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }
}
