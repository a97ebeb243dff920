//! Relation values: a list of attribute names plus a set of tuples.

use crate::access::Value;
use crate::error::{EvalError, EvalResult};
use crate::expression::resolver::local_name;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A row of a relation value
pub type Tuple = Vec<Value>;

/// An attribute name; `None` marks an unnamed attribute
pub type Attribute = Option<String>;

/// An attribute-named set of tuples.
///
/// Every tuple has exactly `attribute_count()` values, and the row set never
/// holds two equal tuples. An empty attribute list together with an empty
/// row set means the arity has not been established yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationValue {
    attributes: Vec<Attribute>,
    rows: BTreeSet<Tuple>,
}

impl RelationValue {
    /// Create a relation value with no attributes and no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty relation value with the given (possibly unnamed) attributes
    pub fn with_attributes(attributes: Vec<Attribute>) -> EvalResult<Self> {
        check_unique(&attributes)?;
        Ok(Self {
            attributes,
            rows: BTreeSet::new(),
        })
    }

    /// Create an empty relation value whose attributes are all named
    pub fn named<I, S>(names: I) -> EvalResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_attributes(names.into_iter().map(|n| Some(n.into())).collect())
    }

    /// Assemble a relation from parts an operator has already validated.
    pub(crate) fn from_parts(attributes: Vec<Attribute>, rows: BTreeSet<Tuple>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == attributes.len()));
        Self { attributes, rows }
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute_names(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &BTreeSet<Tuple> {
        &self.rows
    }

    pub fn contains_row(&self, row: &[Value]) -> bool {
        self.rows.contains(row)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_unnamed_attributes(&self) -> bool {
        self.attributes.iter().any(|a| a.is_none())
    }

    /// False for a value with no attributes and no rows, such as `{}`
    pub fn arity_established(&self) -> bool {
        !self.attributes.is_empty() || !self.rows.is_empty()
    }

    /// Replace the attribute names, keeping the arity.
    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) -> EvalResult<()> {
        if self.arity_established() && attributes.len() != self.attributes.len() {
            return Err(EvalError::arity(
                "attribute naming",
                self.attributes.len(),
                attributes.len(),
            ));
        }
        check_unique(&attributes)?;
        self.attributes = attributes;
        Ok(())
    }

    /// Name every attribute
    pub fn set_attribute_names<I, S>(&mut self, names: I) -> EvalResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_attributes(names.into_iter().map(|n| Some(n.into())).collect())
    }

    /// Add a row. Adding a row that is already present is a no-op.
    pub fn add_row(&mut self, row: Tuple) -> EvalResult<()> {
        if !self.arity_established() {
            self.attributes = vec![None; row.len()];
        }
        if row.len() != self.attributes.len() {
            return Err(EvalError::arity("row", self.attributes.len(), row.len()));
        }
        self.rows.insert(row);
        Ok(())
    }

    /// Copy of this value with every attribute re-qualified as `relvar.attr`.
    pub fn qualified(&self, relvar: &str) -> EvalResult<Self> {
        let mut names = Vec::with_capacity(self.attributes.len());
        for attr in &self.attributes {
            let name = attr.as_deref().ok_or_else(|| EvalError::UnnamedAttribute {
                context: format!("cannot qualify attributes under {}", relvar),
            })?;
            names.push(Some(format!("{}.{}", relvar, local_name(name))));
        }
        check_unique(&names)?;
        Ok(Self {
            attributes: names,
            rows: self.rows.clone(),
        })
    }
}

/// Fail if two named attributes share a name
pub(crate) fn check_unique(attributes: &[Attribute]) -> EvalResult<()> {
    let mut seen = HashSet::new();
    for name in attributes.iter().flatten() {
        if !seen.insert(name.as_str()) {
            return Err(EvalError::DuplicateAttributeName { name: name.clone() });
        }
    }
    Ok(())
}

impl fmt::Display for RelationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!(
            "({})",
            self.attributes
                .iter()
                .map(|a| a.as_deref().unwrap_or("unnamed"))
                .collect::<Vec<_>>()
                .join(",")
        );
        writeln!(f, "{}", header)?;
        writeln!(f, "{}", "-".repeat(header.len()))?;

        if self.rows.is_empty() {
            return writeln!(f, "no rows");
        }
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "({})", cells.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn row(values: &[Value]) -> Tuple {
        values.to_vec()
    }

    #[test]
    fn test_first_row_establishes_arity() -> EvalResult<()> {
        let mut rel = RelationValue::new();
        rel.add_row(row(&[Value::Number(1), Value::text("a")]))?;
        assert_eq!(rel.attribute_count(), 2);
        assert!(rel.has_unnamed_attributes());

        let err = rel.add_row(row(&[Value::Number(2)])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
        Ok(())
    }

    #[test]
    fn test_duplicate_rows_collapse() -> EvalResult<()> {
        let mut rel = RelationValue::named(["x"])?;
        rel.add_row(vec![Value::Number(1)])?;
        rel.add_row(vec![Value::Number(1)])?;
        assert_eq!(rel.row_count(), 1);
        Ok(())
    }

    #[test]
    fn test_set_attribute_names() -> EvalResult<()> {
        let mut rel = RelationValue::new();
        rel.add_row(vec![Value::Number(1), Value::Number(2)])?;

        let err = rel.set_attribute_names(["a"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);

        let err = rel.set_attribute_names(["a", "a"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateAttributeName);

        rel.set_attribute_names(["a", "b"])?;
        assert_eq!(
            rel.attribute_names(),
            &[Some("a".to_string()), Some("b".to_string())]
        );
        Ok(())
    }

    #[test]
    fn test_set_attribute_names_on_fresh_value() -> EvalResult<()> {
        let mut rel = RelationValue::new();
        rel.set_attribute_names(["a", "b", "c"])?;
        assert_eq!(rel.attribute_count(), 3);
        assert!(rel.add_row(vec![Value::Null]).is_err());
        Ok(())
    }

    #[test]
    fn test_qualified() -> EvalResult<()> {
        let mut rel = RelationValue::named(["R.x", "y"])?;
        rel.add_row(vec![Value::Number(1), Value::Null])?;

        let q = rel.qualified("S")?;
        assert_eq!(
            q.attribute_names(),
            &[Some("S.x".to_string()), Some("S.y".to_string())]
        );
        assert_eq!(q.rows(), rel.rows());

        let clash = RelationValue::named(["R.x", "T.x"])?;
        assert_eq!(
            clash.qualified("S").unwrap_err().kind(),
            ErrorKind::DuplicateAttributeName
        );

        let mut unnamed = RelationValue::new();
        unnamed.add_row(vec![Value::Number(1)])?;
        assert_eq!(
            unnamed.qualified("S").unwrap_err().kind(),
            ErrorKind::UnnamedAttributeError
        );
        Ok(())
    }

    #[test]
    fn test_display() -> EvalResult<()> {
        let mut rel = RelationValue::with_attributes(vec![Some("a".to_string()), None])?;
        assert_eq!(rel.to_string(), "(a,unnamed)\n-----------\nno rows\n");

        rel.add_row(vec![Value::Number(2), Value::text("x")])?;
        rel.add_row(vec![Value::Number(1), Value::Null])?;
        assert_eq!(
            rel.to_string(),
            "(a,unnamed)\n-----------\n(1, NULL)\n(2, 'x')\n"
        );
        Ok(())
    }
}
