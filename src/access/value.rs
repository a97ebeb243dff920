use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of non-null values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Number,
    Text,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Number => "Number",
            DataType::Text => "Text",
        }
    }
}

/// A scalar value held in a tuple.
///
/// Numbers are integers so that equality and hashing are total; rows can
/// therefore live in ordinary sets. The derived ordering (Null, then
/// booleans, numbers, text) only serves deterministic row storage and is
/// not the scalar comparison used by predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(i64),
    Text(String),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Number(_) => Some(DataType::Number),
            Value::Text(_) => Some(DataType::Text),
        }
    }

    /// Name of this value's kind, used in error messages
    pub fn type_name(&self) -> &'static str {
        self.data_type().map(|t| t.name()).unwrap_or("Null")
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "'{}'", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_data_type() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Boolean(true).data_type(), Some(DataType::Boolean));
        assert_eq!(Value::Number(42).data_type(), Some(DataType::Number));
        assert_eq!(Value::text("a").data_type(), Some(DataType::Text));
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::Number(1).type_name(), "Number");
    }

    #[test]
    fn test_values_hash_structurally() {
        let mut set = HashSet::new();
        set.insert(vec![Value::Number(1), Value::text("a")]);
        set.insert(vec![Value::Number(1), Value::text("a")]);
        set.insert(vec![Value::Number(1), Value::Null]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Number(-7).to_string(), "-7");
        assert_eq!(Value::text("Bob").to_string(), "'Bob'");
    }

    #[test]
    fn test_storage_order() {
        assert!(Value::Null < Value::Boolean(false));
        assert!(Value::Boolean(true) < Value::Number(-100));
        assert!(Value::Number(3) < Value::text(""));
    }
}
