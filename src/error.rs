//! Evaluation error types.

use thiserror::Error;

/// Discriminant of an [`EvalError`], for callers that only need to branch
/// on the failure category (a batch checker, a formatter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArityMismatch,
    DuplicateAttributeName,
    UnnamedAttributeError,
    UnknownAttribute,
    AmbiguousAttribute,
    UnknownRelationVariable,
    UnknownSchema,
    UnknownFunction,
    TypeMismatch,
    DivisionByZero,
    DivisionIncompatibleSchema,
    NumericOverflow,
    RowLimitExceeded,
}

/// Errors that can occur while evaluating a statement.
///
/// Every error aborts the enclosing statement; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Arity mismatch in {context}: expected {expected} attributes, got {actual}")]
    ArityMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Attribute name \"{name}\" appears more than once")]
    DuplicateAttributeName { name: String },

    #[error("Relation-value has unnamed attributes: {context}")]
    UnnamedAttribute { context: String },

    #[error("No attribute with name {name}")]
    UnknownAttribute { name: String },

    #[error("Attribute name {name} is ambiguous")]
    AmbiguousAttribute { name: String },

    #[error("Unknown relation variable: {name}")]
    UnknownRelationVariable { name: String },

    #[error("Unknown schema: {name}")]
    UnknownSchema { name: String },

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("Type mismatch for {operator}: left={left}, right={right}")]
    TypeMismatch {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Divisor attribute {attribute} has no unique counterpart in the dividend")]
    DivisionIncompatibleSchema { attribute: String },

    #[error("Numeric overflow in {operator}")]
    NumericOverflow { operator: String },

    #[error("Result of {operator} exceeds the limit of {limit} rows")]
    RowLimitExceeded { operator: String, limit: usize },
}

impl EvalError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            EvalError::DuplicateAttributeName { .. } => ErrorKind::DuplicateAttributeName,
            EvalError::UnnamedAttribute { .. } => ErrorKind::UnnamedAttributeError,
            EvalError::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            EvalError::AmbiguousAttribute { .. } => ErrorKind::AmbiguousAttribute,
            EvalError::UnknownRelationVariable { .. } => ErrorKind::UnknownRelationVariable,
            EvalError::UnknownSchema { .. } => ErrorKind::UnknownSchema,
            EvalError::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            EvalError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            EvalError::DivisionByZero => ErrorKind::DivisionByZero,
            EvalError::DivisionIncompatibleSchema { .. } => ErrorKind::DivisionIncompatibleSchema,
            EvalError::NumericOverflow { .. } => ErrorKind::NumericOverflow,
            EvalError::RowLimitExceeded { .. } => ErrorKind::RowLimitExceeded,
        }
    }

    pub(crate) fn arity(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        EvalError::ArityMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn type_mismatch(
        operator: impl Into<String>,
        left: &'static str,
        right: &'static str,
    ) -> Self {
        EvalError::TypeMismatch {
            operator: operator.into(),
            left,
            right,
        }
    }
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvalError::arity("union", 2, 3);
        assert_eq!(
            err.to_string(),
            "Arity mismatch in union: expected 2 attributes, got 3"
        );

        let err = EvalError::AmbiguousAttribute {
            name: "id".to_string(),
        };
        assert_eq!(err.to_string(), "Attribute name id is ambiguous");

        let err = EvalError::type_mismatch("+", "Number", "Text");
        assert_eq!(err.to_string(), "Type mismatch for +: left=Number, right=Text");

        assert_eq!(EvalError::DivisionByZero.to_string(), "Division by zero");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            EvalError::UnnamedAttribute {
                context: "assignment".to_string()
            }
            .kind(),
            ErrorKind::UnnamedAttributeError
        );
        assert_eq!(
            EvalError::UnknownSchema {
                name: "S".to_string()
            }
            .kind(),
            ErrorKind::UnknownSchema
        );
        assert_eq!(EvalError::DivisionByZero.kind(), ErrorKind::DivisionByZero);
    }
}
