//! Registry of built-in scalar functions.
//!
//! Each entry has a fixed arity and a pure implementation over non-null
//! values. A null argument makes the whole call null without invoking the
//! implementation.

use crate::access::Value;
use crate::error::{EvalError, EvalResult};

type FunctionImpl = fn(&[Value]) -> EvalResult<Value>;

/// A built-in scalar function
pub struct ScalarFunction {
    pub name: &'static str,
    pub arity: usize,
    implementation: FunctionImpl,
}

impl ScalarFunction {
    /// Call the function, checking arity and propagating nulls
    pub fn call(&self, args: &[Value]) -> EvalResult<Value> {
        if args.len() != self.arity {
            return Err(EvalError::arity(
                format!("call to {}", self.name),
                self.arity,
                args.len(),
            ));
        }
        if args.iter().any(Value::is_null) {
            return Ok(Value::Null);
        }
        (self.implementation)(args)
    }
}

static REGISTRY: &[ScalarFunction] = &[
    ScalarFunction {
        name: "abs",
        arity: 1,
        implementation: abs,
    },
    ScalarFunction {
        name: "length",
        arity: 1,
        implementation: length,
    },
    ScalarFunction {
        name: "lower",
        arity: 1,
        implementation: lower,
    },
    ScalarFunction {
        name: "upper",
        arity: 1,
        implementation: upper,
    },
    ScalarFunction {
        name: "mod",
        arity: 2,
        implementation: modulo,
    },
];

/// Look up a function by name, ignoring case
pub fn lookup(name: &str) -> EvalResult<&'static ScalarFunction> {
    REGISTRY
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| EvalError::UnknownFunction {
            name: name.to_string(),
        })
}

fn abs(args: &[Value]) -> EvalResult<Value> {
    match &args[0] {
        Value::Number(n) => n
            .checked_abs()
            .map(Value::Number)
            .ok_or_else(|| EvalError::NumericOverflow {
                operator: "abs".to_string(),
            }),
        other => Err(EvalError::type_mismatch("abs", other.type_name(), "-")),
    }
}

fn length(args: &[Value]) -> EvalResult<Value> {
    match &args[0] {
        Value::Text(s) => Ok(Value::Number(s.chars().count() as i64)),
        other => Err(EvalError::type_mismatch("length", other.type_name(), "-")),
    }
}

fn lower(args: &[Value]) -> EvalResult<Value> {
    match &args[0] {
        Value::Text(s) => Ok(Value::Text(s.to_lowercase())),
        other => Err(EvalError::type_mismatch("lower", other.type_name(), "-")),
    }
}

fn upper(args: &[Value]) -> EvalResult<Value> {
    match &args[0] {
        Value::Text(s) => Ok(Value::Text(s.to_uppercase())),
        other => Err(EvalError::type_mismatch("upper", other.type_name(), "-")),
    }
}

fn modulo(args: &[Value]) -> EvalResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Number(_), Value::Number(0)) => Err(EvalError::DivisionByZero),
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.wrapping_rem(*b))),
        (a, b) => Err(EvalError::type_mismatch("mod", a.type_name(), b.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_lookup() -> EvalResult<()> {
        assert_eq!(lookup("ABS")?.arity, 1);
        assert_eq!(lookup("mod")?.arity, 2);
        assert_eq!(
            lookup("count").err().map(|e| e.kind()),
            Some(ErrorKind::UnknownFunction)
        );
        Ok(())
    }

    #[test]
    fn test_calls() -> EvalResult<()> {
        assert_eq!(lookup("abs")?.call(&[Value::Number(-4)])?, Value::Number(4));
        assert_eq!(
            lookup("length")?.call(&[Value::text("héllo")])?,
            Value::Number(5)
        );
        assert_eq!(
            lookup("upper")?.call(&[Value::text("ab")])?,
            Value::text("AB")
        );
        assert_eq!(
            lookup("mod")?.call(&[Value::Number(7), Value::Number(3)])?,
            Value::Number(1)
        );
        Ok(())
    }

    #[test]
    fn test_call_errors() -> EvalResult<()> {
        let err = lookup("abs")?.call(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);

        let err = lookup("lower")?.call(&[Value::Number(1)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = lookup("mod")?
            .call(&[Value::Number(1), Value::Number(0)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);
        Ok(())
    }

    #[test]
    fn test_null_argument() -> EvalResult<()> {
        assert_eq!(lookup("abs")?.call(&[Value::Null])?, Value::Null);
        assert_eq!(
            lookup("mod")?.call(&[Value::Number(1), Value::Null])?,
            Value::Null
        );
        Ok(())
    }
}
