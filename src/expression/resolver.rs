//! Attribute name resolution.
//!
//! A qualified name (`rel.attr`) must match an attribute exactly. An
//! unqualified name is compared against the local part of every attribute
//! name, so `a` finds `R.a` after a join, but fails as ambiguous when both
//! `R.a` and `S.a` are present.

use crate::access::Attribute;
use crate::error::{EvalError, EvalResult};

/// The part of an attribute name after its last qualifier
pub fn local_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

pub fn is_qualified(name: &str) -> bool {
    name.contains('.')
}

/// Find the index of `name` in `attributes`. Unnamed attributes never match.
pub fn resolve(name: &str, attributes: &[Attribute]) -> EvalResult<usize> {
    let qualified = is_qualified(name);
    let mut found = None;

    for (idx, attr) in attributes.iter().enumerate() {
        let Some(attr) = attr.as_deref() else {
            continue;
        };
        let matches = if qualified {
            attr == name
        } else {
            local_name(attr) == name
        };
        if matches {
            if found.is_some() {
                return Err(EvalError::AmbiguousAttribute {
                    name: name.to_string(),
                });
            }
            found = Some(idx);
        }
    }

    found.ok_or_else(|| EvalError::UnknownAttribute {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn attrs(names: &[&str]) -> Vec<Attribute> {
        names.iter().map(|n| Some(n.to_string())).collect()
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("R.a"), "a");
        assert_eq!(local_name("a"), "a");
        assert_eq!(local_name("db.R.a"), "a");
    }

    #[test]
    fn test_resolve_unqualified() -> EvalResult<()> {
        let list = attrs(&["R.a", "R.b", "S.c"]);
        assert_eq!(resolve("b", &list)?, 1);
        assert_eq!(resolve("c", &list)?, 2);
        assert_eq!(
            resolve("d", &list).unwrap_err().kind(),
            ErrorKind::UnknownAttribute
        );
        Ok(())
    }

    #[test]
    fn test_resolve_qualified() -> EvalResult<()> {
        let list = attrs(&["R.a", "S.a", "b"]);
        assert_eq!(resolve("S.a", &list)?, 1);
        assert_eq!(
            resolve("T.a", &list).unwrap_err().kind(),
            ErrorKind::UnknownAttribute
        );
        // A qualified name never matches an unqualified attribute.
        assert!(resolve("R.b", &list).is_err());
        Ok(())
    }

    #[test]
    fn test_resolve_ambiguous() {
        let list = attrs(&["R.a", "S.a"]);
        assert_eq!(
            resolve("a", &list).unwrap_err().kind(),
            ErrorKind::AmbiguousAttribute
        );
    }

    #[test]
    fn test_unnamed_attributes_are_skipped() -> EvalResult<()> {
        let list = vec![None, Some("x".to_string())];
        assert_eq!(resolve("x", &list)?, 1);
        Ok(())
    }
}
