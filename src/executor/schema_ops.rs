//! Set operations over named schema templates.

use crate::algebra::{SchemaExpr, SetOpKind};
use crate::database::Database;
use crate::error::EvalResult;

/// Expand a schema expression into an ordered, de-duplicated list of
/// attribute names.
///
/// Union keeps the left names in order and appends the right names that are
/// new. Intersect and difference keep the left order, filtered by membership
/// in the right side.
pub fn evaluate_schema(expr: &SchemaExpr, database: &Database) -> EvalResult<Vec<String>> {
    match expr {
        SchemaExpr::Name(name) => Ok(dedupe(database.schema(name)?.iter().cloned())),
        SchemaExpr::Parenthesized(inner) => evaluate_schema(inner, database),
        SchemaExpr::SetOp { kind, left, right } => {
            let left = evaluate_schema(left, database)?;
            let right = evaluate_schema(right, database)?;
            let names = match kind {
                SetOpKind::Union => dedupe(left.into_iter().chain(right)),
                SetOpKind::Intersect => left.into_iter().filter(|n| right.contains(n)).collect(),
                SetOpKind::Difference => left.into_iter().filter(|n| !right.contains(n)).collect(),
            };
            Ok(names)
        }
    }
}

fn dedupe(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn database() -> EvalResult<Database> {
        let mut db = Database::new();
        db.declare_schema("person", vec!["id".into(), "name".into(), "age".into()])?;
        db.declare_schema("employee", vec!["id".into(), "salary".into(), "name".into()])?;
        Ok(db)
    }

    fn op(kind: SetOpKind) -> SchemaExpr {
        SchemaExpr::set_op(kind, SchemaExpr::name("person"), SchemaExpr::name("employee"))
    }

    #[test]
    fn test_schema_union() -> EvalResult<()> {
        let names = evaluate_schema(&op(SetOpKind::Union), &database()?)?;
        assert_eq!(names, vec!["id", "name", "age", "salary"]);
        Ok(())
    }

    #[test]
    fn test_schema_intersect_and_difference() -> EvalResult<()> {
        let db = database()?;
        assert_eq!(evaluate_schema(&op(SetOpKind::Intersect), &db)?, vec!["id", "name"]);
        assert_eq!(evaluate_schema(&op(SetOpKind::Difference), &db)?, vec!["age"]);

        let nested = SchemaExpr::set_op(
            SetOpKind::Difference,
            SchemaExpr::Parenthesized(Box::new(op(SetOpKind::Union))),
            SchemaExpr::name("person"),
        );
        assert_eq!(evaluate_schema(&nested, &db)?, vec!["salary"]);
        Ok(())
    }

    #[test]
    fn test_unknown_schema() -> EvalResult<()> {
        let err = evaluate_schema(&SchemaExpr::name("nobody"), &database()?).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSchema);
        Ok(())
    }
}
