// Relational algebra abstract syntax tree definitions

use crate::expression::Expression;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `relvar(attr, ...) := expr`; the attribute list is optional
    Assign {
        relvar: String,
        attributes: Option<Vec<String>>,
        expr: RelExpr,
    },
    /// A bare expression whose value is returned but not stored
    NoAssign(RelExpr),
    /// `schema = (attr, ...)`
    SchemaDecl {
        schema: String,
        attributes: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelExpr {
    RelationVariable(String),
    /// Literal rows; cells are constant scalar expressions
    ConstantRelation(Vec<Vec<Expression>>),
    Rename {
        mappings: Vec<RenameMapping>,
        input: Box<RelExpr>,
    },
    Projection {
        items: Vec<ProjectItem>,
        input: Box<RelExpr>,
    },
    Selection {
        predicate: Expression,
        input: Box<RelExpr>,
    },
    CrossProduct {
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    SetOp {
        kind: SetOpKind,
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    Join {
        kind: JoinKind,
        predicate: Option<Expression>,
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    Division {
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    GroupAggregate {
        groups: Vec<Expression>,
        aggregates: Vec<Expression>,
        input: Box<RelExpr>,
    },
    Parenthesized(Box<RelExpr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameMapping {
    pub from: String,
    pub to: String,
}

impl RenameMapping {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// One entry of a projection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectItem {
    Expr(Expression),
    /// Expands to one attribute reference per name in the schema
    Schema(SchemaExpr),
}

/// Expression over named schema templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaExpr {
    Name(String),
    SetOp {
        kind: SetOpKind,
        left: Box<SchemaExpr>,
        right: Box<SchemaExpr>,
    },
    Parenthesized(Box<SchemaExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOpKind {
    Union,
    Intersect,
    Difference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl SetOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOpKind::Union => "union",
            SetOpKind::Intersect => "intersect",
            SetOpKind::Difference => "difference",
        }
    }
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner join",
            JoinKind::LeftOuter => "left outer join",
            JoinKind::RightOuter => "right outer join",
            JoinKind::FullOuter => "full outer join",
        }
    }
}

impl RelExpr {
    pub fn relvar(name: impl Into<String>) -> Self {
        RelExpr::RelationVariable(name.into())
    }

    pub fn constant(rows: Vec<Vec<Expression>>) -> Self {
        RelExpr::ConstantRelation(rows)
    }

    pub fn select(predicate: Expression, input: RelExpr) -> Self {
        RelExpr::Selection {
            predicate,
            input: Box::new(input),
        }
    }

    pub fn project(items: Vec<Expression>, input: RelExpr) -> Self {
        RelExpr::Projection {
            items: items.into_iter().map(ProjectItem::Expr).collect(),
            input: Box::new(input),
        }
    }

    pub fn rename(mappings: Vec<RenameMapping>, input: RelExpr) -> Self {
        RelExpr::Rename {
            mappings,
            input: Box::new(input),
        }
    }

    pub fn cross(left: RelExpr, right: RelExpr) -> Self {
        RelExpr::CrossProduct {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn set_op(kind: SetOpKind, left: RelExpr, right: RelExpr) -> Self {
        RelExpr::SetOp {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn join(kind: JoinKind, predicate: Option<Expression>, left: RelExpr, right: RelExpr) -> Self {
        RelExpr::Join {
            kind,
            predicate,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn divide(left: RelExpr, right: RelExpr) -> Self {
        RelExpr::Division {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn group(groups: Vec<Expression>, aggregates: Vec<Expression>, input: RelExpr) -> Self {
        RelExpr::GroupAggregate {
            groups,
            aggregates,
            input: Box::new(input),
        }
    }

    pub fn parens(inner: RelExpr) -> Self {
        RelExpr::Parenthesized(Box::new(inner))
    }

    /// Short operator name, used in log messages and error contexts
    pub fn operator_name(&self) -> &'static str {
        match self {
            RelExpr::RelationVariable(_) => "relation variable",
            RelExpr::ConstantRelation(_) => "constant relation",
            RelExpr::Rename { .. } => "rename",
            RelExpr::Projection { .. } => "projection",
            RelExpr::Selection { .. } => "selection",
            RelExpr::CrossProduct { .. } => "cross product",
            RelExpr::SetOp { kind, .. } => kind.as_str(),
            RelExpr::Join { kind, .. } => kind.as_str(),
            RelExpr::Division { .. } => "division",
            RelExpr::GroupAggregate { .. } => "group/aggregate",
            RelExpr::Parenthesized(_) => "parentheses",
        }
    }
}

impl SchemaExpr {
    pub fn name(name: impl Into<String>) -> Self {
        SchemaExpr::Name(name.into())
    }

    pub fn set_op(kind: SetOpKind, left: SchemaExpr, right: SchemaExpr) -> Self {
        SchemaExpr::SetOp {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
