//! Access layer for relation data.
//!
//! - **Value**: tagged scalar values (number, text, boolean, null)
//! - **RelationValue**: attribute-named sets of tuples with set semantics
//!
//! Relation values produced by an operator are never mutated afterwards;
//! every operator builds a fresh one.

pub mod relation;
pub mod value;

pub use relation::{Attribute, RelationValue, Tuple};
pub use value::{DataType, Value};
