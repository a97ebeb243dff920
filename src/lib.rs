pub mod access;
pub mod algebra;
pub mod database;
pub mod error;
pub mod executor;
pub mod expression;
pub mod session;

pub use access::{RelationValue, Value};
pub use database::Database;
pub use error::{ErrorKind, EvalError, EvalResult};
pub use executor::{Evaluator, EvaluatorConfig};
pub use session::{Session, StatementOutcome};
