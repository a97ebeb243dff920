// Relational algebra module - AST handed over by an external front end

pub mod ast;

pub use ast::*;
