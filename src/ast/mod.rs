//! Untyped query AST.
//!
//! This is the value the typed builders produce and backends consume.

pub mod expr;
pub mod operators;
pub mod query;
pub mod scope;
pub mod values;

pub use expr::*;
pub use operators::*;
pub use query::*;
pub use scope::*;
pub use values::*;
