//! The seam between query construction and execution.

use crate::ast::QueryAst;
use crate::error::QailResult;

/// An execution backend: turns a finished [`QueryAst`] into whatever it
/// sends to the database.
///
/// Backends own SQL text, placeholder syntax, parameter binding and row
/// decoding. They are also where statement-shape checks live that the type
/// system does not express, such as SET assignments outside an UPDATE.
pub trait Backend {
    type Output;

    fn render(&self, ast: &QueryAst) -> QailResult<Self::Output>;
}

impl<B: Backend + ?Sized> Backend for &B {
    type Output = B::Output;

    fn render(&self, ast: &QueryAst) -> QailResult<Self::Output> {
        (**self).render(ast)
    }
}
