//! DELETE SQL generation.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::dml::update::{reject_row_clauses, single_scope};
use crate::transpiler::dml::SqlWriter;

pub fn build_delete(writer: &mut SqlWriter<'_>, ast: &QueryAst) -> QailResult<String> {
    if !ast.assignments.is_empty() {
        return Err(QailError::SetOutsideUpdate {
            statement: ast.statement,
        });
    }
    reject_row_clauses(ast)?;
    let scope = single_scope(ast)?;

    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&writer.table_ref(scope));

    if !ast.wheres.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&writer.conjunction(&ast.wheres)?);
    }

    Ok(sql)
}
