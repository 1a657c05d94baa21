//! SELECT SQL generation.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::dml::SqlWriter;

pub fn build_select(writer: &mut SqlWriter<'_>, ast: &QueryAst) -> QailResult<String> {
    if !ast.assignments.is_empty() {
        return Err(QailError::SetOutsideUpdate {
            statement: ast.statement,
        });
    }

    let mut sql = if ast.distinct {
        String::from("SELECT DISTINCT ")
    } else {
        String::from("SELECT ")
    };
    sql.push_str(&writer.columns(&ast.columns)?);

    if !ast.from.is_empty() {
        sql.push_str(" FROM ");
        sql.push_str(&writer.from_clause(&ast.from)?);
    }

    if !ast.wheres.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&writer.conjunction(&ast.wheres)?);
    }

    if !ast.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&writer.expr_list(&ast.group_by)?);
    }

    if !ast.having.is_empty() {
        sql.push_str(" HAVING ");
        sql.push_str(&writer.conjunction(&ast.having)?);
    }

    if !ast.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&writer.order_by(&ast.order_by)?);
    }

    sql.push_str(&writer.limit_offset(ast));
    Ok(sql)
}
