//! UPDATE SQL generation.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::dml::SqlWriter;

pub fn build_update(writer: &mut SqlWriter<'_>, ast: &QueryAst) -> QailResult<String> {
    if ast.assignments.is_empty() {
        return Err(QailError::invalid("UPDATE without SET assignments"));
    }
    reject_row_clauses(ast)?;
    let scope = single_scope(ast)?;

    let mut sql = String::from("UPDATE ");
    sql.push_str(&writer.table_ref(scope));

    let mut sets = Vec::with_capacity(ast.assignments.len());
    for set in &ast.assignments {
        match set.target.as_scope() {
            Some(target) if target.id == scope.id => {}
            _ => {
                return Err(QailError::invalid(format!(
                    "SET {} targets a scope other than the updated table {}",
                    set.field, scope.alias
                )));
            }
        }
        let value = writer.expr(&set.value)?;
        let column = writer.ident(set.field);
        let rhs = match set.op.binary_op() {
            None => value,
            Some(op) => format!(
                "({}.{} {} {})",
                writer.ident(&scope.alias),
                column,
                op,
                value
            ),
        };
        sets.push(format!("{} = {}", column, rhs));
    }
    sql.push_str(" SET ");
    sql.push_str(&sets.join(", "));

    if !ast.wheres.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&writer.conjunction(&ast.wheres)?);
    }

    Ok(sql)
}

/// Clauses that only make sense on a row-returning statement.
pub(crate) fn reject_row_clauses(ast: &QueryAst) -> QailResult<()> {
    let offending = [
        (ast.distinct, "DISTINCT"),
        (!ast.group_by.is_empty(), "GROUP BY"),
        (!ast.having.is_empty(), "HAVING"),
        (!ast.order_by.is_empty(), "ORDER BY"),
        (ast.limit.is_some(), "LIMIT"),
        (ast.offset.is_some(), "OFFSET"),
    ];
    match offending.iter().find(|(present, _)| *present) {
        Some((_, clause)) => Err(QailError::invalid(format!(
            "{} is not supported in {}",
            clause, ast.statement
        ))),
        None => Ok(()),
    }
}

/// The one plain table an UPDATE or DELETE operates on.
pub(crate) fn single_scope(ast: &QueryAst) -> QailResult<&ScopeRef> {
    match ast.from.roots.as_slice() {
        [root] => match ast.from.get(*root) {
            Some(Registration::Scope(scope)) => Ok(scope),
            Some(Registration::Join(_)) => Err(QailError::invalid(format!(
                "{} over a join is not supported",
                ast.statement
            ))),
            None => Err(QailError::invalid(format!(
                "dangling registration id {}",
                root.0
            ))),
        },
        roots => Err(QailError::invalid(format!(
            "{} needs exactly one table, found {}",
            ast.statement,
            roots.len()
        ))),
    }
}
