//! Statement rendering shared by SELECT, UPDATE and DELETE.

pub mod delete;
pub mod select;
pub mod update;

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::traits::SqlGenerator;

/// Accumulates SQL for one statement and the parameters it binds.
///
/// Sub-selects render through the same writer, so placeholders are numbered
/// across the whole statement in textual order.
pub struct SqlWriter<'g> {
    generator: &'g dyn SqlGenerator,
    params: Vec<Value>,
}

impl<'g> SqlWriter<'g> {
    pub fn new(generator: &'g dyn SqlGenerator) -> Self {
        Self {
            generator,
            params: Vec::new(),
        }
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }

    /// Dispatch on the statement kind.
    pub fn statement(&mut self, ast: &QueryAst) -> QailResult<String> {
        match ast.statement {
            StatementKind::Select => select::build_select(self, ast),
            StatementKind::Update => update::build_update(self, ast),
            StatementKind::Delete => delete::build_delete(self, ast),
        }
    }

    pub(crate) fn ident(&self, name: &str) -> String {
        self.generator.quote_identifier(name)
    }

    fn bind(&mut self, value: &Value) -> String {
        if value.is_null() {
            return "NULL".to_string();
        }
        self.params.push(value.clone());
        self.generator.placeholder(self.params.len())
    }

    /// `table` or `table AS alias`.
    pub(crate) fn table_ref(&self, scope: &ScopeRef) -> String {
        if scope.alias == scope.table {
            self.ident(scope.table)
        } else {
            format!("{} AS {}", self.ident(scope.table), self.ident(&scope.alias))
        }
    }

    fn column_ref(&self, scope: &ScopeRef, field: &str) -> String {
        format!("{}.{}", self.ident(&scope.alias), self.ident(field))
    }

    /// Render a projection list. Whole-entity handles expand to every field.
    pub(crate) fn columns(&mut self, columns: &[RawExpr]) -> QailResult<String> {
        let mut rendered = Vec::new();
        for column in columns {
            match column {
                RawExpr::Entity(scope) => {
                    rendered.extend(scope.fields.iter().map(|f| self.column_ref(scope, f.name)))
                }
                other => rendered.push(self.expr(other)?),
            }
        }
        if rendered.is_empty() {
            return Ok("1".to_string());
        }
        Ok(rendered.join(", "))
    }

    /// Render every FROM root, comma separated.
    pub(crate) fn from_clause(&mut self, from: &FromClause) -> QailResult<String> {
        let mut roots = Vec::with_capacity(from.roots.len());
        for root in &from.roots {
            roots.push(self.registration(from, *root)?);
        }
        Ok(roots.join(", "))
    }

    fn registration(&mut self, from: &FromClause, id: RegistrationId) -> QailResult<String> {
        match from.get(id) {
            Some(Registration::Scope(scope)) => Ok(self.table_ref(scope)),
            Some(Registration::Join(join)) => {
                let left = self.registration(from, join.left)?;
                let mut right = self.registration(from, join.right)?;
                if matches!(from.get(join.right), Some(Registration::Join(_))) {
                    right = format!("({})", right);
                }
                let mut sql = format!("{} {} {}", left, join.kind.sql_keyword(), right);
                match (&join.on, join.kind) {
                    (Some(_), JoinKind::Cross) => {
                        return Err(QailError::invalid("CROSS JOIN cannot take an ON clause"));
                    }
                    (Some(on), _) => {
                        sql.push_str(" ON ");
                        sql.push_str(&self.expr(on)?);
                    }
                    (None, _) => {}
                }
                Ok(sql)
            }
            None => Err(QailError::invalid(format!(
                "dangling registration id {}",
                id.0
            ))),
        }
    }

    /// Predicates joined with AND.
    pub(crate) fn conjunction(&mut self, predicates: &[RawExpr]) -> QailResult<String> {
        let mut rendered = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            rendered.push(self.expr(predicate)?);
        }
        Ok(rendered.join(" AND "))
    }

    pub(crate) fn expr_list(&mut self, exprs: &[RawExpr]) -> QailResult<String> {
        let mut rendered = Vec::with_capacity(exprs.len());
        for expr in exprs {
            rendered.push(self.expr(expr)?);
        }
        Ok(rendered.join(", "))
    }

    pub(crate) fn order_by(&mut self, directives: &[OrderBy]) -> QailResult<String> {
        let mut rendered = Vec::with_capacity(directives.len());
        for directive in directives {
            rendered.push(format!("{} {}", self.expr(&directive.expr)?, directive.order));
        }
        Ok(rendered.join(", "))
    }

    pub(crate) fn limit_offset(&self, ast: &QueryAst) -> String {
        self.generator.limit_offset(ast.limit, ast.offset)
    }

    /// Render a scalar expression. Compound nodes are fully parenthesized.
    pub(crate) fn expr(&mut self, expr: &RawExpr) -> QailResult<String> {
        Ok(match expr {
            RawExpr::Entity(scope) => {
                return Err(QailError::invalid(format!(
                    "whole-row handle {} used where a scalar is expected",
                    scope.alias
                )));
            }
            RawExpr::FieldAccess { base, field } => match base.as_ref() {
                RawExpr::Entity(scope) => self.column_ref(scope, field),
                other => format!("({}).{}", self.expr(other)?, self.ident(field)),
            },
            RawExpr::Literal(value) => self.bind(value),
            RawExpr::Compare { left, op, right } => {
                let left = self.expr(left)?;
                let right = self.expr(right)?;
                format!("({} {} {})", left, op.sql_symbol(), right)
            }
            RawExpr::Logical { left, op, right } => {
                let left = self.expr(left)?;
                let right = self.expr(right)?;
                format!("({} {} {})", left, op, right)
            }
            RawExpr::Not(inner) => format!("(NOT {})", self.expr(inner)?),
            RawExpr::Binary { left, op, right } => {
                let left = self.expr(left)?;
                let right = self.expr(right)?;
                format!("({} {} {})", left, op, right)
            }
            RawExpr::IsNull(inner) => format!("({} IS NULL)", self.expr(inner)?),
            RawExpr::CountRows => "COUNT(*)".to_string(),
            RawExpr::Aggregate {
                func,
                distinct,
                arg,
            } => {
                let arg = self.expr(arg)?;
                if *distinct {
                    format!("{}(DISTINCT {})", func, arg)
                } else {
                    format!("{}({})", func, arg)
                }
            }
            RawExpr::InList {
                expr,
                list,
                negated,
            } => {
                // An empty list has no valid SQL spelling; fold it.
                if list.is_empty() {
                    return Ok(if *negated { "TRUE" } else { "FALSE" }.to_string());
                }
                let expr = self.expr(expr)?;
                let items: Vec<String> = list.iter().map(|v| self.bind(v)).collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!("({} {} ({}))", expr, keyword, items.join(", "))
            }
            RawExpr::Coalesce(args) => format!("COALESCE({})", self.expr_list(args)?),
            RawExpr::SubSelect(query) => format!("({})", self.nested_select(query)?),
            RawExpr::Exists { query, negated } => {
                let inner = self.nested_select(query)?;
                if *negated {
                    format!("(NOT EXISTS ({}))", inner)
                } else {
                    format!("(EXISTS ({}))", inner)
                }
            }
        })
    }

    fn nested_select(&mut self, query: &QueryAst) -> QailResult<String> {
        if query.statement != StatementKind::Select {
            return Err(QailError::invalid(format!(
                "sub-query must be a SELECT, found {}",
                query.statement
            )));
        }
        select::build_select(self, query)
    }
}
