//! Reference backend: renders a finished query to SQL text plus bound
//! parameters.

pub mod dialect;
pub mod dml;
pub mod sql;
pub mod traits;

pub use dialect::Dialect;
pub use traits::{escape_identifier, SqlGenerator};

use serde::Serialize;
use tracing::trace;

use crate::ast::{QueryAst, Value};
use crate::backend::Backend;
use crate::config::RenderConfig;
use crate::error::QailResult;
use dml::SqlWriter;

/// SQL text with its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSql {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Renders statements for one [`Dialect`].
#[derive(Debug, Clone, Default)]
pub struct SqlRenderer {
    config: RenderConfig,
}

impl SqlRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn postgres() -> Self {
        Self::new(RenderConfig::builder().dialect(Dialect::Postgres).build())
    }

    pub fn sqlite() -> Self {
        Self::new(RenderConfig::builder().dialect(Dialect::Sqlite).build())
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

impl Backend for SqlRenderer {
    type Output = RenderedSql;

    fn render(&self, ast: &QueryAst) -> QailResult<RenderedSql> {
        let generator = self
            .config
            .dialect
            .generator(self.config.quote_all_identifiers);
        let mut writer = SqlWriter::new(generator.as_ref());
        let sql = writer.statement(ast)?;
        let params = writer.into_params();
        trace!(dialect = %self.config.dialect, %sql, params = params.len(), "rendered statement");
        Ok(RenderedSql { sql, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StatementKind;
    use crate::error::QailError;
    use crate::expr::{is_nothing, val, val_list};
    use crate::from::{nullable, table};
    use crate::join::{cross_join, inner_join, left_outer_join};
    use crate::query::{delete, select, update};
    use pretty_assertions::assert_eq;

    crate::entity! {
        struct Account in "account" {
            ID => "id": i64,
            OWNER => "owner": String,
            BALANCE => "balance": i64,
        }
    }

    crate::entity! {
        struct Order in "order" {
            ID => "id": i64,
            ACCOUNT_ID => "account_id": i64,
        }
    }

    crate::entity! {
        struct Legacy in "LegacyAccounts" {
            ID => "AccountId": i64,
        }
    }

    #[test]
    fn test_mixed_case_identifiers_are_quoted_on_postgres() {
        let stmt = select(|q| {
            let l = q.from(table::<Legacy>());
            Ok(l.proj(Legacy::ID))
        })
        .unwrap();
        let out = SqlRenderer::postgres().render(stmt.ast()).unwrap();
        assert_eq!(
            out.sql,
            "SELECT \"LegacyAccounts\".\"AccountId\" FROM \"LegacyAccounts\""
        );
    }

    #[test]
    fn test_select_whole_entity_expands_fields() {
        let stmt = select(|q| Ok(q.from(table::<Account>()))).unwrap();
        let out = SqlRenderer::postgres().render(stmt.ast()).unwrap();
        assert_eq!(
            out.sql,
            "SELECT account.id, account.owner, account.balance FROM account"
        );
        assert!(out.params.is_empty());
    }

    #[test]
    fn test_reserved_table_is_quoted() {
        let stmt = select(|q| {
            let o = q.from(table::<Order>());
            Ok(o.proj(Order::ID))
        })
        .unwrap();
        let out = SqlRenderer::postgres().render(stmt.ast()).unwrap();
        assert_eq!(out.sql, "SELECT \"order\".id FROM \"order\"");
    }

    #[test]
    fn test_self_join_aliases_second_scope() {
        let stmt = select(|q| {
            let (a, b) = q.from(inner_join(table::<Account>(), table::<Account>()));
            q.on(a.proj(Account::ID).ne(b.proj(Account::ID)))?;
            Ok((a.proj(Account::ID), b.proj(Account::ID)))
        })
        .unwrap();
        let out = SqlRenderer::postgres().render(stmt.ast()).unwrap();
        assert_eq!(
            out.sql,
            "SELECT account.id, account2.id FROM account INNER JOIN account AS account2 \
             ON (account.id != account2.id)"
        );
    }

    #[test]
    fn test_cross_join_with_on_is_invalid() {
        let stmt = select(|q| {
            let (a, _o) = q.from(cross_join(table::<Account>(), table::<Order>()));
            q.on(a.proj(Account::ID).eq(val(1i64)))?;
            Ok(())
        })
        .unwrap();
        let err = SqlRenderer::postgres().render(stmt.ast()).unwrap_err();
        assert!(matches!(err, QailError::InvalidStatement(_)));
    }

    #[test]
    fn test_nested_right_join_is_parenthesized() {
        let stmt = select(|q| {
            let (_a, (_o, _b)) = q.from(left_outer_join(
                table::<Account>(),
                inner_join(table::<Order>(), nullable::<Account>()),
            ));
            Ok(())
        })
        .unwrap();
        let out = SqlRenderer::postgres().render(stmt.ast()).unwrap();
        assert_eq!(
            out.sql,
            "SELECT 1 FROM account LEFT OUTER JOIN (\"order\" INNER JOIN account AS account2)"
        );
    }

    #[test]
    fn test_sqlite_quotes_everything_and_uses_question_marks() {
        let stmt = select(|q| {
            let a = q.from(table::<Account>());
            q.where_(a.proj(Account::BALANCE).gt(val(100i64)));
            q.offset(20);
            Ok(a.proj(Account::OWNER))
        })
        .unwrap();
        let out = SqlRenderer::sqlite().render(stmt.ast()).unwrap();
        assert_eq!(
            out.sql,
            "SELECT \"account\".\"owner\" FROM \"account\" \
             WHERE (\"account\".\"balance\" > ?) LIMIT -1 OFFSET 20"
        );
        assert_eq!(out.params, vec![Value::Int(100)]);
    }

    #[test]
    fn test_quote_all_identifiers_postgres() {
        let renderer = SqlRenderer::new(RenderConfig::builder().quote_all_identifiers(true).build());
        let stmt = select(|q| {
            let a = q.from(table::<Account>());
            Ok(a.proj(Account::ID))
        })
        .unwrap();
        let out = renderer.render(stmt.ast()).unwrap();
        assert_eq!(out.sql, "SELECT \"account\".\"id\" FROM \"account\"");
    }

    #[test]
    fn test_null_literal_is_inlined() {
        let stmt = select(|q| {
            let a = q.from(table::<Account>());
            q.where_(is_nothing(val(None::<i64>)));
            Ok(a.proj(Account::ID))
        })
        .unwrap();
        let out = SqlRenderer::postgres().render(stmt.ast()).unwrap();
        assert_eq!(out.sql, "SELECT account.id FROM account WHERE (NULL IS NULL)");
        assert!(out.params.is_empty());
    }

    #[test]
    fn test_empty_in_list_folds() {
        let stmt = select(|q| {
            let a = q.from(table::<Account>());
            q.where_(a.proj(Account::ID).in_(val_list(Vec::<i64>::new())));
            q.where_(a.proj(Account::ID).not_in(val_list(Vec::<i64>::new())));
            Ok(a.proj(Account::ID))
        })
        .unwrap();
        let out = SqlRenderer::postgres().render(stmt.ast()).unwrap();
        assert_eq!(out.sql, "SELECT account.id FROM account WHERE FALSE AND TRUE");
    }

    #[test]
    fn test_update_requires_assignments() {
        let stmt = update(|q| {
            let _a = q.from(table::<Account>());
            Ok(())
        })
        .unwrap();
        let err = SqlRenderer::postgres().render(stmt.ast()).unwrap_err();
        assert!(matches!(err, QailError::InvalidStatement(_)));
    }

    #[test]
    fn test_update_over_join_is_invalid() {
        let stmt = update(|q| {
            let (a, _o) = q.from(inner_join(table::<Account>(), table::<Order>()));
            q.set(&a, [Account::BALANCE.assign(val(0i64))]);
            Ok(())
        })
        .unwrap();
        let err = SqlRenderer::postgres().render(stmt.ast()).unwrap_err();
        assert!(matches!(err, QailError::InvalidStatement(_)));
    }

    #[test]
    fn test_delete_with_set_is_rejected() {
        let stmt = delete(|q| {
            let a = q.from(table::<Account>());
            q.set(&a, [Account::BALANCE.assign(val(0i64))]);
            Ok(())
        })
        .unwrap();
        let err = SqlRenderer::postgres().render(stmt.ast()).unwrap_err();
        assert!(matches!(
            err,
            QailError::SetOutsideUpdate {
                statement: StatementKind::Delete
            }
        ));
    }

    #[test]
    fn test_delete_rejects_limit() {
        let stmt = delete(|q| {
            let _a = q.from(table::<Account>());
            q.limit(1);
            Ok(())
        })
        .unwrap();
        let err = SqlRenderer::postgres().render(stmt.ast()).unwrap_err();
        assert!(err.to_string().contains("LIMIT"));
    }

    #[test]
    fn test_entity_in_scalar_position_is_invalid() {
        let stmt = select(|q| {
            let a = q.from(table::<Account>());
            q.group_by(a);
            Ok(())
        })
        .unwrap();
        let err = SqlRenderer::postgres().render(stmt.ast()).unwrap_err();
        assert!(matches!(err, QailError::InvalidStatement(_)));
    }
}
