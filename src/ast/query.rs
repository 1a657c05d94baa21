use serde::Serialize;

use crate::ast::{FromClause, RawExpr, SortOrder, StatementKind, UpdateOp};

/// The finished query handed to a backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAst {
    pub statement: StatementKind,
    pub distinct: bool,
    /// Projected expressions; whole-entity handles expand to every field.
    pub columns: Vec<RawExpr>,
    pub from: FromClause,
    /// Conjoined with AND
    pub wheres: Vec<RawExpr>,
    pub group_by: Vec<RawExpr>,
    /// Conjoined with AND
    pub having: Vec<RawExpr>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub assignments: Vec<SetClause>,
}

impl QueryAst {
    pub fn new(statement: StatementKind) -> Self {
        Self {
            statement,
            distinct: false,
            columns: Vec::new(),
            from: FromClause::default(),
            wheres: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            assignments: Vec::new(),
        }
    }
}

/// One ORDER BY directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBy {
    pub expr: RawExpr,
    pub order: SortOrder,
}

/// One SET assignment: `target.field <op>= value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetClause {
    /// The whole-entity handle the field belongs to
    pub target: RawExpr,
    pub field: &'static str,
    pub op: UpdateOp,
    pub value: RawExpr,
}
