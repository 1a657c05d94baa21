use serde::Serialize;

use crate::ast::{AggregateFunc, BinaryOp, LogicalOp, Operator, QueryAst, ScopeRef, Value};

/// Untyped expression tree behind every `Expr<T>`.
///
/// The typed layer guarantees operands unify before a node is built, so
/// backends can render these nodes without re-checking types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RawExpr {
    /// A whole row of one scope entry (`person.*`)
    Entity(ScopeRef),
    /// Field selection: `alias.field` for entities, `(expr).field` otherwise
    FieldAccess {
        base: Box<RawExpr>,
        field: &'static str,
    },
    /// Bound literal, or `NULL`
    Literal(Value),
    Compare {
        left: Box<RawExpr>,
        op: Operator,
        right: Box<RawExpr>,
    },
    Logical {
        left: Box<RawExpr>,
        op: LogicalOp,
        right: Box<RawExpr>,
    },
    Not(Box<RawExpr>),
    Binary {
        left: Box<RawExpr>,
        op: BinaryOp,
        right: Box<RawExpr>,
    },
    IsNull(Box<RawExpr>),
    /// `COUNT(*)`
    CountRows,
    Aggregate {
        func: AggregateFunc,
        distinct: bool,
        arg: Box<RawExpr>,
    },
    InList {
        expr: Box<RawExpr>,
        list: Vec<Value>,
        negated: bool,
    },
    /// `COALESCE(a, b, ...)`
    Coalesce(Vec<RawExpr>),
    /// Scalar subquery: `(SELECT ...)`
    SubSelect(Box<QueryAst>),
    /// `EXISTS (SELECT ...)`
    Exists {
        query: Box<QueryAst>,
        negated: bool,
    },
}

impl RawExpr {
    pub(crate) fn boxed(self) -> Box<RawExpr> {
        Box::new(self)
    }

    /// The scope entry this expression is a whole-row handle for.
    pub fn as_scope(&self) -> Option<&ScopeRef> {
        match self {
            RawExpr::Entity(scope) => Some(scope),
            _ => None,
        }
    }
}

impl std::fmt::Display for RawExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawExpr::Entity(scope) => write!(f, "{}", scope.alias),
            RawExpr::FieldAccess { base, field } => match base.as_ref() {
                RawExpr::Entity(scope) => write!(f, "{}.{}", scope.alias, field),
                other => write!(f, "({}).{}", other, field),
            },
            RawExpr::Literal(value) => write!(f, "{}", value),
            RawExpr::Compare { left, op, right } => {
                write!(f, "{} {} {}", left, op.sql_symbol(), right)
            }
            RawExpr::Logical { left, op, right } => write!(f, "({} {} {})", left, op, right),
            RawExpr::Not(inner) => write!(f, "NOT ({})", inner),
            RawExpr::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
            RawExpr::IsNull(inner) => write!(f, "{} IS NULL", inner),
            RawExpr::CountRows => write!(f, "COUNT(*)"),
            RawExpr::Aggregate {
                func,
                distinct,
                arg,
            } => {
                if *distinct {
                    write!(f, "{}(DISTINCT {})", func, arg)
                } else {
                    write!(f, "{}({})", func, arg)
                }
            }
            RawExpr::InList {
                expr,
                list,
                negated,
            } => {
                let items: Vec<String> = list.iter().map(|v| v.to_string()).collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                write!(f, "{} {} ({})", expr, keyword, items.join(", "))
            }
            RawExpr::Coalesce(args) => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "COALESCE({})", args.join(", "))
            }
            RawExpr::SubSelect(_) => write!(f, "(SUBQUERY)"),
            RawExpr::Exists { negated, .. } => {
                if *negated {
                    write!(f, "NOT EXISTS (SUBQUERY)")
                } else {
                    write!(f, "EXISTS (SUBQUERY)")
                }
            }
        }
    }
}
