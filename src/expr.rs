//! Typed expressions.
//!
//! `Expr<T>` is a symbolic handle for "a value of type `T` inside the query
//! being built". No `T` ever exists at runtime; the parameter only decides
//! which operations type-check.
//!
//! ```
//! use qail_typed::prelude::*;
//!
//! let total = val(2i64) * val(21i64);
//! let check = total.eq(val(42i64)).and(!val(false));
//! assert_eq!(check.to_string(), "((2 * 21) = 42 AND NOT (false))");
//! ```

use std::marker::PhantomData;
use std::ops::{Add, BitAnd, BitOr, Div, Mul, Not, Sub};

use crate::ast::{
    AggregateFunc, BinaryOp, LogicalOp, Operator, OrderBy, RawExpr, SetClause, SortOrder,
    UpdateOp, Value,
};
use crate::entity::{Entity, Field, IntoNullable, Literal, Numeric, SqlType};

/// A typed expression handle.
pub struct Expr<T> {
    raw: RawExpr,
    _type: PhantomData<fn() -> T>,
}

impl<T> Expr<T> {
    pub(crate) fn from_raw(raw: RawExpr) -> Self {
        Self {
            raw,
            _type: PhantomData,
        }
    }

    /// The untyped tree behind this handle.
    pub fn raw(&self) -> &RawExpr {
        &self.raw
    }

    pub fn into_raw(self) -> RawExpr {
        self.raw
    }
}

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

impl<T> std::fmt::Debug for Expr<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Expr").field(&self.raw).finish()
    }
}

impl<T> std::fmt::Display for Expr<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

// ---- projection ----

impl<E: Entity> Expr<E> {
    /// Project one field of this row.
    pub fn proj<T>(&self, field: Field<E, T>) -> Expr<T> {
        Expr::from_raw(field_access(&self.raw, field.name()))
    }
}

impl<E: Entity> Expr<Option<E>> {
    /// Project one field of a row that may be absent (outer-join side).
    pub fn proj_maybe<T: IntoNullable>(&self, field: Field<E, T>) -> Expr<T::Nullable> {
        Expr::from_raw(field_access(&self.raw, field.name()))
    }
}

fn field_access(base: &RawExpr, field: &'static str) -> RawExpr {
    RawExpr::FieldAccess {
        base: base.clone().boxed(),
        field,
    }
}

// ---- lifting and nulls ----

/// Lift a host value into the query as a bound parameter.
pub fn val<L: Literal>(value: L) -> Expr<L::Sql> {
    Expr::from_raw(RawExpr::Literal(value.into_value()))
}

/// Wrap a value as present. Has no effect on the tree: `just(val(x))` and
/// `val(Some(x))` are the same expression.
pub fn just<T>(expr: Expr<T>) -> Expr<Option<T>> {
    Expr::from_raw(expr.raw)
}

/// SQL `NULL` of a given type.
pub fn nothing<T: SqlType>() -> Expr<Option<T>> {
    Expr::from_raw(RawExpr::Literal(Value::Null))
}

/// `expr IS NULL`
pub fn is_nothing<T>(expr: Expr<Option<T>>) -> Expr<bool> {
    Expr::from_raw(RawExpr::IsNull(expr.raw.boxed()))
}

/// `COALESCE(expr, default)`
pub fn coalesce_default<T: SqlType>(expr: Expr<Option<T>>, default: Expr<T>) -> Expr<T> {
    Expr::from_raw(RawExpr::Coalesce(vec![expr.raw, default.raw]))
}

// ---- comparisons ----

impl<T: SqlType> Expr<T> {
    fn compare(self, op: Operator, rhs: Expr<T>) -> Expr<bool> {
        Expr::from_raw(RawExpr::Compare {
            left: self.raw.boxed(),
            op,
            right: rhs.raw.boxed(),
        })
    }

    pub fn eq(self, rhs: Expr<T>) -> Expr<bool> {
        self.compare(Operator::Eq, rhs)
    }

    pub fn ne(self, rhs: Expr<T>) -> Expr<bool> {
        self.compare(Operator::Ne, rhs)
    }

    pub fn gt(self, rhs: Expr<T>) -> Expr<bool> {
        self.compare(Operator::Gt, rhs)
    }

    pub fn ge(self, rhs: Expr<T>) -> Expr<bool> {
        self.compare(Operator::Gte, rhs)
    }

    pub fn lt(self, rhs: Expr<T>) -> Expr<bool> {
        self.compare(Operator::Lt, rhs)
    }

    pub fn le(self, rhs: Expr<T>) -> Expr<bool> {
        self.compare(Operator::Lte, rhs)
    }

    /// `expr IN (v1, v2, ...)`
    pub fn in_(self, list: ValueList<T>) -> Expr<bool> {
        self.in_list(list, false)
    }

    /// `expr NOT IN (v1, v2, ...)`
    pub fn not_in(self, list: ValueList<T>) -> Expr<bool> {
        self.in_list(list, true)
    }

    fn in_list(self, list: ValueList<T>, negated: bool) -> Expr<bool> {
        Expr::from_raw(RawExpr::InList {
            expr: self.raw.boxed(),
            list: list.values,
            negated,
        })
    }
}

impl Expr<String> {
    /// `expr LIKE pattern`
    pub fn like(self, pattern: Expr<String>) -> Expr<bool> {
        self.compare(Operator::Like, pattern)
    }
}

impl Expr<Option<String>> {
    pub fn like(self, pattern: Expr<Option<String>>) -> Expr<bool> {
        self.compare(Operator::Like, pattern)
    }
}

/// A list of lifted literals for `IN` / `NOT IN`.
///
/// Built with [`val_list`]. The element type `T` must match the compared
/// expression; the values themselves are bound as parameters.
#[derive(Debug, Clone)]
pub struct ValueList<T> {
    values: Vec<Value>,
    _type: PhantomData<fn() -> T>,
}

impl<T> ValueList<T> {
    /// Number of values in the list.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// An empty list renders as a constant (`FALSE` for IN, `TRUE` for
    /// NOT IN).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lift several host values for use with [`Expr::in_`].
pub fn val_list<L: Literal>(values: impl IntoIterator<Item = L>) -> ValueList<L::Sql> {
    ValueList {
        values: values.into_iter().map(Literal::into_value).collect(),
        _type: PhantomData,
    }
}

// ---- boolean ----

impl Expr<bool> {
    fn logical(self, op: LogicalOp, rhs: Expr<bool>) -> Expr<bool> {
        Expr::from_raw(RawExpr::Logical {
            left: self.raw.boxed(),
            op,
            right: rhs.raw.boxed(),
        })
    }

    /// `self AND rhs`
    pub fn and(self, rhs: Expr<bool>) -> Expr<bool> {
        self.logical(LogicalOp::And, rhs)
    }

    /// `self OR rhs`
    pub fn or(self, rhs: Expr<bool>) -> Expr<bool> {
        self.logical(LogicalOp::Or, rhs)
    }
}

impl Not for Expr<bool> {
    type Output = Expr<bool>;

    fn not(self) -> Self::Output {
        Expr::from_raw(RawExpr::Not(self.raw.boxed()))
    }
}

impl BitAnd for Expr<bool> {
    type Output = Expr<bool>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Expr<bool> {
    type Output = Expr<bool>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

// ---- arithmetic ----

fn binary<T>(left: Expr<T>, op: BinaryOp, right: Expr<T>) -> Expr<T> {
    Expr::from_raw(RawExpr::Binary {
        left: left.raw.boxed(),
        op,
        right: right.raw.boxed(),
    })
}

impl<T: Numeric> Add for Expr<T> {
    type Output = Expr<T>;

    fn add(self, rhs: Self) -> Self::Output {
        binary(self, BinaryOp::Add, rhs)
    }
}

impl<T: Numeric> Sub for Expr<T> {
    type Output = Expr<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        binary(self, BinaryOp::Sub, rhs)
    }
}

impl<T: Numeric> Mul for Expr<T> {
    type Output = Expr<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        binary(self, BinaryOp::Mul, rhs)
    }
}

impl<T: Numeric> Div for Expr<T> {
    type Output = Expr<T>;

    fn div(self, rhs: Self) -> Self::Output {
        binary(self, BinaryOp::Div, rhs)
    }
}

// ---- aggregates ----

/// `COUNT(*)`
pub fn count_rows<N: Numeric>() -> Expr<N> {
    Expr::from_raw(RawExpr::CountRows)
}

fn aggregate<T, R>(func: AggregateFunc, distinct: bool, arg: Expr<T>) -> Expr<R> {
    Expr::from_raw(RawExpr::Aggregate {
        func,
        distinct,
        arg: arg.raw.boxed(),
    })
}

/// `COUNT(expr)`
pub fn count<N: Numeric, T: SqlType>(expr: Expr<T>) -> Expr<N> {
    aggregate(AggregateFunc::Count, false, expr)
}

/// `COUNT(DISTINCT expr)`
pub fn count_distinct<N: Numeric, T: SqlType>(expr: Expr<T>) -> Expr<N> {
    aggregate(AggregateFunc::Count, true, expr)
}

/// `SUM(expr)`, NULL over no rows.
pub fn sum<T: Numeric + IntoNullable>(expr: Expr<T>) -> Expr<T::Nullable> {
    aggregate(AggregateFunc::Sum, false, expr)
}

/// `AVG(expr)`, NULL over no rows.
pub fn avg<T: Numeric + IntoNullable>(expr: Expr<T>) -> Expr<T::Nullable> {
    aggregate(AggregateFunc::Avg, false, expr)
}

/// `MIN(expr)`, NULL over no rows.
pub fn min<T: IntoNullable>(expr: Expr<T>) -> Expr<T::Nullable> {
    aggregate(AggregateFunc::Min, false, expr)
}

/// `MAX(expr)`, NULL over no rows.
pub fn max<T: IntoNullable>(expr: Expr<T>) -> Expr<T::Nullable> {
    aggregate(AggregateFunc::Max, false, expr)
}

// ---- ordering ----

/// `expr ASC`
pub fn asc<T>(expr: Expr<T>) -> OrderBy {
    OrderBy {
        expr: expr.raw,
        order: SortOrder::Asc,
    }
}

/// `expr DESC`
pub fn desc<T>(expr: Expr<T>) -> OrderBy {
    OrderBy {
        expr: expr.raw,
        order: SortOrder::Desc,
    }
}

// ---- update assignments ----

/// One typed SET directive for a field of entity `E`.
///
/// The field's value type is checked when the assignment is built and then
/// erased, so a single `set` call can mix fields of different types.
pub struct Assignment<E> {
    field: &'static str,
    op: UpdateOp,
    value: RawExpr,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Assignment<E> {
    fn new<T>(field: Field<E, T>, op: UpdateOp, value: Expr<T>) -> Self {
        Self {
            field: field.name(),
            op,
            value: value.raw,
            _entity: PhantomData,
        }
    }

    /// Column name being assigned.
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn op(&self) -> UpdateOp {
        self.op
    }

    pub(crate) fn into_clause(self, target: RawExpr) -> SetClause {
        SetClause {
            target,
            field: self.field,
            op: self.op,
            value: self.value,
        }
    }
}

impl<E> std::fmt::Debug for Assignment<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assignment")
            .field("field", &self.field)
            .field("op", &self.op)
            .field("value", &self.value)
            .finish()
    }
}

impl<E: Entity, T: SqlType> Field<E, T> {
    /// `field = value`
    pub fn assign(self, value: Expr<T>) -> Assignment<E> {
        Assignment::new(self, UpdateOp::Assign, value)
    }
}

impl<E: Entity, T: Numeric> Field<E, T> {
    /// `field = field + value`
    pub fn add_assign(self, value: Expr<T>) -> Assignment<E> {
        Assignment::new(self, UpdateOp::Add, value)
    }

    /// `field = field - value`
    pub fn sub_assign(self, value: Expr<T>) -> Assignment<E> {
        Assignment::new(self, UpdateOp::Sub, value)
    }

    /// `field = field * value`
    pub fn mul_assign(self, value: Expr<T>) -> Assignment<E> {
        Assignment::new(self, UpdateOp::Mul, value)
    }

    /// `field = field / value`
    pub fn div_assign(self, value: Expr<T>) -> Assignment<E> {
        Assignment::new(self, UpdateOp::Div, value)
    }
}
