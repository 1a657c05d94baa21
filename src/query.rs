//! The query accumulator and statement entry points.
//!
//! A query body is a closure over `&mut Query`. Every clause call appends to
//! the accumulator; the closure's return value is the projection.
//!
//! ```
//! use qail_typed::prelude::*;
//!
//! entity! {
//!     pub struct Person in "person" {
//!         ID => "id": i64,
//!         NAME => "name": String,
//!     }
//! }
//!
//! entity! {
//!     pub struct BlogPost in "blog_post" {
//!         TITLE => "title": String,
//!         AUTHOR_ID => "author_id": i64,
//!     }
//! }
//!
//! let stmt = select(|q| {
//!     let (p, b) = q.from(inner_join(table::<Person>(), table::<BlogPost>()));
//!     q.on(p.proj(Person::ID).eq(b.proj(BlogPost::AUTHOR_ID)))?;
//!     q.order_by([asc(b.proj(BlogPost::TITLE))]);
//!     Ok((p.proj(Person::NAME), b.proj(BlogPost::TITLE)))
//! })?;
//!
//! assert_eq!(stmt.ast().from.joins().count(), 1);
//! # Ok::<(), QailError>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::ast::{
    JoinKind, JoinRegistration, OrderBy, QueryAst, RawExpr, Registration, RegistrationId,
    ScopeId, ScopeRef, StatementKind,
};
use crate::backend::Backend;
use crate::entity::{Entity, SqlType};
use crate::error::{QailError, QailResult};
use crate::expr::{Assignment, Expr};
use crate::from::FromShape;

/// Alias and scope-id allocation, shared by a query and its sub-queries.
#[derive(Debug, Default)]
struct Idents {
    next_scope: usize,
    uses: HashMap<&'static str, usize>,
    /// Every alias handed out so far, across tables.
    issued: HashSet<String>,
}

impl Idents {
    fn allocate(&mut self, table: &'static str) -> (ScopeId, String) {
        let id = ScopeId(self.next_scope);
        self.next_scope += 1;
        let uses = self.uses.entry(table).or_insert(0);
        let alias = loop {
            *uses += 1;
            let candidate = if *uses == 1 {
                table.to_string()
            } else {
                format!("{}{}", table, uses)
            };
            // A table literally named `person2` may already own the alias.
            if !self.issued.contains(&candidate) {
                break candidate;
            }
        };
        self.issued.insert(alias.clone());
        (id, alias)
    }
}

/// Clause accumulator for one query body.
#[derive(Debug)]
pub struct Query {
    ast: QueryAst,
    /// Joins still waiting for an ON clause, most recent last.
    pending_on: Vec<RegistrationId>,
    idents: Idents,
}

impl Query {
    pub(crate) fn new(statement: StatementKind) -> Self {
        Self {
            ast: QueryAst::new(statement),
            pending_on: Vec::new(),
            idents: Idents::default(),
        }
    }

    /// The clauses accumulated so far.
    pub fn ast(&self) -> &QueryAst {
        &self.ast
    }

    pub fn statement(&self) -> StatementKind {
        self.ast.statement
    }

    /// Number of joins that have not received an ON clause yet.
    pub fn pending_on_len(&self) -> usize {
        self.pending_on.len()
    }

    // ---- scope registration ----

    /// Introduce a FROM shape into scope and return its handles.
    pub fn from<S: FromShape>(&mut self, shape: S) -> S::Output {
        shape.introduce(self)
    }

    pub(crate) fn register_scope<E: Entity>(&mut self, nullable: bool) -> (RegistrationId, RawExpr) {
        let (scope_id, alias) = self.idents.allocate(E::TABLE);
        let scope = ScopeRef {
            id: scope_id,
            table: E::TABLE,
            alias,
            nullable,
            fields: E::FIELDS,
        };
        debug!(table = E::TABLE, alias = %scope.alias, nullable, "registered scope");
        let id = self.ast.from.push(Registration::Scope(scope.clone()));
        (id, RawExpr::Entity(scope))
    }

    pub(crate) fn register_join(
        &mut self,
        kind: JoinKind,
        left: RegistrationId,
        right: RegistrationId,
    ) -> RegistrationId {
        let id = self.ast.from.push(Registration::Join(JoinRegistration {
            kind,
            left,
            right,
            on: None,
        }));
        self.pending_on.push(id);
        debug!(%kind, join = id.0, pending = self.pending_on.len(), "registered join");
        id
    }

    pub(crate) fn add_root(&mut self, id: RegistrationId) {
        self.ast.from.roots.push(id);
    }

    // ---- clauses ----

    /// Attach an ON predicate to the most recent join without one.
    ///
    /// Fails with [`QailError::OnClauseWithoutMatchingJoin`] when every join
    /// registered so far already has its ON clause.
    pub fn on(&mut self, predicate: Expr<bool>) -> QailResult<()> {
        let predicate = predicate.into_raw();
        let Some(id) = self.pending_on.pop() else {
            debug!(%predicate, "ON clause without pending join");
            return Err(QailError::unmatched_on(format!(
                "no join is waiting for an ON clause (predicate: {})",
                predicate
            )));
        };
        let join = self.ast.from.join_mut(id).ok_or_else(|| {
            QailError::unmatched_on(format!(
                "pending registration {} is not a join (predicate: {})",
                id.0, predicate
            ))
        })?;
        debug!(join = id.0, kind = %join.kind, %predicate, "matched ON clause");
        join.on = Some(predicate);
        Ok(())
    }

    /// Add a WHERE predicate. Several calls are conjoined.
    pub fn where_(&mut self, predicate: Expr<bool>) {
        self.ast.wheres.push(predicate.into_raw());
    }

    pub fn order_by(&mut self, directives: impl IntoIterator<Item = OrderBy>) {
        self.ast.order_by.extend(directives);
    }

    pub fn group_by<T>(&mut self, expr: Expr<T>) {
        self.ast.group_by.push(expr.into_raw());
    }

    /// Add a HAVING predicate. Several calls are conjoined.
    pub fn having(&mut self, predicate: Expr<bool>) {
        self.ast.having.push(predicate.into_raw());
    }

    pub fn limit(&mut self, n: u64) {
        self.ast.limit = Some(n);
    }

    pub fn offset(&mut self, n: u64) {
        self.ast.offset = Some(n);
    }

    pub fn distinct(&mut self) {
        self.ast.distinct = true;
    }

    /// Record SET assignments for `entity`.
    ///
    /// Accepted in every statement kind; only an UPDATE renders. SELECT and
    /// DELETE statements carrying assignments are rejected by the backend
    /// with [`QailError::SetOutsideUpdate`].
    pub fn set<E: Entity>(
        &mut self,
        entity: &Expr<E>,
        assignments: impl IntoIterator<Item = Assignment<E>>,
    ) {
        let target = entity.raw();
        self.ast.assignments.extend(
            assignments
                .into_iter()
                .map(|assignment| assignment.into_clause(target.clone())),
        );
    }

    /// Run a query fragment against this accumulator.
    pub fn run<R>(&mut self, fragment: impl FnOnce(&mut Query) -> QailResult<R>) -> QailResult<R> {
        fragment(self)
    }

    /// Run a fragment with a fresh pending-ON stack.
    ///
    /// `on` calls inside `fragment` only see joins the fragment registers
    /// itself. Joins it leaves unmatched are pushed back onto this query's
    /// stack afterwards, on top of the ones that were already pending.
    pub fn isolated_on<R>(
        &mut self,
        fragment: impl FnOnce(&mut Query) -> QailResult<R>,
    ) -> QailResult<R> {
        let outer = std::mem::take(&mut self.pending_on);
        let result = fragment(self);
        let leftover = std::mem::replace(&mut self.pending_on, outer);
        trace!(leftover = leftover.len(), "isolated fragment finished");
        self.pending_on.extend(leftover);
        result
    }

    // ---- sub-queries ----

    /// Embed a one-column query as a scalar: `(SELECT ...)`.
    pub fn sub_select<T: SqlType>(
        &mut self,
        body: impl FnOnce(&mut Query) -> QailResult<Expr<T>>,
    ) -> QailResult<Expr<T>> {
        let (ast, _) = self.nested(false, body)?;
        Ok(Expr::from_raw(RawExpr::SubSelect(Box::new(ast))))
    }

    /// Like [`sub_select`](Self::sub_select) with `SELECT DISTINCT`.
    pub fn sub_select_distinct<T: SqlType>(
        &mut self,
        body: impl FnOnce(&mut Query) -> QailResult<Expr<T>>,
    ) -> QailResult<Expr<T>> {
        let (ast, _) = self.nested(true, body)?;
        Ok(Expr::from_raw(RawExpr::SubSelect(Box::new(ast))))
    }

    /// `EXISTS (SELECT ...)`
    pub fn exists<R: Projection>(
        &mut self,
        body: impl FnOnce(&mut Query) -> QailResult<R>,
    ) -> QailResult<Expr<bool>> {
        self.exists_inner(false, body)
    }

    /// `NOT EXISTS (SELECT ...)`
    pub fn not_exists<R: Projection>(
        &mut self,
        body: impl FnOnce(&mut Query) -> QailResult<R>,
    ) -> QailResult<Expr<bool>> {
        self.exists_inner(true, body)
    }

    fn exists_inner<R: Projection>(
        &mut self,
        negated: bool,
        body: impl FnOnce(&mut Query) -> QailResult<R>,
    ) -> QailResult<Expr<bool>> {
        let (ast, _) = self.nested(false, body)?;
        Ok(Expr::from_raw(RawExpr::Exists {
            query: Box::new(ast),
            negated,
        }))
    }

    /// Build an inner SELECT with its own pending-ON stack, sharing alias
    /// allocation with this query.
    fn nested<R: Projection>(
        &mut self,
        distinct: bool,
        body: impl FnOnce(&mut Query) -> QailResult<R>,
    ) -> QailResult<(QueryAst, R)> {
        let mut inner = Query::new(StatementKind::Select);
        inner.idents = std::mem::take(&mut self.idents);
        let result = body(&mut inner);
        self.idents = std::mem::take(&mut inner.idents);
        let projection = result?;
        if distinct {
            inner.distinct();
        }
        Ok((inner.finish(&projection), projection))
    }

    fn finish<R: Projection>(mut self, projection: &R) -> QueryAst {
        projection.collect_columns(&mut self.ast.columns);
        trace!(
            statement = %self.ast.statement,
            roots = self.ast.from.roots.len(),
            unmatched_joins = self.pending_on.len(),
            "finished query"
        );
        self.ast
    }
}

/// Values a query body may return as its result columns.
pub trait Projection {
    fn collect_columns(&self, columns: &mut Vec<RawExpr>);
}

impl<T> Projection for Expr<T> {
    fn collect_columns(&self, columns: &mut Vec<RawExpr>) {
        columns.push(self.raw().clone());
    }
}

impl Projection for () {
    fn collect_columns(&self, _columns: &mut Vec<RawExpr>) {}
}

macro_rules! impl_projection_tuple {
    ($($name:ident => $idx:tt),+) => {
        impl<$($name: Projection),+> Projection for ($($name,)+) {
            fn collect_columns(&self, columns: &mut Vec<RawExpr>) {
                $( self.$idx.collect_columns(columns); )+
            }
        }
    };
}

impl_projection_tuple!(A => 0, B => 1);
impl_projection_tuple!(A => 0, B => 1, C => 2);
impl_projection_tuple!(A => 0, B => 1, C => 2, D => 3);
impl_projection_tuple!(A => 0, B => 1, C => 2, D => 3, F => 4);
impl_projection_tuple!(A => 0, B => 1, C => 2, D => 3, F => 4, G => 5);
impl_projection_tuple!(A => 0, B => 1, C => 2, D => 3, F => 4, G => 5, H => 6);
impl_projection_tuple!(A => 0, B => 1, C => 2, D => 3, F => 4, G => 5, H => 6, I => 7);

/// A finished statement whose rows decode as `R`.
#[derive(Debug)]
pub struct Statement<R> {
    ast: QueryAst,
    _result: PhantomData<fn() -> R>,
}

impl<R> Statement<R> {
    pub fn ast(&self) -> &QueryAst {
        &self.ast
    }

    pub fn into_ast(self) -> QueryAst {
        self.ast
    }

    pub fn kind(&self) -> StatementKind {
        self.ast.statement
    }

    /// Hand the statement to an execution backend.
    pub fn render<B: Backend>(&self, backend: &B) -> QailResult<B::Output> {
        backend.render(&self.ast)
    }

    /// JSON dump of the statement's AST.
    pub fn to_json(&self) -> QailResult<String> {
        Ok(serde_json::to_string(&self.ast)?)
    }
}

impl<R> Clone for Statement<R> {
    fn clone(&self) -> Self {
        Self {
            ast: self.ast.clone(),
            _result: PhantomData,
        }
    }
}

fn build<R: Projection>(
    statement: StatementKind,
    body: impl FnOnce(&mut Query) -> QailResult<R>,
) -> QailResult<Statement<R>> {
    let mut query = Query::new(statement);
    let projection = body(&mut query)?;
    Ok(Statement {
        ast: query.finish(&projection),
        _result: PhantomData,
    })
}

/// Build a SELECT statement.
pub fn select<R: Projection>(
    body: impl FnOnce(&mut Query) -> QailResult<R>,
) -> QailResult<Statement<R>> {
    build(StatementKind::Select, body)
}

/// Build an UPDATE statement.
pub fn update(body: impl FnOnce(&mut Query) -> QailResult<()>) -> QailResult<Statement<()>> {
    build(StatementKind::Update, body)
}

/// Build a DELETE statement.
pub fn delete(body: impl FnOnce(&mut Query) -> QailResult<()>) -> QailResult<Statement<()>> {
    build(StatementKind::Delete, body)
}

/// Combine two query fragments, running `first` then `second` on the same
/// accumulator and pairing their results.
///
/// Each fragment runs under [`Query::isolated_on`], so its `on` calls bind
/// only to joins that fragment registered, whichever order the two are
/// combined in. A fragment with no join of its own cannot claim a join the
/// other fragment left unmatched.
pub fn both<A, B>(
    first: impl FnOnce(&mut Query) -> QailResult<A>,
    second: impl FnOnce(&mut Query) -> QailResult<B>,
) -> impl FnOnce(&mut Query) -> QailResult<(A, B)> {
    move |query: &mut Query| {
        let a = query.isolated_on(first)?;
        let b = query.isolated_on(second)?;
        Ok((a, b))
    }
}
