//! # qail-typed
//!
//! Typed query construction for QAIL. Queries are built by a closure over a
//! [`Query`](query::Query) accumulator; join trees, nullability and operand
//! types are checked by the compiler, and the finished AST is handed to a
//! [`Backend`](backend::Backend).
//!
//! ## Quick Example
//!
//! ```
//! use qail_typed::prelude::*;
//!
//! entity! {
//!     pub struct Person in "person" {
//!         ID => "id": i64,
//!         NAME => "name": String,
//!         AGE => "age": Option<i32>,
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
//!     let (p, b) = q.from(left_outer_join(table::<Person>(), nullable::<BlogPost>()));
//!     q.on(just(p.proj(Person::ID)).eq(b.proj_maybe(BlogPost::AUTHOR_ID)))?;
//!     q.where_(p.proj(Person::NAME).like(val("J%")));
//!     Ok((p.proj(Person::NAME), b.proj_maybe(BlogPost::TITLE)))
//! })?;
//!
//! let out = stmt.render(&SqlRenderer::postgres())?;
//! assert_eq!(
//!     out.sql,
//!     "SELECT person.name, blog_post.title FROM person \
//!      LEFT OUTER JOIN blog_post ON (person.id = blog_post.author_id) \
//!      WHERE (person.name LIKE $1)"
//! );
//! # Ok::<(), QailError>(())
//! ```

pub mod ast;
pub mod backend;
pub mod config;
pub mod entity;
pub mod error;
pub mod expr;
pub mod from;
pub mod join;
pub mod query;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::backend::Backend;
    pub use crate::config::RenderConfig;
    pub use crate::entity;
    pub use crate::entity::{Entity, Field, FieldDef, FieldType, Literal, Numeric, SqlType};
    pub use crate::error::*;
    pub use crate::expr::{
        asc, avg, coalesce_default, count, count_distinct, count_rows, desc, is_nothing, just,
        max, min, nothing, sum, val, val_list, Assignment, Expr, ValueList,
    };
    pub use crate::from::{nullable, table, NullableTable, Table};
    pub use crate::join::{
        cross_join, full_outer_join, inner_join, kind_of, kind_of_type, left_outer_join,
        right_outer_join, Join,
    };
    pub use crate::query::{both, delete, select, update, Projection, Query, Statement};
    pub use crate::transpiler::{Dialect, RenderedSql, SqlRenderer};
}
