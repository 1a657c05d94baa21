//! Entity metadata and the type-level vocabulary of query values.
//!
//! Entities are zero-sized marker types describing one table. They are
//! usually declared with [`entity!`](crate::entity!):
//!
//! ```
//! use qail_typed::entity;
//!
//! entity! {
//!     pub struct Person in "person" {
//!         ID => "id": i64,
//!         NAME => "name": String,
//!         AGE => "age": Option<i32>,
//!     }
//! }
//!
//! use qail_typed::entity::Entity;
//! assert_eq!(Person::TABLE, "person");
//! assert_eq!(Person::NAME.name(), "name");
//! assert!(Person::FIELDS[2].nullable);
//! ```

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::ast::Value;

/// Storage type of a field, as reported to backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    Bytes,
    Timestamp,
}

/// Metadata of one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
}

impl FieldDef {
    /// Describe a field whose values have type `T`.
    pub const fn of<T: SqlType>(name: &'static str) -> Self {
        Self {
            name,
            ty: T::FIELD_TYPE,
            nullable: T::NULLABLE,
        }
    }
}

/// Trait for entity marker types.
///
/// Generated entity structs implement this trait.
pub trait Entity: 'static {
    /// The table name.
    const TABLE: &'static str;

    /// Every field of the entity, in declaration order.
    const FIELDS: &'static [FieldDef];

    /// Look up a field by column name.
    fn field(name: &str) -> Option<&'static FieldDef> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

/// A typed field reference: a column of entity `E` holding `T` values.
pub struct Field<E, T> {
    name: &'static str,
    _phantom: PhantomData<fn() -> (E, T)>,
}

impl<E, T> Field<E, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<E: Entity, T> Field<E, T> {
    /// Get qualified name (table.column).
    pub fn qualified(&self) -> String {
        format!("{}.{}", E::TABLE, self.name)
    }
}

impl<E, T> Clone for Field<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Field<E, T> {}

impl<E, T> std::fmt::Debug for Field<E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Value types a column or expression may carry.
///
/// Entities deliberately do not implement this, so a whole row can never
/// stand where a single value is expected.
pub trait SqlType: 'static {
    const FIELD_TYPE: FieldType;
    const NULLABLE: bool = false;
}

macro_rules! impl_sql_type {
    ($($ty:ty => $field_type:ident),* $(,)?) => {
        $(
            impl SqlType for $ty {
                const FIELD_TYPE: FieldType = FieldType::$field_type;
            }

            impl IntoNullable for $ty {
                type Nullable = Option<$ty>;
            }
        )*
    };
}

impl_sql_type! {
    bool => Bool,
    i32 => Int,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    String => Text,
    Vec<u8> => Bytes,
    chrono::DateTime<chrono::Utc> => Timestamp,
}

impl<T: SqlType> SqlType for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
    const NULLABLE: bool = true;
}

/// Maps a field type to its nullable counterpart without double wrapping.
///
/// `i32` becomes `Option<i32>`; `Option<i32>` stays `Option<i32>`.
pub trait IntoNullable: SqlType {
    type Nullable: SqlType;
}

impl<T: SqlType> IntoNullable for Option<T> {
    type Nullable = Option<T>;
}

/// Marker for types arithmetic operators accept.
pub trait Numeric: SqlType {}

impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for f32 {}
impl Numeric for f64 {}
impl<N: Numeric> Numeric for Option<N> {}

/// Host values that can be lifted into a query with [`val`](crate::expr::val).
pub trait Literal {
    /// The query-level type of the lifted value.
    type Sql: SqlType;

    fn into_value(self) -> Value;
}

macro_rules! impl_literal {
    ($($ty:ty => $sql:ty),* $(,)?) => {
        $(
            impl Literal for $ty {
                type Sql = $sql;

                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

impl_literal! {
    bool => bool,
    i32 => i32,
    i64 => i64,
    f32 => f32,
    f64 => f64,
    String => String,
    Vec<u8> => Vec<u8>,
    chrono::DateTime<chrono::Utc> => chrono::DateTime<chrono::Utc>,
}

impl Literal for &str {
    type Sql = String;

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl<L: Literal> Literal for Option<L> {
    type Sql = Option<L::Sql>;

    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

/// Declare an entity marker type with typed field constants.
///
/// ```
/// qail_typed::entity! {
///     /// A blog post.
///     pub struct BlogPost in "blog_post" {
///         ID => "id": i64,
///         TITLE => "title": String,
///         AUTHOR_ID => "author_id": i64,
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident in $table:literal {
            $( $(#[$field_meta:meta])* $field:ident => $column:literal : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name;

        impl $name {
            $(
                $(#[$field_meta])*
                pub const $field: $crate::entity::Field<$name, $ty> =
                    $crate::entity::Field::new($column);
            )*
        }

        impl $crate::entity::Entity for $name {
            const TABLE: &'static str = $table;
            const FIELDS: &'static [$crate::entity::FieldDef] = &[
                $( $crate::entity::FieldDef::of::<$ty>($column), )*
            ];
        }
    };
}
