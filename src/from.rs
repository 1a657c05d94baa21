//! The scope builder behind [`Query::from`].
//!
//! A FROM shape is an entity marker, a nullable entity marker, a join tree
//! of those, or a tuple of 2 to 8 of them. Introducing a shape runs two
//! phases:
//!
//! 1. *preprocess*: walk the shape post-order, left to right, registering a
//!    scope entry per entity and a join registration per join node (each join
//!    also goes on the pending-ON stack);
//! 2. *finish*: hand the user the `Expr` handles for every entity.
//!
//! Each tuple element becomes its own top-level FROM root.

use std::marker::PhantomData;

use crate::ast::RegistrationId;
use crate::entity::Entity;
use crate::expr::Expr;
use crate::join::{Join, JoinTag};
use crate::query::Query;

/// Scope descriptor for one entity.
pub struct Table<E>(PhantomData<fn() -> E>);

/// Scope descriptor for one entity on the non-preserving side of an outer
/// join: every column may come back NULL.
pub struct NullableTable<E>(PhantomData<fn() -> E>);

/// Introduce `E` as a plain scope.
pub fn table<E: Entity>() -> Table<E> {
    Table(PhantomData)
}

/// Introduce `E` as a scope whose row may be absent.
pub fn nullable<E: Entity>() -> NullableTable<E> {
    NullableTable(PhantomData)
}

impl<E> Clone for Table<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Table<E> {}

impl<E> Clone for NullableTable<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for NullableTable<E> {}

impl<E: Entity> std::fmt::Debug for Table<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Table").field(&E::TABLE).finish()
    }
}

impl<E: Entity> std::fmt::Debug for NullableTable<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NullableTable").field(&E::TABLE).finish()
    }
}

/// A preprocessed scope fragment: registered, not yet handed to the user.
#[derive(Debug)]
pub struct Preprocessed<O> {
    id: RegistrationId,
    output: O,
}

impl<O> Preprocessed<O> {
    /// The registration this fragment produced: a scope entry for an
    /// entity, the join node for a join.
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// Materialize the user-visible handles.
    pub fn finish(self) -> O {
        self.output
    }
}

/// Shapes that may appear as one operand of a join.
///
/// Implemented for [`Table`], [`NullableTable`] and nested [`Join`]s.
pub trait JoinOperand {
    /// Handles the user receives: `Expr<E>`, `Expr<Option<E>>` or a pair.
    type Output;

    /// Register this operand and everything below it, post-order.
    fn preprocess(self, query: &mut Query) -> Preprocessed<Self::Output>;
}

impl<E: Entity> JoinOperand for Table<E> {
    type Output = Expr<E>;

    fn preprocess(self, query: &mut Query) -> Preprocessed<Self::Output> {
        let (id, scope) = query.register_scope::<E>(false);
        Preprocessed {
            id,
            output: Expr::from_raw(scope),
        }
    }
}

impl<E: Entity> JoinOperand for NullableTable<E> {
    type Output = Expr<Option<E>>;

    fn preprocess(self, query: &mut Query) -> Preprocessed<Self::Output> {
        let (id, scope) = query.register_scope::<E>(true);
        Preprocessed {
            id,
            output: Expr::from_raw(scope),
        }
    }
}

impl<K: JoinTag, A: JoinOperand, B: JoinOperand> JoinOperand for Join<K, A, B> {
    type Output = (A::Output, B::Output);

    fn preprocess(self, query: &mut Query) -> Preprocessed<Self::Output> {
        let (left, right) = self.into_parts();
        let left = left.preprocess(query);
        let right = right.preprocess(query);
        let id = query.register_join(K::KIND, left.id, right.id);
        Preprocessed {
            id,
            output: (left.finish(), right.finish()),
        }
    }
}

/// Shapes accepted by [`Query::from`].
///
/// Single operands become one FROM root; tuples of 2 to 8 operands become
/// one root each, left to right.
pub trait FromShape {
    type Output;

    /// Register the shape's roots and return its handles.
    fn introduce(self, query: &mut Query) -> Self::Output;
}

fn introduce_root<S: JoinOperand>(shape: S, query: &mut Query) -> S::Output {
    let fragment = shape.preprocess(query);
    query.add_root(fragment.id());
    fragment.finish()
}

impl<E: Entity> FromShape for Table<E> {
    type Output = Expr<E>;

    fn introduce(self, query: &mut Query) -> Self::Output {
        introduce_root(self, query)
    }
}

impl<E: Entity> FromShape for NullableTable<E> {
    type Output = Expr<Option<E>>;

    fn introduce(self, query: &mut Query) -> Self::Output {
        introduce_root(self, query)
    }
}

impl<K: JoinTag, A: JoinOperand, B: JoinOperand> FromShape for Join<K, A, B> {
    type Output = (A::Output, B::Output);

    fn introduce(self, query: &mut Query) -> Self::Output {
        introduce_root(self, query)
    }
}

macro_rules! impl_from_shape_tuple {
    ($($name:ident => $var:ident),+) => {
        impl<$($name: JoinOperand),+> FromShape for ($($name,)+) {
            type Output = ($($name::Output,)+);

            fn introduce(self, query: &mut Query) -> Self::Output {
                let ($($var,)+) = self;
                $(
                    let $var = introduce_root($var, query);
                )+
                ($($var,)+)
            }
        }
    };
}

impl_from_shape_tuple!(A => a, B => b);
impl_from_shape_tuple!(A => a, B => b, C => c);
impl_from_shape_tuple!(A => a, B => b, C => c, D => d);
impl_from_shape_tuple!(A => a, B => b, C => c, D => d, F => f);
impl_from_shape_tuple!(A => a, B => b, C => c, D => d, F => f, G => g);
impl_from_shape_tuple!(A => a, B => b, C => c, D => d, F => f, G => g, H => h);
impl_from_shape_tuple!(A => a, B => b, C => c, D => d, F => f, G => g, H => h, I => i);
