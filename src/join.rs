//! Join algebra.
//!
//! A join is a value `Join<K, A, B>` whose kind lives in the zero-sized tag
//! `K`. The kind is therefore available from the type alone, before (and
//! without) looking at either operand.

use std::marker::PhantomData;

use crate::ast::JoinKind;

/// Zero-sized join kind tags.
pub trait JoinTag: 'static {
    const KIND: JoinKind;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Inner;

#[derive(Debug, Clone, Copy, Default)]
pub struct Cross;

#[derive(Debug, Clone, Copy, Default)]
pub struct LeftOuter;

#[derive(Debug, Clone, Copy, Default)]
pub struct RightOuter;

#[derive(Debug, Clone, Copy, Default)]
pub struct FullOuter;

impl JoinTag for Inner {
    const KIND: JoinKind = JoinKind::Inner;
}

impl JoinTag for Cross {
    const KIND: JoinKind = JoinKind::Cross;
}

impl JoinTag for LeftOuter {
    const KIND: JoinKind = JoinKind::LeftOuter;
}

impl JoinTag for RightOuter {
    const KIND: JoinKind = JoinKind::RightOuter;
}

impl JoinTag for FullOuter {
    const KIND: JoinKind = JoinKind::FullOuter;
}

/// A join of two scope descriptors.
#[derive(Debug, Clone, Copy)]
pub struct Join<K, A, B> {
    pub(crate) left: A,
    pub(crate) right: B,
    _kind: PhantomData<fn() -> K>,
}

pub type InnerJoin<A, B> = Join<Inner, A, B>;
pub type CrossJoin<A, B> = Join<Cross, A, B>;
pub type LeftOuterJoin<A, B> = Join<LeftOuter, A, B>;
pub type RightOuterJoin<A, B> = Join<RightOuter, A, B>;
pub type FullOuterJoin<A, B> = Join<FullOuter, A, B>;

impl<K: JoinTag, A, B> Join<K, A, B> {
    pub const KIND: JoinKind = K::KIND;

    pub const fn new(left: A, right: B) -> Self {
        Self {
            left,
            right,
            _kind: PhantomData,
        }
    }

    pub const fn kind(&self) -> JoinKind {
        K::KIND
    }

    pub fn into_parts(self) -> (A, B) {
        (self.left, self.right)
    }
}

/// Anything that statically knows its join kind.
pub trait IsJoin {
    const KIND: JoinKind;
}

impl<K: JoinTag, A, B> IsJoin for Join<K, A, B> {
    const KIND: JoinKind = K::KIND;
}

/// Recover the kind of a join value. The operands are not touched.
pub fn kind_of<J: IsJoin>(_join: &J) -> JoinKind {
    J::KIND
}

/// Recover the kind of a join type without any value at all.
pub const fn kind_of_type<J: IsJoin>() -> JoinKind {
    J::KIND
}

pub const fn inner_join<A, B>(left: A, right: B) -> InnerJoin<A, B> {
    Join::new(left, right)
}

pub const fn cross_join<A, B>(left: A, right: B) -> CrossJoin<A, B> {
    Join::new(left, right)
}

pub const fn left_outer_join<A, B>(left: A, right: B) -> LeftOuterJoin<A, B> {
    Join::new(left, right)
}

pub const fn right_outer_join<A, B>(left: A, right: B) -> RightOuterJoin<A, B> {
    Join::new(left, right)
}

pub const fn full_outer_join<A, B>(left: A, right: B) -> FullOuterJoin<A, B> {
    Join::new(left, right)
}
