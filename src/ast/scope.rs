//! FROM-clause registrations.
//!
//! The scope builder emits one registration per entity scope and one per
//! join, in post-order. Joins refer to their operands by registration id.

use serde::Serialize;

use crate::ast::{JoinKind, RawExpr};
use crate::entity::FieldDef;

/// Query-wide identity of one scope entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub usize);

/// Position of a registration inside [`FromClause::registrations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RegistrationId(pub usize);

/// One entity introduced into scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeRef {
    pub id: ScopeId,
    pub table: &'static str,
    /// Unique within the query and its sub-queries
    pub alias: String,
    /// Right-hand side of an outer join
    pub nullable: bool,
    pub fields: &'static [FieldDef],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinRegistration {
    pub kind: JoinKind,
    pub left: RegistrationId,
    pub right: RegistrationId,
    /// `None` until an `on` call binds to this join
    pub on: Option<RawExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Registration {
    Scope(ScopeRef),
    Join(JoinRegistration),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FromClause {
    pub registrations: Vec<Registration>,
    /// Top-level FROM items, comma separated, in the order written.
    pub roots: Vec<RegistrationId>,
}

impl FromClause {
    pub(crate) fn push(&mut self, registration: Registration) -> RegistrationId {
        let id = RegistrationId(self.registrations.len());
        self.registrations.push(registration);
        id
    }

    pub fn get(&self, id: RegistrationId) -> Option<&Registration> {
        self.registrations.get(id.0)
    }

    pub(crate) fn join_mut(&mut self, id: RegistrationId) -> Option<&mut JoinRegistration> {
        match self.registrations.get_mut(id.0) {
            Some(Registration::Join(join)) => Some(join),
            _ => None,
        }
    }

    /// All scope entries, in registration order.
    pub fn scopes(&self) -> impl Iterator<Item = &ScopeRef> {
        self.registrations.iter().filter_map(|r| match r {
            Registration::Scope(scope) => Some(scope),
            Registration::Join(_) => None,
        })
    }

    /// All joins, in registration order.
    pub fn joins(&self) -> impl Iterator<Item = &JoinRegistration> {
        self.registrations.iter().filter_map(|r| match r {
            Registration::Join(join) => Some(join),
            Registration::Scope(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
