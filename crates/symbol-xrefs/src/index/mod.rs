//! Read-only query contract of the persistent symbol index.
//!
//! Every query takes an immutable request and invokes its callback
//! synchronously, zero or more times, before returning. Queries that can be
//! truncated report whether more results were available.

use std::collections::BTreeSet;

mod memory;
mod merge;
mod quality;
mod symbol;
mod symbol_id;

pub use memory::{IndexSnapshot, MemIndex};
pub use merge::{merge_symbol, prefer, preferred_location};
pub use quality::{DefaultScorer, RelevanceScorer};
pub use symbol::{ContainedRef, Point, Ref, RefKind, Relation, RelationKind, Symbol, SymbolKind, SymbolLocation};
pub use symbol_id::SymbolId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRequest {
    pub ids: BTreeSet<SymbolId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuzzyFindRequest {
    pub query: String,
    /// Scopes to search, each with a trailing `::`; `""` is the global scope.
    pub scopes: Vec<String>,
    /// Also return symbols outside `scopes`.
    pub any_scope: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefsRequest {
    pub ids: BTreeSet<SymbolId>,
    pub filter: RefKind,
    pub limit: Option<usize>,
}

impl Default for RefsRequest {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
            filter: RefKind::ALL,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationsRequest {
    pub subjects: BTreeSet<SymbolId>,
    pub predicate: RelationKind,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainedRefsRequest {
    pub id: SymbolId,
    pub limit: Option<usize>,
}

pub trait SymbolIndex {
    fn lookup(
        &self,
        request: &LookupRequest,
        callback: &mut dyn FnMut(&Symbol),
    );

    /// Returns true when results were dropped because of the limit.
    fn fuzzy_find(
        &self,
        request: &FuzzyFindRequest,
        callback: &mut dyn FnMut(&Symbol),
    ) -> bool;

    /// Returns true when results were dropped because of the limit.
    fn refs(
        &self,
        request: &RefsRequest,
        callback: &mut dyn FnMut(&Ref),
    ) -> bool;

    /// Reports `(subject, object)` pairs for the requested predicate.
    fn relations(
        &self,
        request: &RelationsRequest,
        callback: &mut dyn FnMut(SymbolId, &Symbol),
    );

    /// References located inside the body of `request.id`.
    /// Returns true when results were dropped because of the limit.
    fn contained_refs(
        &self,
        request: &ContainedRefsRequest,
        callback: &mut dyn FnMut(&ContainedRef),
    ) -> bool;
}
