use std::{cmp::Reverse, path::Path};

use dashmap::{DashMap, mapref::entry::Entry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::XrefError,
    index::{
        ContainedRef, ContainedRefsRequest, FuzzyFindRequest, LookupRequest, Ref, Relation, RelationKind,
        RelationsRequest, RefsRequest, Symbol, SymbolId, SymbolIndex, merge_symbol,
    },
};

/// Serialized form of a [`MemIndex`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub refs: Vec<SymbolRefs>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRefs {
    pub id: SymbolId,
    pub refs: Vec<Ref>,
}

/// In-memory index safe for concurrent readers and writers.
///
/// Entries live in `DashMap`s; every query sorts what it reports so callers
/// observe the same order no matter how the shards iterate.
pub struct MemIndex {
    symbols: DashMap<SymbolId, Symbol>,
    refs: DashMap<SymbolId, Vec<Ref>>,
    relations: DashMap<(SymbolId, RelationKind), Vec<SymbolId>>,
}

impl Default for MemIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemIndex {
    pub fn new() -> Self {
        Self {
            symbols: DashMap::new(),
            refs: DashMap::new(),
            relations: DashMap::new(),
        }
    }

    pub fn from_snapshot(snapshot: IndexSnapshot) -> Self {
        let index = Self::new();
        for symbol in snapshot.symbols {
            index.insert_symbol(symbol);
        }
        for entry in snapshot.refs {
            for reference in entry.refs {
                index.insert_ref(entry.id, reference);
            }
        }
        for relation in snapshot.relations {
            index.insert_relation(relation);
        }
        index
    }

    pub fn load(path: &Path) -> Result<Self, XrefError> {
        let text = std::fs::read_to_string(path)?;
        let snapshot: IndexSnapshot = serde_json::from_str(&text)?;
        debug!(
            "[index] loaded {} symbols, {} ref lists, {} relations from {}",
            snapshot.symbols.len(),
            snapshot.refs.len(),
            snapshot.relations.len(),
            path.display()
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn snapshot(&self) -> IndexSnapshot {
        let mut symbols: Vec<Symbol> = self.symbols.iter().map(|entry| entry.value().clone()).collect();
        symbols.sort_by_key(|symbol| symbol.id);
        let mut refs: Vec<SymbolRefs> = self
            .refs
            .iter()
            .map(|entry| SymbolRefs {
                id: *entry.key(),
                refs: entry.value().clone(),
            })
            .collect();
        refs.sort_by_key(|entry| entry.id);
        let mut relations: Vec<Relation> = self
            .relations
            .iter()
            .flat_map(|entry| {
                let (subject, predicate) = *entry.key();
                entry
                    .value()
                    .iter()
                    .map(move |object| Relation {
                        subject,
                        predicate,
                        object: *object,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        relations.sort_by_key(|relation| (relation.subject, relation.predicate, relation.object));
        IndexSnapshot {
            symbols,
            refs,
            relations,
        }
    }

    /// Adds a symbol, merging with any entry already stored under its id.
    pub fn insert_symbol(
        &self,
        symbol: Symbol,
    ) {
        match self.symbols.entry(symbol.id) {
            Entry::Occupied(mut existing) => {
                let merged = merge_symbol(existing.get(), &symbol);
                existing.insert(merged);
            },
            Entry::Vacant(slot) => {
                slot.insert(symbol);
            },
        }
    }

    pub fn insert_ref(
        &self,
        id: SymbolId,
        reference: Ref,
    ) {
        let mut refs = self.refs.entry(id).or_default();
        if !refs.contains(&reference) {
            refs.push(reference);
        }
    }

    pub fn insert_relation(
        &self,
        relation: Relation,
    ) {
        let mut objects = self.relations.entry((relation.subject, relation.predicate)).or_default();
        if let Err(pos) = objects.binary_search(&relation.object) {
            objects.insert(pos, relation.object);
        }
    }

    /// Drops every reference located in `file_uri` and forgets symbol
    /// locations pointing into it.
    pub fn remove_file(
        &self,
        file_uri: &str,
    ) {
        for mut entry in self.refs.iter_mut() {
            entry.value_mut().retain(|reference| reference.location.file_uri != file_uri);
        }
        self.refs.retain(|_, refs| !refs.is_empty());
        for mut entry in self.symbols.iter_mut() {
            let symbol = entry.value_mut();
            if symbol.canonical_declaration.file_uri == file_uri {
                symbol.canonical_declaration = Default::default();
            }
            if symbol.definition.file_uri == file_uri {
                symbol.definition = Default::default();
            }
        }
        self.symbols.retain(|_, symbol| !symbol.canonical_declaration.is_empty() || !symbol.definition.is_empty());
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

/// Case-insensitive subsequence match, the loosest notion of "fuzzy".
fn fuzzy_matches(
    query: &str,
    name: &str,
) -> bool {
    let mut name_chars = name.chars().flat_map(char::to_lowercase);
    query.chars().flat_map(char::to_lowercase).all(|wanted| name_chars.any(|ch| ch == wanted))
}

fn truncate<T>(
    items: &mut Vec<T>,
    limit: Option<usize>,
) -> bool {
    match limit {
        Some(limit) if items.len() > limit => {
            items.truncate(limit);
            true
        },
        _ => false,
    }
}

impl SymbolIndex for MemIndex {
    fn lookup(
        &self,
        request: &LookupRequest,
        callback: &mut dyn FnMut(&Symbol),
    ) {
        for id in &request.ids {
            if let Some(symbol) = self.symbols.get(id) {
                callback(&symbol);
            }
        }
    }

    fn fuzzy_find(
        &self,
        request: &FuzzyFindRequest,
        callback: &mut dyn FnMut(&Symbol),
    ) -> bool {
        let mut matches: Vec<Symbol> = self
            .symbols
            .iter()
            .filter(|entry| fuzzy_matches(&request.query, &entry.name))
            .filter(|entry| {
                request.any_scope || request.scopes.is_empty() || request.scopes.contains(&entry.scope)
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by(|a, b| {
            (Reverse(a.references), &a.name, &a.scope, a.id).cmp(&(Reverse(b.references), &b.name, &b.scope, b.id))
        });
        let more = truncate(&mut matches, request.limit);
        for symbol in &matches {
            callback(symbol);
        }
        more
    }

    fn refs(
        &self,
        request: &RefsRequest,
        callback: &mut dyn FnMut(&Ref),
    ) -> bool {
        let mut found: Vec<Ref> = request
            .ids
            .iter()
            .filter_map(|id| self.refs.get(id))
            .flat_map(|refs| {
                refs.iter().filter(|reference| reference.kind.intersects(request.filter)).cloned().collect::<Vec<_>>()
            })
            .collect();
        found.sort_by(|a, b| (&a.location, a.kind.bits()).cmp(&(&b.location, b.kind.bits())));
        let more = truncate(&mut found, request.limit);
        for reference in &found {
            callback(reference);
        }
        more
    }

    fn relations(
        &self,
        request: &RelationsRequest,
        callback: &mut dyn FnMut(SymbolId, &Symbol),
    ) {
        let mut remaining = request.limit.unwrap_or(usize::MAX);
        for subject in &request.subjects {
            let Some(objects) = self.relations.get(&(*subject, request.predicate)) else {
                continue;
            };
            for object in objects.iter() {
                if remaining == 0 {
                    return;
                }
                if let Some(symbol) = self.symbols.get(object) {
                    remaining -= 1;
                    callback(*subject, &symbol);
                }
            }
        }
    }

    fn contained_refs(
        &self,
        request: &ContainedRefsRequest,
        callback: &mut dyn FnMut(&ContainedRef),
    ) -> bool {
        let mut found: Vec<ContainedRef> = self
            .refs
            .iter()
            .flat_map(|entry| {
                let symbol = *entry.key();
                entry
                    .value()
                    .iter()
                    .filter(|reference| reference.container == Some(request.id))
                    .map(|reference| ContainedRef {
                        location: reference.location.clone(),
                        kind: reference.kind,
                        symbol,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        found.sort_by(|a, b| (&a.location, a.symbol).cmp(&(&b.location, b.symbol)));
        let more = truncate(&mut found, request.limit);
        for reference in &found {
            callback(reference);
        }
        more
    }
}

#[cfg(test)]
#[path = "../../tests/src/index/memory_tests.rs"]
mod tests;
