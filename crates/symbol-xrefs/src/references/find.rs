use std::collections::{BTreeMap, BTreeSet};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    ast::DeclKind,
    context::QueryContext,
    ide::navigation::{IdeLocation, IdePosition},
    index::{LookupRequest, RefKind, RefsRequest, RelationKind, RelationsRequest, SymbolId, SymbolIndex},
    location::{file_path, index_to_ide_location, main_file_offset, main_range},
    references::finder::{SymbolRole, find_refs},
    selection::{DeclRelation, decls_at_with_relations},
    vfs::paths_match,
};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ReferenceAttributes: u8 {
        const DECLARATION = 1 << 0;
        const DEFINITION = 1 << 1;
        /// Declaration or definition of a method overriding the target.
        const OVERRIDE = 1 << 2;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub location: IdeLocation,
    pub attributes: ReferenceAttributes,
    /// `scope::name` of the symbol containing the reference.
    pub container_name: Option<String>,
}

impl Reference {
    fn new(location: IdeLocation) -> Self {
        Self {
            location,
            attributes: ReferenceAttributes::empty(),
            container_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencesResult {
    pub references: Vec<Reference>,
    /// The limit cut the result short.
    pub has_more: bool,
}

/// Every reference to the symbol under the cursor.
///
/// The main file comes from the AST, everything else from the index. For
/// virtual and ObjC methods the declarations and definitions of overrides
/// are listed, then plain references through any overridden base method.
/// `limit` caps what the index contributes; `None` means no cap.
pub fn find_references(
    ctx: &QueryContext<'_>,
    position: IdePosition,
    limit: Option<usize>,
) -> ReferencesResult {
    let unit = ctx.unit;
    let Some(offset) = main_file_offset(unit, position) else {
        debug!("[refs] position {}:{} is outside the file", position.line, position.character);
        return ReferencesResult::default();
    };
    let main_path = file_path(unit, unit.main_file, ctx.tu_path).unwrap_or_default();
    let add_context = ctx.settings.references.container_names;

    let mut results = ReferencesResult::default();
    let mut ids_to_query: BTreeSet<SymbolId> = BTreeSet::new();
    let mut overridden_methods: BTreeSet<SymbolId> = BTreeSet::new();

    let macro_at_cursor = unit
        .touching_tokens(offset)
        .iter()
        .find(|token| token.kind.is_identifier())
        .and_then(|token| unit.macro_at(token));

    if let Some(macro_idx) = macro_at_cursor {
        let macro_id = unit.macro_symbol_id(macro_idx);
        let mut macro_refs: Vec<_> = unit
            .macro_refs
            .iter()
            .filter(|reference| unit.macro_symbol_id(reference.macro_idx) == macro_id)
            .collect();
        macro_refs.sort_by_key(|reference| reference.start);
        for macro_ref in macro_refs {
            let range = main_range(unit, macro_ref.start, macro_ref.end);
            let mut reference = Reference::new(IdeLocation::new(main_path.clone(), range));
            if macro_ref.is_definition {
                reference.attributes = ReferenceAttributes::DECLARATION | ReferenceAttributes::DEFINITION;
            }
            results.references.push(reference);
        }
        debug!("[refs] macro `{}` has {} main-file references", unit.macro_def(macro_idx).name, results.references.len());
        ids_to_query.insert(macro_id);
    } else {
        let decls = decls_at_with_relations(unit, offset, DeclRelation::TEMPLATE_PATTERN | DeclRelation::ALIAS);
        let mut targets = Vec::new();
        let mut override_subjects: BTreeSet<SymbolId> = BTreeSet::new();
        for &(decl, _) in &decls.decls {
            let Some(id) = unit.symbol_id(decl) else {
                continue;
            };
            targets.push(decl);
            // Function-local symbols cannot be referenced from other files.
            if !unit.decl(decl).function_local {
                ids_to_query.insert(id);
            }
        }
        if ctx.index.is_some() {
            for &(decl, _) in &decls.decls {
                let overrides = match &unit.decl(decl).kind {
                    DeclKind::Method(method) => method.is_virtual,
                    DeclKind::ObjcMethod(_) => true,
                    _ => false,
                };
                if overrides {
                    override_subjects.extend(unit.symbol_id(decl));
                    overridden_methods
                        .extend(unit.overridden_methods(decl).into_iter().filter_map(|base| unit.symbol_id(base)));
                }
            }
        }

        let mut main_refs = find_refs(unit, &targets, false);
        // Only the location matters here, not every role it was seen with.
        main_refs.dedup_by(|later, earlier| later.start == earlier.start);
        for occurrence in main_refs {
            let range = main_range(unit, occurrence.start, occurrence.end);
            let mut reference = Reference::new(IdeLocation::new(main_path.clone(), range));
            if add_context {
                reference.container_name = occurrence.container.map(|container| unit.qualified_name(container));
            }
            if occurrence.role.contains(SymbolRole::DECLARATION) {
                reference.attributes |= ReferenceAttributes::DECLARATION;
            }
            if occurrence.role.contains(SymbolRole::DEFINITION) {
                reference.attributes |= ReferenceAttributes::DECLARATION | ReferenceAttributes::DEFINITION;
            }
            results.references.push(reference);
        }

        if let Some(index) = ctx.index
            && !override_subjects.is_empty()
        {
            add_overrides(ctx, index, override_subjects, limit, add_context, &mut results);
        }
    }

    query_index(ctx, ids_to_query, true, false, limit, &mut results);
    // References through a base method are plain references, and the AST does
    // not report them for the main file.
    query_index(ctx, overridden_methods, false, true, limit, &mut results);
    results
}

/// Declarations and definitions of everything overriding `subjects`.
fn add_overrides(
    ctx: &QueryContext<'_>,
    index: &dyn SymbolIndex,
    subjects: BTreeSet<SymbolId>,
    limit: Option<usize>,
    add_context: bool,
    results: &mut ReferencesResult,
) {
    let request = RelationsRequest {
        subjects,
        predicate: RelationKind::OverriddenBy,
        limit: None,
    };
    let mut positions: BTreeMap<SymbolId, Vec<usize>> = BTreeMap::new();
    index.relations(&request, &mut |_subject, object| {
        if limit.is_some_and(|limit| results.references.len() >= limit) {
            results.has_more = true;
            return;
        }
        let declaration = index_to_ide_location(&object.canonical_declaration, ctx.tu_path);
        let definition = index_to_ide_location(&object.definition, ctx.tu_path);
        if let Some(declaration) = declaration
            && Some(&declaration) != definition.as_ref()
        {
            positions.entry(object.id).or_default().push(results.references.len());
            let mut reference = Reference::new(declaration);
            reference.attributes = ReferenceAttributes::DECLARATION | ReferenceAttributes::OVERRIDE;
            results.references.push(reference);
        }
        if let Some(definition) = definition {
            positions.entry(object.id).or_default().push(results.references.len());
            let mut reference = Reference::new(definition);
            reference.attributes =
                ReferenceAttributes::DECLARATION | ReferenceAttributes::DEFINITION | ReferenceAttributes::OVERRIDE;
            results.references.push(reference);
        }
    });

    if add_context && !positions.is_empty() {
        fill_container_names(index, &positions, results);
    }
}

/// Index references to `ids` outside the main file, unless
/// `allow_main_file` is set. Without `allow_attributes` every hit is reported
/// as a plain reference.
fn query_index(
    ctx: &QueryContext<'_>,
    ids: BTreeSet<SymbolId>,
    allow_attributes: bool,
    allow_main_file: bool,
    limit: Option<usize>,
    results: &mut ReferencesResult,
) {
    let Some(index) = ctx.index else {
        return;
    };
    if ids.is_empty() || results.has_more {
        return;
    }
    let main_path = file_path(ctx.unit, ctx.unit.main_file, ctx.tu_path).unwrap_or_default();
    let add_context = ctx.settings.references.container_names;
    let request = RefsRequest {
        ids,
        filter: RefKind::ALL,
        // Once the quota is full the index is still asked, with nothing left,
        // so it can tell whether more exist.
        limit: limit.map(|limit| limit.saturating_sub(results.references.len())),
    };

    let mut positions: BTreeMap<SymbolId, Vec<usize>> = BTreeMap::new();
    let references = &mut results.references;
    let truncated = index.refs(&request, &mut |indexed| {
        let Some(location) = index_to_ide_location(&indexed.location, ctx.tu_path) else {
            return;
        };
        if !allow_main_file && paths_match(&location.file_path, &main_path) {
            return;
        }
        let mut reference = Reference::new(location);
        if allow_attributes {
            if indexed.kind.contains(RefKind::DECLARATION) {
                reference.attributes |= ReferenceAttributes::DECLARATION;
            }
            if indexed.kind.contains(RefKind::DEFINITION) {
                reference.attributes |= ReferenceAttributes::DECLARATION | ReferenceAttributes::DEFINITION;
            }
        }
        if add_context && let Some(container) = indexed.container {
            positions.entry(container).or_default().push(references.len());
        }
        references.push(reference);
    });
    results.has_more |= truncated;
    if truncated {
        debug!("[refs] index references truncated at {} results", results.references.len());
    }

    if !positions.is_empty() {
        fill_container_names(index, &positions, results);
    }
}

fn fill_container_names(
    index: &dyn SymbolIndex,
    positions: &BTreeMap<SymbolId, Vec<usize>>,
    results: &mut ReferencesResult,
) {
    let request = LookupRequest {
        ids: positions.keys().copied().collect(),
    };
    index.lookup(&request, &mut |container| {
        let Some(indices) = positions.get(&container.id) else {
            warn!("[refs] index returned unrequested container {}", container.id);
            return;
        };
        let name = format!("{}{}", container.scope, container.name);
        for &idx in indices {
            results.references[idx].container_name = Some(name.clone());
        }
    });
}

#[cfg(test)]
#[path = "../../tests/src/references/find_tests.rs"]
mod tests;
