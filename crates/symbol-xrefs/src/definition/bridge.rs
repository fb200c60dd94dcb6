use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::{
    ast::DeclId,
    context::QueryContext,
    definition::{
        located::LocatedSymbol,
        preferred::{definition_of, preferred_decl},
    },
    index::{LookupRequest, RelationKind, RelationsRequest, SymbolId, preferred_location},
    location::{index_to_ide_location, make_location, to_index_location},
};

/// Locates `decl` from the AST alone: its preferred declaration's name, plus
/// the name of its definition when the unit has one. `None` when the
/// declaration lives somewhere without a stable path.
pub fn located_from_decl(
    ctx: &QueryContext<'_>,
    decl: DeclId,
) -> Option<LocatedSymbol> {
    let unit = ctx.unit;
    let decl = preferred_decl(unit, decl);
    let location = make_location(unit, unit.name_location(decl), ctx.tu_path)?;

    let mut located = LocatedSymbol::new(unit.print_name(decl), location);
    located.id = unit.symbol_id(decl);
    located.definition = definition_of(unit, decl)
        .and_then(|definition| make_location(unit, unit.name_location(definition), ctx.tu_path));
    Some(located)
}

/// Completes AST-derived results with index data in one batch lookup.
///
/// With an AST definition the index may still provide a better declaration
/// and, for generated code, a better definition. Without one the index
/// definition is taken as is and the declarations compete under the index
/// merge rules.
pub fn enhance_from_index(
    ctx: &QueryContext<'_>,
    results: &mut [LocatedSymbol],
) {
    let Some(index) = ctx.index else {
        return;
    };
    let mut positions: BTreeMap<SymbolId, usize> = BTreeMap::new();
    for (position, located) in results.iter().enumerate() {
        if let Some(id) = located.id {
            positions.entry(id).or_insert(position);
        }
    }
    if positions.is_empty() {
        return;
    }

    let request = LookupRequest {
        ids: positions.keys().copied().collect(),
    };
    index.lookup(&request, &mut |symbol| {
        let Some(&position) = positions.get(&symbol.id) else {
            warn!("[goto-def] index returned unrequested symbol {}", symbol.id);
            return;
        };
        let located = &mut results[position];

        match &located.definition {
            Some(ast_definition) => {
                if let Some(declaration) = index_to_ide_location(&symbol.canonical_declaration, ctx.tu_path) {
                    located.preferred_declaration = declaration;
                }
                let preferred = preferred_location(&to_index_location(ast_definition), &symbol.definition);
                if let Some(definition) = index_to_ide_location(&preferred, ctx.tu_path) {
                    located.definition = Some(definition);
                }
            },
            None => {
                located.definition = index_to_ide_location(&symbol.definition, ctx.tu_path);
                let preferred = preferred_location(
                    &to_index_location(&located.preferred_declaration),
                    &symbol.canonical_declaration,
                );
                if let Some(declaration) = index_to_ide_location(&preferred, ctx.tu_path) {
                    located.preferred_declaration = declaration;
                }
            },
        }
    });
}

/// Symbols related to `ids` by `predicate` in the index, e.g. the overrides
/// of a set of virtual methods. Entries whose locations cannot be converted
/// are skipped.
pub fn find_implementors(
    ctx: &QueryContext<'_>,
    ids: BTreeSet<SymbolId>,
    predicate: RelationKind,
) -> Vec<LocatedSymbol> {
    let Some(index) = ctx.index else {
        return Vec::new();
    };
    if ids.is_empty() {
        return Vec::new();
    }
    ctx.metrics.record_case(match predicate {
        RelationKind::BaseOf => "find-base",
        RelationKind::OverriddenBy => "find-override",
    });

    let request = RelationsRequest {
        subjects: ids,
        predicate,
        limit: None,
    };
    let mut results = Vec::new();
    index.relations(&request, &mut |_subject, object| {
        let Some(declaration) = index_to_ide_location(&object.canonical_declaration, ctx.tu_path) else {
            debug!("[goto-def] implementor {} has no usable declaration", object.id);
            return;
        };
        let Some(definition) = index_to_ide_location(&object.definition, ctx.tu_path) else {
            debug!("[goto-def] implementor {} has no usable definition", object.id);
            return;
        };
        let mut located = LocatedSymbol::new(object.name.clone(), declaration);
        located.definition = Some(definition);
        located.id = Some(object.id);
        results.push(located);
    });
    results
}

#[cfg(test)]
#[path = "../../tests/src/definition/bridge_tests.rs"]
mod tests;
