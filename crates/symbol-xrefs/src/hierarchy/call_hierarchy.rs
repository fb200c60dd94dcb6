use std::{collections::BTreeMap, path::Path};

use tracing::{debug, warn};

use crate::{
    ast::{DeclId, DeclKind, ParsedUnit},
    context::QueryContext,
    hierarchy::{
        item::{HierarchyItem, decl_to_item, symbol_to_item},
        payload::{decode_call_payload, encode_call_payload},
    },
    ide::navigation::{IdeLocation, IdePosition, IdeRange},
    index::{ContainedRefsRequest, LookupRequest, RefKind, RefsRequest, Symbol, SymbolId, SymbolIndex},
    location::{index_to_ide_location, main_file_offset},
    selection::{DeclRelation, decls_at_with_relations},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallHierarchyItem {
    pub item: HierarchyItem,
    /// Hex symbol id; empty when the declaration has none.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCall {
    pub from: CallHierarchyItem,
    /// Call sites, in the caller's file.
    pub from_ranges: Vec<IdeRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingCall {
    pub to: CallHierarchyItem,
    /// Call sites, in the file of the item that was asked about.
    pub from_ranges: Vec<IdeRange>,
}

/// Declarations a call hierarchy can start from: anything callable, plus
/// non-local variables and fields whose uses are worth listing.
fn is_call_hierarchy_root(
    unit: &ParsedUnit,
    decl: DeclId,
) -> bool {
    let data = unit.decl(decl);
    match &data.kind {
        DeclKind::Function(_)
        | DeclKind::Method(_)
        | DeclKind::ObjcMethod(_)
        | DeclKind::FunctionTemplate {
            ..
        }
        | DeclKind::Field {
            ..
        } => true,
        DeclKind::Var {
            ..
        } => !data.function_local,
        _ => false,
    }
}

fn symbol_to_call_item(
    symbol: &Symbol,
    tu_path: &Path,
) -> Option<CallHierarchyItem> {
    Some(CallHierarchyItem {
        item: symbol_to_item(symbol, tu_path)?,
        data: encode_call_payload(symbol.id),
    })
}

/// Call hierarchy items for the declarations under the cursor.
pub fn prepare_call_hierarchy(
    ctx: &QueryContext<'_>,
    position: IdePosition,
) -> Vec<CallHierarchyItem> {
    let unit = ctx.unit;
    let Some(offset) = main_file_offset(unit, position) else {
        debug!("[hierarchy] position {}:{} is outside the file", position.line, position.character);
        return Vec::new();
    };

    decls_at_with_relations(unit, offset, DeclRelation::empty())
        .decls
        .into_iter()
        .filter(|(decl, _)| is_call_hierarchy_root(unit, *decl))
        .filter_map(|(decl, _)| {
            let item = decl_to_item(unit, decl, ctx.tu_path)?;
            Some(CallHierarchyItem {
                item,
                data: unit.symbol_id(decl).map(encode_call_payload).unwrap_or_default(),
            })
        })
        .collect()
}

fn item_id(
    item: &CallHierarchyItem,
    what: &str,
) -> Option<SymbolId> {
    match decode_call_payload(&item.data) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!("[hierarchy] {what} for `{}`: {err}", item.item.name);
            None
        },
    }
}

/// Callers of an item, each with the ranges of its calls. Index only: the
/// main file's AST is not consulted. Non-call references such as taking a
/// function's address count too, since they hint at indirect calls.
pub fn incoming_calls(
    item: &CallHierarchyItem,
    index: Option<&dyn SymbolIndex>,
) -> Vec<IncomingCall> {
    let Some(index) = index else {
        return Vec::new();
    };
    let Some(id) = item_id(item, "incoming calls") else {
        return Vec::new();
    };

    let request = RefsRequest {
        ids: [id].into(),
        filter: RefKind::REFERENCE,
        limit: None,
    };
    let mut calls_in: BTreeMap<SymbolId, Vec<IdeLocation>> = BTreeMap::new();
    index.refs(&request, &mut |reference| {
        let Some(location) = index_to_ide_location(&reference.location, &item.item.file_path) else {
            return;
        };
        if let Some(container) = reference.container {
            calls_in.entry(container).or_default().push(location);
        }
    });
    if calls_in.is_empty() {
        return Vec::new();
    }

    let lookup = LookupRequest {
        ids: calls_in.keys().copied().collect(),
    };
    let mut results = Vec::new();
    index.lookup(&lookup, &mut |caller| {
        let Some(locations) = calls_in.get(&caller.id) else {
            return;
        };
        let Some(from) = symbol_to_call_item(caller, &item.item.file_path) else {
            return;
        };
        // Ranges are relative to the caller's file; others cannot be reported.
        let from_ranges = locations
            .iter()
            .filter(|location| location.file_path == from.item.file_path)
            .map(|location| location.range)
            .collect();
        results.push(IncomingCall {
            from,
            from_ranges,
        });
    });
    results.sort_by(|a, b| a.from.item.name.cmp(&b.from.item.name));
    results
}

/// Callees of an item, each with the ranges of the calls made to it. Index
/// only, like [`incoming_calls`].
pub fn outgoing_calls(
    item: &CallHierarchyItem,
    index: Option<&dyn SymbolIndex>,
) -> Vec<OutgoingCall> {
    let Some(index) = index else {
        return Vec::new();
    };
    let Some(id) = item_id(item, "outgoing calls") else {
        return Vec::new();
    };

    let request = ContainedRefsRequest {
        id,
        limit: None,
    };
    let mut calls_out: BTreeMap<SymbolId, Vec<IdeLocation>> = BTreeMap::new();
    index.contained_refs(&request, &mut |reference| {
        if let Some(location) = index_to_ide_location(&reference.location, &item.item.file_path) {
            calls_out.entry(reference.symbol).or_default().push(location);
        }
    });
    if calls_out.is_empty() {
        return Vec::new();
    }

    let lookup = LookupRequest {
        ids: calls_out.keys().copied().collect(),
    };
    let mut results = Vec::new();
    index.lookup(&lookup, &mut |callee| {
        let Some(locations) = calls_out.get(&callee.id) else {
            return;
        };
        let Some(to) = symbol_to_call_item(callee, &item.item.file_path) else {
            return;
        };
        // A declaration apart from its body sees none of the body's calls.
        let from_ranges = locations
            .iter()
            .filter(|location| location.file_path == item.item.file_path)
            .map(|location| location.range)
            .collect();
        results.push(OutgoingCall {
            to,
            from_ranges,
        });
    });
    results.sort_by(|a, b| a.to.item.name.cmp(&b.to.item.name));
    results
}

#[cfg(test)]
#[path = "../../tests/src/hierarchy/call_hierarchy_tests.rs"]
mod tests;
