use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ast::{DeclId, DeclKind, ParsedUnit, Type, TypeId},
    context::QueryContext,
    definition::definition_of,
    hierarchy::{
        item::{HierarchyItem, decl_to_item, symbol_to_item},
        payload::TypeHierarchyPayload,
    },
    ide::navigation::IdePosition,
    index::{LookupRequest, RelationKind, RelationsRequest, Symbol, SymbolId, SymbolIndex},
    location::main_file_offset,
    selection::{DeclRelation, create_each, explicit_reference_targets, template_pattern},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeHierarchyDirection {
    Children,
    #[default]
    Parents,
    Both,
}

impl TypeHierarchyDirection {
    fn wants_children(self) -> bool {
        matches!(self, TypeHierarchyDirection::Children | TypeHierarchyDirection::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHierarchyItem {
    pub item: HierarchyItem,
    pub data: TypeHierarchyPayload,
    /// `None` until computed.
    pub parents: Option<Vec<TypeHierarchyItem>>,
    pub children: Option<Vec<TypeHierarchyItem>>,
}

impl TypeHierarchyItem {
    fn new(
        item: HierarchyItem,
        symbol_id: SymbolId,
    ) -> Self {
        Self {
            item,
            data: TypeHierarchyPayload::new(symbol_id),
            parents: None,
            children: None,
        }
    }
}

/// The record a type names, looking through aliases and deduction.
fn record_of_type(
    unit: &ParsedUnit,
    ty: TypeId,
) -> Option<DeclId> {
    match unit.ty(ty) {
        Type::Record {
            decl,
        } => unit.decl(*decl).kind.is_record().then_some(*decl),
        Type::Typedef {
            underlying, ..
        } => record_of_type(unit, *underlying),
        Type::Deduced {
            deduced: Some(deduced),
            ..
        } => record_of_type(unit, *deduced),
        Type::TemplateSpecialization {
            specialization: Some(specialization),
            ..
        } => Some(*specialization),
        _ => None,
    }
}

fn templated_record(
    unit: &ParsedUnit,
    template: DeclId,
) -> Option<DeclId> {
    match unit.decl(template).kind {
        DeclKind::ClassTemplate {
            templated,
        } => Some(templated),
        _ => None,
    }
}

/// Records the cursor is about: a record itself, the class of a method or
/// the type of a variable.
fn find_record_type_at(
    unit: &ParsedUnit,
    offset: u32,
) -> Vec<DeclId> {
    let mut records = Vec::new();
    create_each(unit, offset, |tree| {
        records.clear();
        let Some(node) = tree.common_ancestor else {
            return false;
        };
        for decl in explicit_reference_targets(unit, node, DeclRelation::UNDERLYING) {
            match &unit.decl(decl).kind {
                DeclKind::Var {
                    ty, ..
                } => records.extend(record_of_type(unit, *ty)),
                DeclKind::Method(method) => records.push(method.record),
                DeclKind::Record(_) | DeclKind::ClassTemplateSpecialization(_) => records.push(decl),
                DeclKind::ClassTemplate {
                    templated,
                } => records.push(*templated),
                _ => {},
            }
        }
        !records.is_empty()
    });
    records
}

/// Direct bases of `record`. Invalid specializations use their template's
/// bases, dependent bases resolve to the primary template.
fn type_parents(
    unit: &ParsedUnit,
    record: DeclId,
) -> Vec<DeclId> {
    let mut record = record;
    if let DeclKind::ClassTemplateSpecialization(spec) = &unit.decl(record).kind
        && spec.invalid
        && let Some(templated) = templated_record(unit, spec.specialized_template)
    {
        record = templated;
    }
    let Some(definition) = definition_of(unit, record) else {
        return Vec::new();
    };
    let Some(data) = unit.decl(definition).kind.as_record() else {
        return Vec::new();
    };

    let mut parents = Vec::new();
    for &base in &data.bases {
        let parent = record_of_type(unit, base).or_else(|| match unit.ty(base) {
            Type::TemplateSpecialization {
                template, ..
            } => templated_record(unit, *template),
            _ => None,
        });
        parents.extend(parent);
    }
    parents
}

fn decl_to_type_item(
    ctx: &QueryContext<'_>,
    decl: DeclId,
) -> Option<TypeHierarchyItem> {
    let item = decl_to_item(ctx.unit, decl, ctx.tu_path)?;
    let Some(id) = ctx.unit.symbol_id(decl) else {
        debug!("[hierarchy] `{}` has no symbol id", item.name);
        return None;
    };
    Some(TypeHierarchyItem::new(item, id))
}

fn symbol_to_type_item(
    symbol: &Symbol,
    tu_path: &Path,
) -> Option<TypeHierarchyItem> {
    symbol_to_item(symbol, tu_path).map(|item| TypeHierarchyItem::new(item, symbol.id))
}

/// Fills the parents of `item` from the AST, all the way up. A template
/// pattern already being expanded is not expanded again, which ends
/// hierarchies like `template <class T> struct S : S<T *> {}`.
fn fill_super_types(
    ctx: &QueryContext<'_>,
    record: DeclId,
    item: &mut TypeHierarchyItem,
    expanding_patterns: &mut BTreeSet<DeclId>,
) {
    let unit = ctx.unit;
    let mut parents = Vec::new();
    let mut parent_payloads = Vec::new();

    let pattern = unit
        .decl(record)
        .kind
        .as_record()
        .is_some_and(|data| data.described_template.is_some())
        .then_some(record);
    if let Some(pattern) = pattern
        && !expanding_patterns.insert(pattern)
    {
        item.parents = Some(parents);
        item.data.parents = Some(parent_payloads);
        return;
    }

    for parent in type_parents(unit, record) {
        if let Some(mut parent_item) = decl_to_type_item(ctx, parent) {
            fill_super_types(ctx, parent, &mut parent_item, expanding_patterns);
            parent_payloads.push(parent_item.data.clone());
            parents.push(parent_item);
        }
    }
    item.parents = Some(parents);
    item.data.parents = Some(parent_payloads);

    if let Some(pattern) = pattern {
        expanding_patterns.remove(&pattern);
    }
}

/// Subtypes of `id` from the index, `levels` deep. Each level is one query.
fn fill_sub_types(
    index: &dyn SymbolIndex,
    id: SymbolId,
    levels: u32,
    tu_path: &Path,
) -> Vec<TypeHierarchyItem> {
    let request = RelationsRequest {
        subjects: BTreeSet::from([id]),
        predicate: RelationKind::BaseOf,
        limit: None,
    };
    let mut objects = Vec::new();
    index.relations(&request, &mut |_subject, object| objects.push(object.clone()));

    let mut children = Vec::new();
    for object in objects {
        let Some(mut child) = symbol_to_type_item(&object, tu_path) else {
            continue;
        };
        if levels > 1 {
            child.children = Some(fill_sub_types(index, object.id, levels - 1, tu_path));
        }
        children.push(child);
    }
    children
}

/// Type hierarchy of the record under the cursor. Parents come from the AST
/// and are always complete; children come from the index, `resolve_levels`
/// deep.
pub fn get_type_hierarchy(
    ctx: &QueryContext<'_>,
    position: IdePosition,
    resolve_levels: u32,
    direction: TypeHierarchyDirection,
) -> Vec<TypeHierarchyItem> {
    let unit = ctx.unit;
    let Some(offset) = main_file_offset(unit, position) else {
        debug!("[hierarchy] position {}:{} is outside the file", position.line, position.character);
        return Vec::new();
    };

    let mut results = Vec::new();
    for mut record in find_record_type_at(unit, offset) {
        // The index relates templates, not their implicit instantiations, so
        // children are looked up from the pattern.
        if direction.wants_children()
            && let DeclKind::ClassTemplateSpecialization(_) = unit.decl(record).kind
            && let Some(pattern) = template_pattern(unit, record)
        {
            record = pattern;
        }

        let Some(mut item) = decl_to_type_item(ctx, record) else {
            continue;
        };
        fill_super_types(ctx, record, &mut item, &mut BTreeSet::new());

        if direction.wants_children() && resolve_levels > 0 {
            item.children = Some(match ctx.index {
                Some(index) => fill_sub_types(index, item.data.symbol_id, resolve_levels, ctx.tu_path),
                None => Vec::new(),
            });
        }
        results.push(item);
    }
    results
}

/// Parents of an item from its payload, resolved through the index. `None`
/// when the payload never recorded parents.
pub fn super_types(
    item: &TypeHierarchyItem,
    index: &dyn SymbolIndex,
) -> Option<Vec<TypeHierarchyItem>> {
    let parents = item.data.parents.as_ref()?;
    if parents.is_empty() {
        return Some(Vec::new());
    }
    let payloads: BTreeMap<SymbolId, &TypeHierarchyPayload> =
        parents.iter().map(|parent| (parent.symbol_id, parent)).collect();
    let request = LookupRequest {
        ids: payloads.keys().copied().collect(),
    };

    let mut results = Vec::new();
    index.lookup(&request, &mut |symbol| {
        if let Some(mut parent) = symbol_to_type_item(symbol, &item.item.file_path)
            && let Some(payload) = payloads.get(&symbol.id)
        {
            parent.data = (*payload).clone();
            results.push(parent);
        }
    });
    Some(results)
}

/// Direct children of an item. Each child remembers the item as its parent.
pub fn sub_types(
    item: &TypeHierarchyItem,
    index: &dyn SymbolIndex,
) -> Vec<TypeHierarchyItem> {
    let mut children = fill_sub_types(index, item.data.symbol_id, 1, &item.item.file_path);
    for child in &mut children {
        child.data.parents = Some(vec![item.data.clone()]);
    }
    children
}

/// Expands the children of an item previously returned. Parents are always
/// resolved eagerly, so only children are expanded here.
pub fn resolve_type_hierarchy(
    item: &mut TypeHierarchyItem,
    resolve_levels: u32,
    direction: TypeHierarchyDirection,
    index: Option<&dyn SymbolIndex>,
) {
    let Some(index) = index else {
        return;
    };
    if direction == TypeHierarchyDirection::Parents || resolve_levels == 0 {
        return;
    }
    item.children = Some(fill_sub_types(index, item.data.symbol_id, resolve_levels, &item.item.file_path));
}

#[cfg(test)]
#[path = "../../tests/src/hierarchy/type_hierarchy_tests.rs"]
mod tests;
