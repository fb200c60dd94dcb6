use std::path::{Path, PathBuf};

use tracing::warn;

use crate::{
    ast::{DeclId, DeclKind, ParsedUnit, TagKind},
    ide::navigation::{IdeLocation, IdeRange},
    index::{Symbol, SymbolKind},
    location::{file_path, index_to_ide_location, make_location, span_to_range},
};

/// What type and call hierarchy items have in common.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyItem {
    pub name: String,
    /// `scope::name`, only known for items built from the index.
    pub detail: Option<String>,
    pub kind: SymbolKind,
    pub deprecated: bool,
    pub file_path: PathBuf,
    /// Full extent of the declaration; always contains `selection_range`.
    pub range: IdeRange,
    /// The declaration's name.
    pub selection_range: IdeRange,
}

/// Index kind of a declaration.
pub fn symbol_kind_of(
    unit: &ParsedUnit,
    decl: DeclId,
) -> SymbolKind {
    match &unit.decl(decl).kind {
        DeclKind::Namespace => SymbolKind::Namespace,
        DeclKind::Record(record) => tag_kind(record.tag),
        DeclKind::ClassTemplateSpecialization(spec) => tag_kind(spec.record.tag),
        DeclKind::ClassTemplate {
            templated,
        } => symbol_kind_of(unit, *templated),
        DeclKind::Enum {
            ..
        } => SymbolKind::Enum,
        DeclKind::EnumConstant {
            ..
        } => SymbolKind::EnumConstant,
        DeclKind::Function(_) => SymbolKind::Function,
        DeclKind::FunctionTemplate {
            templated,
        } => symbol_kind_of(unit, *templated),
        DeclKind::Method(method) if method.is_constructor => SymbolKind::Constructor,
        DeclKind::Method(_) => SymbolKind::InstanceMethod,
        DeclKind::Var {
            ..
        } => SymbolKind::Variable,
        DeclKind::Field {
            ..
        } => SymbolKind::Field,
        DeclKind::Param {
            ..
        } => SymbolKind::Parameter,
        DeclKind::TypeAlias {
            ..
        } => SymbolKind::TypeAlias,
        DeclKind::Using {
            ..
        } => SymbolKind::Using,
        DeclKind::TemplateTypeParam => SymbolKind::TemplateTypeParam,
        DeclKind::NonTypeTemplateParam {
            ..
        } => SymbolKind::NonTypeTemplateParam,
        DeclKind::TemplateTemplateParam => SymbolKind::TemplateTemplateParam,
        DeclKind::Label => SymbolKind::Unknown,
        DeclKind::ObjcInterface {
            ..
        }
        | DeclKind::ObjcImplementation {
            ..
        } => SymbolKind::Class,
        DeclKind::ObjcProtocol {
            ..
        } => SymbolKind::Protocol,
        DeclKind::ObjcCategory {
            ..
        }
        | DeclKind::ObjcCategoryImpl {
            ..
        } => SymbolKind::Extension,
        DeclKind::ObjcMethod(method) if method.instance => SymbolKind::InstanceMethod,
        DeclKind::ObjcMethod(_) => SymbolKind::ClassMethod,
    }
}

fn tag_kind(tag: TagKind) -> SymbolKind {
    match tag {
        TagKind::Struct => SymbolKind::Struct,
        TagKind::Class => SymbolKind::Class,
        TagKind::Union => SymbolKind::Union,
    }
}

/// Builds an item from a parsed declaration. `None` when the declaration's
/// file has no stable path.
pub fn decl_to_item(
    unit: &ParsedUnit,
    decl: DeclId,
    tu_path: &Path,
) -> Option<HierarchyItem> {
    let name_point = unit.name_location(decl);
    let path = file_path(unit, name_point.file, tu_path)?;
    let selection_range = make_location(unit, name_point, tu_path)?.range;

    let data = unit.decl(decl);
    let mut range = span_to_range(unit, &data.range);
    // The name must lie inside the extent; unrelated extents collapse to it.
    if data.range.file != name_point.file
        || range.start > selection_range.start
        || selection_range.end > range.end
    {
        range = selection_range;
    }

    Some(HierarchyItem {
        name: unit.print_name(decl),
        detail: None,
        kind: symbol_kind_of(unit, decl),
        deprecated: data.deprecated,
        file_path: path,
        range,
        selection_range,
    })
}

/// Where an index symbol is best shown: its definition, else its declaration.
pub fn symbol_location(
    symbol: &Symbol,
    tu_path: &Path,
) -> Option<IdeLocation> {
    index_to_ide_location(&symbol.definition, tu_path)
        .or_else(|| index_to_ide_location(&symbol.canonical_declaration, tu_path))
}

/// Builds an item from an index symbol. The index has no extents, so both
/// ranges are the name.
pub fn symbol_to_item(
    symbol: &Symbol,
    tu_path: &Path,
) -> Option<HierarchyItem> {
    let Some(location) = symbol_location(symbol, tu_path) else {
        warn!("[hierarchy] symbol {} has no usable location", symbol.id);
        return None;
    };
    Some(HierarchyItem {
        name: symbol.name.clone(),
        detail: Some(format!("{}{}", symbol.scope, symbol.name)),
        kind: symbol.kind,
        deprecated: symbol.deprecated,
        file_path: location.file_path,
        range: location.range,
        selection_range: location.range,
    })
}
