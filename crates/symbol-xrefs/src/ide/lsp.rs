use serde_json::{Value, json};
use tower_lsp::lsp_types::{
    CallHierarchyIncomingCall, CallHierarchyItem as LspCallHierarchyItem, CallHierarchyOutgoingCall,
    DocumentHighlight as LspDocumentHighlight, DocumentHighlightKind, DocumentLink as LspDocumentLink,
    GotoDefinitionResponse, Location, Position, Range, SymbolKind as LspSymbolKind, SymbolTag,
    TypeHierarchyItem as LspTypeHierarchyItem, Url,
};

use crate::{
    definition::{DocumentLink, LocatedSymbol},
    error::PayloadError,
    hierarchy::{CallHierarchyItem, HierarchyItem, IncomingCall, OutgoingCall, TypeHierarchyItem, TypeHierarchyPayload},
    ide::navigation::{IdeLocation, IdePosition, IdeRange, NavigationTarget},
    index::SymbolKind,
    references::{DocumentHighlight, HighlightKind, Reference, SymbolDetails},
    vfs::uri_for_path,
};

pub fn lsp_position_to_ide(position: Position) -> IdePosition {
    IdePosition::new(position.line, position.character)
}

pub fn ide_position_to_lsp(position: IdePosition) -> Position {
    Position::new(position.line, position.character)
}

pub fn lsp_range_to_ide(range: Range) -> IdeRange {
    IdeRange::new(lsp_position_to_ide(range.start), lsp_position_to_ide(range.end))
}

pub fn ide_range_to_lsp(range: IdeRange) -> Range {
    Range::new(ide_position_to_lsp(range.start), ide_position_to_lsp(range.end))
}

pub fn ide_location_to_lsp(location: &IdeLocation) -> Option<Location> {
    let uri = uri_for_path(&location.file_path)?;
    Some(Location {
        uri,
        range: ide_range_to_lsp(location.range),
    })
}

fn navigation_target_to_lsp(target: NavigationTarget) -> Option<GotoDefinitionResponse> {
    match target {
        NavigationTarget::Single(location) => ide_location_to_lsp(&location).map(GotoDefinitionResponse::Scalar),
        NavigationTarget::Multiple(locations) => {
            let lsp_locations: Vec<Location> = locations.iter().filter_map(ide_location_to_lsp).collect();
            match lsp_locations.len() {
                0 => None,
                1 => lsp_locations.into_iter().next().map(GotoDefinitionResponse::Scalar),
                _ => Some(GotoDefinitionResponse::Array(lsp_locations)),
            }
        },
    }
}

/// Go-to response for located symbols: each symbol's definition when it has
/// one, else its preferred declaration.
pub fn located_symbols_to_lsp(symbols: &[LocatedSymbol]) -> Option<GotoDefinitionResponse> {
    let locations = symbols
        .iter()
        .map(|symbol| symbol.definition.clone().unwrap_or_else(|| symbol.preferred_declaration.clone()))
        .collect();
    NavigationTarget::from_locations(locations).and_then(navigation_target_to_lsp)
}

/// Declaration response: the preferred declaration of each symbol.
pub fn declarations_to_lsp(symbols: &[LocatedSymbol]) -> Vec<Location> {
    symbols.iter().filter_map(|symbol| ide_location_to_lsp(&symbol.preferred_declaration)).collect()
}

pub fn reference_to_lsp(reference: &Reference) -> Option<Location> {
    ide_location_to_lsp(&reference.location)
}

/// A reference with its attributes and container, as extended clients
/// receive it.
pub fn reference_to_json(reference: &Reference) -> Option<Value> {
    let location = reference_to_lsp(reference)?;
    let mut value = serde_json::to_value(location).ok()?;
    if let Some(object) = value.as_object_mut() {
        if let Some(container) = &reference.container_name {
            object.insert("containerName".to_string(), json!(container));
        }
        object.insert("attributes".to_string(), json!(reference.attributes.bits()));
    }
    Some(value)
}

pub fn highlight_to_lsp(highlight: &DocumentHighlight) -> LspDocumentHighlight {
    let kind = match highlight.kind {
        HighlightKind::Text => DocumentHighlightKind::TEXT,
        HighlightKind::Read => DocumentHighlightKind::READ,
        HighlightKind::Write => DocumentHighlightKind::WRITE,
    };
    LspDocumentHighlight {
        range: ide_range_to_lsp(highlight.range),
        kind: Some(kind),
    }
}

pub fn document_link_to_lsp(link: &DocumentLink) -> LspDocumentLink {
    LspDocumentLink {
        range: ide_range_to_lsp(link.range),
        target: uri_for_path(&link.target),
        tooltip: None,
        data: None,
    }
}

pub fn symbol_details_to_json(details: &SymbolDetails) -> Value {
    let mut value = json!({
        "name": details.name,
        "containerName": details.container_name,
    });
    if let Some(object) = value.as_object_mut() {
        if let Some(usr) = &details.usr {
            object.insert("usr".to_string(), json!(usr));
        }
        if let Some(id) = details.id {
            object.insert("id".to_string(), json!(id.to_hex()));
        }
        if let Some(location) = details.declaration_range.as_ref().and_then(ide_location_to_lsp) {
            object.insert("declarationRange".to_string(), json!(location));
        }
        if let Some(location) = details.definition_range.as_ref().and_then(ide_location_to_lsp) {
            object.insert("definitionRange".to_string(), json!(location));
        }
    }
    value
}

pub fn symbol_kind_to_lsp(kind: SymbolKind) -> LspSymbolKind {
    match kind {
        SymbolKind::Unknown => LspSymbolKind::VARIABLE,
        SymbolKind::Namespace => LspSymbolKind::NAMESPACE,
        SymbolKind::Macro => LspSymbolKind::STRING,
        SymbolKind::Enum => LspSymbolKind::ENUM,
        SymbolKind::Struct | SymbolKind::Union => LspSymbolKind::STRUCT,
        SymbolKind::Class | SymbolKind::Extension => LspSymbolKind::CLASS,
        SymbolKind::Protocol => LspSymbolKind::INTERFACE,
        SymbolKind::TypeAlias | SymbolKind::Using => LspSymbolKind::CLASS,
        SymbolKind::Function => LspSymbolKind::FUNCTION,
        SymbolKind::Variable | SymbolKind::Parameter => LspSymbolKind::VARIABLE,
        SymbolKind::Field => LspSymbolKind::FIELD,
        SymbolKind::EnumConstant => LspSymbolKind::ENUM_MEMBER,
        SymbolKind::InstanceMethod | SymbolKind::ClassMethod | SymbolKind::StaticMethod => LspSymbolKind::METHOD,
        SymbolKind::Constructor => LspSymbolKind::CONSTRUCTOR,
        SymbolKind::TemplateTypeParam | SymbolKind::TemplateTemplateParam => LspSymbolKind::TYPE_PARAMETER,
        SymbolKind::NonTypeTemplateParam => LspSymbolKind::CONSTANT,
    }
}

fn tags_for(item: &HierarchyItem) -> Option<Vec<SymbolTag>> {
    item.deprecated.then(|| vec![SymbolTag::DEPRECATED])
}

pub fn type_hierarchy_item_to_lsp(item: &TypeHierarchyItem) -> Option<LspTypeHierarchyItem> {
    let base = &item.item;
    Some(LspTypeHierarchyItem {
        name: base.name.clone(),
        kind: symbol_kind_to_lsp(base.kind),
        tags: base.deprecated.then_some(SymbolTag::DEPRECATED),
        detail: base.detail.clone(),
        uri: uri_for_path(&base.file_path)?,
        range: ide_range_to_lsp(base.range),
        selection_range: ide_range_to_lsp(base.selection_range),
        data: Some(item.data.to_value()),
    })
}

pub fn call_hierarchy_item_to_lsp(item: &CallHierarchyItem) -> Option<LspCallHierarchyItem> {
    let base = &item.item;
    Some(LspCallHierarchyItem {
        name: base.name.clone(),
        kind: symbol_kind_to_lsp(base.kind),
        tags: tags_for(base),
        detail: base.detail.clone(),
        uri: uri_for_path(&base.file_path)?,
        range: ide_range_to_lsp(base.range),
        selection_range: ide_range_to_lsp(base.selection_range),
        data: Some(Value::String(item.data.clone())),
    })
}

pub fn incoming_call_to_lsp(call: &IncomingCall) -> Option<CallHierarchyIncomingCall> {
    Some(CallHierarchyIncomingCall {
        from: call_hierarchy_item_to_lsp(&call.from)?,
        from_ranges: call.from_ranges.iter().copied().map(ide_range_to_lsp).collect(),
    })
}

pub fn outgoing_call_to_lsp(call: &OutgoingCall) -> Option<CallHierarchyOutgoingCall> {
    Some(CallHierarchyOutgoingCall {
        to: call_hierarchy_item_to_lsp(&call.to)?,
        from_ranges: call.from_ranges.iter().copied().map(ide_range_to_lsp).collect(),
    })
}

/// Legacy nested form of a type hierarchy item, with `parents` and
/// `children` inlined when they were computed.
pub fn type_hierarchy_tree_to_json(item: &TypeHierarchyItem) -> Option<Value> {
    let mut value = serde_json::to_value(type_hierarchy_item_to_lsp(item)?).ok()?;
    if let Some(object) = value.as_object_mut() {
        if let Some(parents) = &item.parents {
            let parents: Vec<Value> = parents.iter().filter_map(type_hierarchy_tree_to_json).collect();
            object.insert("parents".to_string(), Value::Array(parents));
        }
        if let Some(children) = &item.children {
            let children: Vec<Value> = children.iter().filter_map(type_hierarchy_tree_to_json).collect();
            object.insert("children".to_string(), Value::Array(children));
        }
    }
    Some(value)
}

/// Best-effort inverse of [`symbol_kind_to_lsp`]; items coming back from a
/// client only need their kind to round-trip.
pub fn symbol_kind_from_lsp(kind: LspSymbolKind) -> SymbolKind {
    match kind {
        LspSymbolKind::NAMESPACE => SymbolKind::Namespace,
        LspSymbolKind::ENUM => SymbolKind::Enum,
        LspSymbolKind::STRUCT => SymbolKind::Struct,
        LspSymbolKind::CLASS => SymbolKind::Class,
        LspSymbolKind::INTERFACE => SymbolKind::Protocol,
        LspSymbolKind::FUNCTION => SymbolKind::Function,
        LspSymbolKind::VARIABLE => SymbolKind::Variable,
        LspSymbolKind::FIELD => SymbolKind::Field,
        LspSymbolKind::ENUM_MEMBER => SymbolKind::EnumConstant,
        LspSymbolKind::METHOD => SymbolKind::InstanceMethod,
        LspSymbolKind::CONSTRUCTOR => SymbolKind::Constructor,
        LspSymbolKind::TYPE_PARAMETER => SymbolKind::TemplateTypeParam,
        _ => SymbolKind::Unknown,
    }
}

fn hierarchy_item_from_lsp(
    name: &str,
    kind: LspSymbolKind,
    tags: Option<&[SymbolTag]>,
    detail: Option<&str>,
    uri: &Url,
    range: Range,
    selection_range: Range,
) -> Result<HierarchyItem, PayloadError> {
    let file_path = uri.to_file_path().map_err(|()| PayloadError::Malformed(format!("`{uri}` is not a file")))?;
    Ok(HierarchyItem {
        name: name.to_string(),
        detail: detail.map(str::to_string),
        kind: symbol_kind_from_lsp(kind),
        deprecated: tags.is_some_and(|tags| tags.contains(&SymbolTag::DEPRECATED)),
        file_path,
        range: lsp_range_to_ide(range),
        selection_range: lsp_range_to_ide(selection_range),
    })
}

pub fn type_hierarchy_item_from_lsp(item: &LspTypeHierarchyItem) -> Result<TypeHierarchyItem, PayloadError> {
    let data = TypeHierarchyPayload::from_value(item.data.as_ref().unwrap_or(&Value::Null))?;
    Ok(TypeHierarchyItem {
        item: hierarchy_item_from_lsp(
            &item.name,
            item.kind,
            item.tags.as_ref().map(std::slice::from_ref),
            item.detail.as_deref(),
            &item.uri,
            item.range,
            item.selection_range,
        )?,
        data,
        parents: None,
        children: None,
    })
}

pub fn call_hierarchy_item_from_lsp(item: &LspCallHierarchyItem) -> Result<CallHierarchyItem, PayloadError> {
    let data = match &item.data {
        Some(Value::String(data)) => data.clone(),
        Some(other) => return Err(PayloadError::Malformed(format!("expected a string, got {other}"))),
        None => return Err(PayloadError::Missing),
    };
    Ok(CallHierarchyItem {
        item: hierarchy_item_from_lsp(
            &item.name,
            item.kind,
            item.tags.as_deref(),
            item.detail.as_deref(),
            &item.uri,
            item.range,
            item.selection_range,
        )?,
        data,
    })
}

#[cfg(test)]
#[path = "../../tests/src/ide/lsp_tests.rs"]
mod tests;
