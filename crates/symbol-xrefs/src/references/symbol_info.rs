use tracing::debug;

use crate::{
    context::QueryContext,
    definition::{definition_of, preferred_decl},
    ide::navigation::{IdeLocation, IdePosition},
    index::SymbolId,
    location::{main_file_offset, make_location},
    selection::{DeclRelation, decls_at_with_relations},
};

/// Identity of a symbol for hover and info display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolDetails {
    pub name: String,
    /// Qualified name of the enclosing scope, without a trailing `::`.
    pub container_name: String,
    pub usr: Option<String>,
    pub id: Option<SymbolId>,
    pub declaration_range: Option<IdeLocation>,
    pub definition_range: Option<IdeLocation>,
}

/// Details of every declaration under the cursor, aliases and their targets
/// included, followed by the macro under it if there is one.
pub fn get_symbol_info(
    ctx: &QueryContext<'_>,
    position: IdePosition,
) -> Vec<SymbolDetails> {
    let unit = ctx.unit;
    let Some(offset) = main_file_offset(unit, position) else {
        debug!("[symbol-info] position {}:{} is outside the file", position.line, position.character);
        return Vec::new();
    };

    let relations = DeclRelation::TEMPLATE_PATTERN | DeclRelation::ALIAS | DeclRelation::UNDERLYING;
    let mut results = Vec::new();
    for (decl, _) in decls_at_with_relations(unit, offset, relations).decls {
        let decl = preferred_decl(unit, decl);
        let data = unit.decl(decl);

        let mut container_name = data.scope.strip_suffix("::").unwrap_or(&data.scope).to_string();
        if container_name.is_empty()
            && let Some(parent) = data.parent
        {
            container_name = unit.qualified_name(parent);
        }
        let usr = data.usr.clone().filter(|usr| !usr.is_empty());
        results.push(SymbolDetails {
            name: unit.print_name(decl),
            container_name,
            id: usr.as_deref().map(SymbolId::from_usr),
            usr,
            declaration_range: make_location(unit, unit.name_location(decl), ctx.tu_path),
            definition_range: definition_of(unit, decl)
                .and_then(|definition| make_location(unit, unit.name_location(definition), ctx.tu_path)),
        });
    }

    let macro_at_cursor = unit
        .touching_tokens(offset)
        .iter()
        .find(|token| token.kind.is_identifier())
        .and_then(|token| unit.macro_at(token));
    if let Some(macro_idx) = macro_at_cursor {
        let usr = unit.macro_usr(macro_idx);
        results.push(SymbolDetails {
            name: unit.macro_def(macro_idx).name.clone(),
            id: Some(SymbolId::from_usr(&usr)),
            usr: Some(usr),
            ..SymbolDetails::default()
        });
    }
    results
}

#[cfg(test)]
#[path = "../../tests/src/references/symbol_info_tests.rs"]
mod tests;
