use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::{
    ast::{DeclId, DeclKind, NodeId, Token},
    context::QueryContext,
    definition::{
        bridge::{enhance_from_index, find_implementors, located_from_decl},
        includes::locate_file_referent,
        located::LocatedSymbol,
        macros::locate_macro_referent,
        nearby::find_nearby_identifier,
        textual::locate_symbol_textually,
        types::locate_symbol_for_type,
    },
    ide::navigation::IdePosition,
    index::{RelationKind, SymbolId},
    location::main_file_offset,
    selection::{DeclRelation, decls_at_with_relations},
    syntax::SpelledWord,
};

/// Go to definition/declaration.
///
/// Tried in order, the first non-empty answer wins: the file of an include
/// line, a macro under the cursor, the deduced type of `auto`/`decltype`, the
/// AST, the same word nearby when the cursor is not on a parsed token, and
/// finally an exact-name index search.
pub fn locate_symbol_at(
    ctx: &QueryContext<'_>,
    position: IdePosition,
) -> Vec<LocatedSymbol> {
    if let Some(file) = locate_file_referent(ctx, position) {
        ctx.metrics.record_case("include");
        return vec![file];
    }

    let unit = ctx.unit;
    let Some(offset) = main_file_offset(unit, position) else {
        debug!("[goto-def] position {}:{} is outside the file", position.line, position.character);
        return Vec::new();
    };

    let mut touched_identifier = None;
    for token in unit.touching_tokens(offset) {
        if token.kind.is_identifier() {
            if let Some(located) = locate_macro_referent(ctx, token) {
                ctx.metrics.record_case("macro");
                return vec![located];
            }
            touched_identifier = Some(token);
            break;
        }
        if token.kind.is_deduced_type_keyword()
            && let Some(deduced) = unit.deduced_type_at(token.start)
        {
            let located = locate_symbol_for_type(ctx, deduced);
            if !located.is_empty() {
                ctx.metrics.record_case("deduced-type");
                return located;
            }
        }
    }

    let (results, mut node) = locate_ast_referent(ctx, offset, touched_identifier);
    if !results.is_empty() {
        return results;
    }

    let Some(word) = SpelledWord::touching(unit, offset) else {
        return Vec::new();
    };
    if ctx.settings.navigation.nearby_identifier
        && let Some(nearby) = find_nearby_identifier(unit, &word)
    {
        if let Some(located) = locate_macro_referent(ctx, nearby) {
            info!("[goto-def] found macro `{}` through a nearby identifier", word.text);
            ctx.metrics.record_case("nearby-identifier");
            return vec![located];
        }
        let (results, nearby_node) = locate_ast_referent(ctx, nearby.start, Some(nearby));
        if !results.is_empty() {
            info!("[goto-def] found `{}` through a nearby identifier", word.text);
            ctx.metrics.record_case("nearby-identifier");
            return results;
        }
        node = nearby_node.or(node);
        debug!("[goto-def] nearby identifier for `{}` resolved to nothing", word.text);
    }

    locate_symbol_textually(ctx, &word, node)
}

/// Resolves declarations at `offset` through the AST and completes them from
/// the index. Also returns the selected node so callers can tell dependent
/// names apart.
pub(crate) fn locate_ast_referent(
    ctx: &QueryContext<'_>,
    offset: u32,
    touched_identifier: Option<&Token>,
) -> (Vec<LocatedSymbol>, Option<NodeId>) {
    let unit = ctx.unit;
    let candidates = decls_at_with_relations(unit, offset, DeclRelation::TEMPLATE_PATTERN | DeclRelation::ALIAS);
    let on_override_attr = candidates.node.is_some_and(|node| unit.node(node).kind.is_override_attr());
    let touched_at = |point| touched_identifier.is_some_and(|token| unit.main_point(token.start) == point);

    let mut results = Vec::new();
    let mut virtual_methods: BTreeSet<SymbolId> = BTreeSet::new();
    for &(decl_id, relations) in &candidates.decls {
        let decl = unit.decl(decl_id);

        if let Some(method) = decl.kind.as_method() {
            // `virtual void ^method() = 0` jumps to all overrides.
            if method.is_pure && touched_at(decl.name_loc.spelling) {
                virtual_methods.extend(unit.symbol_id(decl_id));
                ctx.metrics.record_case("method-to-override");
            }
            // `void foo() ^override` jumps to the overridden methods.
            if on_override_attr {
                for &overridden in &method.overridden {
                    push_located(ctx, &mut results, overridden);
                }
                continue;
            }
        }

        if let Some(method) = decl.kind.as_objc_method()
            && decl.is_definition
            && method.selector_locs.iter().any(|loc| touched_at(loc.spelling))
        {
            for &overridden in &method.overridden {
                push_located(ctx, &mut results, overridden);
            }
            if !method.overridden.is_empty() {
                ctx.metrics.record_case("objc-overriden-method");
            }
            push_located(ctx, &mut results, decl_id);
            continue;
        }

        // `using ns::^Foo`: the aliased declaration is more interesting.
        let point = touched_identifier.map_or(offset, |token| token.start);
        if relations.contains(DeclRelation::ALIAS)
            && candidates.decls.len() > 1
            && decl.range.touches(unit.main_point(point))
        {
            continue;
        }

        if let DeclKind::ClassTemplateSpecialization(spec) = &decl.kind
            && touched_at(decl.name_loc.spelling)
        {
            ctx.metrics.record_case("template-specialization-to-primary");
            push_located(ctx, &mut results, spec.specialized_template);
            continue;
        }

        if let DeclKind::ObjcCategory {
            class_interface: Some(interface),
            ..
        } = decl.kind
            && let Some(token) = touched_identifier
            && (touched_at(decl.name_loc.spelling) || unit.decl(interface).name == unit.token_text(token))
        {
            ctx.metrics.record_case("objc-category-to-class");
            push_located(ctx, &mut results, interface);
        }

        ctx.metrics.record_case("regular");
        push_located(ctx, &mut results, decl_id);
    }

    enhance_from_index(ctx, &mut results);
    results.extend(find_implementors(ctx, virtual_methods, RelationKind::OverriddenBy));
    (results, candidates.node)
}

fn push_located(
    ctx: &QueryContext<'_>,
    results: &mut Vec<LocatedSymbol>,
    decl: DeclId,
) {
    if let Some(located) = located_from_decl(ctx, decl) {
        results.push(located);
    }
}

#[cfg(test)]
#[path = "../../tests/src/definition/locate_tests.rs"]
mod tests;
