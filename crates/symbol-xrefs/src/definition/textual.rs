use tracing::{debug, info};

use crate::{
    ast::NodeId,
    context::QueryContext,
    definition::located::LocatedSymbol,
    index::{FuzzyFindRequest, SymbolKind},
    location::index_to_ide_location,
    syntax::{SpelledWord, visible_namespaces},
};

/// Guesses declarations for a word by exact name in the index.
///
/// Real identifiers are left to the AST, except dependent names the AST could
/// not resolve. Constructors are skipped since they share the class name. If
/// more candidates survive than the configured maximum there is no confident
/// answer and nothing is returned; otherwise results are ordered by score.
pub fn locate_symbol_textually(
    ctx: &QueryContext<'_>,
    word: &SpelledWord<'_>,
    node: Option<NodeId>,
) -> Vec<LocatedSymbol> {
    let unit = ctx.unit;
    let settings = &ctx.settings.navigation;
    let dependent = node.is_some_and(|node| unit.node(node).kind.is_dependent_name());
    if !settings.textual_fallback || (word.expanded && !dependent) || !word.likely_identifier {
        return Vec::new();
    }
    let Some(index) = ctx.index else {
        return Vec::new();
    };
    if word.in_string_literal() {
        return Vec::new();
    }

    let prefix = unit.main_text().get(..word.offset as usize).unwrap_or_default();
    let request = FuzzyFindRequest {
        query: word.text.to_string(),
        scopes: visible_namespaces(prefix),
        any_scope: true,
        limit: Some(settings.textual_query_limit),
    };

    let mut too_many = false;
    let mut scored: Vec<(f32, LocatedSymbol)> = Vec::new();
    index.fuzzy_find(&request, &mut |symbol| {
        if symbol.name != word.text || symbol.kind == SymbolKind::Constructor {
            return;
        }
        let Some(declaration) = index_to_ide_location(&symbol.canonical_declaration, ctx.tu_path) else {
            debug!("[goto-def] textual candidate {} has no usable declaration", symbol.id);
            return;
        };
        let mut located = LocatedSymbol::new(symbol.name.clone(), declaration);
        located.id = Some(symbol.id);
        if !symbol.definition.is_empty() {
            let Some(definition) = index_to_ide_location(&symbol.definition, ctx.tu_path) else {
                debug!("[goto-def] textual candidate {} has no usable definition", symbol.id);
                return;
            };
            located.preferred_declaration = definition.clone();
            located.definition = Some(definition);
        }

        if scored.len() >= settings.textual_max_candidates {
            too_many = true;
            return;
        }
        scored.push((ctx.scorer.score(symbol), located));
    });

    if too_many {
        debug!("[goto-def] textual lookup for `{}` returned too many candidates, ignored", word.text);
        return Vec::new();
    }

    scored.sort_by(|left, right| right.0.total_cmp(&left.0));
    if scored.is_empty() {
        debug!("[goto-def] no textual index match for `{}`", word.text);
    } else {
        info!("[goto-def] found `{}` textually in the index", word.text);
        ctx.metrics.record_case("textual");
    }
    scored.into_iter().map(|(_, located)| located).collect()
}

#[cfg(test)]
#[path = "../../tests/src/definition/textual_tests.rs"]
mod tests;
