use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    ast::DeclKind,
    context::QueryContext,
    definition::{bridge::find_implementors, located::LocatedSymbol},
    ide::navigation::IdePosition,
    index::RelationKind,
    location::main_file_offset,
    selection::{DeclRelation, decls_at_with_relations},
};

/// Overrides of the virtual or ObjC method under the cursor, or subclasses of
/// the class under it. Purely index driven, so nothing without an index.
pub fn find_implementations(
    ctx: &QueryContext<'_>,
    position: IdePosition,
) -> Vec<LocatedSymbol> {
    if ctx.index.is_none() {
        return Vec::new();
    }
    let unit = ctx.unit;
    let Some(offset) = main_file_offset(unit, position) else {
        debug!("[implementations] position {}:{} is outside the file", position.line, position.character);
        return Vec::new();
    };

    let mut ids = BTreeSet::new();
    let mut predicate = RelationKind::OverriddenBy;
    let candidates = decls_at_with_relations(unit, offset, DeclRelation::TEMPLATE_PATTERN | DeclRelation::ALIAS);
    for (decl, _) in candidates.decls {
        match &unit.decl(decl).kind {
            DeclKind::Method(method) => {
                if method.is_virtual {
                    ids.extend(unit.symbol_id(decl));
                    predicate = RelationKind::OverriddenBy;
                }
            },
            DeclKind::ObjcMethod(_) => {
                ids.extend(unit.symbol_id(decl));
                predicate = RelationKind::OverriddenBy;
            },
            DeclKind::Record(_)
            | DeclKind::ClassTemplateSpecialization(_)
            | DeclKind::ObjcInterface {
                ..
            } => {
                ids.extend(unit.symbol_id(decl));
                predicate = RelationKind::BaseOf;
            },
            _ => {},
        }
    }
    find_implementors(ctx, ids, predicate)
}
