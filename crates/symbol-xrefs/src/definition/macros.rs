use crate::{
    ast::Token,
    context::QueryContext,
    definition::located::LocatedSymbol,
    location::make_location,
};

/// The macro definition an identifier token names. Macros have no separate
/// declaration, so the definition fills both slots; the AST and index are not
/// consulted since an expansion only leads to unrelated declarations.
pub fn locate_macro_referent(
    ctx: &QueryContext<'_>,
    token: &Token,
) -> Option<LocatedSymbol> {
    let unit = ctx.unit;
    let macro_idx = unit.macro_at(token)?;
    let definition = unit.macro_def(macro_idx);
    let location = make_location(unit, definition.name_loc, ctx.tu_path)?;

    let mut located = LocatedSymbol::new(definition.name.clone(), location.clone());
    located.definition = Some(location);
    located.id = Some(unit.macro_symbol_id(macro_idx));
    Some(located)
}
