use crate::index::{Symbol, SymbolLocation};

/// File suffixes of generated sources whose locations beat hand-written ones.
const CODEGEN_SUFFIXES: &[&str] = &[".proto"];

fn has_codegen_suffix(location: &SymbolLocation) -> bool {
    CODEGEN_SUFFIXES.iter().any(|suffix| location.file_uri.ends_with(suffix))
}

/// Whether `candidate` should replace `current`.
///
/// Absent locations never win, anything wins over an absent location, an
/// exact location wins over a clamped one, and a generated source wins over
/// a hand-written one. Otherwise the current location stays.
pub fn prefer(
    candidate: &SymbolLocation,
    current: &SymbolLocation,
) -> bool {
    if candidate.is_empty() {
        return false;
    }
    if current.is_empty() {
        return true;
    }
    if candidate.has_overflow() != current.has_overflow() {
        return !candidate.has_overflow();
    }
    has_codegen_suffix(candidate) && !has_codegen_suffix(current)
}

/// Merges two index entries for the same symbol.
///
/// The entry that saw a definition is the base when the other did not; the
/// other entry's locations only replace the base's when strictly preferable.
pub fn merge_symbol(
    left: &Symbol,
    right: &Symbol,
) -> Symbol {
    let right_is_base = !right.definition.is_empty() && left.definition.is_empty();
    let (base, other) = if right_is_base { (right, left) } else { (left, right) };

    let mut merged = base.clone();
    if prefer(&other.canonical_declaration, &merged.canonical_declaration) {
        merged.canonical_declaration = other.canonical_declaration.clone();
    }
    if prefer(&other.definition, &merged.definition) {
        merged.definition = other.definition.clone();
    }
    merged.references = merged.references.saturating_add(other.references);
    if merged.name.is_empty() {
        merged.name = other.name.clone();
    }
    if merged.scope.is_empty() {
        merged.scope = other.scope.clone();
    }
    merged.deprecated |= other.deprecated;
    merged
}

/// Chooses between an AST-observed and an index-observed location for one
/// symbol under the same rules as merging two index entries. The AST side is
/// authoritative unless the index side is strictly preferable.
pub fn preferred_location(
    ast: &SymbolLocation,
    index: &SymbolLocation,
) -> SymbolLocation {
    // Only the declaration slot is populated so no other field sways the merge.
    let ast_symbol = Symbol {
        canonical_declaration: ast.clone(),
        ..Symbol::default()
    };
    let index_symbol = Symbol {
        canonical_declaration: index.clone(),
        ..Symbol::default()
    };
    merge_symbol(&ast_symbol, &index_symbol).canonical_declaration
}

#[cfg(test)]
#[path = "../../tests/src/index/merge_tests.rs"]
mod tests;
