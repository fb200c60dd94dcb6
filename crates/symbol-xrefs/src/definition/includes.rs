use std::path::PathBuf;

use tracing::debug;

use crate::{
    ast::{Inclusion, ParsedUnit},
    context::QueryContext,
    definition::located::LocatedSymbol,
    ide::navigation::{IdePosition, IdeRange},
    location::main_range,
    syntax::TokenKind,
    vfs::normalized_path,
};

/// A clickable `#include` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    pub range: IdeRange,
    pub target: PathBuf,
}

/// The included file when `position` is on the line of a resolved include.
/// Nothing else is looked up on include lines.
pub fn locate_file_referent(
    ctx: &QueryContext<'_>,
    position: IdePosition,
) -> Option<LocatedSymbol> {
    ctx.unit
        .includes
        .iter()
        .find(|inclusion| inclusion.hash_line == position.line && inclusion.resolved.is_some())
        .and_then(|inclusion| inclusion.resolved.as_deref())
        .map(|resolved| LocatedSymbol::file(normalized_path(resolved)))
}

/// Links for every resolved include of the main file, covering the target as
/// written including its delimiters.
pub fn document_links(unit: &ParsedUnit) -> Vec<DocumentLink> {
    unit.includes
        .iter()
        .filter_map(|inclusion| {
            let resolved = inclusion.resolved.as_deref()?;
            let Some((start, end)) = include_target_span(unit, inclusion) else {
                debug!("[links] no tokens for include of `{}`", inclusion.written);
                return None;
            };
            Some(DocumentLink {
                range: main_range(unit, start, end),
                target: normalized_path(resolved),
            })
        })
        .collect()
}

/// `#` `include` `<target>`: the target starts at the third token. Angled
/// targets do not lex as one token, so the length comes from the written text.
fn include_target_span(
    unit: &ParsedUnit,
    inclusion: &Inclusion,
) -> Option<(u32, u32)> {
    let hash = unit.tokens.partition_point(|token| token.end <= inclusion.hash_offset);
    let hash_token = unit.tokens.get(hash).filter(|token| token.kind == TokenKind::Hash)?;
    if hash_token.start > inclusion.hash_offset {
        return None;
    }
    let target = unit.tokens.get(hash + 2)?;
    let delimited = matches!(target.kind, TokenKind::String | TokenKind::Less);
    let length = inclusion.written.len() as u32 + if delimited { 2 } else { 0 };
    Some((target.start, target.start + length))
}

#[cfg(test)]
#[path = "../../tests/src/definition/includes_tests.rs"]
mod tests;
