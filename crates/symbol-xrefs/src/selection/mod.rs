//! Picks the semantic node under a cursor.
//!
//! A cursor between two tokens (`foo|(`) may mean either of them, so a point
//! selection yields one tree per touching token, right token first.

pub mod targets;

use crate::{
    ast::{NodeId, ParsedUnit, SourceSpan},
    syntax::TokenKind,
};

pub use targets::{
    DeclRelation, DeclsAtPoint, all_target_decls, decls_at_with_relations, explicit_reference_targets, target_decls,
    type_target_decls,
};

pub(crate) use targets::template_pattern;

/// The selection of one `[begin, end)` main-file range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTree {
    pub begin: u32,
    pub end: u32,
    /// Deepest node enclosing the selection, `None` when only the root does.
    pub common_ancestor: Option<NodeId>,
}

impl SelectionTree {
    pub fn new(
        unit: &ParsedUnit,
        begin: u32,
        end: u32,
    ) -> Self {
        Self {
            begin,
            end,
            common_ancestor: common_ancestor(unit, begin, end),
        }
    }

    /// The node targets should be read from: attributes stand in for the
    /// declaration they decorate.
    pub fn target_node(
        &self,
        unit: &ParsedUnit,
    ) -> Option<NodeId> {
        let node = self.common_ancestor?;
        if unit.node(node).kind.is_attr()
            && let Some(parent) = unit.node(node).parent
        {
            return Some(parent);
        }
        Some(node)
    }
}

/// Candidate ranges for a point selection: every significant token touching
/// `offset`, right one first, or the empty range at `offset`.
pub fn point_bounds(
    unit: &ParsedUnit,
    offset: u32,
) -> Vec<(u32, u32)> {
    let mut bounds: Vec<(u32, u32)> = unit
        .touching_tokens(offset)
        .iter()
        .rev()
        .filter(|token| !matches!(token.kind, TokenKind::Comment | TokenKind::Semicolon | TokenKind::Comma))
        .map(|token| (token.start, token.end))
        .collect();
    if bounds.is_empty() {
        bounds.push((offset, offset));
    }
    bounds
}

fn common_ancestor(
    unit: &ParsedUnit,
    begin: u32,
    end: u32,
) -> Option<NodeId> {
    let wanted = SourceSpan::new(unit.main_file, begin, end);
    let mut current = unit.root;
    'descend: loop {
        for &child in &unit.node(current).children {
            if unit.node(child).range.encloses(&wanted) {
                current = child;
                continue 'descend;
            }
        }
        break;
    }
    (current != unit.root).then_some(current)
}

/// Builds the selection for each candidate range of `offset` in turn until
/// `callback` accepts one. Returns whether any was accepted.
pub fn create_each(
    unit: &ParsedUnit,
    offset: u32,
    mut callback: impl FnMut(&SelectionTree) -> bool,
) -> bool {
    point_bounds(unit, offset)
        .into_iter()
        .any(|(begin, end)| callback(&SelectionTree::new(unit, begin, end)))
}

#[cfg(test)]
#[path = "../../tests/src/selection/selection_tests.rs"]
mod tests;
