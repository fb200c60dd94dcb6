use bitflags::bitflags;
use tracing::debug;

use crate::{
    ast::{ExprKind, NodeId, NodeKind, ParsedUnit, StmtKind},
    context::QueryContext,
    ide::navigation::{IdePosition, IdeRange},
    location::{main_file_offset, main_range},
    references::finder::{SymbolRole, find_refs},
    selection::{DeclRelation, create_each, target_decls},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HighlightKind {
    Text,
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHighlight {
    pub range: IdeRange,
    pub kind: HighlightKind,
}

/// Occurrences of the symbol under the cursor in the main file. When the
/// cursor names no declaration, the control flow related to the statement
/// under it instead, e.g. every `return` of a function.
pub fn find_document_highlights(
    ctx: &QueryContext<'_>,
    position: IdePosition,
) -> Vec<DocumentHighlight> {
    let unit = ctx.unit;
    let Some(offset) = main_file_offset(unit, position) else {
        debug!("[highlight] position {}:{} is outside the file", position.line, position.character);
        return Vec::new();
    };

    let mut results = Vec::new();
    create_each(unit, offset, |tree| {
        let Some(node) = tree.common_ancestor else {
            return false;
        };
        let targets = target_decls(unit, node, DeclRelation::TEMPLATE_PATTERN | DeclRelation::ALIAS);
        if !targets.is_empty() {
            for occurrence in find_refs(unit, &targets, true) {
                results.push(DocumentHighlight {
                    range: main_range(unit, occurrence.start, occurrence.end),
                    kind: highlight_kind(occurrence.role),
                });
            }
            return true;
        }
        if !ctx.settings.references.control_flow_highlights {
            return false;
        }
        let flow = related_control_flow(unit, node);
        if flow.is_empty() {
            return false;
        }
        debug!("[highlight] {} control flow locations", flow.len());
        results.extend(flow.into_iter().filter_map(|offset| {
            let token = unit.spelled_token_at(offset)?;
            Some(DocumentHighlight {
                range: main_range(unit, token.start, token.end),
                kind: HighlightKind::Text,
            })
        }));
        true
    });
    results
}

fn highlight_kind(role: SymbolRole) -> HighlightKind {
    if role.contains(SymbolRole::WRITE) {
        HighlightKind::Write
    } else if role.contains(SymbolRole::READ) {
        HighlightKind::Read
    } else {
        HighlightKind::Text
    }
}

bitflags! {
    /// Control-flow statements a traversal reports.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct FlowTarget: u8 {
        const BREAK = 1 << 0;
        const CONTINUE = 1 << 1;
        const RETURN = 1 << 2;
        const CASE = 1 << 3;
        const THROW = 1 << 4;
        const GOTO = 1 << 5;
    }
}

/// What the selected statement is, for picking the root it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    None,
    Break,
    Continue,
    Return,
    Case,
    Throw,
}

fn function_body(
    unit: &ParsedUnit,
    node: NodeId,
) -> Option<NodeId> {
    match unit.node(node).kind {
        NodeKind::Decl {
            body, ..
        } => body,
        NodeKind::Expr {
            expr: ExprKind::Lambda {
                body,
            },
            ..
        } => body,
        _ => None,
    }
}

fn loop_body(
    unit: &ParsedUnit,
    node: NodeId,
) -> Option<NodeId> {
    match unit.node(node).kind {
        NodeKind::Stmt {
            stmt:
                StmtKind::For {
                    body,
                }
                | StmtKind::RangeFor {
                    body, ..
                }
                | StmtKind::While {
                    body, ..
                }
                | StmtKind::Do {
                    body, ..
                },
        } => body,
        _ => None,
    }
}

fn is_switch_case(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Stmt {
            stmt: StmtKind::Case { .. } | StmtKind::Default { .. }
        }
    )
}

fn case_sub(kind: &NodeKind) -> Option<NodeId> {
    match kind {
        NodeKind::Stmt {
            stmt: StmtKind::Case {
                sub, ..
            }
            | StmtKind::Default {
                sub,
            },
        } => *sub,
        _ => None,
    }
}

/// Half-open range of the case containing `offset`. `case A: case B:` counts
/// as one case; other fallthrough is not detected.
fn find_case_bounds(
    unit: &ParsedUnit,
    switch: NodeId,
    cases: &[NodeId],
    offset: u32,
) -> (u32, u32) {
    let mut cases = cases.to_vec();
    cases.sort_by_key(|case| unit.node(*case).range.start);
    let range = unit.node(switch).range;

    let after = cases.partition_point(|case| unit.node(*case).range.start <= offset);
    let end = cases.get(after).map_or(range.end, |case| unit.node(*case).range.start);
    if after == 0 {
        return (range.start, end);
    }
    let mut before = after - 1;
    while before > 0 && case_sub(&unit.node(cases[before - 1]).kind) == Some(cases[before]) {
        before -= 1;
    }
    (unit.node(cases[before]).range.start, end)
}

/// Locations of control flow related to `node`: for a loop its breaks,
/// continues, returns and throws; for a `break` the loop or switch case it
/// leaves and that one's control flow; for a `return` every exit of the
/// function. Exits bound to outer constructs count as exits of inner ones.
/// Throws are treated like returns, catch blocks are not analyzed.
fn related_control_flow(
    unit: &ParsedUnit,
    node: NodeId,
) -> Vec<u32> {
    let mut result = Vec::new();
    let current = unit.node(node);
    let cursor = match &current.kind {
        NodeKind::Stmt {
            stmt: StmtKind::Break,
        } => Cursor::Break,
        NodeKind::Stmt {
            stmt: StmtKind::Continue,
        } => Cursor::Continue,
        NodeKind::Stmt {
            stmt: StmtKind::Return {
                ..
            },
        } => Cursor::Return,
        NodeKind::Expr {
            expr: ExprKind::Throw {
                ..
            },
            ..
        } => Cursor::Throw,
        kind if is_switch_case(kind) => Cursor::Case,
        NodeKind::Stmt {
            stmt: StmtKind::Goto {
                label, ..
            },
        } => {
            // No root to associate with; the goto and its label are enough.
            result.push(current.range.start);
            if let Some(label) = label {
                result.push(unit.decl(*label).name_loc.file_point().offset);
            }
            Cursor::None
        },
        _ => Cursor::None,
    };

    let mut root = None;
    let mut bounds = None;
    let mut ancestor = Some(node);
    while let Some(candidate) = ancestor {
        if let Some(body) = function_body(unit, candidate) {
            if matches!(cursor, Cursor::Return | Cursor::Throw) {
                root = Some(body);
            }
            break;
        }
        if let Some(body) = loop_body(unit, candidate)
            && matches!(cursor, Cursor::None | Cursor::Break | Cursor::Continue)
        {
            root = Some(body);
            result.push(unit.node(candidate).range.start);
            break;
        }
        if let NodeKind::Stmt {
            stmt: StmtKind::Switch {
                body,
                cases,
                ..
            },
        } = &unit.node(candidate).kind
            && matches!(cursor, Cursor::Break | Cursor::Case)
        {
            result.push(unit.node(candidate).range.start);
            root = *body;
            bounds = Some(find_case_bounds(unit, candidate, cases, current.range.start));
            break;
        }
        if cursor == Cursor::None {
            break;
        }
        ancestor = unit.node(candidate).parent;
    }

    if let Some(root) = root {
        let range = unit.node(root).range;
        let finder = ControlFlowFinder {
            unit,
            bounds: bounds.unwrap_or((range.start, range.end)),
        };
        finder.traverse(root, FlowTarget::empty(), &mut result);
    }
    result
}

struct ControlFlowFinder<'u> {
    unit: &'u ParsedUnit,
    bounds: (u32, u32),
}

impl ControlFlowFinder<'_> {
    fn outside_bounds(
        &self,
        offset: u32,
    ) -> bool {
        offset < self.bounds.0 || self.bounds.1 <= offset
    }

    /// Reports the wanted leaves under `node`. `ignore` holds the targets
    /// that no longer refer to the root at this depth.
    fn traverse(
        &self,
        node: NodeId,
        ignore: FlowTarget,
        result: &mut Vec<u32>,
    ) {
        let unit = self.unit;
        let mut ignore = ignore;
        if function_body(unit, node).is_some() {
            ignore = FlowTarget::all();
        } else if loop_body(unit, node).is_some() {
            ignore |= FlowTarget::BREAK | FlowTarget::CONTINUE;
        } else if matches!(
            unit.node(node).kind,
            NodeKind::Stmt {
                stmt: StmtKind::Switch { .. }
            }
        ) {
            ignore |= FlowTarget::BREAK | FlowTarget::CASE;
        }
        if ignore == FlowTarget::all() {
            return;
        }

        let current = unit.node(node);
        let leaf = match &current.kind {
            NodeKind::Stmt {
                stmt: StmtKind::Return {
                    ..
                },
            } => Some(FlowTarget::RETURN),
            NodeKind::Stmt {
                stmt: StmtKind::Break,
            } => Some(FlowTarget::BREAK),
            NodeKind::Stmt {
                stmt: StmtKind::Continue,
            } => Some(FlowTarget::CONTINUE),
            NodeKind::Expr {
                expr: ExprKind::Throw {
                    ..
                },
                ..
            } => Some(FlowTarget::THROW),
            kind if is_switch_case(kind) => Some(FlowTarget::CASE),
            // A goto only leaves the root when its label is outside it.
            NodeKind::Stmt {
                stmt: StmtKind::Goto {
                    label: Some(label),
                    ..
                },
            } if self.outside_bounds(unit.decl(*label).name_loc.file_point().offset) => Some(FlowTarget::GOTO),
            _ => None,
        };
        if let Some(target) = leaf
            && !ignore.intersects(target)
            && !self.outside_bounds(current.range.start)
        {
            result.push(current.range.start);
        }

        for &child in &current.children {
            self.traverse(child, ignore, result);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/references/highlight_tests.rs"]
mod tests;
