//! Occurrence enumeration over the main file's semantic tree.

use std::collections::BTreeSet;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{
    ast::{Access, DeclId, DeclKey, DeclKind, ExprKind, NodeId, NodeKind, ParsedUnit, SourceLocation, StmtKind, Type, TypeId},
    syntax::TokenKind,
};

bitflags! {
    /// How an occurrence uses its declaration.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SymbolRole: u8 {
        const DECLARATION = 1 << 0;
        const DEFINITION = 1 << 1;
        const REFERENCE = 1 << 2;
        const READ = 1 << 3;
        const WRITE = 1 << 4;
        const CALL = 1 << 5;
    }
}

/// One occurrence of a target declaration, reported at a main-file token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub start: u32,
    pub end: u32,
    pub role: SymbolRole,
    /// Nearest declaration enclosing the occurrence.
    pub container: Option<DeclId>,
}

/// Identity used to match occurrences against targets. Templates are matched
/// through the declaration they template so `Foo<int>` counts for `Foo`.
fn match_key(
    unit: &ParsedUnit,
    decl: DeclId,
) -> DeclKey {
    match unit.decl(decl).kind {
        DeclKind::ClassTemplate {
            templated,
        }
        | DeclKind::FunctionTemplate {
            templated,
        } => unit.decl_key(templated),
        _ => unit.decl_key(decl),
    }
}

/// A candidate occurrence before it is matched and mapped to a token.
struct Candidate<'u> {
    decl: DeclId,
    loc: SourceLocation,
    role: SymbolRole,
    /// Selector pieces of ObjC messages and method declarations.
    pieces: &'u [SourceLocation],
}

impl<'u> Candidate<'u> {
    fn at(
        decl: DeclId,
        loc: SourceLocation,
        role: SymbolRole,
    ) -> Self {
        Self {
            decl,
            loc,
            role,
            pieces: &[],
        }
    }
}

struct ReferenceFinder<'u> {
    unit: &'u ParsedUnit,
    targets: BTreeSet<DeclKey>,
    per_token: bool,
    found: Vec<Occurrence>,
}

impl<'u> ReferenceFinder<'u> {
    fn visit(
        &mut self,
        node: NodeId,
        container: Option<DeclId>,
    ) {
        let unit = self.unit;
        for candidate in self.candidates(node) {
            self.report(candidate, container);
        }
        let inner = match unit.node(node).kind {
            NodeKind::Decl {
                decl, ..
            } => Some(decl),
            _ => container,
        };
        for &child in &unit.node(node).children {
            self.visit(child, inner);
        }
    }

    fn report(
        &mut self,
        candidate: Candidate<'u>,
        container: Option<DeclId>,
    ) {
        let unit = self.unit;
        if !self.targets.contains(&match_key(unit, candidate.decl)) {
            return;
        }
        if candidate.loc.file_point().file != unit.main_file {
            return;
        }
        let mut locs: Vec<SourceLocation> = Vec::new();
        if self.per_token && candidate.pieces.first() == Some(&candidate.loc) {
            locs.extend_from_slice(candidate.pieces);
        }
        if locs.is_empty() {
            locs.push(candidate.loc);
        }
        for loc in locs {
            let point = loc.file_point();
            if point.file != unit.main_file {
                continue;
            }
            if let Some(token) = unit.spelled_token_at(point.offset) {
                self.found.push(Occurrence {
                    start: token.start,
                    end: token.end,
                    role: candidate.role,
                    container,
                });
            }
        }
    }

    fn candidates(
        &self,
        node: NodeId,
    ) -> Vec<Candidate<'u>> {
        let unit = self.unit;
        let current = unit.node(node);
        let mut out = Vec::new();
        match &current.kind {
            NodeKind::Decl {
                decl, ..
            } => {
                let data = unit.decl(*decl);
                if data.implicit {
                    return out;
                }
                let mut role = SymbolRole::DECLARATION;
                if data.is_definition {
                    role |= SymbolRole::DEFINITION;
                }
                let mut candidate = Candidate::at(*decl, data.name_loc, role);
                if let DeclKind::ObjcMethod(method) = &data.kind {
                    candidate.pieces = &method.selector_locs;
                    if let Some(first) = method.selector_locs.first() {
                        candidate.loc = *first;
                    }
                }
                out.push(candidate);
                if let DeclKind::ObjcImplementation {
                    class_interface: Some(interface),
                } = data.kind
                {
                    out.push(Candidate::at(interface, data.name_loc, SymbolRole::REFERENCE));
                }
            },
            NodeKind::TypeRef {
                ty,
            }
            | NodeKind::BaseSpecifier {
                ty,
            } => {
                if let Some(decl) = named_type_decl(unit, *ty)
                    && let Some(loc) = self.first_identifier(node)
                {
                    out.push(Candidate::at(decl, loc, SymbolRole::REFERENCE));
                }
            },
            NodeKind::Qualifier {
                decl: Some(decl),
            } => {
                if let Some(loc) = self.first_identifier(node) {
                    out.push(Candidate::at(*decl, loc, SymbolRole::REFERENCE));
                }
            },
            NodeKind::CtorInitializer {
                member,
                base,
            } => {
                if let Some(loc) = self.first_identifier(node) {
                    if let Some(member) = member {
                        out.push(Candidate::at(*member, loc, SymbolRole::REFERENCE | SymbolRole::WRITE));
                    }
                    if let Some(decl) = base.and_then(|base| named_type_decl(unit, base)) {
                        out.push(Candidate::at(decl, loc, SymbolRole::REFERENCE));
                    }
                }
            },
            NodeKind::Expr {
                expr, ..
            } => self.expr_candidates(node, expr, &mut out),
            NodeKind::Stmt {
                stmt:
                    StmtKind::Goto {
                        label: Some(label),
                        label_loc: Some(loc),
                    },
            } => out.push(Candidate::at(*label, *loc, SymbolRole::REFERENCE)),
            NodeKind::Stmt {
                stmt: StmtKind::Label {
                    decl,
                },
            } => {
                let name_loc = unit.decl(*decl).name_loc;
                out.push(Candidate::at(*decl, name_loc, SymbolRole::DECLARATION | SymbolRole::DEFINITION));
            },
            _ => {},
        }
        out
    }

    fn expr_candidates(
        &self,
        node: NodeId,
        expr: &'u ExprKind,
        out: &mut Vec<Candidate<'u>>,
    ) {
        let call = if self.is_callee(node) { SymbolRole::CALL } else { SymbolRole::empty() };
        match expr {
            ExprKind::DeclRef {
                decl,
                loc,
                access,
            }
            | ExprKind::Member {
                member: decl,
                loc,
                access,
                ..
            } => out.push(Candidate::at(*decl, *loc, SymbolRole::REFERENCE | access_roles(*access) | call)),
            ExprKind::OverloadSet {
                candidates,
                loc,
            }
            | ExprKind::DependentMember {
                candidates,
                loc,
            } => {
                out.extend(candidates.iter().map(|decl| Candidate::at(*decl, *loc, SymbolRole::REFERENCE | call)));
            },
            ExprKind::Construct {
                ctor,
                loc,
            } => out.push(Candidate::at(*ctor, *loc, SymbolRole::REFERENCE | SymbolRole::CALL)),
            ExprKind::ObjcMessage {
                method,
                selector_locs,
            } => {
                if let Some(first) = selector_locs.first() {
                    out.push(Candidate {
                        decl: *method,
                        loc: *first,
                        role: SymbolRole::REFERENCE | SymbolRole::CALL,
                        pieces: selector_locs,
                    });
                }
            },
            ExprKind::DesignatedInit {
                fields,
            } => {
                out.extend(
                    fields
                        .iter()
                        .map(|field| Candidate::at(field.field, field.loc, SymbolRole::REFERENCE | SymbolRole::WRITE)),
                );
            },
            ExprKind::Call {
                ..
            }
            | ExprKind::Throw {
                ..
            }
            | ExprKind::Delete {
                ..
            }
            | ExprKind::Lambda {
                ..
            }
            | ExprKind::Other => {},
        }
    }

    fn is_callee(
        &self,
        node: NodeId,
    ) -> bool {
        let Some(parent) = self.unit.node(node).parent else {
            return false;
        };
        matches!(
            self.unit.node(parent).kind,
            NodeKind::Expr {
                expr: ExprKind::Call {
                    callee: Some(callee)
                },
                ..
            } if callee == node
        )
    }

    /// First identifier token of `node` that is not part of a qualifier, e.g.
    /// `Foo` in `const ns::Foo &`.
    fn first_identifier(
        &self,
        node: NodeId,
    ) -> Option<SourceLocation> {
        let unit = self.unit;
        let range = unit.node(node).range;
        if range.file != unit.main_file {
            return None;
        }
        let qualifiers: Vec<_> = unit
            .node(node)
            .children
            .iter()
            .map(|child| unit.node(*child))
            .filter(|child| matches!(child.kind, NodeKind::Qualifier { .. }))
            .map(|child| child.range)
            .collect();
        let first = unit.tokens.partition_point(|token| token.start < range.start);
        unit.tokens[first..]
            .iter()
            .take_while(|token| token.end <= range.end)
            .filter(|token| token.kind == TokenKind::Ident)
            .find(|token| !qualifiers.iter().any(|span| span.contains(unit.main_point(token.start))))
            .map(|token| SourceLocation::file(unit.main_point(token.start)))
    }
}

fn access_roles(access: Access) -> SymbolRole {
    match access {
        Access::Read => SymbolRole::READ,
        Access::Write => SymbolRole::WRITE,
        Access::ReadWrite => SymbolRole::READ | SymbolRole::WRITE,
        Access::Unknown => SymbolRole::empty(),
    }
}

/// The declaration a written type names, looking through pointers,
/// references and arrays.
fn named_type_decl(
    unit: &ParsedUnit,
    ty: TypeId,
) -> Option<DeclId> {
    match unit.ty(ty) {
        Type::Record {
            decl,
        }
        | Type::Enum {
            decl,
        }
        | Type::Typedef {
            decl, ..
        }
        | Type::TemplateParam {
            decl,
        }
        | Type::ObjcObject {
            interface: decl,
        }
        | Type::TemplateSpecialization {
            template: decl, ..
        } => Some(*decl),
        Type::Pointer {
            pointee,
        }
        | Type::Reference {
            pointee,
        }
        | Type::ObjcObjectPointer {
            pointee,
        }
        | Type::Array {
            element: pointee,
        } => named_type_decl(unit, *pointee),
        Type::Builtin {
            ..
        }
        | Type::Function {
            ..
        }
        | Type::Deduced {
            ..
        } => None,
    }
}

/// Every main-file occurrence of `targets`, sorted by token and role with
/// duplicates of the same pair removed.
///
/// In per-token mode a split reference such as an ObjC selector reports each
/// piece separately, provided the first piece is where the reference is.
pub fn find_refs(
    unit: &ParsedUnit,
    targets: &[DeclId],
    per_token: bool,
) -> Vec<Occurrence> {
    let mut finder = ReferenceFinder {
        unit,
        targets: targets.iter().map(|decl| match_key(unit, *decl)).collect(),
        per_token,
        found: Vec::new(),
    };
    if finder.targets.is_empty() {
        return Vec::new();
    }
    for &node in unit.top_level_nodes() {
        finder.visit(node, None);
    }
    let mut found = finder.found;
    found.sort_by(|a, b| (a.start, a.role).cmp(&(b.start, b.role)));
    found.dedup_by(|b, a| a.start == b.start && a.role == b.role);
    found
}

#[cfg(test)]
#[path = "../../tests/src/references/finder_tests.rs"]
mod tests;
