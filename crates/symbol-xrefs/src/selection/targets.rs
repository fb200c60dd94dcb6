use bitflags::bitflags;

use crate::{
    ast::{DeclId, DeclKind, ExprKind, NodeId, NodeKind, ParsedUnit, StmtKind, Type, TypeId},
    selection::create_each,
};

bitflags! {
    /// How a node reached a declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeclRelation: u8 {
        /// Reached through a `typedef`, alias or non-renaming `using`.
        const ALIAS = 1;
        /// The target of an alias, rather than the alias itself.
        const UNDERLYING = 1 << 1;
        /// A declaration instantiated from a template.
        const TEMPLATE_INSTANTIATION = 1 << 2;
        /// The template pattern an instantiation came from.
        const TEMPLATE_PATTERN = 1 << 3;
    }
}

/// Declarations a node or type denotes, each reported once with the union of
/// the relations it was reached by, in discovery order.
struct TargetFinder<'u> {
    unit: &'u ParsedUnit,
    found: Vec<(DeclId, DeclRelation)>,
    expanding_decls: Vec<DeclId>,
    expanding_types: Vec<TypeId>,
}

impl<'u> TargetFinder<'u> {
    fn new(unit: &'u ParsedUnit) -> Self {
        Self {
            unit,
            found: Vec::new(),
            expanding_decls: Vec::new(),
            expanding_types: Vec::new(),
        }
    }

    fn report(
        &mut self,
        decl: DeclId,
        flags: DeclRelation,
    ) {
        match self.found.iter_mut().find(|(found, _)| *found == decl) {
            Some((_, existing)) => *existing |= flags,
            None => self.found.push((decl, flags)),
        }
    }

    fn add_decl(
        &mut self,
        decl: DeclId,
        mut flags: DeclRelation,
    ) {
        if self.expanding_decls.contains(&decl) {
            return;
        }
        self.expanding_decls.push(decl);

        let unit = self.unit;
        let mut target = decl;
        match &unit.decl(decl).kind {
            DeclKind::TypeAlias {
                underlying,
            } => {
                self.add_type(*underlying, flags | DeclRelation::UNDERLYING);
                flags |= DeclRelation::ALIAS;
            },
            DeclKind::Using {
                targets,
            } => {
                for using_target in targets {
                    self.add_decl(*using_target, flags);
                }
                flags |= DeclRelation::ALIAS;
            },
            DeclKind::ObjcImplementation {
                class_interface: Some(interface),
            } => {
                if let DeclKind::ObjcInterface {
                    definition: Some(definition),
                    ..
                } = unit.decl(*interface).kind
                    && !unit.decl(definition).implicit
                {
                    target = definition;
                }
            },
            DeclKind::ObjcCategoryImpl {
                category: Some(category),
                ..
            } => target = *category,
            _ => {},
        }

        if let Some(pattern) = template_pattern(unit, target)
            && pattern != target
        {
            self.add_decl(pattern, flags | DeclRelation::TEMPLATE_PATTERN);
            flags |= DeclRelation::TEMPLATE_INSTANTIATION;
        }
        self.report(target, flags);
        self.expanding_decls.pop();
    }

    fn add_type(
        &mut self,
        ty: TypeId,
        flags: DeclRelation,
    ) {
        if self.expanding_types.contains(&ty) {
            return;
        }
        self.expanding_types.push(ty);

        let unit = self.unit;
        match unit.ty(ty) {
            Type::Record {
                decl,
            }
            | Type::Enum {
                decl,
            }
            | Type::TemplateParam {
                decl,
            }
            | Type::Typedef {
                decl, ..
            }
            | Type::ObjcObject {
                interface: decl,
            } => self.add_decl(*decl, flags),
            Type::ObjcObjectPointer {
                pointee,
            } => self.add_type(*pointee, flags),
            Type::Deduced {
                deduced: Some(deduced),
                ..
            } => self.add_type(*deduced, flags),
            Type::TemplateSpecialization {
                template,
                specialization,
                ..
            } => match (&unit.decl(*template).kind, specialization) {
                (DeclKind::TemplateTemplateParam, _) => self.add_decl(*template, flags),
                (_, Some(specialization)) => self.add_decl(*specialization, flags),
                (
                    DeclKind::ClassTemplate {
                        templated,
                    },
                    None,
                ) => self.add_decl(*templated, flags | DeclRelation::TEMPLATE_PATTERN),
                (_, None) => self.add_decl(*template, flags | DeclRelation::TEMPLATE_PATTERN),
            },
            Type::Deduced {
                deduced: None, ..
            }
            | Type::Builtin {
                ..
            }
            | Type::Pointer {
                ..
            }
            | Type::Reference {
                ..
            }
            | Type::Array {
                ..
            }
            | Type::Function {
                ..
            } => {},
        }
        self.expanding_types.pop();
    }

    fn add_node(
        &mut self,
        node: NodeId,
    ) {
        let unit = self.unit;
        let flags = DeclRelation::empty();
        match &unit.node(node).kind {
            NodeKind::Decl {
                decl, ..
            } => self.add_decl(*decl, flags),
            NodeKind::TypeRef {
                ty,
            }
            | NodeKind::BaseSpecifier {
                ty,
            } => self.add_type(*ty, flags),
            NodeKind::Qualifier {
                decl,
            } => {
                if let Some(decl) = decl {
                    self.add_decl(*decl, flags);
                }
            },
            NodeKind::CtorInitializer {
                member,
                base,
            } => {
                if let Some(member) = member {
                    self.add_decl(*member, flags);
                }
                if let Some(base) = base {
                    self.add_type(*base, flags);
                }
            },
            NodeKind::Expr {
                expr, ..
            } => match expr {
                ExprKind::DeclRef {
                    decl, ..
                }
                | ExprKind::Member {
                    member: decl, ..
                }
                | ExprKind::Construct {
                    ctor: decl, ..
                }
                | ExprKind::ObjcMessage {
                    method: decl, ..
                } => self.add_decl(*decl, flags),
                ExprKind::OverloadSet {
                    candidates, ..
                }
                | ExprKind::DependentMember {
                    candidates, ..
                } => {
                    for candidate in candidates {
                        self.add_decl(*candidate, flags);
                    }
                },
                ExprKind::DesignatedInit {
                    fields,
                } => {
                    for designator in fields {
                        self.add_decl(designator.field, flags);
                    }
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
            },
            NodeKind::Stmt {
                stmt:
                    StmtKind::Goto {
                        label: Some(decl), ..
                    }
                    | StmtKind::Label {
                        decl,
                    },
            } => self.add_decl(*decl, flags),
            NodeKind::Stmt {
                ..
            }
            | NodeKind::TranslationUnit
            | NodeKind::Attr {
                ..
            } => {},
        }
    }
}

/// The template pattern `decl` was instantiated from. Explicit specializations
/// are written by hand and have none.
pub(crate) fn template_pattern(
    unit: &ParsedUnit,
    decl: DeclId,
) -> Option<DeclId> {
    match &unit.decl(decl).kind {
        DeclKind::ClassTemplateSpecialization(spec) => {
            if spec.explicit {
                return None;
            }
            spec.pattern.or_else(|| match unit.decl(spec.specialized_template).kind {
                DeclKind::ClassTemplate {
                    templated,
                } => Some(templated),
                _ => None,
            })
        },
        _ => unit.decl(decl).instantiated_from,
    }
}

/// Every declaration `node` denotes, with the relations it was reached by.
pub fn all_target_decls(
    unit: &ParsedUnit,
    node: NodeId,
) -> Vec<(DeclId, DeclRelation)> {
    let mut finder = TargetFinder::new(unit);
    finder.add_node(node);
    finder.found
}

/// Declarations of `node` whose relations are all within `mask`.
pub fn target_decls(
    unit: &ParsedUnit,
    node: NodeId,
    mask: DeclRelation,
) -> Vec<DeclId> {
    all_target_decls(unit, node)
        .into_iter()
        .filter(|(_, relations)| mask.contains(*relations))
        .map(|(decl, _)| decl)
        .collect()
}

/// Declarations a type names, filtered like [`target_decls`].
pub fn type_target_decls(
    unit: &ParsedUnit,
    ty: TypeId,
    mask: DeclRelation,
) -> Vec<DeclId> {
    let mut finder = TargetFinder::new(unit);
    finder.add_type(ty, DeclRelation::empty());
    finder.found.into_iter().filter(|(_, relations)| mask.contains(*relations)).map(|(decl, _)| decl).collect()
}

/// Declarations `node` explicitly refers to. Template instantiations are
/// preferred; patterns are only returned when no instantiation was found.
pub fn explicit_reference_targets(
    unit: &ParsedUnit,
    node: NodeId,
    mask: DeclRelation,
) -> Vec<DeclId> {
    let mask = mask | DeclRelation::TEMPLATE_PATTERN | DeclRelation::TEMPLATE_INSTANTIATION;
    let mut targets = Vec::new();
    let mut patterns = Vec::new();
    let mut seen_instantiation = false;
    for (decl, relations) in all_target_decls(unit, node) {
        if !mask.contains(relations) {
            continue;
        }
        if relations.contains(DeclRelation::TEMPLATE_PATTERN) {
            patterns.push(decl);
            continue;
        }
        seen_instantiation |= relations.contains(DeclRelation::TEMPLATE_INSTANTIATION);
        targets.push(decl);
    }
    if !seen_instantiation {
        targets.extend(patterns);
    }
    targets
}

/// Result of resolving a point to declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclsAtPoint {
    pub decls: Vec<(DeclId, DeclRelation)>,
    /// The selected node before attributes were replaced by what they
    /// decorate, e.g. the `override` attribute itself.
    pub node: Option<NodeId>,
}

/// Declarations at `offset` whose relations fit in `relations`, taken from
/// the first selection candidate that yields any.
pub fn decls_at_with_relations(
    unit: &ParsedUnit,
    offset: u32,
    relations: DeclRelation,
) -> DeclsAtPoint {
    let mut result = DeclsAtPoint::default();
    create_each(unit, offset, |tree| {
        let Some(node) = tree.target_node(unit) else {
            return false;
        };
        result.node = tree.common_ancestor;
        result.decls.extend(
            all_target_decls(unit, node).into_iter().filter(|(_, found)| relations.contains(*found)),
        );
        !result.decls.is_empty()
    });
    result
}
