use tracing::debug;

use crate::{
    ast::{DeclId, DeclKind, ExprKind, NodeId, NodeKind, ParsedUnit, StmtKind, Type, TypeId},
    context::QueryContext,
    definition::{
        bridge::{enhance_from_index, located_from_decl},
        located::LocatedSymbol,
    },
    ide::navigation::IdePosition,
    location::main_file_offset,
    selection::{DeclRelation, create_each, type_target_decls},
};

/// Guards against malformed units whose types refer to themselves.
const MAX_UNWRAP_DEPTH: usize = 32;

/// The type most relevant to a selected node: the type it spells, the type a
/// declaration declares or holds, or the type of the data a statement works
/// on. Aliases are looked through; nested-name qualifiers defer to what they
/// qualify.
pub fn type_for_node(
    unit: &ParsedUnit,
    node: Option<NodeId>,
) -> Option<TypeId> {
    let mut node = node?;
    while let NodeKind::Qualifier {
        ..
    } = unit.node(node).kind
    {
        node = unit.node(node).parent?;
    }

    match &unit.node(node).kind {
        NodeKind::TypeRef {
            ty,
        } => match unit.ty(*ty) {
            Type::Deduced {
                deduced: Some(deduced),
                ..
            } => Some(*deduced),
            Type::Typedef {
                underlying, ..
            } => Some(*underlying),
            _ => Some(*ty),
        },
        NodeKind::CtorInitializer {
            member,
            base,
        } => member.and_then(|member| unit.decl(member).kind.value_type()).or(*base),
        NodeKind::BaseSpecifier {
            ty,
        } => Some(*ty),
        NodeKind::Decl {
            decl, ..
        } => type_of_decl(unit, *decl),
        NodeKind::Expr {
            ..
        }
        | NodeKind::Stmt {
            ..
        } => type_of_statement(unit, node),
        NodeKind::Qualifier {
            ..
        }
        | NodeKind::Attr {
            ..
        }
        | NodeKind::TranslationUnit => None,
    }
}

fn type_of_decl(
    unit: &ParsedUnit,
    decl: DeclId,
) -> Option<TypeId> {
    match &unit.decl(decl).kind {
        DeclKind::TypeAlias {
            underlying,
        } => Some(*underlying),
        DeclKind::ClassTemplate {
            templated,
        }
        | DeclKind::FunctionTemplate {
            templated,
        } => type_of_decl(unit, *templated),
        DeclKind::ObjcMethod(_) => None,
        kind => kind.value_type().or_else(|| unit.declared_type(decl)),
    }
}

fn type_of_statement(
    unit: &ParsedUnit,
    node: NodeId,
) -> Option<TypeId> {
    let of_child = |child: &Option<NodeId>| child.and_then(|child| type_of_statement(unit, child));
    match &unit.node(node).kind {
        NodeKind::Expr {
            expr,
            ty,
        } => match expr {
            ExprKind::Member {
                member,
                bound_member: true,
                ..
            } => unit.decl(*member).kind.value_type(),
            ExprKind::Delete {
                destroyed,
            } => *destroyed,
            ExprKind::Throw {
                operand,
            } => of_child(operand),
            ExprKind::DesignatedInit {
                fields,
            } => fields.last().and_then(|designator| unit.decl(designator.field).kind.value_type()),
            _ => *ty,
        },
        NodeKind::Stmt {
            stmt,
        } => match stmt {
            StmtKind::Switch {
                cond, ..
            }
            | StmtKind::While {
                cond, ..
            }
            | StmtKind::Do {
                cond, ..
            }
            | StmtKind::If {
                cond,
            } => of_child(cond),
            StmtKind::Case {
                lhs, ..
            } => of_child(lhs),
            StmtKind::RangeFor {
                var, ..
            } => var.and_then(|var| unit.decl(var).kind.value_type()),
            StmtKind::Return {
                value,
            } => of_child(value),
            StmtKind::Catch {
                caught,
            } => *caught,
            _ => None,
        },
        _ => None,
    }
}

/// Types worth navigating to for `ty`, innermost first.
///
/// Pointers, references, arrays and function types are peeled off, lambdas
/// yield their call operator's result, and the first alias met is kept as is.
/// Smart pointers contribute their pointee and then themselves, so nested
/// wrappers keep every level: `ptr<ptr<T>>` gives `T`, `ptr<T>`, `ptr<ptr<T>>`.
pub fn unwrap_find_type(
    ctx: &QueryContext<'_>,
    ty: TypeId,
) -> Vec<TypeId> {
    let mut out = Vec::new();
    unwrap_into(ctx, ty, 0, &mut out);
    out
}

fn unwrap_into(
    ctx: &QueryContext<'_>,
    ty: TypeId,
    depth: usize,
    out: &mut Vec<TypeId>,
) {
    if depth > MAX_UNWRAP_DEPTH {
        return;
    }
    let unit = ctx.unit;
    match unit.ty(ty) {
        Type::Typedef {
            ..
        } => out.push(ty),
        Type::Pointer {
            pointee,
        }
        | Type::Reference {
            pointee,
        }
        | Type::Array {
            element: pointee,
        }
        | Type::Function {
            result: pointee, ..
        }
        | Type::Deduced {
            deduced: Some(pointee),
            ..
        } => unwrap_into(ctx, *pointee, depth + 1, out),
        Type::Record {
            decl,
        } => {
            let call_operator = unit.decl(*decl).kind.as_record().and_then(|record| record.lambda_call_operator);
            match call_operator.and_then(|operator| unit.decl(operator).kind.value_type()) {
                Some(signature) => unwrap_into(ctx, signature, depth + 1, out),
                None => out.push(ty),
            }
        },
        Type::TemplateSpecialization {
            template,
            args,
            ..
        } => {
            if let Some(pointee) = args.first()
                && ctx.settings.navigation.is_smart_pointer(&unit.qualified_name(*template))
            {
                unwrap_into(ctx, *pointee, depth + 1, out);
            }
            out.push(ty);
        },
        _ => out.push(ty),
    }
}

/// Declarations of the type `ty` names, located and enhanced from the index.
pub fn locate_symbol_for_type(
    ctx: &QueryContext<'_>,
    ty: TypeId,
) -> Vec<LocatedSymbol> {
    let unit = ctx.unit;
    let ty = match unit.ty(ty) {
        Type::Reference {
            pointee,
        } => *pointee,
        _ => ty,
    };
    let mut results: Vec<LocatedSymbol> = type_target_decls(unit, ty, DeclRelation::TEMPLATE_PATTERN | DeclRelation::ALIAS)
        .into_iter()
        .filter_map(|decl| located_from_decl(ctx, decl))
        .collect();
    enhance_from_index(ctx, &mut results);
    results
}

/// Go to type definition: position, node, type, declarations. Duplicates from
/// nested wrappers are kept.
pub fn find_type(
    ctx: &QueryContext<'_>,
    position: IdePosition,
) -> Vec<LocatedSymbol> {
    let unit = ctx.unit;
    let Some(offset) = main_file_offset(unit, position) else {
        debug!("[type-def] position {}:{} is outside the file", position.line, position.character);
        return Vec::new();
    };
    let mut results = Vec::new();
    create_each(unit, offset, |tree| {
        results = type_for_node(unit, tree.common_ancestor)
            .map(|ty| unwrap_find_type(ctx, ty).into_iter().flat_map(|ty| locate_symbol_for_type(ctx, ty)).collect())
            .unwrap_or_default();
        !results.is_empty()
    });
    results
}

#[cfg(test)]
#[path = "../../tests/src/definition/types_tests.rs"]
mod tests;
