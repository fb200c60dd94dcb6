use crate::ast::{DeclId, DeclKind, ParsedUnit};

/// The declaration a reader thinks of as primary: the canonical one, except
/// that forward-declared ObjC interfaces and protocols yield their definition.
pub fn preferred_decl(
    unit: &ParsedUnit,
    decl: DeclId,
) -> DeclId {
    let canonical = unit.canonical(decl);
    match unit.decl(canonical).kind {
        DeclKind::ObjcInterface {
            definition: Some(definition),
            ..
        }
        | DeclKind::ObjcProtocol {
            definition: Some(definition),
        } => definition,
        _ => canonical,
    }
}

/// The unique definition of `decl`, for kinds that have one.
///
/// Tags, variables and functions have at most one definition; value-like
/// declarations and template parameters are their own definition. Namespaces,
/// aliases and function templates may be defined many times and get `None`.
pub fn definition_of(
    unit: &ParsedUnit,
    decl: DeclId,
) -> Option<DeclId> {
    let this = unit.decl(decl);
    match &this.kind {
        DeclKind::Record(_)
        | DeclKind::ClassTemplateSpecialization(_)
        | DeclKind::Enum {
            ..
        }
        | DeclKind::Var {
            ..
        }
        | DeclKind::Function(_)
        | DeclKind::Method(_) => redeclared_definition(unit, decl),
        DeclKind::ClassTemplate {
            templated,
        } => redeclared_definition(unit, *templated),
        DeclKind::ObjcMethod(method) => {
            if this.is_definition {
                Some(decl)
            } else {
                method.definition
            }
        },
        DeclKind::ObjcInterface {
            implementation, ..
        }
        | DeclKind::ObjcCategory {
            implementation, ..
        } => *implementation,
        DeclKind::ObjcProtocol {
            ..
        }
        | DeclKind::ObjcCategoryImpl {
            ..
        }
        | DeclKind::ObjcImplementation {
            ..
        } => None,
        DeclKind::Field {
            ..
        }
        | DeclKind::Param {
            ..
        }
        | DeclKind::EnumConstant {
            ..
        }
        | DeclKind::NonTypeTemplateParam {
            ..
        }
        | DeclKind::TemplateTypeParam
        | DeclKind::TemplateTemplateParam => Some(decl),
        DeclKind::Namespace
        | DeclKind::TypeAlias {
            ..
        }
        | DeclKind::Using {
            ..
        }
        | DeclKind::FunctionTemplate {
            ..
        }
        | DeclKind::Label => None,
    }
}

/// The definition recorded on `decl` or its canonical redeclaration.
fn redeclared_definition(
    unit: &ParsedUnit,
    decl: DeclId,
) -> Option<DeclId> {
    if unit.decl(decl).is_definition {
        return Some(decl);
    }
    definition_link(unit, decl).or_else(|| definition_link(unit, unit.canonical(decl)))
}

fn definition_link(
    unit: &ParsedUnit,
    decl: DeclId,
) -> Option<DeclId> {
    match &unit.decl(decl).kind {
        DeclKind::Record(record) => record.definition,
        DeclKind::ClassTemplateSpecialization(spec) => spec.record.definition,
        DeclKind::Enum {
            definition, ..
        }
        | DeclKind::Var {
            definition, ..
        } => *definition,
        DeclKind::Function(function) => function.definition,
        DeclKind::Method(method) => method.definition,
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/src/definition/preferred_tests.rs"]
mod tests;
