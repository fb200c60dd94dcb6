use serde::{Deserialize, Serialize};

use crate::ast::{
    source::{SourceLocation, SourceSpan},
    types::TypeId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub u32);

/// A named entity of the translation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    #[serde(flatten)]
    pub kind: DeclKind,
    pub name: String,
    /// Enclosing scope spelled as a qualifier, e.g. `ns::Outer::`.
    #[serde(default)]
    pub scope: String,
    pub name_loc: SourceLocation,
    /// Full extent of the declaration, half-open.
    pub range: SourceSpan,
    /// First declaration of the redeclaration chain. `None` means this one.
    #[serde(default)]
    pub canonical: Option<DeclId>,
    /// Semantic parent (enclosing record, namespace, function, ...).
    #[serde(default)]
    pub parent: Option<DeclId>,
    /// Unified symbol resolution string; absent for unnamed or unstable decls.
    #[serde(default)]
    pub usr: Option<String>,
    #[serde(default)]
    pub is_definition: bool,
    #[serde(default)]
    pub implicit: bool,
    #[serde(default)]
    pub deprecated: bool,
    /// Declared inside a function body (locals, local classes, parameters).
    #[serde(default)]
    pub function_local: bool,
    /// Template pattern this declaration was instantiated from.
    #[serde(default)]
    pub instantiated_from: Option<DeclId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    #[default]
    Struct,
    Class,
    Union,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordDecl {
    #[serde(default)]
    pub tag: TagKind,
    #[serde(default)]
    pub definition: Option<DeclId>,
    /// Base specifiers as written on the definition.
    #[serde(default)]
    pub bases: Vec<TypeId>,
    /// Class template this record is the pattern of.
    #[serde(default)]
    pub described_template: Option<DeclId>,
    #[serde(default)]
    pub lambda_call_operator: Option<DeclId>,
    /// The record's own type, if the provider materialized it.
    #[serde(default)]
    pub ty: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecializationDecl {
    /// The class template being specialized.
    pub specialized_template: DeclId,
    /// Record the specialization was instantiated from (primary or partial).
    #[serde(default)]
    pub pattern: Option<DeclId>,
    /// Template arguments as printed, e.g. `<int>`.
    #[serde(default)]
    pub args: String,
    /// Written by the user rather than implicitly instantiated.
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub record: RecordDecl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Function type of the declaration.
    pub ty: TypeId,
    #[serde(default)]
    pub definition: Option<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub ty: TypeId,
    #[serde(default)]
    pub definition: Option<DeclId>,
    pub record: DeclId,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_pure: bool,
    #[serde(default)]
    pub is_constructor: bool,
    /// Methods this one directly overrides.
    #[serde(default)]
    pub overridden: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjcMethodDecl {
    #[serde(default)]
    pub result: Option<TypeId>,
    /// The method of the matching `@implementation`.
    #[serde(default)]
    pub definition: Option<DeclId>,
    #[serde(default)]
    pub container: Option<DeclId>,
    /// One location per selector piece, e.g. `foo:` and `bar:`.
    #[serde(default)]
    pub selector_locs: Vec<SourceLocation>,
    #[serde(default)]
    pub overridden: Vec<DeclId>,
    #[serde(default = "default_true")]
    pub instance: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclKind {
    Namespace,
    Record(RecordDecl),
    ClassTemplate {
        templated: DeclId,
    },
    ClassTemplateSpecialization(SpecializationDecl),
    Enum {
        #[serde(default)]
        definition: Option<DeclId>,
        #[serde(default)]
        ty: Option<TypeId>,
    },
    EnumConstant {
        ty: TypeId,
    },
    Function(FunctionDecl),
    Method(MethodDecl),
    FunctionTemplate {
        templated: DeclId,
    },
    Var {
        ty: TypeId,
        #[serde(default)]
        definition: Option<DeclId>,
    },
    Field {
        ty: TypeId,
    },
    Param {
        ty: TypeId,
    },
    /// `typedef` or `using X = ...`.
    TypeAlias {
        underlying: TypeId,
    },
    /// Non-renaming `using ns::name;`.
    Using {
        targets: Vec<DeclId>,
    },
    TemplateTypeParam,
    NonTypeTemplateParam {
        ty: TypeId,
    },
    TemplateTemplateParam,
    Label,
    ObjcInterface {
        #[serde(default)]
        definition: Option<DeclId>,
        #[serde(default)]
        implementation: Option<DeclId>,
        #[serde(default)]
        super_class: Option<DeclId>,
        #[serde(default)]
        ty: Option<TypeId>,
    },
    ObjcProtocol {
        #[serde(default)]
        definition: Option<DeclId>,
    },
    ObjcCategory {
        #[serde(default)]
        class_interface: Option<DeclId>,
        #[serde(default)]
        implementation: Option<DeclId>,
    },
    ObjcCategoryImpl {
        #[serde(default)]
        class_interface: Option<DeclId>,
        #[serde(default)]
        category: Option<DeclId>,
    },
    ObjcImplementation {
        #[serde(default)]
        class_interface: Option<DeclId>,
    },
    ObjcMethod(ObjcMethodDecl),
}

impl DeclKind {
    /// Record data for plain records and class template specializations.
    pub fn as_record(&self) -> Option<&RecordDecl> {
        match self {
            DeclKind::Record(record) => Some(record),
            DeclKind::ClassTemplateSpecialization(spec) => Some(&spec.record),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDecl> {
        match self {
            DeclKind::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_objc_method(&self) -> Option<&ObjcMethodDecl> {
        match self {
            DeclKind::ObjcMethod(method) => Some(method),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        self.as_record().is_some()
    }

    pub fn is_function_like(&self) -> bool {
        matches!(self, DeclKind::Function(_) | DeclKind::Method(_) | DeclKind::ObjcMethod(_))
    }

    pub fn is_virtual_method(&self) -> bool {
        self.as_method().is_some_and(|method| method.is_virtual)
    }

    pub fn is_objc_container(&self) -> bool {
        matches!(
            self,
            DeclKind::ObjcInterface { .. }
                | DeclKind::ObjcProtocol { .. }
                | DeclKind::ObjcCategory { .. }
                | DeclKind::ObjcCategoryImpl { .. }
                | DeclKind::ObjcImplementation { .. }
        )
    }

    /// The declared type of value-like declarations.
    pub fn value_type(&self) -> Option<TypeId> {
        match self {
            DeclKind::Var { ty, .. }
            | DeclKind::Field { ty }
            | DeclKind::Param { ty }
            | DeclKind::EnumConstant { ty }
            | DeclKind::NonTypeTemplateParam { ty } => Some(*ty),
            DeclKind::Function(function) => Some(function.ty),
            DeclKind::Method(method) => Some(method.ty),
            DeclKind::ObjcMethod(method) => method.result,
            _ => None,
        }
    }
}

impl Decl {
    pub fn new(
        kind: DeclKind,
        name: impl Into<String>,
        name_loc: SourceLocation,
        range: SourceSpan,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            scope: String::new(),
            name_loc,
            range,
            canonical: None,
            parent: None,
            usr: None,
            is_definition: false,
            implicit: false,
            deprecated: false,
            function_local: false,
            instantiated_from: None,
        }
    }
}
