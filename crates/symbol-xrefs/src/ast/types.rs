use serde::{Deserialize, Serialize};

use crate::ast::decl::DeclId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeducedKeyword {
    Auto,
    Decltype,
}

/// Semantic types, with sugar (aliases, deduced placeholders) kept visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Builtin {
        name: String,
    },
    Record {
        decl: DeclId,
    },
    Enum {
        decl: DeclId,
    },
    /// Reference to a typedef or alias declaration.
    Typedef {
        decl: DeclId,
        underlying: TypeId,
    },
    Pointer {
        pointee: TypeId,
    },
    Reference {
        pointee: TypeId,
    },
    Array {
        element: TypeId,
    },
    Function {
        result: TypeId,
        #[serde(default)]
        params: Vec<TypeId>,
    },
    /// `Name<Args...>`; `specialization` is the record the arguments select,
    /// when one exists.
    TemplateSpecialization {
        template: DeclId,
        #[serde(default)]
        args: Vec<TypeId>,
        #[serde(default)]
        specialization: Option<DeclId>,
    },
    Deduced {
        keyword: DeducedKeyword,
        #[serde(default)]
        deduced: Option<TypeId>,
    },
    TemplateParam {
        decl: DeclId,
    },
    ObjcObject {
        interface: DeclId,
    },
    ObjcObjectPointer {
        pointee: TypeId,
    },
}
