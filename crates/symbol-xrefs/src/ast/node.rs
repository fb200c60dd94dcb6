use serde::{Deserialize, Serialize};

use crate::ast::{
    decl::DeclId,
    source::{SourceLocation, SourceSpan},
    types::TypeId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// One node of the selection tree. Ranges are in the main file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    pub range: SourceSpan,
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrKind {
    Override,
    Final,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Read,
    Write,
    ReadWrite,
    /// Address taken, unevaluated operand, ...
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designator {
    pub field: DeclId,
    pub loc: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum NodeKind {
    TranslationUnit,
    Decl {
        decl: DeclId,
        /// Function or method body.
        #[serde(default)]
        body: Option<NodeId>,
    },
    /// A written reference to a type, e.g. `Foo` in `Foo *x`.
    TypeRef {
        ty: TypeId,
    },
    /// A nested-name-specifier component, e.g. `ns` in `ns::f()`.
    Qualifier {
        #[serde(default)]
        decl: Option<DeclId>,
    },
    BaseSpecifier {
        ty: TypeId,
    },
    CtorInitializer {
        #[serde(default)]
        member: Option<DeclId>,
        #[serde(default)]
        base: Option<TypeId>,
    },
    Attr {
        attr: AttrKind,
    },
    Expr {
        expr: ExprKind,
        #[serde(default)]
        ty: Option<TypeId>,
    },
    Stmt {
        stmt: StmtKind,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKind {
    DeclRef {
        decl: DeclId,
        loc: SourceLocation,
        #[serde(default)]
        access: Access,
    },
    Member {
        member: DeclId,
        loc: SourceLocation,
        #[serde(default)]
        access: Access,
        /// `obj.method` naming a method that is then called.
        #[serde(default)]
        bound_member: bool,
    },
    /// Unresolved lookup naming an overload set.
    OverloadSet {
        candidates: Vec<DeclId>,
        loc: SourceLocation,
    },
    /// Member or qualified name that depends on a template parameter.
    DependentMember {
        candidates: Vec<DeclId>,
        loc: SourceLocation,
    },
    Call {
        #[serde(default)]
        callee: Option<NodeId>,
    },
    Construct {
        ctor: DeclId,
        loc: SourceLocation,
    },
    ObjcMessage {
        method: DeclId,
        selector_locs: Vec<SourceLocation>,
    },
    Throw {
        #[serde(default)]
        operand: Option<NodeId>,
    },
    Delete {
        #[serde(default)]
        destroyed: Option<TypeId>,
    },
    DesignatedInit {
        fields: Vec<Designator>,
    },
    Lambda {
        #[serde(default)]
        body: Option<NodeId>,
    },
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StmtKind {
    Compound,
    If {
        #[serde(default)]
        cond: Option<NodeId>,
    },
    While {
        #[serde(default)]
        cond: Option<NodeId>,
        #[serde(default)]
        body: Option<NodeId>,
    },
    Do {
        #[serde(default)]
        cond: Option<NodeId>,
        #[serde(default)]
        body: Option<NodeId>,
    },
    For {
        #[serde(default)]
        body: Option<NodeId>,
    },
    RangeFor {
        #[serde(default)]
        var: Option<DeclId>,
        #[serde(default)]
        body: Option<NodeId>,
    },
    Switch {
        #[serde(default)]
        cond: Option<NodeId>,
        #[serde(default)]
        body: Option<NodeId>,
        /// `case`/`default` statements in source order.
        #[serde(default)]
        cases: Vec<NodeId>,
    },
    Case {
        #[serde(default)]
        lhs: Option<NodeId>,
        /// Statement labelled by this case, possibly another case.
        #[serde(default)]
        sub: Option<NodeId>,
    },
    Default {
        #[serde(default)]
        sub: Option<NodeId>,
    },
    Break,
    Continue,
    Return {
        #[serde(default)]
        value: Option<NodeId>,
    },
    Goto {
        #[serde(default)]
        label: Option<DeclId>,
        #[serde(default)]
        label_loc: Option<SourceLocation>,
    },
    Label {
        decl: DeclId,
    },
    Catch {
        #[serde(default)]
        caught: Option<TypeId>,
    },
    Other,
}

impl NodeKind {
    pub fn is_attr(&self) -> bool {
        matches!(self, NodeKind::Attr { .. })
    }

    pub fn is_override_attr(&self) -> bool {
        matches!(
            self,
            NodeKind::Attr {
                attr: AttrKind::Override | AttrKind::Final
            }
        )
    }

    /// Names whose meaning depends on template arguments or overload
    /// resolution that has not happened yet.
    pub fn is_dependent_name(&self) -> bool {
        matches!(
            self,
            NodeKind::Expr {
                expr: ExprKind::OverloadSet { .. } | ExprKind::DependentMember { .. },
                ..
            }
        )
    }
}
