//! The semantic tree of one translation unit, as handed over by the parser.
//!
//! Everything lives in flat arenas addressed by small integer ids, so a unit
//! can be serialized, shared across threads and queried without lifetimes.

pub mod builder;
pub mod decl;
pub mod node;
pub mod preproc;
pub mod source;
pub mod tokens;
pub mod types;
pub mod unit;

pub use builder::UnitBuilder;
pub use decl::{Decl, DeclId, DeclKind, FunctionDecl, MethodDecl, ObjcMethodDecl, RecordDecl, SpecializationDecl, TagKind};
pub use node::{Access, AttrKind, Designator, ExprKind, Node, NodeId, NodeKind, StmtKind};
pub use preproc::{Inclusion, MacroDefinition, MacroIdx, MacroReference};
pub use source::{FileEntry, FileIdx, FilePoint, SourceLocation, SourceSpan};
pub use tokens::Token;
pub use types::{DeducedKeyword, Type, TypeId};
pub use unit::{DeclKey, ParsedUnit};
