use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::index::SymbolId;

/// A line/column pair packed the way the persistent index stores it: 20 bits
/// of line and 12 bits of column. Larger values saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "PointRepr", into = "PointRepr")]
pub struct Point {
    line: u32,
    column: u32,
}

#[derive(Serialize, Deserialize)]
struct PointRepr {
    line: u32,
    column: u32,
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        Point::new(repr.line, repr.column)
    }
}

impl From<Point> for PointRepr {
    fn from(point: Point) -> Self {
        PointRepr {
            line: point.line,
            column: point.column,
        }
    }
}

impl Point {
    pub const MAX_LINE: u32 = (1 << 20) - 1;
    pub const MAX_COLUMN: u32 = (1 << 12) - 1;

    pub fn new(
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            line: line.min(Self::MAX_LINE),
            column: column.min(Self::MAX_COLUMN),
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// The stored value may have been clamped.
    pub fn has_overflow(&self) -> bool {
        self.line == Self::MAX_LINE || self.column == Self::MAX_COLUMN
    }
}

/// A location in the index: file URI plus a half-open range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolLocation {
    #[serde(default)]
    pub file_uri: String,
    #[serde(default)]
    pub start: Point,
    #[serde(default)]
    pub end: Point,
}

impl SymbolLocation {
    pub fn new(
        file_uri: impl Into<String>,
        start: Point,
        end: Point,
    ) -> Self {
        Self {
            file_uri: file_uri.into(),
            start,
            end,
        }
    }

    /// Locations without a file are "absent".
    pub fn is_empty(&self) -> bool {
        self.file_uri.is_empty()
    }

    pub fn has_overflow(&self) -> bool {
        self.start.has_overflow() || self.end.has_overflow()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    #[default]
    Unknown,
    Namespace,
    Macro,
    Enum,
    Struct,
    Class,
    Protocol,
    Extension,
    Union,
    TypeAlias,
    Function,
    Variable,
    Field,
    EnumConstant,
    InstanceMethod,
    ClassMethod,
    StaticMethod,
    Constructor,
    Parameter,
    Using,
    TemplateTypeParam,
    TemplateTemplateParam,
    NonTypeTemplateParam,
}

/// A symbol as the index knows it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    /// Enclosing scope with a trailing `::`, empty for globals.
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub kind: SymbolKind,
    #[serde(default)]
    pub canonical_declaration: SymbolLocation,
    #[serde(default)]
    pub definition: SymbolLocation,
    #[serde(default)]
    pub deprecated: bool,
    /// Number of references seen across the project.
    #[serde(default)]
    pub references: u32,
}

impl Symbol {
    pub fn new(
        id: SymbolId,
        name: impl Into<String>,
        kind: SymbolKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            ..Self::default()
        }
    }
}

bitflags! {
    /// How a reference mentions its symbol.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct RefKind: u8 {
        const DECLARATION = 1 << 0;
        const DEFINITION = 1 << 1;
        const REFERENCE = 1 << 2;
        /// The symbol's name is spelled at the location, as opposed to an
        /// implicit reference such as a constructor call through `{}`.
        const SPELLED = 1 << 3;
        const CALL = 1 << 4;
        const ALL = Self::DECLARATION.bits() | Self::DEFINITION.bits() | Self::REFERENCE.bits() | Self::SPELLED.bits();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ref {
    pub location: SymbolLocation,
    pub kind: RefKind,
    /// Symbol whose body contains the reference, if any.
    #[serde(default)]
    pub container: Option<SymbolId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Subject is a base class of the object.
    BaseOf,
    /// Subject is a virtual method overridden by the object.
    OverriddenBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub subject: SymbolId,
    pub predicate: RelationKind,
    pub object: SymbolId,
}

/// A reference located inside the body of a container symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainedRef {
    pub location: SymbolLocation,
    pub kind: RefKind,
    /// The referenced symbol.
    pub symbol: SymbolId,
}
