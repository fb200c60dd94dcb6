//! Hand-built translation units for unit tests.
//!
//! Offsets are found by searching the main text for whole words, so tests
//! read like the code they describe: `fx.word("foo", 1)` is the second `foo`.

use std::path::{Path, PathBuf};

use crate::{
    ast::{
        Decl, DeclId, DeclKind, ExprKind, FileIdx, FilePoint, FunctionDecl, NodeId, NodeKind, ParsedUnit, SourceLocation,
        SourceSpan, StmtKind, Type, TypeId, UnitBuilder,
    },
    ide::navigation::{IdeLocation, IdePosition, IdeRange},
    index::{Point, SymbolLocation},
    text_pos::position_from_byte_offset,
};

pub(crate) const MAIN_PATH: &str = "/work/src/main.cc";

pub(crate) fn main_path() -> PathBuf {
    PathBuf::from(MAIN_PATH)
}

/// An index location of `len` columns on one line.
pub(crate) fn index_loc(
    uri: &str,
    line: u32,
    column: u32,
    len: u32,
) -> SymbolLocation {
    SymbolLocation::new(uri, Point::new(line, column), Point::new(line, column + len))
}

/// An editor location of `len` columns on one line.
pub(crate) fn ide_loc(
    path: &str,
    line: u32,
    column: u32,
    len: u32,
) -> IdeLocation {
    IdeLocation::new(
        path,
        IdeRange::new(IdePosition::new(line, column), IdePosition::new(line, column + len)),
    )
}

pub(crate) struct Fixture {
    pub builder: UnitBuilder,
    text: String,
}

impl Fixture {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            builder: UnitBuilder::new(MAIN_PATH, text),
            text: text.to_string(),
        }
    }

    pub(crate) fn main(&self) -> FileIdx {
        self.builder.main_file()
    }

    pub(crate) fn root(&self) -> NodeId {
        self.builder.root()
    }

    /// Offset of the `nth` whole-word occurrence of `word`.
    pub(crate) fn word(
        &self,
        word: &str,
        nth: usize,
    ) -> u32 {
        let is_ident = |ch: char| ch.is_ascii_alphanumeric() || ch == '_';
        self.text
            .match_indices(word)
            .filter(|(idx, _)| {
                let before = self.text[..*idx].chars().next_back();
                let after = self.text[idx + word.len()..].chars().next();
                !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
            })
            .nth(nth)
            .map(|(idx, _)| idx as u32)
            .unwrap_or_else(|| panic!("word `{word}` #{nth} not found"))
    }

    /// Offset of the `nth` occurrence of arbitrary text.
    pub(crate) fn text_at(
        &self,
        needle: &str,
        nth: usize,
    ) -> u32 {
        self.builder.find(self.main(), needle, nth).unwrap_or_else(|| panic!("`{needle}` #{nth} not found"))
    }

    pub(crate) fn loc(
        &self,
        word: &str,
        nth: usize,
    ) -> SourceLocation {
        SourceLocation::file(FilePoint::new(self.main(), self.word(word, nth)))
    }

    /// Span of the `nth` whole-word `word`.
    pub(crate) fn span(
        &self,
        word: &str,
        nth: usize,
    ) -> SourceSpan {
        let start = self.word(word, nth);
        SourceSpan::new(self.main(), start, start + word.len() as u32)
    }

    /// From the start of `from` to the end of `to`, both arbitrary text.
    pub(crate) fn extent(
        &self,
        from: (&str, usize),
        to: (&str, usize),
    ) -> SourceSpan {
        let start = self.text_at(from.0, from.1);
        let end = self.text_at(to.0, to.1) + to.0.len() as u32;
        SourceSpan::new(self.main(), start, end)
    }

    pub(crate) fn position(
        &self,
        word: &str,
        nth: usize,
    ) -> IdePosition {
        position_from_byte_offset(&self.text, self.word(word, nth) as usize)
    }

    pub(crate) fn ty(
        &mut self,
        ty: Type,
    ) -> TypeId {
        self.builder.add_type(ty)
    }

    pub(crate) fn int(&mut self) -> TypeId {
        self.ty(Type::Builtin {
            name: "int".to_string(),
        })
    }

    /// A free function returning `int`, defined by `definition` if given.
    pub(crate) fn function(
        &mut self,
        definition: Option<DeclId>,
    ) -> DeclKind {
        let result = self.int();
        let ty = self.ty(Type::Function {
            result,
            params: Vec::new(),
        });
        DeclKind::Function(FunctionDecl {
            ty,
            definition,
        })
    }

    /// Declares `name` at its `nth` occurrence, spanning `extent`.
    pub(crate) fn decl(
        &mut self,
        kind: DeclKind,
        name: &str,
        nth: usize,
        extent: SourceSpan,
    ) -> DeclId {
        let loc = self.loc(name, nth);
        self.builder.add_decl(kind, name, loc, extent)
    }

    /// A declaration whose extent is just its name.
    pub(crate) fn decl_here(
        &mut self,
        kind: DeclKind,
        name: &str,
        nth: usize,
    ) -> DeclId {
        let extent = self.span(name, nth);
        self.decl(kind, name, nth, extent)
    }

    pub(crate) fn edit(
        &mut self,
        decl: DeclId,
        change: impl FnOnce(&mut Decl),
    ) {
        change(self.builder.decl_mut(decl));
    }

    pub(crate) fn node(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        range: SourceSpan,
    ) -> NodeId {
        self.builder.add_node(parent, kind, range)
    }

    /// A selection node for a declaration, spanning the declaration's extent.
    pub(crate) fn decl_node(
        &mut self,
        parent: NodeId,
        decl: DeclId,
    ) -> NodeId {
        let range = self.builder.decl_mut(decl).range;
        self.node(
            parent,
            NodeKind::Decl {
                decl,
                body: None,
            },
            range,
        )
    }

    /// A read of `decl` at the `nth` whole-word `word`.
    pub(crate) fn decl_ref(
        &mut self,
        parent: NodeId,
        decl: DeclId,
        word: &str,
        nth: usize,
    ) -> NodeId {
        let loc = self.loc(word, nth);
        let range = self.span(word, nth);
        self.node(
            parent,
            NodeKind::Expr {
                expr: ExprKind::DeclRef {
                    decl,
                    loc,
                    access: Default::default(),
                },
                ty: None,
            },
            range,
        )
    }

    pub(crate) fn type_ref(
        &mut self,
        parent: NodeId,
        ty: TypeId,
        word: &str,
        nth: usize,
    ) -> NodeId {
        let range = self.span(word, nth);
        self.node(
            parent,
            NodeKind::TypeRef {
                ty,
            },
            range,
        )
    }

    pub(crate) fn stmt(
        &mut self,
        parent: NodeId,
        stmt: StmtKind,
        range: SourceSpan,
    ) -> NodeId {
        self.node(
            parent,
            NodeKind::Stmt {
                stmt,
            },
            range,
        )
    }

    pub(crate) fn add_file(
        &mut self,
        path: &str,
        text: &str,
    ) -> FileIdx {
        self.builder.add_file(Some(Path::new(path).to_path_buf()), text)
    }

    pub(crate) fn build(self) -> ParsedUnit {
        self.builder.build()
    }
}
