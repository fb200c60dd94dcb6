use std::path::PathBuf;

use crate::ast::{
    decl::{Decl, DeclId, DeclKind},
    node::{Node, NodeId, NodeKind},
    preproc::{Inclusion, MacroDefinition, MacroIdx, MacroReference},
    source::{FileEntry, FileIdx, FilePoint, SourceLocation, SourceSpan},
    tokens::{Token, lex_spelled_tokens},
    types::{Type, TypeId},
    unit::ParsedUnit,
};

/// Incrementally assembles a [`ParsedUnit`] for in-process providers.
///
/// The main text is lexed up front; every token starts out as part of the
/// parsed stream. Nodes may be added in any order, children are sorted by
/// offset on [`build`](Self::build).
pub struct UnitBuilder {
    files: Vec<FileEntry>,
    decls: Vec<Decl>,
    types: Vec<Type>,
    nodes: Vec<Node>,
    tokens: Vec<Token>,
    includes: Vec<Inclusion>,
    macros: Vec<MacroDefinition>,
    macro_refs: Vec<MacroReference>,
}

const MAIN_FILE: FileIdx = FileIdx(0);
const ROOT: NodeId = NodeId(0);

impl UnitBuilder {
    pub fn new(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let tokens = lex_spelled_tokens(&text);
        let root = Node {
            kind: NodeKind::TranslationUnit,
            range: SourceSpan::new(MAIN_FILE, 0, text.len() as u32),
            parent: None,
            children: Vec::new(),
        };
        Self {
            files: vec![FileEntry {
                path: Some(path.into()),
                text,
            }],
            decls: Vec::new(),
            types: Vec::new(),
            nodes: vec![root],
            tokens,
            includes: Vec::new(),
            macros: Vec::new(),
            macro_refs: Vec::new(),
        }
    }

    pub fn main_file(&self) -> FileIdx {
        MAIN_FILE
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn add_file(
        &mut self,
        path: Option<PathBuf>,
        text: impl Into<String>,
    ) -> FileIdx {
        self.files.push(FileEntry {
            path,
            text: text.into(),
        });
        FileIdx(self.files.len() as u32 - 1)
    }

    pub fn text(
        &self,
        file: FileIdx,
    ) -> &str {
        &self.files[file.0 as usize].text
    }

    /// Offset of the `nth` occurrence of `needle` in `file`.
    pub fn find(
        &self,
        file: FileIdx,
        needle: &str,
        nth: usize,
    ) -> Option<u32> {
        self.text(file).match_indices(needle).nth(nth).map(|(idx, _)| idx as u32)
    }

    pub fn location(
        &self,
        file: FileIdx,
        offset: u32,
    ) -> SourceLocation {
        SourceLocation::file(FilePoint::new(file, offset))
    }

    pub fn add_type(
        &mut self,
        ty: Type,
    ) -> TypeId {
        self.types.push(ty);
        TypeId(self.types.len() as u32 - 1)
    }

    pub fn add_decl(
        &mut self,
        kind: DeclKind,
        name: &str,
        name_loc: SourceLocation,
        range: SourceSpan,
    ) -> DeclId {
        self.decls.push(Decl::new(kind, name, name_loc, range));
        DeclId(self.decls.len() as u32 - 1)
    }

    pub fn decl_mut(
        &mut self,
        id: DeclId,
    ) -> &mut Decl {
        &mut self.decls[id.0 as usize]
    }

    pub fn node_mut(
        &mut self,
        id: NodeId,
    ) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn add_node(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        range: SourceSpan,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            range,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    pub fn add_include(
        &mut self,
        inclusion: Inclusion,
    ) {
        self.includes.push(inclusion);
    }

    pub fn add_macro(
        &mut self,
        definition: MacroDefinition,
    ) -> MacroIdx {
        self.macros.push(definition);
        MacroIdx(self.macros.len() as u32 - 1)
    }

    pub fn add_macro_ref(
        &mut self,
        reference: MacroReference,
    ) {
        self.macro_refs.push(reference);
    }

    /// Marks main-file tokens inside `[start, end)` as absent from the parsed
    /// stream, e.g. a disabled `#if 0` region or a macro invocation's body.
    pub fn mark_unexpanded(
        &mut self,
        start: u32,
        end: u32,
    ) {
        for token in self.tokens.iter_mut().filter(|token| start <= token.start && token.end <= end) {
            token.expanded = false;
        }
    }

    /// Marks the token starting at `offset` as the start of a macro invocation.
    pub fn mark_macro_expansion_start(
        &mut self,
        offset: u32,
    ) {
        if let Some(token) = self.tokens.iter_mut().find(|token| token.start == offset) {
            token.macro_expansion_start = true;
            token.expanded = false;
        }
    }

    /// Finishes the unit. Named, non-local declarations without a USR get one
    /// derived from their scope and name, so redeclarations share it.
    pub fn build(mut self) -> ParsedUnit {
        for decl in &mut self.decls {
            if decl.usr.is_none() && !decl.name.is_empty() && !decl.function_local {
                decl.usr = Some(format!("c:@{}{}", decl.scope.replace("::", "@"), decl.name));
            }
        }
        let starts: Vec<u32> = self.nodes.iter().map(|node| node.range.start).collect();
        for node in &mut self.nodes {
            node.children.sort_by_key(|child| starts[child.0 as usize]);
        }

        let mut unit = ParsedUnit::from_parts(MAIN_FILE, self.files, self.decls, self.types, self.nodes, ROOT, self.tokens);
        unit.includes = self.includes;
        unit.macros = self.macros;
        unit.macro_refs = self.macro_refs;
        unit
    }
}

impl From<ParsedUnit> for UnitBuilder {
    fn from(unit: ParsedUnit) -> Self {
        Self {
            files: unit.files,
            decls: unit.decls,
            types: unit.types,
            nodes: unit.nodes,
            tokens: unit.tokens,
            includes: unit.includes,
            macros: unit.macros,
            macro_refs: unit.macro_refs,
        }
    }
}
