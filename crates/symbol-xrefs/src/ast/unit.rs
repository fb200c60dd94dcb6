use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::{
    ast::{
        decl::{Decl, DeclId, DeclKind, TagKind},
        node::{ExprKind, Node, NodeId, NodeKind, StmtKind},
        preproc::{Inclusion, MacroDefinition, MacroIdx, MacroReference},
        source::{FileEntry, FileIdx, FilePoint, SourceLocation},
        tokens::Token,
        types::{Type, TypeId},
    },
    error::XrefError,
    index::SymbolId,
    syntax::lexer::token_length_at,
};

/// Value-typed identity of a declaration: the name location of its canonical
/// redeclaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclKey {
    pub file: FileIdx,
    pub offset: u32,
    pub name: String,
}

/// Read-only snapshot of one parsed translation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedUnit {
    pub main_file: FileIdx,
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub decls: Vec<Decl>,
    #[serde(default)]
    pub types: Vec<Type>,
    pub nodes: Vec<Node>,
    pub root: NodeId,
    /// Spelled tokens of the main file, ordered by offset.
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub includes: Vec<Inclusion>,
    #[serde(default)]
    pub macros: Vec<MacroDefinition>,
    #[serde(default)]
    pub macro_refs: Vec<MacroReference>,
    #[serde(skip)]
    line_starts: OnceCell<Vec<u32>>,
}

impl ParsedUnit {
    pub(crate) fn from_parts(
        main_file: FileIdx,
        files: Vec<FileEntry>,
        decls: Vec<Decl>,
        types: Vec<Type>,
        nodes: Vec<Node>,
        root: NodeId,
        tokens: Vec<Token>,
    ) -> Self {
        Self {
            main_file,
            files,
            decls,
            types,
            nodes,
            root,
            tokens,
            includes: Vec::new(),
            macros: Vec::new(),
            macro_refs: Vec::new(),
            line_starts: OnceCell::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, XrefError> {
        let unit: ParsedUnit = serde_json::from_str(json)?;
        unit.validate()?;
        Ok(unit)
    }

    pub fn decl(
        &self,
        id: DeclId,
    ) -> &Decl {
        &self.decls[id.0 as usize]
    }

    pub fn ty(
        &self,
        id: TypeId,
    ) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn node(
        &self,
        id: NodeId,
    ) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn file(
        &self,
        idx: FileIdx,
    ) -> &FileEntry {
        &self.files[idx.0 as usize]
    }

    pub fn file_path(
        &self,
        idx: FileIdx,
    ) -> Option<&Path> {
        self.file(idx).path.as_deref()
    }

    pub fn main_text(&self) -> &str {
        &self.file(self.main_file).text
    }

    pub fn main_point(
        &self,
        offset: u32,
    ) -> FilePoint {
        FilePoint::new(self.main_file, offset)
    }

    pub fn top_level_nodes(&self) -> &[NodeId] {
        &self.node(self.root).children
    }

    pub fn canonical(
        &self,
        id: DeclId,
    ) -> DeclId {
        self.decl(id).canonical.unwrap_or(id)
    }

    pub fn decl_key(
        &self,
        id: DeclId,
    ) -> DeclKey {
        let canonical = self.canonical(id);
        let point = self.decl(canonical).name_loc.spelling;
        DeclKey {
            file: point.file,
            offset: point.offset,
            name: self.decl(canonical).name.clone(),
        }
    }

    pub fn symbol_id(
        &self,
        id: DeclId,
    ) -> Option<SymbolId> {
        self.decl(id).usr.as_deref().filter(|usr| !usr.is_empty()).map(SymbolId::from_usr)
    }

    /// True when the spelling of `loc` is real file text rather than a
    /// scratch buffer produced by token pasting.
    pub fn is_spelled_in_source(
        &self,
        loc: &SourceLocation,
    ) -> bool {
        self.file_path(loc.spelling.file).is_some()
    }

    /// Where a declaration's name should be reported: the first selector piece
    /// for ObjC methods, the spelling when it is real text, else the expansion.
    pub fn name_location(
        &self,
        id: DeclId,
    ) -> FilePoint {
        let decl = self.decl(id);
        let loc = decl
            .kind
            .as_objc_method()
            .and_then(|method| method.selector_locs.first().copied())
            .unwrap_or(decl.name_loc);
        if self.is_spelled_in_source(&loc) { loc.spelling } else { loc.file_point() }
    }

    /// Length of the token at `point`, measured in that file's text.
    pub fn token_length(
        &self,
        point: FilePoint,
    ) -> u32 {
        let Some(entry) = self.files.get(point.file.0 as usize) else {
            return 0;
        };
        token_length_at(&entry.text, point.offset as usize) as u32
    }

    pub fn print_name(
        &self,
        id: DeclId,
    ) -> String {
        let decl = self.decl(id);
        match &decl.kind {
            DeclKind::ClassTemplateSpecialization(spec) => format!("{}{}", decl.name, spec.args),
            DeclKind::ObjcCategory {
                class_interface, ..
            }
            | DeclKind::ObjcCategoryImpl {
                class_interface, ..
            } => {
                let class_name = class_interface.map(|class| self.decl(class).name.as_str()).unwrap_or_default();
                format!("{class_name}({})", decl.name)
            },
            _ if !decl.name.is_empty() => decl.name.clone(),
            DeclKind::Namespace => "(anonymous namespace)".to_string(),
            DeclKind::Record(record) => match record.tag {
                TagKind::Struct => "(anonymous struct)".to_string(),
                TagKind::Class => "(anonymous class)".to_string(),
                TagKind::Union => "(anonymous union)".to_string(),
            },
            DeclKind::Enum { .. } => "(anonymous enum)".to_string(),
            _ => "(anonymous)".to_string(),
        }
    }

    pub fn qualified_name(
        &self,
        id: DeclId,
    ) -> String {
        format!("{}{}", self.decl(id).scope, self.print_name(id))
    }

    /// The type a type-declaring decl introduces.
    pub fn declared_type(
        &self,
        id: DeclId,
    ) -> Option<TypeId> {
        match &self.decl(id).kind {
            DeclKind::Record(record) => record.ty,
            DeclKind::ClassTemplateSpecialization(spec) => spec.record.ty,
            DeclKind::Enum {
                ty, ..
            }
            | DeclKind::ObjcInterface {
                ty, ..
            } => *ty,
            DeclKind::TypeAlias {
                underlying,
            } => Some(*underlying),
            _ => None,
        }
    }

    /// Methods `id` overrides, transitively, in discovery order.
    pub fn overridden_methods(
        &self,
        id: DeclId,
    ) -> Vec<DeclId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let direct: &[DeclId] = match &self.decl(current).kind {
                DeclKind::Method(method) => &method.overridden,
                DeclKind::ObjcMethod(method) => &method.overridden,
                _ => &[],
            };
            for overridden in direct.iter().rev() {
                if !out.contains(overridden) {
                    out.push(*overridden);
                    stack.push(*overridden);
                }
            }
        }
        out
    }

    /// Tokens whose closed range `[start, end]` contains `offset`: zero, one,
    /// or two when `offset` sits between adjacent tokens.
    pub fn touching_tokens(
        &self,
        offset: u32,
    ) -> &[Token] {
        let first = self.tokens.partition_point(|token| token.end < offset);
        let last = self.tokens[first..]
            .iter()
            .position(|token| token.start > offset)
            .map_or(self.tokens.len(), |len| first + len);
        &self.tokens[first..last]
    }

    /// The spelled token covering `offset`.
    pub fn spelled_token_at(
        &self,
        offset: u32,
    ) -> Option<&Token> {
        let idx = self.tokens.partition_point(|token| token.end <= offset);
        self.tokens.get(idx).filter(|token| token.start <= offset)
    }

    pub fn token_text(
        &self,
        token: &Token,
    ) -> &str {
        token.text(self.main_text())
    }

    fn line_starts(&self) -> &[u32] {
        self.line_starts.get_or_init(|| {
            std::iter::once(0)
                .chain(self.main_text().match_indices('\n').map(|(idx, _)| idx as u32 + 1))
                .collect()
        })
    }

    /// Zero-based main-file line of `offset`.
    pub fn line_of(
        &self,
        offset: u32,
    ) -> u32 {
        self.line_starts().partition_point(|&start| start <= offset).saturating_sub(1) as u32
    }

    /// Offset of the first byte of zero-based main-file `line`.
    pub fn line_start(
        &self,
        line: u32,
    ) -> Option<u32> {
        self.line_starts().get(line as usize).copied()
    }

    /// The macro a main-file identifier token names, if one is defined there.
    pub fn macro_at(
        &self,
        token: &Token,
    ) -> Option<MacroIdx> {
        if !token.kind.is_identifier() {
            return None;
        }
        let name = self.token_text(token);
        self.macros
            .iter()
            .enumerate()
            .filter(|(_, def)| def.name == name)
            .filter(|(_, def)| {
                let defined_before = def.name_loc.file != self.main_file || def.name_loc.offset <= token.start;
                let still_defined = def.undefined_at.is_none_or(|undef| undef > token.start);
                defined_before && still_defined
            })
            .map(|(idx, _)| MacroIdx(idx as u32))
            .last()
    }

    pub fn macro_def(
        &self,
        idx: MacroIdx,
    ) -> &MacroDefinition {
        &self.macros[idx.0 as usize]
    }

    pub fn macro_usr(
        &self,
        idx: MacroIdx,
    ) -> String {
        let def = self.macro_def(idx);
        let file_name = self
            .file_path(def.name_loc.file)
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("c:{file_name}@{}@macro@{}", def.name_loc.offset, def.name)
    }

    pub fn macro_symbol_id(
        &self,
        idx: MacroIdx,
    ) -> SymbolId {
        SymbolId::from_usr(&self.macro_usr(idx))
    }

    /// Deduced type of the `auto`/`decltype` written at `offset`.
    pub fn deduced_type_at(
        &self,
        offset: u32,
    ) -> Option<TypeId> {
        self.nodes.iter().find_map(|node| {
            let NodeKind::TypeRef {
                ty,
            } = node.kind
            else {
                return None;
            };
            if node.range.file != self.main_file || node.range.start != offset {
                return None;
            }
            match self.ty(ty) {
                Type::Deduced {
                    deduced, ..
                } => *deduced,
                _ => None,
            }
        })
    }

    /// Checks every cross-reference of the snapshot so later lookups can index
    /// the arenas directly.
    pub fn validate(&self) -> Result<(), XrefError> {
        let mut problems = Vec::new();
        let decls = self.decls.len();
        let types = self.types.len();
        let nodes = self.nodes.len();
        let files = self.files.len();
        let mut check_decl = |what: &str, id: DeclId| {
            if id.0 as usize >= decls {
                problems.push(format!("{what}: decl {} out of range", id.0));
            }
        };
        let mut type_refs = Vec::new();
        let mut node_refs = Vec::new();
        let mut file_refs = vec![self.main_file];

        for decl in &self.decls {
            file_refs.extend([decl.name_loc.spelling.file, decl.range.file]);
            file_refs.extend(decl.name_loc.expansion.map(|point| point.file));
            for id in [decl.canonical, decl.parent, decl.instantiated_from].into_iter().flatten() {
                check_decl("decl link", id);
            }
            match &decl.kind {
                DeclKind::Namespace
                | DeclKind::TemplateTypeParam
                | DeclKind::TemplateTemplateParam
                | DeclKind::Label => {},
                DeclKind::Record(record) => {
                    record
                        .definition
                        .into_iter()
                        .chain(record.described_template)
                        .chain(record.lambda_call_operator)
                        .for_each(|id| check_decl("record", id));
                    type_refs.extend(record.bases.iter().copied().chain(record.ty));
                },
                DeclKind::ClassTemplateSpecialization(spec) => {
                    check_decl("specialization", spec.specialized_template);
                    spec.pattern
                        .into_iter()
                        .chain(spec.record.definition)
                        .chain(spec.record.described_template)
                        .chain(spec.record.lambda_call_operator)
                        .for_each(|id| check_decl("specialization", id));
                    type_refs.extend(spec.record.bases.iter().copied().chain(spec.record.ty));
                },
                DeclKind::ClassTemplate {
                    templated,
                }
                | DeclKind::FunctionTemplate {
                    templated,
                } => check_decl("template", *templated),
                DeclKind::Enum {
                    definition,
                    ty,
                } => {
                    definition.iter().for_each(|id| check_decl("enum", *id));
                    type_refs.extend(*ty);
                },
                DeclKind::EnumConstant {
                    ty,
                }
                | DeclKind::Field {
                    ty,
                }
                | DeclKind::Param {
                    ty,
                }
                | DeclKind::NonTypeTemplateParam {
                    ty,
                }
                | DeclKind::TypeAlias {
                    underlying: ty,
                } => type_refs.push(*ty),
                DeclKind::Var {
                    ty,
                    definition,
                } => {
                    type_refs.push(*ty);
                    definition.iter().for_each(|id| check_decl("var", *id));
                },
                DeclKind::Function(function) => {
                    type_refs.push(function.ty);
                    function.definition.iter().for_each(|id| check_decl("function", *id));
                },
                DeclKind::Method(method) => {
                    type_refs.push(method.ty);
                    check_decl("method", method.record);
                    method.definition.iter().chain(&method.overridden).for_each(|id| check_decl("method", *id));
                },
                DeclKind::Using {
                    targets,
                } => targets.iter().for_each(|id| check_decl("using", *id)),
                DeclKind::ObjcInterface {
                    definition,
                    implementation,
                    super_class,
                    ty,
                } => {
                    [definition, implementation, super_class]
                        .into_iter()
                        .flatten()
                        .for_each(|id| check_decl("interface", *id));
                    type_refs.extend(*ty);
                },
                DeclKind::ObjcProtocol {
                    definition,
                } => definition.iter().for_each(|id| check_decl("protocol", *id)),
                DeclKind::ObjcCategory {
                    class_interface,
                    implementation: other,
                }
                | DeclKind::ObjcCategoryImpl {
                    class_interface,
                    category: other,
                } => [class_interface, other].into_iter().flatten().for_each(|id| check_decl("category", *id)),
                DeclKind::ObjcImplementation {
                    class_interface,
                } => class_interface.iter().for_each(|id| check_decl("implementation", *id)),
                DeclKind::ObjcMethod(method) => {
                    type_refs.extend(method.result);
                    method
                        .definition
                        .iter()
                        .chain(&method.container)
                        .chain(&method.overridden)
                        .for_each(|id| check_decl("objc method", *id));
                    for loc in &method.selector_locs {
                        file_refs.push(loc.spelling.file);
                    }
                },
            }
        }

        for ty in &self.types {
            match ty {
                Type::Builtin {
                    ..
                } => {},
                Type::Record {
                    decl,
                }
                | Type::Enum {
                    decl,
                }
                | Type::TemplateParam {
                    decl,
                }
                | Type::ObjcObject {
                    interface: decl,
                } => check_decl("type", *decl),
                Type::Typedef {
                    decl,
                    underlying,
                } => {
                    check_decl("typedef", *decl);
                    type_refs.push(*underlying);
                },
                Type::Pointer {
                    pointee,
                }
                | Type::Reference {
                    pointee,
                }
                | Type::ObjcObjectPointer {
                    pointee,
                }
                | Type::Array {
                    element: pointee,
                } => type_refs.push(*pointee),
                Type::Function {
                    result,
                    params,
                } => {
                    type_refs.push(*result);
                    type_refs.extend(params.iter().copied());
                },
                Type::TemplateSpecialization {
                    template,
                    args,
                    specialization,
                } => {
                    check_decl("specialization type", *template);
                    specialization.iter().for_each(|id| check_decl("specialization type", *id));
                    type_refs.extend(args.iter().copied());
                },
                Type::Deduced {
                    deduced, ..
                } => type_refs.extend(*deduced),
            }
        }

        node_refs.push(self.root);
        for node in &self.nodes {
            file_refs.push(node.range.file);
            node_refs.extend(node.parent.iter().chain(&node.children).copied());
            match &node.kind {
                NodeKind::TranslationUnit
                | NodeKind::Attr {
                    ..
                } => {},
                NodeKind::Decl {
                    decl,
                    body,
                } => {
                    check_decl("decl node", *decl);
                    node_refs.extend(*body);
                },
                NodeKind::TypeRef {
                    ty,
                }
                | NodeKind::BaseSpecifier {
                    ty,
                } => type_refs.push(*ty),
                NodeKind::Qualifier {
                    decl,
                } => decl.iter().for_each(|id| check_decl("qualifier", *id)),
                NodeKind::CtorInitializer {
                    member,
                    base,
                } => {
                    member.iter().for_each(|id| check_decl("initializer", *id));
                    type_refs.extend(*base);
                },
                NodeKind::Expr {
                    expr,
                    ty,
                } => {
                    type_refs.extend(*ty);
                    match expr {
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
                        } => check_decl("expr", *decl),
                        ExprKind::OverloadSet {
                            candidates, ..
                        }
                        | ExprKind::DependentMember {
                            candidates, ..
                        } => candidates.iter().for_each(|id| check_decl("overload", *id)),
                        ExprKind::Call {
                            callee: child,
                        }
                        | ExprKind::Throw {
                            operand: child,
                        }
                        | ExprKind::Lambda {
                            body: child,
                        } => node_refs.extend(*child),
                        ExprKind::Delete {
                            destroyed,
                        } => type_refs.extend(*destroyed),
                        ExprKind::DesignatedInit {
                            fields,
                        } => fields.iter().for_each(|field| check_decl("designator", field.field)),
                        ExprKind::Other => {},
                    }
                },
                NodeKind::Stmt {
                    stmt,
                } => match stmt {
                    StmtKind::Compound | StmtKind::Break | StmtKind::Continue | StmtKind::Other => {},
                    StmtKind::If {
                        cond,
                    } => node_refs.extend(*cond),
                    StmtKind::While {
                        cond,
                        body,
                    }
                    | StmtKind::Do {
                        cond,
                        body,
                    } => node_refs.extend(cond.iter().chain(body.iter()).copied()),
                    StmtKind::For {
                        body,
                    } => node_refs.extend(*body),
                    StmtKind::RangeFor {
                        var,
                        body,
                    } => {
                        var.iter().for_each(|id| check_decl("range-for", *id));
                        node_refs.extend(*body);
                    },
                    StmtKind::Switch {
                        cond,
                        body,
                        cases,
                    } => node_refs.extend(cond.iter().chain(body.iter()).chain(cases.iter()).copied()),
                    StmtKind::Case {
                        lhs,
                        sub,
                    } => node_refs.extend(lhs.iter().chain(sub.iter()).copied()),
                    StmtKind::Default {
                        sub,
                    } => node_refs.extend(*sub),
                    StmtKind::Return {
                        value,
                    } => node_refs.extend(*value),
                    StmtKind::Goto {
                        label,
                        label_loc,
                    } => {
                        label.iter().for_each(|id| check_decl("goto", *id));
                        file_refs.extend(label_loc.map(|loc| loc.spelling.file));
                    },
                    StmtKind::Label {
                        decl,
                    } => check_decl("label", *decl),
                    StmtKind::Catch {
                        caught,
                    } => type_refs.extend(*caught),
                },
            }
        }

        for (idx, def) in self.macros.iter().enumerate() {
            file_refs.push(def.name_loc.file);
            if def.name.is_empty() {
                problems.push(format!("macro {idx} has no name"));
            }
        }
        for reference in &self.macro_refs {
            if reference.macro_idx.0 as usize >= self.macros.len() {
                problems.push(format!("macro reference to {} out of range", reference.macro_idx.0));
            }
        }
        problems.extend(
            type_refs.iter().filter(|id| id.0 as usize >= types).map(|id| format!("type {} out of range", id.0)),
        );
        problems.extend(
            node_refs.iter().filter(|id| id.0 as usize >= nodes).map(|id| format!("node {} out of range", id.0)),
        );
        problems.extend(
            file_refs.iter().filter(|idx| idx.0 as usize >= files).map(|idx| format!("file {} out of range", idx.0)),
        );
        if !self.tokens.windows(2).all(|pair| pair[0].start <= pair[1].start) {
            problems.push("tokens are not sorted by offset".to_string());
        }
        if problems.is_empty() {
            problems.extend(self.cycle_problems());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(XrefError::InvalidUnit(problems.join("; ")))
        }
    }

    /// Types built from themselves and records deriving from themselves.
    /// Records that are template patterns are skipped: the hierarchy walk
    /// stops on patterns it is already expanding. Ids must be in range.
    fn cycle_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(ty) = first_cycle(self.types.len(), |idx| self.type_components(TypeId(idx as u32))) {
            problems.push(format!("type {ty} is built from itself"));
            return problems;
        }
        if let Some(decl) = first_cycle(self.decls.len(), |idx| self.base_records(DeclId(idx as u32))) {
            problems.push(format!("record {decl} derives from itself"));
        }
        problems
    }

    fn type_components(
        &self,
        ty: TypeId,
    ) -> Vec<usize> {
        let ids: Vec<TypeId> = match self.ty(ty) {
            Type::Typedef {
                underlying: inner, ..
            }
            | Type::Pointer {
                pointee: inner,
            }
            | Type::Reference {
                pointee: inner,
            }
            | Type::ObjcObjectPointer {
                pointee: inner,
            }
            | Type::Array {
                element: inner,
            } => vec![*inner],
            Type::Function {
                result,
                params,
            } => std::iter::once(*result).chain(params.iter().copied()).collect(),
            Type::TemplateSpecialization {
                args, ..
            } => args.clone(),
            Type::Deduced {
                deduced, ..
            } => deduced.iter().copied().collect(),
            Type::Builtin {
                ..
            }
            | Type::Record {
                ..
            }
            | Type::Enum {
                ..
            }
            | Type::TemplateParam {
                ..
            }
            | Type::ObjcObject {
                ..
            } => Vec::new(),
        };
        ids.into_iter().map(|id| id.0 as usize).collect()
    }

    /// Records a record's parents are looked up through: its definition, the
    /// records its bases name and, for invalid specializations, the primary
    /// template. Only valid once the type graph is known to be acyclic.
    fn base_records(
        &self,
        decl: DeclId,
    ) -> Vec<usize> {
        let kind = &self.decl(decl).kind;
        let Some(record) = kind.as_record() else {
            return Vec::new();
        };
        if record.described_template.is_some() {
            return Vec::new();
        }

        let mut records: Vec<DeclId> = record.definition.into_iter().filter(|definition| *definition != decl).collect();
        if let DeclKind::ClassTemplateSpecialization(spec) = kind
            && spec.invalid
        {
            records.extend(self.templated_record(spec.specialized_template));
        }
        for &base in &record.bases {
            records.extend(self.base_record(base));
        }
        records.into_iter().map(|id| id.0 as usize).collect()
    }

    fn base_record(
        &self,
        ty: TypeId,
    ) -> Option<DeclId> {
        match self.ty(ty) {
            Type::Record {
                decl,
            } => Some(*decl),
            Type::Typedef {
                underlying: inner, ..
            }
            | Type::Deduced {
                deduced: Some(inner),
                ..
            } => self.base_record(*inner),
            Type::TemplateSpecialization {
                specialization: Some(specialization),
                ..
            } => Some(*specialization),
            Type::TemplateSpecialization {
                template, ..
            } => self.templated_record(*template),
            _ => None,
        }
    }

    fn templated_record(
        &self,
        template: DeclId,
    ) -> Option<DeclId> {
        match self.decl(template).kind {
            DeclKind::ClassTemplate {
                templated,
            } => Some(templated),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

/// A node of the first cycle found in a graph of `len` nodes, walking
/// depth-first without recursion.
fn first_cycle(
    len: usize,
    successors: impl Fn(usize) -> Vec<usize>,
) -> Option<usize> {
    let mut visits = vec![Visit::New; len];
    for start in 0..len {
        if visits[start] != Visit::New {
            continue;
        }
        visits[start] = Visit::Open;
        let mut stack = vec![(start, successors(start), 0usize)];
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let Some(next) = top.1.get(top.2).copied() else {
                visits[node] = Visit::Done;
                stack.pop();
                continue;
            };
            top.2 += 1;
            match visits.get(next) {
                Some(Visit::Open) => return Some(next),
                Some(Visit::New) => {
                    visits[next] = Visit::Open;
                    stack.push((next, successors(next), 0));
                },
                Some(Visit::Done) | None => {},
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/src/ast/unit_tests.rs"]
mod tests;
