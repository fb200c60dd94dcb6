    use std::path::PathBuf;

    use super::*;
    use crate::{
        ast::RecordDecl,
        fixture::{Fixture, MAIN_PATH, index_loc, main_path},
        ide::navigation::IdeRange,
        index::{MemIndex, Relation, SymbolKind},
    };

    const BASES: &str = "struct A {};\nstruct B : A {};\nB b;\n";

    fn bases_unit() -> ParsedUnit {
        let mut fx = Fixture::new(BASES);
        let a = fx.decl(DeclKind::Record(RecordDecl::default()), "A", 0, fx.extent(("struct A", 0), ("}", 0)));
        let a_ty = fx.ty(Type::Record {
            decl: a,
        });
        let b = fx.decl(
            DeclKind::Record(RecordDecl {
                bases: vec![a_ty],
                ..RecordDecl::default()
            }),
            "B",
            0,
            fx.extent(("struct B", 0), ("}", 1)),
        );
        for record in [a, b] {
            fx.edit(record, |decl| decl.is_definition = true);
        }
        let b_ty = fx.ty(Type::Record {
            decl: b,
        });
        let var = fx.decl_here(
            DeclKind::Var {
                ty: b_ty,
                definition: None,
            },
            "b",
            0,
        );
        let root = fx.root();
        for decl in [a, b, var] {
            fx.decl_node(root, decl);
        }
        fx.build()
    }

    fn range(
        line: u32,
        start: u32,
        end: u32,
    ) -> IdeRange {
        IdeRange::new(IdePosition::new(line, start), IdePosition::new(line, end))
    }

    fn indexed(
        name: &str,
        uri: &str,
    ) -> Symbol {
        let mut symbol = Symbol::new(SymbolId::from_usr(&format!("c:@{name}")), name, SymbolKind::Struct);
        symbol.definition = index_loc(uri, 0, 7, 1);
        symbol
    }

    /// `C : B` and `D : C`, plus `A` for looking parents up.
    fn derived_index() -> MemIndex {
        let index = MemIndex::new();
        index.insert_symbol(indexed("A", "file:///work/src/main.cc"));
        index.insert_symbol(indexed("C", "file:///work/src/c.h"));
        index.insert_symbol(indexed("D", "file:///work/src/d.h"));
        for (subject, object) in [("c:@B", "c:@C"), ("c:@C", "c:@D")] {
            index.insert_relation(Relation {
                subject: SymbolId::from_usr(subject),
                predicate: RelationKind::BaseOf,
                object: SymbolId::from_usr(object),
            });
        }
        index
    }

    fn hierarchy_at_b(unit: &ParsedUnit) -> TypeHierarchyItem {
        let path = main_path();
        let ctx = QueryContext::new(unit, &path);
        let mut items = get_type_hierarchy(&ctx, IdePosition::new(1, 7), 0, TypeHierarchyDirection::Parents);
        assert_eq!(items.len(), 1);
        items.remove(0)
    }

    #[test]
    fn parents_come_from_the_ast() {
        let unit = bases_unit();
        let item = hierarchy_at_b(&unit);

        assert_eq!(item.item, HierarchyItem {
            name: "B".to_string(),
            detail: None,
            kind: SymbolKind::Struct,
            deprecated: false,
            file_path: PathBuf::from(MAIN_PATH),
            range: range(1, 0, 15),
            selection_range: range(1, 7, 8),
        });
        assert_eq!(item.data.symbol_id, SymbolId::from_usr("c:@B"));
        assert_eq!(item.children, None);

        let parents = item.parents.expect("parents are resolved eagerly");
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].item.name, "A");
        assert_eq!(parents[0].item.range, range(0, 0, 11));
        assert_eq!(parents[0].parents, Some(Vec::new()));
        assert_eq!(item.data.parents, Some(vec![TypeHierarchyPayload {
            symbol_id: SymbolId::from_usr("c:@A"),
            parents: Some(Vec::new()),
        }]));
    }

    #[test]
    fn variables_show_the_hierarchy_of_their_type() {
        let unit = bases_unit();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let items = get_type_hierarchy(&ctx, IdePosition::new(2, 2), 0, TypeHierarchyDirection::Parents);
        assert_eq!(items, vec![hierarchy_at_b(&unit)]);
        assert!(get_type_hierarchy(&ctx, IdePosition::new(9, 0), 0, TypeHierarchyDirection::Parents).is_empty());
    }

    #[test]
    fn children_come_from_the_index_level_by_level() {
        let unit = bases_unit();
        let path = main_path();
        let index = derived_index();
        let ctx = QueryContext::new(&unit, &path).with_index(Some(&index));

        let items = get_type_hierarchy(&ctx, IdePosition::new(1, 7), 2, TypeHierarchyDirection::Children);
        let children = items[0].children.as_ref().expect("children");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].item.name, "C");
        assert_eq!(children[0].item.detail.as_deref(), Some("C"));
        assert_eq!(children[0].item.file_path, PathBuf::from("/work/src/c.h"));
        assert_eq!(children[0].item.selection_range, range(0, 7, 8));
        let grandchildren = children[0].children.as_ref().expect("second level");
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(grandchildren[0].item.name, "D");
        assert_eq!(grandchildren[0].children, None);
    }

    #[test]
    fn resolving_expands_children_only() {
        let unit = bases_unit();
        let index = derived_index();
        let mut item = hierarchy_at_b(&unit);

        resolve_type_hierarchy(&mut item, 1, TypeHierarchyDirection::Parents, Some(&index));
        assert_eq!(item.children, None);
        resolve_type_hierarchy(&mut item, 1, TypeHierarchyDirection::Children, None);
        assert_eq!(item.children, None);

        resolve_type_hierarchy(&mut item, 1, TypeHierarchyDirection::Both, Some(&index));
        let children = item.children.expect("children");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].item.name, "C");
        assert_eq!(children[0].children, None);
    }

    #[test]
    fn super_and_sub_types_resume_from_payloads() {
        let unit = bases_unit();
        let index = derived_index();
        let item = hierarchy_at_b(&unit);

        let parents = super_types(&item, &index).expect("parents recorded");
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].item.name, "A");
        assert_eq!(Some(&parents[0].data), item.data.parents.as_ref().and_then(|parents| parents.first()));

        let children = sub_types(&item, &index);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].data.symbol_id, SymbolId::from_usr("c:@C"));
        assert_eq!(children[0].data.parents, Some(vec![item.data.clone()]));

        let mut b = Symbol::new(SymbolId::from_usr("c:@B"), "B", SymbolKind::Struct);
        b.definition = index_loc("file:///work/src/main.cc", 1, 7, 1);
        index.insert_symbol(b);
        let back = super_types(&children[0], &index).expect("sub types remember their parent");
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].item.name, "B");
        assert_eq!(back[0].item.selection_range, range(1, 7, 8));
        assert_eq!(back[0].data, item.data);

        let grandchildren = sub_types(&children[0], &index);
        assert_eq!(grandchildren[0].item.name, "D");
        assert_eq!(super_types(&grandchildren[0], &index).map(|parents| parents.len()), Some(1));
    }

    #[test]
    fn self_referential_templates_stop_expanding() {
        let text = "template <class T> struct S : S<T *> {};\n";
        let mut fx = Fixture::new(text);
        let pattern = fx.decl(DeclKind::Record(RecordDecl::default()), "S", 0, fx.extent(("struct", 0), ("}", 0)));
        let template = fx.decl(
            DeclKind::ClassTemplate {
                templated: pattern,
            },
            "S",
            0,
            fx.extent(("template", 0), ("}", 0)),
        );
        let base = fx.ty(Type::TemplateSpecialization {
            template,
            args: Vec::new(),
            specialization: None,
        });
        fx.edit(pattern, |decl| {
            decl.is_definition = true;
            if let DeclKind::Record(record) = &mut decl.kind {
                record.described_template = Some(template);
                record.bases = vec![base];
            }
        });
        let root = fx.root();
        let template_node = fx.decl_node(root, template);
        fx.decl_node(template_node, pattern);
        let at_name = fx.position("S", 0);
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let items = get_type_hierarchy(&ctx, at_name, 0, TypeHierarchyDirection::Parents);
        assert_eq!(items.len(), 1);
        let parents = items[0].parents.as_ref().expect("parents");
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].item.name, "S");
        assert_eq!(parents[0].parents, Some(Vec::new()));
    }
