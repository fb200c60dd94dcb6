    use std::path::PathBuf;

    use super::*;
    use crate::{
        ast::{
            AttrKind, DeducedKeyword, FilePoint, Inclusion, MacroDefinition, MethodDecl, NodeKind, ObjcMethodDecl,
            RecordDecl, SpecializationDecl, Type,
        },
        config::XrefSettings,
        fixture::{Fixture, MAIN_PATH, ide_loc, index_loc, main_path},
        index::{MemIndex, Relation, Symbol, SymbolKind},
        perf::QueryPerf,
    };

    fn method(
        fx: &mut Fixture,
        record: DeclId,
        is_pure: bool,
        overridden: Vec<DeclId>,
    ) -> DeclKind {
        let int = fx.int();
        let ty = fx.ty(Type::Function {
            result: int,
            params: Vec::new(),
        });
        DeclKind::Method(MethodDecl {
            ty,
            definition: None,
            record,
            is_virtual: true,
            is_pure,
            is_constructor: false,
            overridden,
        })
    }

    #[test]
    fn references_resolve_to_declaration_and_definition() {
        let mut fx = Fixture::new("int f();\nint f() { return 0; }\nint g() { return f(); }\n");
        let definition = {
            let kind = fx.function(None);
            fx.decl_here(kind, "f", 1)
        };
        let declaration = {
            let kind = fx.function(Some(definition));
            fx.decl_here(kind, "f", 0)
        };
        fx.edit(definition, |decl| {
            decl.is_definition = true;
            decl.canonical = Some(declaration);
        });
        let root = fx.root();
        fx.decl_ref(root, declaration, "f", 2);
        let at_call = fx.position("f", 2);
        let unit = fx.build();
        let path = main_path();
        let metrics = QueryPerf::default();
        let ctx = QueryContext::new(&unit, &path).with_metrics(&metrics);

        let found = locate_symbol_at(&ctx, at_call);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].preferred_declaration, ide_loc(MAIN_PATH, 0, 4, 1));
        assert_eq!(found[0].definition, Some(ide_loc(MAIN_PATH, 1, 4, 1)));
        assert_eq!(metrics.case_count("regular"), 1);
    }

    #[test]
    fn include_lines_win_over_everything() {
        let mut fx = Fixture::new("#include \"foo.h\"\n");
        fx.builder.add_include(Inclusion {
            hash_line: 0,
            hash_offset: 0,
            written: "foo.h".to_string(),
            resolved: Some(PathBuf::from("/work/include/foo.h")),
        });
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let found = locate_symbol_at(&ctx, IdePosition::new(0, 12));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "foo.h");
    }

    #[test]
    fn macros_resolve_to_their_definition() {
        let mut fx = Fixture::new("#define LIMIT 10\nint x = LIMIT;\n");
        let name_loc = FilePoint::new(fx.main(), fx.word("LIMIT", 0));
        let idx = fx.builder.add_macro(MacroDefinition {
            name: "LIMIT".to_string(),
            name_loc,
            undefined_at: None,
        });
        let at_use = fx.position("LIMIT", 1);
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let found = locate_symbol_at(&ctx, at_use);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "LIMIT");
        assert_eq!(found[0].preferred_declaration, ide_loc(MAIN_PATH, 0, 8, 5));
        assert_eq!(found[0].definition, Some(ide_loc(MAIN_PATH, 0, 8, 5)));
        assert_eq!(found[0].id, Some(unit.macro_symbol_id(idx)));
    }

    #[test]
    fn auto_jumps_to_the_deduced_type() {
        let mut fx = Fixture::new("struct Foo {};\nauto x = Foo();\n");
        let record = fx.decl_here(DeclKind::Record(RecordDecl::default()), "Foo", 0);
        let foo = fx.ty(Type::Record {
            decl: record,
        });
        let deduced = fx.ty(Type::Deduced {
            keyword: DeducedKeyword::Auto,
            deduced: Some(foo),
        });
        let root = fx.root();
        let auto_span = fx.span("auto", 0);
        fx.node(
            root,
            NodeKind::TypeRef {
                ty: deduced,
            },
            auto_span,
        );
        let at_auto = fx.position("auto", 0);
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let found = locate_symbol_at(&ctx, at_auto);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Foo");
        assert_eq!(found[0].preferred_declaration, ide_loc(MAIN_PATH, 0, 7, 3));
    }

    #[test]
    fn pure_virtual_methods_also_list_their_overrides() {
        let mut fx = Fixture::new("struct B { virtual int run() = 0; };\n");
        let record = fx.decl(DeclKind::Record(RecordDecl::default()), "B", 0, fx.extent(("struct", 0), ("}", 0)));
        let kind = method(&mut fx, record, true, Vec::new());
        let run = fx.decl(kind, "run", 0, fx.extent(("virtual", 0), ("0", 0)));
        fx.edit(run, |decl| decl.scope = "B::".to_string());
        let root = fx.root();
        let record_node = fx.decl_node(root, record);
        fx.decl_node(record_node, run);
        let at_run = fx.position("run", 0);
        let unit = fx.build();
        let path = main_path();

        let base_run = SymbolId::from_usr("c:@B@run");
        let derived_run = SymbolId::from_usr("c:@D@run");
        let index = MemIndex::new();
        let mut symbol = Symbol::new(derived_run, "run", SymbolKind::InstanceMethod);
        symbol.canonical_declaration = index_loc("file:///work/src/d.h", 2, 9, 3);
        symbol.definition = index_loc("file:///work/src/d.cc", 7, 9, 3);
        index.insert_symbol(symbol);
        index.insert_relation(Relation {
            subject: base_run,
            predicate: RelationKind::OverriddenBy,
            object: derived_run,
        });
        let ctx = QueryContext::new(&unit, &path).with_index(Some(&index));

        let found = locate_symbol_at(&ctx, at_run);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, Some(base_run));
        assert_eq!(found[0].preferred_declaration.range.start, at_run);
        assert_eq!(found[1].id, Some(derived_run));
        assert_eq!(found[1].definition, Some(ide_loc("/work/src/d.cc", 7, 9, 3)));
    }

    #[test]
    fn override_attributes_jump_to_the_overridden_method() {
        let mut fx = Fixture::new("struct B { virtual int run(); };\nstruct D : B { int run() override; };\n");
        let base = fx.decl_here(DeclKind::Record(RecordDecl::default()), "B", 0);
        let derived = fx.decl_here(DeclKind::Record(RecordDecl::default()), "D", 0);
        let kind = method(&mut fx, base, false, Vec::new());
        let base_run = fx.decl_here(kind, "run", 0);
        let kind = method(&mut fx, derived, false, vec![base_run]);
        let derived_run = fx.decl(kind, "run", 1, fx.extent(("int run() override", 0), ("override", 0)));
        let root = fx.root();
        let method_node = fx.decl_node(root, derived_run);
        let attr_span = fx.span("override", 0);
        fx.node(
            method_node,
            NodeKind::Attr {
                attr: AttrKind::Override,
            },
            attr_span,
        );
        let at_override = fx.position("override", 0);
        let base_position = fx.position("run", 0);
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let found = locate_symbol_at(&ctx, at_override);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].preferred_declaration.range.start, base_position);
    }

    #[test]
    fn objc_method_bodies_list_what_they_override_and_themselves() {
        let mut fx = Fixture::new(
            "@interface Canvas\n- (void)draw:(int)x with:(int)y;\n@end\n@implementation Canvas\n- (void)draw:(int)x with:(int)y {}\n@end\n",
        );
        let selector = |fx: &Fixture, nth| vec![fx.loc("draw", nth), fx.loc("with", nth)];
        let declared_selector = selector(&fx, 0);
        let declared_extent = fx.extent(("- (void)draw", 0), ("(int)y;", 0));
        let declared_loc = fx.loc("draw", 0);
        let declared = fx.builder.add_decl(
            DeclKind::ObjcMethod(ObjcMethodDecl {
                result: None,
                definition: None,
                container: None,
                selector_locs: declared_selector,
                overridden: Vec::new(),
                instance: true,
            }),
            "draw:with:",
            declared_loc,
            declared_extent,
        );
        let defined_selector = selector(&fx, 1);
        let defined_extent = fx.extent(("- (void)draw", 1), ("{}", 0));
        let defined_loc = fx.loc("draw", 1);
        let defined = fx.builder.add_decl(
            DeclKind::ObjcMethod(ObjcMethodDecl {
                result: None,
                definition: None,
                container: None,
                selector_locs: defined_selector,
                overridden: vec![declared],
                instance: true,
            }),
            "draw:with:",
            defined_loc,
            defined_extent,
        );
        fx.edit(defined, |decl| decl.is_definition = true);
        fx.edit(declared, |decl| {
            if let DeclKind::ObjcMethod(method) = &mut decl.kind {
                method.definition = Some(defined);
            }
        });
        let root = fx.root();
        for decl in [declared, defined] {
            fx.decl_node(root, decl);
        }
        let at_second_piece = fx.position("with", 1);
        let unit = fx.build();
        let path = main_path();
        let metrics = QueryPerf::default();
        let ctx = QueryContext::new(&unit, &path).with_metrics(&metrics);

        let found = locate_symbol_at(&ctx, at_second_piece);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].preferred_declaration, ide_loc(MAIN_PATH, 1, 8, 4));
        assert_eq!(found[0].definition, Some(ide_loc(MAIN_PATH, 4, 8, 4)));
        assert_eq!(found[1].preferred_declaration, ide_loc(MAIN_PATH, 4, 8, 4));
        assert_eq!(found[1].definition, Some(ide_loc(MAIN_PATH, 4, 8, 4)));
        assert_eq!(metrics.case_count("objc-overriden-method"), 1);
        assert_eq!(metrics.case_count("regular"), 0);
    }

    #[test]
    fn category_class_names_also_reach_the_interface() {
        let mut fx = Fixture::new(
            "@interface Foo\n@end\n@interface Foo (Extras)\n@end\n@implementation Foo (Extras)\n@end\n",
        );
        let interface_extent = fx.extent(("@interface Foo", 0), ("@end", 0));
        let interface = fx.decl(
            DeclKind::ObjcInterface {
                definition: None,
                implementation: None,
                super_class: None,
                ty: None,
            },
            "Foo",
            0,
            interface_extent,
        );
        let category_extent = fx.extent(("@interface Foo (Extras)", 0), ("@end", 1));
        let category = fx.decl(
            DeclKind::ObjcCategory {
                class_interface: Some(interface),
                implementation: None,
            },
            "Extras",
            0,
            category_extent,
        );
        let implementation_extent = fx.extent(("@implementation", 0), ("@end", 2));
        let implementation = fx.decl(
            DeclKind::ObjcCategoryImpl {
                class_interface: Some(interface),
                category: Some(category),
            },
            "Extras",
            1,
            implementation_extent,
        );
        fx.edit(category, |decl| {
            if let DeclKind::ObjcCategory {
                implementation: slot, ..
            } = &mut decl.kind
            {
                *slot = Some(implementation);
            }
        });
        let root = fx.root();
        for decl in [interface, category, implementation] {
            fx.decl_node(root, decl);
        }
        let on_category = fx.position("Foo", 1);
        let on_implementation = fx.position("Foo", 2);
        let unit = fx.build();
        let path = main_path();
        let metrics = QueryPerf::default();
        let ctx = QueryContext::new(&unit, &path).with_metrics(&metrics);

        for position in [on_category, on_implementation] {
            let found = locate_symbol_at(&ctx, position);
            assert_eq!(found.len(), 2, "at {position:?}");
            assert_eq!(found[0].name, "Foo");
            assert_eq!(found[0].preferred_declaration, ide_loc(MAIN_PATH, 0, 11, 3));
            assert_eq!(found[1].name, "Foo(Extras)");
            assert_eq!(found[1].preferred_declaration, ide_loc(MAIN_PATH, 2, 16, 6));
            assert_eq!(found[1].definition, Some(ide_loc(MAIN_PATH, 4, 21, 6)));
        }
        assert_eq!(metrics.case_count("objc-category-to-class"), 2);
    }

    #[test]
    fn specialization_names_jump_to_the_primary_template() {
        let mut fx = Fixture::new("template <class T> struct Box {};\ntemplate <> struct Box<int> {};\n");
        let pattern = fx.decl_here(DeclKind::Record(RecordDecl::default()), "Box", 0);
        let template = fx.decl_here(
            DeclKind::ClassTemplate {
                templated: pattern,
            },
            "Box",
            0,
        );
        let spec = fx.decl(
            DeclKind::ClassTemplateSpecialization(SpecializationDecl {
                specialized_template: template,
                pattern: Some(pattern),
                args: "<int>".to_string(),
                explicit: true,
                invalid: false,
                record: RecordDecl::default(),
            }),
            "Box",
            1,
            fx.extent(("struct Box<int>", 0), ("}", 1)),
        );
        let root = fx.root();
        fx.decl_node(root, spec);
        let at_spec = fx.position("Box", 1);
        let primary = fx.position("Box", 0);
        let unit = fx.build();
        let path = main_path();
        let metrics = QueryPerf::default();
        let ctx = QueryContext::new(&unit, &path).with_metrics(&metrics);

        let found = locate_symbol_at(&ctx, at_spec);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Box");
        assert_eq!(found[0].preferred_declaration.range.start, primary);
        assert_eq!(metrics.case_count("template-specialization-to-primary"), 1);
    }

    #[test]
    fn using_declarations_defer_to_their_target() {
        let mut fx = Fixture::new("namespace ns { int foo(); }\nusing ns::foo;\n");
        let foo = {
            let kind = fx.function(None);
            fx.decl_here(kind, "foo", 0)
        };
        let using = fx.decl(
            DeclKind::Using {
                targets: vec![foo],
            },
            "foo",
            1,
            fx.extent(("using", 0), ("foo;", 0)),
        );
        let root = fx.root();
        fx.decl_node(root, using);
        let at_using = fx.position("foo", 1);
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let found = locate_symbol_at(&ctx, at_using);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].preferred_declaration, ide_loc(MAIN_PATH, 0, 19, 3));
    }

    #[test]
    fn comment_words_resolve_through_a_nearby_identifier() {
        let mut fx = Fixture::new("int value;\n// value\n");
        let int = fx.int();
        let value = fx.decl(
            DeclKind::Var {
                ty: int,
                definition: None,
            },
            "value",
            0,
            fx.extent(("int", 0), ("value", 0)),
        );
        fx.edit(value, |decl| decl.is_definition = true);
        let root = fx.root();
        fx.decl_node(root, value);
        let in_comment = fx.position("value", 1);
        let unit = fx.build();
        let path = main_path();
        let metrics = QueryPerf::default();
        let ctx = QueryContext::new(&unit, &path).with_metrics(&metrics);

        let found = locate_symbol_at(&ctx, in_comment);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].preferred_declaration, ide_loc(MAIN_PATH, 0, 4, 5));
        assert_eq!(metrics.case_count("nearby-identifier"), 1);

        let mut settings = XrefSettings::default();
        settings.navigation.nearby_identifier = false;
        let ctx = ctx.with_settings(&settings);
        assert!(locate_symbol_at(&ctx, in_comment).is_empty());
    }

    #[test]
    fn unresolved_words_fall_back_to_the_index() {
        let fx = Fixture::new("// see do_work\n");
        let at_word = fx.position("do_work", 0);
        let unit = fx.build();
        let path = main_path();
        let index = MemIndex::new();
        let mut symbol = Symbol::new(SymbolId::from_usr("c:@F@do_work#"), "do_work", SymbolKind::Function);
        symbol.canonical_declaration = index_loc("file:///work/include/work.h", 3, 5, 7);
        index.insert_symbol(symbol);
        let ctx = QueryContext::new(&unit, &path).with_index(Some(&index));

        let found = locate_symbol_at(&ctx, at_word);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].preferred_declaration, ide_loc("/work/include/work.h", 3, 5, 7));
        assert!(locate_symbol_at(&ctx, IdePosition::new(9, 0)).is_empty());
    }
