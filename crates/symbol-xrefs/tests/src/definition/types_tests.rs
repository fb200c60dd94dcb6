    use super::*;
    use crate::{
        ast::{AttrKind, RecordDecl},
        config::XrefSettings,
        fixture::{Fixture, main_path},
    };

    #[test]
    fn type_refs_look_through_aliases_and_qualifiers_defer() {
        let mut fx = Fixture::new("struct Foo {};\ntypedef Foo Alias;\nns::Alias a;\n");
        let record = fx.decl_here(DeclKind::Record(RecordDecl::default()), "Foo", 0);
        let foo = fx.ty(Type::Record {
            decl: record,
        });
        let alias = fx.decl_here(
            DeclKind::TypeAlias {
                underlying: foo,
            },
            "Alias",
            0,
        );
        let alias_ty = fx.ty(Type::Typedef {
            decl: alias,
            underlying: foo,
        });
        let root = fx.root();
        let span = fx.extent(("ns::", 0), ("Alias", 1));
        let type_ref = fx.node(
            root,
            NodeKind::TypeRef {
                ty: alias_ty,
            },
            span,
        );
        let qualifier_span = fx.span("ns", 0);
        let qualifier = fx.node(
            type_ref,
            NodeKind::Qualifier {
                decl: None,
            },
            qualifier_span,
        );
        let attr_span = fx.span("a", 0);
        let attr = fx.node(
            root,
            NodeKind::Attr {
                attr: AttrKind::Other,
            },
            attr_span,
        );
        let unit = fx.build();

        assert_eq!(type_for_node(&unit, Some(type_ref)), Some(foo));
        assert_eq!(type_for_node(&unit, Some(qualifier)), Some(foo));
        assert_eq!(type_for_node(&unit, Some(attr)), None);
        assert_eq!(type_for_node(&unit, None), None);
    }

    #[test]
    fn statements_use_the_type_of_their_data() {
        let mut fx = Fixture::new("struct S { int field; S() : field(0) {} };\nint f() { return field; }\n");
        let int = fx.int();
        let field = fx.decl_here(
            DeclKind::Field {
                ty: int,
            },
            "field",
            0,
        );
        let root = fx.root();
        let init_span = fx.extent(("field(0)", 0), ("field(0)", 0));
        let init = fx.node(
            root,
            NodeKind::CtorInitializer {
                member: Some(field),
                base: None,
            },
            init_span,
        );
        let return_span = fx.extent(("return", 0), ("field;", 0));
        let ret = fx.stmt(
            root,
            StmtKind::Return {
                value: None,
            },
            return_span,
        );
        let value = fx.decl_ref(ret, field, "field", 2);
        fx.builder.node_mut(ret).kind = NodeKind::Stmt {
            stmt: StmtKind::Return {
                value: Some(value),
            },
        };
        if let NodeKind::Expr {
            ty, ..
        } = &mut fx.builder.node_mut(value).kind
        {
            *ty = Some(int);
        }
        let unit = fx.build();

        assert_eq!(type_for_node(&unit, Some(init)), Some(int));
        assert_eq!(type_for_node(&unit, Some(ret)), Some(int));
    }

    /// `std::unique_ptr<std::unique_ptr<Foo>> p;`
    struct Nested {
        fx: Fixture,
        foo: TypeId,
        inner: TypeId,
        outer: TypeId,
    }

    fn nested_smart_pointers() -> Nested {
        let mut fx = Fixture::new(
            "namespace std { template <class T> struct unique_ptr {}; }\nstruct Foo {};\nstd::unique_ptr<std::unique_ptr<Foo>> p;\n",
        );
        let pattern = fx.decl(
            DeclKind::Record(RecordDecl::default()),
            "unique_ptr",
            0,
            fx.extent(("struct unique_ptr", 0), ("{}", 0)),
        );
        let template = fx.decl(
            DeclKind::ClassTemplate {
                templated: pattern,
            },
            "unique_ptr",
            0,
            fx.extent(("template", 0), ("{}", 0)),
        );
        for decl in [pattern, template] {
            fx.edit(decl, |decl| decl.scope = "std::".to_string());
        }
        let record = fx.decl_here(DeclKind::Record(RecordDecl::default()), "Foo", 0);
        let foo = fx.ty(Type::Record {
            decl: record,
        });
        let inner = fx.ty(Type::TemplateSpecialization {
            template,
            args: vec![foo],
            specialization: None,
        });
        let outer = fx.ty(Type::TemplateSpecialization {
            template,
            args: vec![inner],
            specialization: None,
        });
        Nested {
            fx,
            foo,
            inner,
            outer,
        }
    }

    #[test]
    fn smart_pointers_keep_every_level() {
        let Nested {
            fx,
            foo,
            inner,
            outer,
        } = nested_smart_pointers();
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);
        assert_eq!(unwrap_find_type(&ctx, outer), vec![foo, inner, outer]);

        let mut settings = XrefSettings::default();
        settings.navigation.smart_pointers.clear();
        let ctx = ctx.with_settings(&settings);
        assert_eq!(unwrap_find_type(&ctx, outer), vec![outer]);
    }

    #[test]
    fn pointers_peel_but_aliases_stop_unwrapping() {
        let mut fx = Fixture::new("struct Foo {};\ntypedef Foo Alias;\n");
        let record = fx.decl_here(DeclKind::Record(RecordDecl::default()), "Foo", 0);
        let foo = fx.ty(Type::Record {
            decl: record,
        });
        let reference = fx.ty(Type::Reference {
            pointee: foo,
        });
        let pointer = fx.ty(Type::Pointer {
            pointee: reference,
        });
        let alias = fx.decl_here(
            DeclKind::TypeAlias {
                underlying: foo,
            },
            "Alias",
            0,
        );
        let alias_ty = fx.ty(Type::Typedef {
            decl: alias,
            underlying: foo,
        });
        let alias_pointer = fx.ty(Type::Pointer {
            pointee: alias_ty,
        });
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        assert_eq!(unwrap_find_type(&ctx, pointer), vec![foo]);
        assert_eq!(unwrap_find_type(&ctx, alias_pointer), vec![alias_ty]);

        let located = locate_symbol_for_type(&ctx, alias_ty);
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].name, "Alias");
    }

    #[test]
    fn go_to_type_lists_every_wrapper_level() {
        let Nested {
            mut fx,
            outer,
            ..
        } = nested_smart_pointers();
        let var = fx.decl(
            DeclKind::Var {
                ty: outer,
                definition: None,
            },
            "p",
            0,
            fx.extent(("std::unique_ptr<std::", 0), ("> p", 0)),
        );
        let root = fx.root();
        fx.decl_node(root, var);
        let at_var = fx.position("p", 0);
        let foo_position = fx.position("Foo", 0);
        let pattern_position = fx.position("unique_ptr", 0);
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let found = find_type(&ctx, at_var);
        let names: Vec<&str> = found.iter().map(|located| located.name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "unique_ptr", "unique_ptr"]);
        assert_eq!(found[0].preferred_declaration.range.start, foo_position);
        assert_eq!(found[1].preferred_declaration.range.start, pattern_position);

        assert!(find_type(&ctx, IdePosition::new(40, 0)).is_empty());
    }
