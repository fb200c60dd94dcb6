    use super::*;
    use crate::{
        ast::{ObjcMethodDecl, RecordDecl},
        fixture::Fixture,
    };

    #[test]
    fn redeclarations_share_one_definition() {
        let mut fx = Fixture::new("int f();\nint f() { return 0; }\nint f();\n");
        let definition = {
            let kind = fx.function(None);
            fx.decl(kind, "f", 1, fx.extent(("int f() {", 0), ("}", 0)))
        };
        let first = {
            let kind = fx.function(Some(definition));
            fx.decl_here(kind, "f", 0)
        };
        let third = {
            let kind = fx.function(None);
            fx.decl_here(kind, "f", 2)
        };
        fx.edit(definition, |decl| {
            decl.is_definition = true;
            decl.canonical = Some(first);
        });
        fx.edit(third, |decl| decl.canonical = Some(first));
        let unit = fx.build();

        assert_eq!(definition_of(&unit, first), Some(definition));
        assert_eq!(definition_of(&unit, definition), Some(definition));
        assert_eq!(definition_of(&unit, third), Some(definition));
        assert_eq!(preferred_decl(&unit, definition), first);
        assert_eq!(preferred_decl(&unit, third), first);
    }

    #[test]
    fn forward_declared_interfaces_prefer_their_definition() {
        let mut fx = Fixture::new("@class Widget;\n@interface Widget\n@end\n");
        let definition = fx.decl_here(
            DeclKind::ObjcInterface {
                definition: None,
                implementation: None,
                super_class: None,
                ty: None,
            },
            "Widget",
            1,
        );
        let forward = fx.decl_here(
            DeclKind::ObjcInterface {
                definition: Some(definition),
                implementation: None,
                super_class: None,
                ty: None,
            },
            "Widget",
            0,
        );
        fx.edit(definition, |decl| decl.canonical = Some(forward));
        let unit = fx.build();

        assert_eq!(preferred_decl(&unit, forward), definition);
        assert_eq!(preferred_decl(&unit, definition), definition);
        // An interface is defined by its @implementation, which this unit lacks.
        assert_eq!(definition_of(&unit, definition), None);
    }

    #[test]
    fn value_declarations_define_themselves() {
        let mut fx = Fixture::new("struct S { int field; };\nnamespace ns {}\ntypedef S Alias;\n");
        let int = fx.int();
        let field = fx.decl_here(
            DeclKind::Field {
                ty: int,
            },
            "field",
            0,
        );
        let namespace = fx.decl_here(DeclKind::Namespace, "ns", 0);
        let alias = fx.decl_here(
            DeclKind::TypeAlias {
                underlying: int,
            },
            "Alias",
            0,
        );
        let unit = fx.build();

        assert_eq!(definition_of(&unit, field), Some(field));
        assert_eq!(definition_of(&unit, namespace), None);
        assert_eq!(definition_of(&unit, alias), None);
    }

    #[test]
    fn class_templates_are_defined_by_their_pattern() {
        let mut fx = Fixture::new("template <class T> struct Box;\ntemplate <class T> struct Box {};\n");
        let defined = fx.decl_here(DeclKind::Record(RecordDecl::default()), "Box", 1);
        let forward = fx.decl_here(
            DeclKind::Record(RecordDecl {
                definition: Some(defined),
                ..RecordDecl::default()
            }),
            "Box",
            0,
        );
        let template = fx.decl_here(
            DeclKind::ClassTemplate {
                templated: forward,
            },
            "Box",
            0,
        );
        fx.edit(defined, |decl| {
            decl.is_definition = true;
            decl.canonical = Some(forward);
        });
        let unit = fx.build();

        assert_eq!(definition_of(&unit, template), Some(defined));
    }

    #[test]
    fn objc_methods_point_at_their_implementation() {
        let mut fx = Fixture::new("@interface A\n- (void)run;\n@end\n@implementation A\n- (void)run {}\n@end\n");
        let method = |definition| {
            DeclKind::ObjcMethod(ObjcMethodDecl {
                result: None,
                definition,
                container: None,
                selector_locs: Vec::new(),
                overridden: Vec::new(),
                instance: true,
            })
        };
        let implementation = fx.decl_here(method(None), "run", 1);
        fx.edit(implementation, |decl| decl.is_definition = true);
        let declaration = fx.decl_here(method(Some(implementation)), "run", 0);
        let unit = fx.build();

        assert_eq!(definition_of(&unit, declaration), Some(implementation));
        assert_eq!(definition_of(&unit, implementation), Some(implementation));
    }
