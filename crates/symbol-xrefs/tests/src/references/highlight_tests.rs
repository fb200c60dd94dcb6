    use super::*;
    use crate::{
        ast::{Access, DeclKind, ParsedUnit},
        config::XrefSettings,
        fixture::{Fixture, main_path},
    };

    fn highlight(
        probe: &Fixture,
        word: &str,
        nth: usize,
        kind: HighlightKind,
    ) -> DocumentHighlight {
        let start = probe.position(word, nth);
        let end = IdePosition::new(start.line, start.character + word.len() as u32);
        DocumentHighlight {
            range: IdeRange::new(start, end),
            kind,
        }
    }

    #[test]
    fn symbol_occurrences_carry_their_access() {
        let text = "int x;\nvoid f() { x = 1; int y = x; }\n";
        let mut fx = Fixture::new(text);
        let int = fx.int();
        let x = fx.decl(
            DeclKind::Var {
                ty: int,
                definition: None,
            },
            "x",
            0,
            fx.extent(("int x", 0), ("x;", 0)),
        );
        fx.edit(x, |decl| decl.is_definition = true);
        let root = fx.root();
        fx.decl_node(root, x);
        let write = fx.decl_ref(root, x, "x", 1);
        if let NodeKind::Expr {
            expr: ExprKind::DeclRef {
                access, ..
            },
            ..
        } = &mut fx.builder.node_mut(write).kind
        {
            *access = Access::Write;
        }
        fx.decl_ref(root, x, "x", 2);
        let at_read = fx.position("x", 2);
        let unit = fx.build();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);
        let probe = Fixture::new(text);

        assert_eq!(find_document_highlights(&ctx, at_read), vec![
            highlight(&probe, "x", 0, HighlightKind::Text),
            highlight(&probe, "x", 1, HighlightKind::Write),
            highlight(&probe, "x", 2, HighlightKind::Read),
        ]);
        assert!(find_document_highlights(&ctx, IdePosition::new(40, 0)).is_empty());
    }

    const LOOP: &str = "int f() {\n  while (1) {\n    break;\n    continue;\n    return 1;\n  }\n  return 0;\n}\n";

    fn loop_unit() -> ParsedUnit {
        let mut fx = Fixture::new(LOOP);
        let f = {
            let kind = fx.function(None);
            fx.decl(kind, "f", 0, fx.extent(("int f", 0), ("}", 1)))
        };
        fx.edit(f, |decl| decl.is_definition = true);
        let root = fx.root();
        let function = fx.decl_node(root, f);
        let body_span = fx.extent(("{", 0), ("}", 1));
        let body = fx.stmt(function, StmtKind::Compound, body_span);
        fx.builder.node_mut(function).kind = NodeKind::Decl {
            decl: f,
            body: Some(body),
        };

        let loop_span = fx.extent(("while", 0), ("}", 0));
        let while_loop = fx.stmt(
            body,
            StmtKind::While {
                cond: None,
                body: None,
            },
            loop_span,
        );
        let inner_span = fx.extent(("{", 1), ("}", 0));
        let inner = fx.stmt(while_loop, StmtKind::Compound, inner_span);
        fx.builder.node_mut(while_loop).kind = NodeKind::Stmt {
            stmt: StmtKind::While {
                cond: None,
                body: Some(inner),
            },
        };
        let span = fx.span("break", 0);
        fx.stmt(inner, StmtKind::Break, span);
        let span = fx.span("continue", 0);
        fx.stmt(inner, StmtKind::Continue, span);
        let span = fx.span("return", 0);
        fx.stmt(
            inner,
            StmtKind::Return {
                value: None,
            },
            span,
        );
        let span = fx.span("return", 1);
        fx.stmt(
            body,
            StmtKind::Return {
                value: None,
            },
            span,
        );
        fx.build()
    }

    #[test]
    fn loops_highlight_their_exits() {
        let unit = loop_unit();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);
        let probe = Fixture::new(LOOP);
        let expected = vec![
            highlight(&probe, "while", 0, HighlightKind::Text),
            highlight(&probe, "break", 0, HighlightKind::Text),
            highlight(&probe, "continue", 0, HighlightKind::Text),
            highlight(&probe, "return", 0, HighlightKind::Text),
        ];

        assert_eq!(find_document_highlights(&ctx, probe.position("break", 0)), expected);
        assert_eq!(find_document_highlights(&ctx, probe.position("while", 0)), expected);
    }

    #[test]
    fn returns_highlight_every_exit_of_the_function() {
        let unit = loop_unit();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);
        let probe = Fixture::new(LOOP);

        // Breaks of the nested loop do not leave the function.
        assert_eq!(find_document_highlights(&ctx, probe.position("return", 1)), vec![
            highlight(&probe, "return", 0, HighlightKind::Text),
            highlight(&probe, "return", 1, HighlightKind::Text),
        ]);
    }

    #[test]
    fn control_flow_can_be_turned_off() {
        let unit = loop_unit();
        let path = main_path();
        let mut settings = XrefSettings::default();
        settings.references.control_flow_highlights = false;
        let ctx = QueryContext::new(&unit, &path).with_settings(&settings);
        let probe = Fixture::new(LOOP);

        assert!(find_document_highlights(&ctx, probe.position("break", 0)).is_empty());
    }

    const SWITCH: &str = "switch (x) {\ncase 1:\ncase 2:\n  break;\ncase 3:\n  return 3;\n}\n";

    fn switch_unit() -> ParsedUnit {
        let mut fx = Fixture::new(SWITCH);
        let root = fx.root();
        let switch_span = fx.extent(("switch", 0), ("}", 0));
        let switch = fx.stmt(
            root,
            StmtKind::Switch {
                cond: None,
                body: None,
                cases: Vec::new(),
            },
            switch_span,
        );
        let body_span = fx.extent(("{", 0), ("}", 0));
        let body = fx.stmt(switch, StmtKind::Compound, body_span);
        let case = |fx: &mut Fixture, label: &str| {
            let span = fx.extent((label, 0), (label, 0));
            fx.stmt(
                body,
                StmtKind::Case {
                    lhs: None,
                    sub: None,
                },
                span,
            )
        };
        let first = case(&mut fx, "case 1:");
        let second = case(&mut fx, "case 2:");
        let span = fx.span("break", 0);
        let exit = fx.stmt(body, StmtKind::Break, span);
        let third = case(&mut fx, "case 3:");
        let span = fx.span("return", 0);
        let ret = fx.stmt(
            body,
            StmtKind::Return {
                value: None,
            },
            span,
        );
        for (case, sub) in [(first, second), (second, exit), (third, ret)] {
            fx.builder.node_mut(case).kind = NodeKind::Stmt {
                stmt: StmtKind::Case {
                    lhs: None,
                    sub: Some(sub),
                },
            };
        }
        fx.builder.node_mut(switch).kind = NodeKind::Stmt {
            stmt: StmtKind::Switch {
                cond: None,
                body: Some(body),
                cases: vec![first, second, third],
            },
        };
        fx.build()
    }

    #[test]
    fn breaks_in_a_switch_stay_within_their_case() {
        let unit = switch_unit();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);
        let probe = Fixture::new(SWITCH);

        // `case 1: case 2:` fall through into one case.
        assert_eq!(find_document_highlights(&ctx, probe.position("break", 0)), vec![
            highlight(&probe, "switch", 0, HighlightKind::Text),
            highlight(&probe, "case", 0, HighlightKind::Text),
            highlight(&probe, "case", 1, HighlightKind::Text),
            highlight(&probe, "break", 0, HighlightKind::Text),
        ]);
        assert_eq!(find_document_highlights(&ctx, probe.position("case", 2)), vec![
            highlight(&probe, "switch", 0, HighlightKind::Text),
            highlight(&probe, "case", 2, HighlightKind::Text),
            highlight(&probe, "return", 0, HighlightKind::Text),
        ]);
    }
