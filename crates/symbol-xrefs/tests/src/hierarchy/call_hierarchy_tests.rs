    use super::*;
    use crate::{
        fixture::{Fixture, MAIN_PATH, index_loc, main_path},
        index::{MemIndex, Ref, SymbolKind},
    };

    const CALLS: &str = "int f();\nvoid g() { int local; f(); }\n";

    fn calls_unit() -> ParsedUnit {
        let mut fx = Fixture::new(CALLS);
        let f = {
            let kind = fx.function(None);
            fx.decl_here(kind, "f", 0)
        };
        let g = {
            let kind = fx.function(None);
            fx.decl(kind, "g", 0, fx.extent(("void", 0), ("}", 0)))
        };
        fx.edit(g, |decl| decl.is_definition = true);
        let int = fx.int();
        let local = fx.decl_here(
            DeclKind::Var {
                ty: int,
                definition: None,
            },
            "local",
            0,
        );
        fx.edit(local, |decl| decl.function_local = true);
        let root = fx.root();
        fx.decl_node(root, f);
        let body = fx.decl_node(root, g);
        fx.decl_node(body, local);
        fx.decl_ref(body, f, "f", 1);
        fx.build()
    }

    fn function(
        name: &str,
        uri: &str,
        line: u32,
    ) -> Symbol {
        let mut symbol = Symbol::new(SymbolId::from_usr(&format!("c:@{name}")), name, SymbolKind::Function);
        symbol.definition = index_loc(uri, line, 5, 1);
        symbol
    }

    fn reference(
        uri: &str,
        line: u32,
        column: u32,
        container: Option<&str>,
    ) -> Ref {
        Ref {
            location: index_loc(uri, line, column, 1),
            kind: RefKind::REFERENCE,
            container: container.map(|name| SymbolId::from_usr(&format!("c:@{name}"))),
        }
    }

    fn range(
        line: u32,
        column: u32,
    ) -> IdeRange {
        IdeRange::new(IdePosition::new(line, column), IdePosition::new(line, column + 1))
    }

    fn item_at(
        unit: &ParsedUnit,
        position: IdePosition,
    ) -> CallHierarchyItem {
        let path = main_path();
        let ctx = QueryContext::new(unit, &path);
        let mut items = prepare_call_hierarchy(&ctx, position);
        assert_eq!(items.len(), 1);
        items.remove(0)
    }

    #[test]
    fn prepares_callables_but_not_locals() {
        let unit = calls_unit();
        let path = main_path();
        let ctx = QueryContext::new(&unit, &path);

        let item = item_at(&unit, IdePosition::new(1, 22));
        assert_eq!(item.item.name, "f");
        assert_eq!(item.item.file_path, Path::new(MAIN_PATH));
        assert_eq!(item.item.selection_range, range(0, 4));
        assert_eq!(item.data, SymbolId::from_usr("c:@f").to_hex());

        assert!(prepare_call_hierarchy(&ctx, IdePosition::new(1, 16)).is_empty());
        assert!(prepare_call_hierarchy(&ctx, IdePosition::new(7, 0)).is_empty());
    }

    #[test]
    fn incoming_calls_group_sites_by_caller() {
        let unit = calls_unit();
        let item = item_at(&unit, IdePosition::new(0, 4));
        let index = MemIndex::new();
        index.insert_symbol(function("g", "file:///work/src/caller.cc", 1));
        index.insert_symbol(function("h", "file:///work/src/other.cc", 0));
        let f = SymbolId::from_usr("c:@f");
        index.insert_ref(f, reference("file:///work/src/caller.cc", 5, 2, Some("g")));
        index.insert_ref(f, reference("file:///work/src/caller.cc", 3, 2, Some("g")));
        index.insert_ref(f, reference("file:///work/src/elsewhere.cc", 1, 0, Some("g")));
        index.insert_ref(f, reference("file:///work/src/other.cc", 2, 4, Some("h")));
        index.insert_ref(f, reference("file:///work/src/global.cc", 0, 0, None));

        let calls = incoming_calls(&item, Some(&index));
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].from.item.name, "g");
        assert_eq!(calls[0].from.data, SymbolId::from_usr("c:@g").to_hex());
        assert_eq!(calls[0].from_ranges, vec![range(3, 2), range(5, 2)]);
        assert_eq!(calls[1].from.item.name, "h");
        assert_eq!(calls[1].from_ranges, vec![range(2, 4)]);

        assert!(incoming_calls(&item, None).is_empty());
    }

    #[test]
    fn outgoing_calls_report_sites_in_the_callers_file() {
        let unit = calls_unit();
        let item = item_at(&unit, IdePosition::new(1, 5));
        assert_eq!(item.item.name, "g");
        let index = MemIndex::new();
        index.insert_symbol(function("f", "file:///work/include/f.h", 0));
        index.insert_symbol(function("h", "file:///work/src/other.cc", 0));
        index.insert_ref(SymbolId::from_usr("c:@f"), reference("file:///work/src/main.cc", 1, 22, Some("g")));
        index.insert_ref(SymbolId::from_usr("c:@h"), reference("file:///work/src/other.cc", 8, 0, Some("g")));

        let calls = outgoing_calls(&item, Some(&index));
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].to.item.name, "f");
        assert_eq!(calls[0].from_ranges, vec![range(1, 22)]);
        assert_eq!(calls[1].to.item.name, "h");
        assert!(calls[1].from_ranges.is_empty());
    }

    #[test]
    fn items_without_a_usable_payload_have_no_calls() {
        let unit = calls_unit();
        let index = MemIndex::new();
        let mut item = item_at(&unit, IdePosition::new(0, 4));

        item.data = String::new();
        assert!(incoming_calls(&item, Some(&index)).is_empty());
        item.data = "zz".to_string();
        assert!(outgoing_calls(&item, Some(&index)).is_empty());
    }
