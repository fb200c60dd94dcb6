    use super::*;
    use crate::ast::builder::UnitBuilder;

    #[test]
    fn likely_identifier_heuristics() {
        assert!(is_likely_identifier("snake_case", "", ""));
        assert!(is_likely_identifier("lowerCamel", "", ""));
        assert!(is_likely_identifier("foo", "see `", "` here"));
        assert!(is_likely_identifier("foo", "ns::", ""));
        assert!(is_likely_identifier("foo", "", "::bar"));
        assert!(is_likely_identifier("foo", "// \\p ", ""));
        assert!(is_likely_identifier("foo", "/// @param[in] ", ""));
        assert!(!is_likely_identifier("foo", "// the ", " thing"));
        assert!(!is_likely_identifier("Foo", "", ""));
        assert!(!is_likely_identifier("", "", ""));
    }

    #[test]
    fn visible_namespaces_tracks_nesting_and_using_directives() {
        let code = "namespace a { namespace b { using namespace c; } }\n\
                    namespace a::b {\n\
                    using namespace ::d;\n\
                    void f() {";
        assert_eq!(visible_namespaces(code), vec!["a::b::", "", "a::", "a::b::c::", "a::c::", "c::", "d::"]);
    }

    #[test]
    fn visible_namespaces_ignores_closed_and_aliased_namespaces() {
        let code = "namespace x { int y; }\nnamespace z = x;\nnamespace {\n";
        assert_eq!(visible_namespaces(code), vec![""]);
    }

    #[test]
    fn touching_word_on_identifier_token() {
        let unit = UnitBuilder::new("/src/main.cc", "int counter = 1;").build();
        let word = SpelledWord::touching(&unit, 6).expect("word");
        assert_eq!(word.text, "counter");
        assert_eq!(word.offset, 4);
        assert!(word.likely_identifier);
        assert!(word.expanded);
        assert!(word.spelled_token.is_some());
    }

    #[test]
    fn touching_word_inside_comment_uses_raw_text() {
        let text = "// calls do_work\nint x;";
        let unit = UnitBuilder::new("/src/main.cc", text).build();
        let offset = text.find("do_work").expect("needle") as u32 + 2;
        let word = SpelledWord::touching(&unit, offset).expect("word");
        assert_eq!(word.text, "do_work");
        assert!(word.likely_identifier);
        assert!(!word.expanded);
        assert!(word.spelled_token.is_none());
    }

    #[test]
    fn touching_word_inside_string_literal() {
        let text = "const char *s = \"get_value\";";
        let unit = UnitBuilder::new("/src/main.cc", text).build();
        let offset = text.find("get_value").expect("needle") as u32 + 1;
        let word = SpelledWord::touching(&unit, offset).expect("word");
        assert_eq!(word.text, "get_value");
        assert!(word.in_string_literal());
    }

    #[test]
    fn plain_keywords_are_not_likely_identifiers() {
        let text = "// return_ and while\n";
        let unit = UnitBuilder::new("/src/main.cc", text).build();
        let offset = text.find("while").expect("needle") as u32;
        let word = SpelledWord::touching(&unit, offset).expect("word");
        assert!(!word.likely_identifier);
    }
