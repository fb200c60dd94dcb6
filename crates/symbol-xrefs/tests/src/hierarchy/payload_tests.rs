    use serde_json::json;

    use super::*;

    #[test]
    fn type_payload_nests_its_parents() {
        let base = SymbolId::from_raw([0, 0, 0, 0, 0, 0, 0, 1]);
        let derived = SymbolId::from_raw([0, 0, 0, 0, 0, 0, 0, 2]);
        let payload = TypeHierarchyPayload {
            symbol_id: derived,
            parents: Some(vec![TypeHierarchyPayload::new(base)]),
        };

        let value = payload.to_value();
        assert_eq!(
            value,
            json!({
                "symbolID": "0000000000000002",
                "parents": [{ "symbolID": "0000000000000001" }],
            })
        );
        assert_eq!(TypeHierarchyPayload::from_value(&value), Ok(payload));
    }

    #[test]
    fn type_payload_rejects_bad_input() {
        assert_eq!(TypeHierarchyPayload::from_value(&Value::Null), Err(PayloadError::Missing));
        assert!(matches!(
            TypeHierarchyPayload::from_value(&json!({ "symbolID": "xyz" })),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(TypeHierarchyPayload::from_value(&json!([1, 2])), Err(PayloadError::Malformed(_))));
    }

    #[test]
    fn call_payload_is_the_hex_id() {
        let id = SymbolId::from_usr("c:@F@main#");
        let data = encode_call_payload(id);
        assert_eq!(data.len(), 16);
        assert_eq!(decode_call_payload(&data), Ok(id));

        assert_eq!(decode_call_payload(""), Err(PayloadError::Missing));
        assert_eq!(decode_call_payload("not-hex!"), Err(PayloadError::InvalidSymbolId("not-hex!".to_string())));
    }
