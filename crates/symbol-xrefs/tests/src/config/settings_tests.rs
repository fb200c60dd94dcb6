use serde_json::json;

use super::*;

#[test]
fn parses_namespaced_payload() {
    let payload = json!({
        "symbol-xrefs": {
            "navigation": {
                "nearbyIdentifier": false,
                "textualMaxCandidates": 3,
                "smartPointers": ["::my::owned_ptr", " std::unique_ptr "]
            },
            "references": {
                "limit": 50,
                "containerNames": false
            },
            "hierarchy": {
                "resolveLevels": 4
            },
            "logging": {
                "level": "debug"
            }
        }
    });

    let settings = XrefSettings::from_payload(Some(&payload));
    assert!(!settings.navigation.nearby_identifier);
    assert_eq!(settings.navigation.textual_max_candidates, 3);
    assert_eq!(settings.navigation.smart_pointers, vec!["my::owned_ptr", "std::unique_ptr"]);
    assert!(settings.navigation.is_smart_pointer("my::owned_ptr"));
    assert_eq!(settings.references.limit, 50);
    assert!(!settings.references.container_names);
    assert_eq!(settings.hierarchy.resolve_levels, 4);
    assert_eq!(settings.logging.level, LogLevel::Debug);
}

#[test]
fn defaults_match_textual_fallback_thresholds() {
    let settings = XrefSettings::default();
    assert_eq!(settings.navigation.textual_max_candidates, 5);
    assert_eq!(settings.navigation.textual_query_limit, 10);
    assert!(settings.navigation.is_smart_pointer("std::shared_ptr"));
}

#[test]
fn clamps_numeric_values() {
    let payload = json!({
        "navigation": { "textualMaxCandidates": 0, "textualQueryLimit": 100000 },
        "references": { "limit": 0 },
        "hierarchy": { "resolveLevels": 999 },
        "logging": { "perfSummaryInterval": 0 }
    });
    let settings = XrefSettings::from_payload(Some(&payload));
    assert_eq!(settings.navigation.textual_max_candidates, MIN_TEXTUAL_CANDIDATES);
    assert_eq!(settings.navigation.textual_query_limit, MAX_TEXTUAL_QUERY_LIMIT);
    assert_eq!(settings.references.limit, MIN_REFERENCE_LIMIT);
    assert_eq!(settings.hierarchy.resolve_levels, MAX_RESOLVE_LEVELS);
    assert_eq!(settings.logging.perf_summary_interval, MIN_PERF_SUMMARY_INTERVAL);
}

#[test]
fn preserves_existing_values_when_payload_is_partial() {
    let base = XrefSettings::from_payload(Some(&json!({ "references": { "limit": 20 } })));
    let merged = base.merged_with_payload(&json!({ "navigation": { "textualFallback": false }, "unknownKey": 1 }));
    assert_eq!(merged.references.limit, 20);
    assert!(!merged.navigation.textual_fallback);
}

#[test]
fn parses_toml_documents() {
    let text = r#"
[navigation]
nearbyIdentifier = false
textualQueryLimit = 25

[hierarchy]
resolveLevels = 2
"#;
    let settings = XrefSettings::from_toml_str(text).expect("valid toml");
    assert!(!settings.navigation.nearby_identifier);
    assert_eq!(settings.navigation.textual_query_limit, 25);
    assert_eq!(settings.hierarchy.resolve_levels, 2);
    assert!(XrefSettings::from_toml_str("navigation = [").is_err());
}
