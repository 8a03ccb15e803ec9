use actix_csp_nonce::core::{CspDefaults, DirectiveName, NoSettings, ResolvedPolicy};
use actix_csp_nonce::CollectingSink;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

fn settings(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("settings fixture must be an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_settings_gives_builtin_defaults() {
        let defaults = CspDefaults::from_settings(&NoSettings);
        assert_eq!(defaults, CspDefaults::builtin());
        assert_eq!(defaults.directives().len(), 6);
        assert!(defaults.nonces_for().is_empty());
        assert!(!defaults.report_only());
    }

    #[test]
    fn test_settings_override_builtin_defaults() {
        let defaults = CspDefaults::from_settings(&settings(json!({
            "directives": { "default-src": ["'self'"], "report-uri": "/csp" },
            "report_only": true,
        })));

        assert_eq!(defaults.directives().len(), 2);
        assert!(defaults.directives().contains(&DirectiveName::REPORT_URI));
        assert!(defaults.report_only());
        assert!(defaults.nonces_for().is_empty());
    }

    #[test]
    fn test_malformed_setting_falls_back_per_key() {
        let defaults = CspDefaults::from_settings(&settings(json!({
            "directives": "not a map",
            "report_only": true,
        })));

        assert_eq!(defaults.directives(), CspDefaults::builtin().directives());
        assert!(defaults.report_only());
    }

    #[test]
    fn test_hash_map_settings() {
        let mut store: HashMap<String, Value> = HashMap::new();
        store.insert("nonces_for".to_string(), json!(["script-src"]));

        let defaults = CspDefaults::from_settings(&store);
        assert_eq!(defaults.nonces_for(), ["script-src".to_string()]);
    }

    #[test]
    fn test_caller_config_overrides_settings() {
        let sink = CollectingSink::new();
        let defaults = CspDefaults::from_settings(&settings(json!({
            "directives": { "default-src": ["'self'"] },
            "report_only": true,
        })));

        let resolved = defaults.resolve(json!({ "report_only": false }), &sink);
        let header = resolved.precomputed().unwrap();
        assert_eq!(header.name(), "content-security-policy");
        assert_eq!(header.value(), "default-src 'self';");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_settings_nonces_make_resolution_deferred() {
        let sink = CollectingSink::new();
        let defaults = CspDefaults::from_settings(&settings(json!({ "nonces_for": "style-src" })));

        let resolved = defaults.resolve(json!({}), &sink);
        assert!(matches!(resolved, ResolvedPolicy::Deferred(ref c) if c.nonces_for() == ["style-src".to_string()]));
    }

    #[test]
    fn test_invalid_config_falls_back_to_settings_defaults() {
        let sink = CollectingSink::new();
        let defaults = CspDefaults::from_settings(&settings(json!({
            "directives": { "default-src": ["'self'"] },
        })));

        let resolved = defaults.resolve(json!(3.5), &sink);
        assert_eq!(resolved.precomputed().unwrap().value(), "default-src 'self';");
        assert_eq!(sink.len(), 1);
    }
}
