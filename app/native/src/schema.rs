//! JSON Schema generation for configuration and trace files.

use crate::config::FrostpaneConfig;
use crate::trace::Trace;

/// Base URL schemas are published under.
const SCHEMA_BASE_URL: &str = "https://raw.githubusercontent.com/frostpane/frostpane/main/schemas";

/// Generates a JSON Schema for the Frostpane configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    with_id(schemars::schema_for!(FrostpaneConfig), "frostpane.schema.json")
}

/// Generates a JSON Schema for trace files.
#[must_use]
pub fn generate_trace_schema() -> schemars::Schema {
    with_id(schemars::schema_for!(Trace), "frostpane-trace.schema.json")
}

fn with_id(mut schema: schemars::Schema, file_name: &str) -> schemars::Schema {
    // Add $id for proper schema identification
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(format!("{SCHEMA_BASE_URL}/{file_name}")));
    }
    schema
}

/// Returns the configuration schema as pretty-printed JSON.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

/// Returns the trace schema as pretty-printed JSON.
#[must_use]
pub fn print_trace_schema() -> String {
    serde_json::to_string_pretty(&generate_trace_schema()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_schema_produces_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(&print_schema()).unwrap();

        assert!(parsed["$id"].as_str().unwrap().ends_with("frostpane.schema.json"));
        assert_eq!(parsed["$schema"], "https://json-schema.org/draft/2020-12/schema");
        assert_eq!(parsed["title"], "FrostpaneConfig");
        assert!(parsed["properties"]["animationSpeed"].is_object());
        assert!(parsed["properties"]["frozenApp"].is_object());
    }

    #[test]
    fn test_schema_contains_frozen_app_config() {
        let parsed: serde_json::Value = serde_json::from_str(&print_schema()).unwrap();
        let frozen = &parsed["$defs"]["FrozenAppConfig"];
        assert!(frozen.is_object());
        assert!(frozen["properties"]["fadeInMs"].is_object());
    }

    #[test]
    fn test_trace_schema_lists_events() {
        let json = print_trace_schema();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["title"], "Trace");
        assert!(json.contains("setUnresponsive"));
        assert!(json.contains("finishTransients"));
    }

    #[test]
    fn test_schema_id_is_url() {
        let schema = generate_schema();
        let id = schema.as_object().unwrap()["$id"].as_str().unwrap().to_string();
        assert!(id.starts_with("https://"));
    }

    #[test]
    fn test_schema_json_is_pretty_printed() {
        assert!(print_schema().contains('\n'));
    }
}
