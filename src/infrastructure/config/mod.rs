//! Run configuration resolved from the `analyzer.config.json` auxiliary input

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::generation::{AdditionalText, GenerationError, find_additional_text};

/// Sentinel file name that marks the run configuration
pub const CONFIG_FILE_NAME: &str = "analyzer.config.json";

/// Per-run generator configuration.
///
/// Every field is optional; an unset field switches off the pipeline that
/// depends on it without reporting anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(rename = "JsonSchema", default)]
    pub schema_file_name: Option<String>,
    #[serde(rename = "ControllerServicesNamespace", default)]
    pub services_namespace: Option<String>,
    #[serde(rename = "TargetProject", default)]
    pub target_namespace: Option<String>,
}

impl RunConfig {
    /// Parse a config document, attributing failures to `path`
    pub fn from_json(path: &str, text: &str) -> Result<Self, GenerationError> {
        serde_json::from_str(text).map_err(|e| GenerationError::config_malformed(path, e))
    }

    pub fn schema_file_name(&self) -> Option<&str> {
        non_empty(&self.schema_file_name)
    }

    pub fn services_namespace(&self) -> Option<&str> {
        non_empty(&self.services_namespace)
    }

    pub fn target_namespace(&self) -> Option<&str> {
        non_empty(&self.target_namespace)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Locate and deserialize the run configuration.
///
/// Returns `Ok(None)` when no auxiliary input ends with [`CONFIG_FILE_NAME`].
pub fn resolve_config(texts: &[AdditionalText]) -> Result<Option<RunConfig>, GenerationError> {
    let Some(config_text) = find_additional_text(texts, CONFIG_FILE_NAME) else {
        debug!("No {} among {} additional texts", CONFIG_FILE_NAME, texts.len());
        return Ok(None);
    };

    let matches = texts
        .iter()
        .filter(|text| text.path.ends_with(CONFIG_FILE_NAME))
        .count();
    if matches > 1 {
        warn!(
            path = %config_text.path,
            matches,
            "Multiple analyzer configs found, using the first"
        );
    }

    let config = RunConfig::from_json(&config_text.path, &config_text.text)?;
    debug!(
        path = %config_text.path,
        schema = ?config.schema_file_name(),
        namespace = ?config.services_namespace(),
        target = ?config.target_namespace(),
        "Resolved analyzer config"
    );

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_text(text: &str) -> AdditionalText {
        AdditionalText::new("/repo/app/analyzer.config.json", text)
    }

    #[test]
    fn test_resolve_config_missing() {
        let texts = vec![AdditionalText::new("/repo/app/services.json", "[]")];
        assert_eq!(resolve_config(&texts).unwrap(), None);
    }

    #[test]
    fn test_resolve_config_all_fields() {
        let texts = vec![config_text(
            r#"{ "JsonSchema": "services.json", "ControllerServicesNamespace": "acme::services", "TargetProject": "acme_api" }"#,
        )];

        let config = resolve_config(&texts).unwrap().unwrap();
        assert_eq!(config.schema_file_name(), Some("services.json"));
        assert_eq!(config.services_namespace(), Some("acme::services"));
        assert_eq!(config.target_namespace(), Some("acme_api"));
    }

    #[test]
    fn test_resolve_config_empty_object_disables_everything() {
        let config = resolve_config(&[config_text("{}")]).unwrap().unwrap();
        assert_eq!(config, RunConfig::default());
        assert!(config.schema_file_name().is_none());
        assert!(config.services_namespace().is_none());
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = resolve_config(&[config_text(
            r#"{ "JsonSchema": "", "ControllerServicesNamespace": "   ", "TargetProject": null }"#,
        )])
        .unwrap()
        .unwrap();

        assert!(config.schema_file_name().is_none());
        assert!(config.services_namespace().is_none());
        assert!(config.target_namespace().is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = resolve_config(&[config_text(r#"{ "Verbose": true, "JsonSchema": "s.json" }"#)])
            .unwrap()
            .unwrap();
        assert_eq!(config.schema_file_name(), Some("s.json"));
    }

    #[test]
    fn test_resolve_config_malformed() {
        for text in ["", "{ not json", "null", "\"text\"", r#"{ "JsonSchema": 42 }"#] {
            let err = resolve_config(&[config_text(text)]).unwrap_err();
            match err {
                GenerationError::ConfigMalformed { path, .. } => {
                    assert_eq!(path, "/repo/app/analyzer.config.json")
                }
                other => panic!("Expected ConfigMalformed for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_first_config_wins() {
        let texts = vec![
            AdditionalText::new("a/analyzer.config.json", r#"{ "JsonSchema": "first.json" }"#),
            AdditionalText::new("b/analyzer.config.json", r#"{ "JsonSchema": "second.json" }"#),
        ];
        let config = resolve_config(&texts).unwrap().unwrap();
        assert_eq!(config.schema_file_name(), Some("first.json"));
    }
}
