use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_DATA_URL: &str = "./assets/malrad_protocols.json";
pub const DEFAULT_SERVICE_WORKER_URL: &str = "./sw.js";

/// Runtime settings.
///
/// Resolved in three layers: built-in defaults, then an optional JSON block
/// embedded in the page (`<script type="application/json" id="app-config">`),
/// then the page query string, e.g. `?data=./test.json&sw=off&log=debug&hl=off`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub data_url: String,
    pub service_worker_url: String,
    pub register_service_worker: bool,
    /// How long the copy button shows its outcome before reverting.
    pub copy_feedback_ms: u64,
    pub highlight_by_default: bool,
    /// `tracing` filter directive.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            service_worker_url: DEFAULT_SERVICE_WORKER_URL.to_string(),
            register_service_worker: true,
            copy_feedback_ms: 1200,
            highlight_by_default: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Missing fields keep their defaults. A blank or absent block is the
    /// default config.
    pub fn from_embedded(embedded: Option<&str>) -> Result<Self> {
        let Some(json) = embedded.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };
        Ok(serde_json::from_str(json)?)
    }

    /// Applies overrides from a `location.search` string (leading `?` optional).
    /// Unknown keys and unparsable values are ignored.
    pub fn with_query(self, search: &str) -> Self {
        let mut config = self;
        for pair in search.trim_start_matches('?').split('&') {
            let Some((key, raw)) = pair.split_once('=') else {
                continue;
            };
            let Ok(value) = urlencoding::decode(raw) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "data" => config.data_url = value.to_string(),
                "sw" => match flag(value) {
                    Some(enabled) => config.register_service_worker = enabled,
                    None => config.service_worker_url = value.to_string(),
                },
                "hl" => {
                    if let Some(enabled) = flag(value) {
                        config.highlight_by_default = enabled;
                    }
                }
                "copy_ms" => {
                    if let Ok(ms) = value.parse() {
                        config.copy_feedback_ms = ms;
                    }
                }
                "log" => config.log_level = value.to_string(),
                _ => {}
            }
        }
        config
    }
}

fn flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" | "yes" => Some(true),
        "off" | "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gives_defaults() {
        assert_eq!(AppConfig::default().with_query(""), AppConfig::default());
        assert_eq!(AppConfig::default().with_query("?"), AppConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config =
            AppConfig::default().with_query("?data=.%2Fdemo.json&sw=off&hl=0&log=debug&copy_ms=500&x=1");
        assert_eq!(config.data_url, "./demo.json");
        assert!(!config.register_service_worker);
        assert!(!config.highlight_by_default);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.copy_feedback_ms, 500);
    }

    #[test]
    fn sw_accepts_a_path() {
        let config = AppConfig::default().with_query("sw=./worker.js");
        assert!(config.register_service_worker);
        assert_eq!(config.service_worker_url, "./worker.js");
    }

    #[test]
    fn bad_values_are_ignored() {
        let config = AppConfig::default().with_query("copy_ms=soon&hl=maybe&data=");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn embedded_block_fills_in_over_defaults() {
        let config = AppConfig::from_embedded(Some(r#"{"copy_feedback_ms": 800}"#)).unwrap();
        assert_eq!(config.copy_feedback_ms, 800);
        assert_eq!(config.data_url, DEFAULT_DATA_URL);
    }

    #[test]
    fn missing_block_gives_defaults_and_malformed_is_an_error() {
        assert_eq!(AppConfig::from_embedded(None).unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_embedded(Some("  ")).unwrap(), AppConfig::default());
        assert!(AppConfig::from_embedded(Some("{nope")).is_err());
    }

    #[test]
    fn query_wins_over_embedded_block() {
        let config = AppConfig::from_embedded(Some(
            r#"{"data_url": "./a.json", "log_level": "warn"}"#,
        ))
        .unwrap()
        .with_query("?data=./b.json");
        assert_eq!(config.data_url, "./b.json");
        assert_eq!(config.log_level, "warn");
    }
}
