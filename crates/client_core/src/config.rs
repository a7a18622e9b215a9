use std::{fs, path::Path, path::PathBuf};

use crate::bootstrap::FailurePolicy;

pub const DEFAULT_CONFIG_FILE: &str = "cipherkit.toml";
const ENV_PREFIX: &str = "CIPHERKIT__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Explicit module location: http(s) URL, file URL or plain path.
    pub module_location: Option<String>,
    /// Page URL the module is resolved against when no explicit location is set.
    pub page_location: Option<String>,
    pub retry_failed_bootstrap: bool,
    pub preferences_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            module_location: None,
            page_location: None,
            retry_failed_bootstrap: false,
            preferences_path: None,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.retry_failed_bootstrap {
            FailurePolicy::Retry
        } else {
            FailurePolicy::Sticky
        }
    }
}

/// Defaults, then the config file (if readable), then `CIPHERKIT__*` variables.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if let Ok(raw) = fs::read_to_string(path) {
        apply_file_overrides(&mut settings, &raw);
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

/// Unknown keys and values of the wrong type are ignored.
pub fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(table) = toml::from_str::<toml::Table>(raw) else {
        return;
    };

    if let Some(v) = table.get("module_location").and_then(|v| v.as_str()) {
        settings.module_location = Some(v.to_string());
    }
    if let Some(v) = table.get("page_location").and_then(|v| v.as_str()) {
        settings.page_location = Some(v.to_string());
    }
    match table.get("retry_failed_bootstrap") {
        Some(toml::Value::Boolean(v)) => settings.retry_failed_bootstrap = *v,
        Some(toml::Value::String(v)) => {
            if let Some(parsed) = parse_flag(v) {
                settings.retry_failed_bootstrap = parsed;
            }
        }
        _ => {}
    }
    if let Some(v) = table.get("preferences_path").and_then(|v| v.as_str()) {
        settings.preferences_path = Some(PathBuf::from(v));
    }
    if let Some(v) = table.get("log_filter").and_then(|v| v.as_str()) {
        settings.log_filter = v.to_string();
    }
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |key: &str| {
        lookup(&format!("{ENV_PREFIX}{key}")).filter(|value| !value.trim().is_empty())
    };

    if let Some(v) = var("MODULE_LOCATION") {
        settings.module_location = Some(v);
    }
    if let Some(v) = var("PAGE_LOCATION") {
        settings.page_location = Some(v);
    }
    if let Some(v) = var("RETRY_FAILED_BOOTSTRAP") {
        if let Some(parsed) = parse_flag(&v) {
            settings.retry_failed_bootstrap = parsed;
        }
    }
    if let Some(v) = var("PREFERENCES_PATH") {
        settings.preferences_path = Some(PathBuf::from(v));
    }
    if let Some(v) = var("LOG_FILTER") {
        settings.log_filter = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
