use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use shared::protocol::{ASK_PATH, DEFAULT_ENDPOINT};
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "docask.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub request_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

impl Settings {
    pub fn set_endpoint(&mut self, raw: &str) {
        match normalize_endpoint(raw) {
            Some(endpoint) => self.endpoint = endpoint,
            None => warn!(endpoint = raw, "ignoring invalid endpoint; keeping {}", self.endpoint),
        }
    }

    /// Zero disables the timeout.
    pub fn set_timeout_secs(&mut self, secs: u64) {
        self.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    fn set_timeout_raw(&mut self, raw: &str) {
        match raw.trim().parse::<u64>() {
            Ok(secs) => self.set_timeout_secs(secs),
            Err(_) => warn!(timeout_secs = raw, "ignoring non-numeric timeout"),
        }
    }
}

pub fn load_settings(path: Option<&Path>) -> Settings {
    load_settings_with(path.unwrap_or_else(|| Path::new(SETTINGS_FILE)), |key| {
        std::env::var(key).ok()
    })
}

/// File values first, then environment; later sources win.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.endpoint {
                    settings.set_endpoint(&v);
                }
                if let Some(v) = file_cfg.timeout_secs {
                    settings.set_timeout_secs(v);
                }
            }
            Err(err) => warn!(path = %path.display(), "ignoring unreadable settings file: {err}"),
        }
    }

    for key in ["DOCASK_ENDPOINT", "APP__ENDPOINT"] {
        if let Some(v) = env(key) {
            settings.set_endpoint(&v);
        }
    }
    for key in ["DOCASK_TIMEOUT_SECS", "APP__TIMEOUT_SECS"] {
        if let Some(v) = env(key) {
            settings.set_timeout_raw(&v);
        }
    }

    settings
}

/// Accepts a full ask URL or a bare service base URL, which gets the ask path.
pub(crate) fn normalize_endpoint(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(ASK_PATH);
    }
    Some(url.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
