use std::fs;

use toml::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub session_ttl_seconds: u64,
    pub session_sweep_seconds: u64,
    pub max_form_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            session_ttl_seconds: 24 * 60 * 60,
            session_sweep_seconds: 300,
            max_form_bytes: 64 * 1024,
        }
    }
}

impl Settings {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(std::time::Duration::from_secs(self.session_ttl_seconds))
            .unwrap_or_else(|_| chrono::Duration::days(365 * 100))
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string("server.toml").ok();
    settings_from_sources(file.as_deref(), |key| std::env::var(key).ok())
}

/// Layers `server.toml` contents and then environment variables over the
/// defaults. Values that do not parse are skipped.
pub(crate) fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(table) = file.and_then(|raw| toml::from_str::<Table>(raw).ok()) {
        if let Some(v) = table.get("bind_addr").and_then(|v| v.as_str()) {
            settings.server_bind = v.to_string();
        }
        if let Some(v) = table_u64(&table, "session_ttl_seconds") {
            settings.session_ttl_seconds = v;
        }
        if let Some(v) = table_u64(&table, "session_sweep_seconds") {
            settings.session_sweep_seconds = v;
        }
        if let Some(v) = table_u64(&table, "max_form_bytes") {
            settings.max_form_bytes = v as usize;
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__SESSION_TTL_SECONDS").and_then(|v| v.parse().ok()) {
        settings.session_ttl_seconds = v;
    }
    if let Some(v) = env("APP__SESSION_SWEEP_SECONDS").and_then(|v| v.parse().ok()) {
        settings.session_sweep_seconds = v;
    }
    if let Some(v) = env("APP__MAX_FORM_BYTES").and_then(|v| v.parse().ok()) {
        settings.max_form_bytes = v;
    }

    settings
}

fn table_u64(table: &Table, key: &str) -> Option<u64> {
    table
        .get(key)
        .and_then(|v| v.as_integer())
        .and_then(|v| u64::try_from(v).ok())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
