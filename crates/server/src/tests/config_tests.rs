use super::{settings_from_sources, Settings};

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    assert_eq!(settings_from_sources(None, env_from(&[])), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
        bind_addr = "0.0.0.0:9000"
        session_ttl_seconds = 60
        session_sweep_seconds = 5
        max_form_bytes = 1024
    "#;
    let settings = settings_from_sources(Some(file), env_from(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.session_ttl_seconds, 60);
    assert_eq!(settings.session_sweep_seconds, 5);
    assert_eq!(settings.max_form_bytes, 1024);
}

#[test]
fn env_overrides_file() {
    let file = r#"bind_addr = "0.0.0.0:9000""#;
    let settings = settings_from_sources(
        Some(file),
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("APP__SESSION_TTL_SECONDS", "120"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.session_ttl_seconds, 120);
}

#[test]
fn unparseable_values_keep_defaults() {
    let file = r#"session_ttl_seconds = "soon""#;
    let settings = settings_from_sources(
        Some(file),
        env_from(&[("APP__SESSION_SWEEP_SECONDS", "often")]),
    );
    let defaults = Settings::default();
    assert_eq!(settings.session_ttl_seconds, defaults.session_ttl_seconds);
    assert_eq!(settings.session_sweep_seconds, defaults.session_sweep_seconds);

    let settings = settings_from_sources(Some("not [valid toml"), env_from(&[]));
    assert_eq!(settings, defaults);
}

#[test]
fn session_ttl_converts_to_chrono() {
    let settings = Settings {
        session_ttl_seconds: 90,
        ..Settings::default()
    };
    assert_eq!(settings.session_ttl(), chrono::Duration::seconds(90));

    let huge = Settings {
        session_ttl_seconds: u64::MAX,
        ..Settings::default()
    };
    assert!(huge.session_ttl() > chrono::Duration::days(365));
}

#[test]
fn zero_session_ttl_disables_expiry() {
    let settings = settings_from_sources(Some("session_ttl_seconds = 0"), env_from(&[]));
    assert_eq!(settings.session_ttl_seconds, 0);
    assert_eq!(settings.session_ttl(), chrono::Duration::zero());
}
