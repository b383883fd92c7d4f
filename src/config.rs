use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const MAX_IDLE_TIMEOUT_MS: u64 = 86_400_000;

/// All configurable settings with their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub daemon_idle_timeout_ms: u64,
    pub events_log_every: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daemon_idle_timeout_ms: 1_800_000,
            events_log_every: 50,
        }
    }
}

/// Raw JSON representation — all fields optional for partial overrides.
#[derive(Debug, Deserialize, Default)]
struct SettingsFile {
    #[serde(rename = "daemon.idleTimeoutMs")]
    daemon_idle_timeout_ms: Option<u64>,
    #[serde(rename = "events.logEvery")]
    events_log_every: Option<u64>,
}

/// Data directory holding the socket, pid file, preference store, and
/// settings. `BLOCKWATCH_HOME` overrides the default `~/.blockwatch`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BLOCKWATCH_HOME") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".blockwatch")
}

/// Resolve settings: defaults → data-dir settings.json.
pub fn resolve() -> Settings {
    resolve_with_path(Some(&data_dir().join("settings.json")))
}

/// Testable resolver that accepts an explicit file path (no home dir
/// dependency).
fn resolve_with_path(path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    if let Some(path) = path {
        apply_file(&mut settings, path);
    }

    settings
}

fn apply_file(settings: &mut Settings, path: &Path) {
    let Ok(content) = std::fs::read_to_string(path) else { return };
    let Ok(file) = serde_json::from_str::<SettingsFile>(&content) else {
        tracing::warn!("Invalid settings file, ignoring: {}", path.display());
        return;
    };
    if let Some(v) = file.daemon_idle_timeout_ms {
        if v >= 60_000 && v <= MAX_IDLE_TIMEOUT_MS {
            settings.daemon_idle_timeout_ms = v;
        } else {
            tracing::warn!(
                "daemon.idleTimeoutMs ({}) out of range (60000..{}), using default",
                v, MAX_IDLE_TIMEOUT_MS
            );
        }
    }
    if let Some(v) = file.events_log_every {
        if v >= 1 && v <= 10_000 {
            settings.events_log_every = v;
        } else {
            tracing::warn!(
                "events.logEvery ({}) out of range (1..10000), using default",
                v
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_no_file_exists() {
        let settings = resolve_with_path(None);
        assert_eq!(settings.daemon_idle_timeout_ms, 1_800_000);
        assert_eq!(settings.events_log_every, 50);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        std::fs::write(&file, r#"{"daemon.idleTimeoutMs": 600000}"#).unwrap();

        let settings = resolve_with_path(Some(&file));
        assert_eq!(settings.daemon_idle_timeout_ms, 600_000);
        assert_eq!(settings.events_log_every, 50); // unchanged
    }

    #[test]
    fn test_invalid_json_ignored() {
        let dir = tempdir().unwrap();
        let bad_file = dir.path().join("bad.json");
        std::fs::write(&bad_file, "not json {{{").unwrap();

        let settings = resolve_with_path(Some(&bad_file));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_file_ignored() {
        let settings = resolve_with_path(Some(Path::new("/nonexistent/settings.json")));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        std::fs::write(&file, r#"{"events.logEvery": 10, "unknown.key": true}"#).unwrap();

        let settings = resolve_with_path(Some(&file));
        assert_eq!(settings.events_log_every, 10);
    }

    #[test]
    fn test_out_of_range_idle_timeout_uses_default() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        // Below the one-minute floor
        std::fs::write(&file, r#"{"daemon.idleTimeoutMs": 1000}"#).unwrap();
        let settings = resolve_with_path(Some(&file));
        assert_eq!(settings.daemon_idle_timeout_ms, 1_800_000);

        // Over 24 hours
        std::fs::write(&file, r#"{"daemon.idleTimeoutMs": 99999999999}"#).unwrap();
        let settings = resolve_with_path(Some(&file));
        assert_eq!(settings.daemon_idle_timeout_ms, 1_800_000);
    }

    #[test]
    fn test_out_of_range_log_every_uses_default() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        std::fs::write(&file, r#"{"events.logEvery": 0}"#).unwrap();
        let settings = resolve_with_path(Some(&file));
        assert_eq!(settings.events_log_every, 50);
    }

    #[test]
    fn test_partial_override_preserves_other_defaults() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        std::fs::write(&file, r#"{"events.logEvery": 200}"#).unwrap();

        let settings = resolve_with_path(Some(&file));
        assert_eq!(settings.daemon_idle_timeout_ms, 1_800_000); // default preserved
        assert_eq!(settings.events_log_every, 200); // overridden
    }
}
