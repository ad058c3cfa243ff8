//! Configuration file – reads/writes `~/.skillbridge/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted user configuration stored in `~/.skillbridge/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How long the dispatcher sleeps between idle polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long the shell waits for a skill result before giving up, in
    /// milliseconds.  Skills block for their full duration, so this bounds
    /// the longest skill the shell will sit through.
    #[serde(default = "default_result_wait_ms")]
    pub result_wait_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    200
}
fn default_result_wait_ms() -> u64 {
    30_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            result_wait_ms: default_result_wait_ms(),
        }
    }
}

/// Return the path to `~/.skillbridge/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".skillbridge").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `SKILLBRIDGE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `SKILLBRIDGE_POLL_INTERVAL_MS` | `poll_interval_ms` |
/// | `SKILLBRIDGE_RESULT_WAIT_MS` | `result_wait_ms` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("SKILLBRIDGE_POLL_INTERVAL_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.poll_interval_ms = ms;
    }
    if let Ok(v) = std::env::var("SKILLBRIDGE_RESULT_WAIT_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.result_wait_ms = ms;
    }
}

/// Save the config to disk, creating `~/.skillbridge/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config::default();
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.poll_interval_ms, 200);
        assert_eq!(loaded.result_wait_ms, 30_000);
    }

    #[test]
    fn config_path_points_to_skillbridge_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".skillbridge"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "poll_interval_ms = 50\n").unwrap();

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.poll_interval_ms, 50);
        assert_eq!(loaded.result_wait_ms, 30_000);
    }

    #[test]
    fn apply_env_overrides_changes_poll_interval() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("SKILLBRIDGE_POLL_INTERVAL_MS", "25") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.poll_interval_ms, 25);
        unsafe { std::env::remove_var("SKILLBRIDGE_POLL_INTERVAL_MS") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_value() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("SKILLBRIDGE_RESULT_WAIT_MS", "not-a-number") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.result_wait_ms, 30_000);
        unsafe { std::env::remove_var("SKILLBRIDGE_RESULT_WAIT_MS") };
    }
}
