// Settings file parser

//! Settings file parsing and validation
//!
//! The settings file is an INI document living next to the executable
//! unless overridden on the command line. Its default (sectionless)
//! properties point at the tunnel config directory and, optionally, the
//! key file locations and log level; the `[exceptions]` section lists
//! config filenames excluded from bulk start/kill.

use crate::types::{Exceptions, Settings};
use anyhow::{Context, Result};
use ini::Ini;
use std::path::{Path, PathBuf};

/// File name of the settings file when `--settings` is not given.
pub const SETTINGS_FILE_NAME: &str = "wg-fleet.ini";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PRIVATE_KEY_FILE: &str = "privatekey";
const DEFAULT_PUBLIC_KEY_FILE: &str = "publickey";

/// Resolve the default settings path: [`SETTINGS_FILE_NAME`] adjacent to
/// the current executable.
pub fn default_settings_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to resolve current executable path")?;
    Ok(exe.with_file_name(SETTINGS_FILE_NAME))
}

/// Load settings from an INI file and validate them.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.is_file() {
        anyhow::bail!("Settings file does not exist: {}", path.display());
    }

    let ini = Ini::load_from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to parse settings file {}: {}", path.display(), e))?;

    let config_dir = default_prop(&ini, "config_dir")
        .with_context(|| format!("Settings file {} is missing config_dir", path.display()))?;
    let config_dir = PathBuf::from(config_dir);

    let private_key_file = match default_prop(&ini, "private_key_file") {
        Some(value) => PathBuf::from(value),
        None => config_dir.join(DEFAULT_PRIVATE_KEY_FILE),
    };
    let public_key_file = match default_prop(&ini, "public_key_file") {
        Some(value) => PathBuf::from(value),
        None => config_dir.join(DEFAULT_PUBLIC_KEY_FILE),
    };

    let log_level = default_prop(&ini, "log_level")
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_string();

    let exceptions = match ini.section(Some("exceptions")) {
        Some(props) => Exceptions {
            start: split_name_list(props.get("start").unwrap_or("")),
            kill: split_name_list(props.get("kill").unwrap_or("")),
        },
        None => Exceptions::default(),
    };

    let settings = Settings {
        config_dir,
        private_key_file,
        public_key_file,
        log_level,
        exceptions,
    };

    validate_settings(&settings)?;
    Ok(settings)
}

/// Validate settings values.
fn validate_settings(settings: &Settings) -> Result<()> {
    if !settings.config_dir.is_dir() {
        anyhow::bail!(
            "The path defined for wg config files does not exist: {}",
            settings.config_dir.display()
        );
    }
    Ok(())
}

fn default_prop<'a>(ini: &'a Ini, key: &str) -> Option<&'a str> {
    ini.section(None::<String>).and_then(|props| props.get(key))
}

/// Split a comma-separated filename list, trimming whitespace around each
/// entry and dropping empty entries.
fn split_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_settings_full() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("wireguard");
        fs::create_dir(&config_dir).unwrap();
        let path = write_settings(
            &dir,
            &format!(
                "config_dir = {}\nlog_level = warn\n\n[exceptions]\nstart = corp.conf , lab.conf\nkill = home.conf\n",
                config_dir.display()
            ),
        );

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.config_dir, config_dir);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.exceptions.start, vec!["corp.conf", "lab.conf"]);
        assert_eq!(settings.exceptions.kill, vec!["home.conf"]);
    }

    #[test]
    fn test_load_settings_defaults() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("wireguard");
        fs::create_dir(&config_dir).unwrap();
        let path = write_settings(&dir, &format!("config_dir = {}\n", config_dir.display()));

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.private_key_file, config_dir.join("privatekey"));
        assert_eq!(settings.public_key_file, config_dir.join("publickey"));
        assert!(settings.exceptions.start.is_empty());
        assert!(settings.exceptions.kill.is_empty());
    }

    #[test]
    fn test_load_settings_key_file_overrides() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("wireguard");
        fs::create_dir(&config_dir).unwrap();
        let path = write_settings(
            &dir,
            &format!(
                "config_dir = {}\nprivate_key_file = /tmp/priv\npublic_key_file = /tmp/pub\n",
                config_dir.display()
            ),
        );

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.private_key_file, PathBuf::from("/tmp/priv"));
        assert_eq!(settings.public_key_file, PathBuf::from("/tmp/pub"));
    }

    #[test]
    fn test_load_settings_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(dir.path().join("nope.ini")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_load_settings_missing_config_dir_key() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(&dir, "[exceptions]\nstart = a.conf\n");
        let err = load_settings(&path).unwrap_err();
        assert!(err.to_string().contains("config_dir"));
    }

    #[test]
    fn test_load_settings_nonexistent_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(
            &dir,
            &format!("config_dir = {}\n", dir.path().join("missing").display()),
        );
        let err = load_settings(&path).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_split_name_list_trims_and_drops_empty() {
        assert_eq!(
            split_name_list(" a.conf ,  b.conf ,, "),
            vec!["a.conf", "b.conf"]
        );
        assert!(split_name_list("").is_empty());
        assert!(split_name_list("  ,  ").is_empty());
    }
}
