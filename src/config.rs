use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "config.json";
const BUNDLED_LOGO: &str = "bundled";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_dir: PathBuf,
    pub export_dir: PathBuf,
    pub logo: LogoSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    Bundled,
    File(PathBuf),
    Url(String),
}

impl LogoSource {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(BUNDLED_LOGO) {
            LogoSource::Bundled
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            LogoSource::Url(trimmed.to_string())
        } else {
            LogoSource::File(PathBuf::from(trimmed))
        }
    }
}

/// Values persisted by `turnolink config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

impl AppConfig {
    pub fn load(workspace_hint: &Path) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, config_directory()?, workspace_hint, |name| {
            env::var(name).ok()
        })
    }

    /// Environment wins over the stored file, which wins over defaults.
    pub fn resolve(
        stored: StoredConfig,
        config_dir: PathBuf,
        workspace_hint: &Path,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let pick = |name: &str, stored: Option<String>| {
            env_var(name)
                .filter(|value| !value.trim().is_empty())
                .or(stored.filter(|value| !value.trim().is_empty()))
        };

        let storage_dir = pick("TURNOLINK_STORAGE_DIR", stored.storage_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| config_dir.join("storage"));
        let export_dir = pick("TURNOLINK_EXPORT_DIR", stored.export_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| workspace_hint.to_path_buf());
        let logo = pick("TURNOLINK_LOGO", stored.logo)
            .map(|value| LogoSource::parse(&value))
            .unwrap_or(LogoSource::Bundled);

        Ok(Self {
            storage_dir,
            export_dir,
            logo,
        })
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os("TURNOLINK_CONFIG_DIR").filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir).join("turnolink"));
    }
    env::var_os("HOME")
        .filter(|dir| !dir.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join("turnolink"))
        .ok_or_else(|| {
            AppError::Configuration(
                "cannot locate config directory; set TURNOLINK_CONFIG_DIR or HOME".to_string(),
            )
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parses_logo_sources() {
        assert_eq!(LogoSource::parse(""), LogoSource::Bundled);
        assert_eq!(LogoSource::parse("Bundled"), LogoSource::Bundled);
        assert_eq!(
            LogoSource::parse("https://cdn.example.com/logo.png"),
            LogoSource::Url("https://cdn.example.com/logo.png".to_string())
        );
        assert_eq!(
            LogoSource::parse("./assets/logo.png"),
            LogoSource::File(PathBuf::from("./assets/logo.png"))
        );
    }

    #[test]
    fn defaults_without_stored_values() {
        let config = AppConfig::resolve(
            StoredConfig::default(),
            PathBuf::from("/cfg"),
            Path::new("/work"),
            no_env,
        )
        .unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/cfg/storage"));
        assert_eq!(config.export_dir, PathBuf::from("/work"));
        assert_eq!(config.logo, LogoSource::Bundled);
    }

    #[test]
    fn environment_overrides_stored_file() {
        let stored = StoredConfig {
            storage_dir: Some("/stored/storage".to_string()),
            export_dir: Some("/stored/exports".to_string()),
            logo: Some("/stored/logo.png".to_string()),
        };
        let env = HashMap::from([("TURNOLINK_EXPORT_DIR", "/env/exports".to_string())]);

        let config = AppConfig::resolve(stored, PathBuf::from("/cfg"), Path::new("/work"), |name| {
            env.get(name).cloned()
        })
        .unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/stored/storage"));
        assert_eq!(config.export_dir, PathBuf::from("/env/exports"));
        assert_eq!(config.logo, LogoSource::File(PathBuf::from("/stored/logo.png")));
    }

    #[test]
    fn stored_config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        assert!(StoredConfig::load_from(&path).unwrap().logo.is_none());

        let cfg = StoredConfig {
            logo: Some("bundled".to_string()),
            ..StoredConfig::default()
        };
        cfg.save_to(&path).unwrap();

        let loaded = StoredConfig::load_from(&path).unwrap();
        assert_eq!(loaded.logo.as_deref(), Some("bundled"));
        assert!(loaded.storage_dir.is_none());
    }

    #[test]
    fn invalid_config_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }
}
