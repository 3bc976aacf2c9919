use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpendError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir_string(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("betterspend")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("betterspend")
}

fn parse_settings(content: &str) -> Settings {
    serde_json::from_str(content).unwrap_or_default()
}

pub fn load_settings() -> Settings {
    match std::fs::read_to_string(settings_path()) {
        Ok(content) => parse_settings(&content),
        Err(_) => Settings::default(),
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(config_dir())?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SpendError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_json() {
        let settings = Settings {
            data_dir: "/tmp/spend".to_string(),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert_eq!(parse_settings(&json), settings);
    }

    #[test]
    fn test_defaults_point_at_documents() {
        let s = Settings::default();
        assert!(s.data_dir.ends_with("betterspend"));
        assert!(s.data_dir.contains("Documents"));
    }

    #[test]
    fn test_missing_field_uses_default() {
        let s = parse_settings("{}");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_malformed_file_uses_default() {
        let s = parse_settings("not json");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let s = parse_settings(r#"{"data_dir": "/tmp/x", "theme": "dark"}"#);
        assert_eq!(s.data_dir, "/tmp/x");
    }

    #[test]
    fn test_shellexpand_tilde() {
        if let Some(home) = dirs::home_dir() {
            let expanded = shellexpand_path("~/spend");
            assert_eq!(expanded, format!("{}/spend", home.to_string_lossy()));
        }
    }

    #[test]
    fn test_shellexpand_canonicalizes_existing() {
        let dir = tempfile::tempdir().unwrap();
        let expanded = shellexpand_path(&dir.path().to_string_lossy());
        assert_eq!(
            PathBuf::from(expanded),
            std::fs::canonicalize(dir.path()).unwrap()
        );
    }
}
