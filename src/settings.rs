use std::fs;
use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    /// Holds the stored configuration, templates and rendered output.
    pub data_root: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        let data_root = project_dirs()
            .map(|dirs| dirs.data_dir().to_string_lossy().to_string())
            .unwrap_or_else(|| "~/.invoice-sheet".to_string());
        Self { data_root }
    }
}

impl AppSettings {
    pub fn root(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "invoice-sheet", "app")
}

pub fn settings_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join("settings.toml"),
        None => PathBuf::from("settings.toml"),
    }
}

/// `None` when no settings file exists yet.
pub fn load_settings() -> Result<Option<AppSettings>> {
    let path = settings_path();
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    Ok(Some(toml::from_str(&content)?))
}

pub fn save_settings(settings: &AppSettings) -> Result<PathBuf> {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    fs::write(&path, toml_str).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

pub fn expand_home_dir(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return format!("{home}{rest}");
        }
    }
    path.to_string()
}
