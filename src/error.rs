use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures outside the derivation core (storage, settings, templates).
///
/// Assembling an invoice never produces one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    SettingsRead(#[from] toml::de::Error),

    #[error("failed to write settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
