use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::format::OutputFormat;

pub const DEFAULT_CONFIG_PATH: &str = "configs/config.json";
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8200";
pub const DEFAULT_SECRET_ENGINE: &str = "secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Vault profile not found: {0}")]
    ProfileNotFound(String),
}

/// One named Vault endpoint from the profiles file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VaultProfile {
    pub name: String,
    pub address: String,
    pub namespace: String,
    pub username: String,
    pub password: String,
    /// Informational only; not sent anywhere
    pub ldap_group: String,
    #[serde(rename = "secretengine")]
    pub secret_engine: String,
}

/// `{"vaults": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilesFile {
    #[serde(default)]
    pub vaults: Vec<VaultProfile>,
}

impl ProfilesFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    /// Like [`ProfilesFile::load`], but a missing file is `Ok(None)`
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(path, &contents).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No profiles file");
                Ok(None)
            }
            Err(source) => Err(ConfigError::FileRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|source| ConfigError::JsonParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.vaults.iter().map(|v| v.name.clone()).collect()
    }

    pub fn find(&self, name: &str) -> Result<&VaultProfile, ConfigError> {
        self.vaults
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub address: Option<String>,
    pub namespace: Option<String>,
    pub secret_engine: Option<String>,
    pub output_format: OutputFormat,
    pub max_depth: Option<usize>,
}

/// Resolved settings of one session. Built once, then only borrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub profile: Option<String>,
    pub address: String,
    pub namespace: Option<String>,
    pub secret_engine: String,
    pub output_format: OutputFormat,
    pub max_depth: Option<usize>,
}

impl SessionConfig {
    /// Overrides win over the profile, the profile wins over built-in defaults
    pub fn resolve(profile: Option<&VaultProfile>, overrides: &Overrides) -> Self {
        let address = pick(overrides.address.as_deref())
            .or_else(|| pick(profile.map(|p| p.address.as_str())))
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

        let namespace = pick(overrides.namespace.as_deref())
            .or_else(|| pick(profile.map(|p| p.namespace.as_str())));

        let secret_engine = pick(overrides.secret_engine.as_deref())
            .or_else(|| pick(profile.map(|p| p.secret_engine.as_str())))
            .unwrap_or_else(|| DEFAULT_SECRET_ENGINE.to_string());

        Self {
            profile: profile.map(|p| p.name.clone()),
            address,
            namespace,
            secret_engine,
            output_format: overrides.output_format,
            max_depth: overrides.max_depth,
        }
    }
}

fn pick(value: Option<&str>) -> Option<String> {
    value.and_then(non_empty).map(str::to_string)
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
