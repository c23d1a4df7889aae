//! # Configuration module
//!
//! This module provide utilities and helpers to interact with the configuration

use std::{convert::TryFrom, path::PathBuf};

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Constants

pub const DEFAULT_REGION: &str = "us-east-1";
pub const ENVIRONMENT_PREFIX: &str = "DEADLINE_PROVISIONER";

// -----------------------------------------------------------------------------
// Api structure

/// connection settings of the deadline cloud api. The engine never reads
/// them, the host builds its `Client` from this section and hands it to the
/// engine through `Context`.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Api {
    #[serde(rename = "endpoint", default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(rename = "region")]
    pub region: String,
    #[serde(rename = "profile", default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: DEFAULT_REGION.to_string(),
            profile: None,
        }
    }
}

// -----------------------------------------------------------------------------
// Reconciler structure

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct Reconciler {
    /// compute reconciliation outcomes without any mutating remote call
    #[serde(rename = "dry_run", default)]
    pub dry_run: bool,
}

// -----------------------------------------------------------------------------
// ConfigurationError enum

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to load file '{0:?}', {1}")]
    File(PathBuf, ConfigError),
    #[error("failed to load configuration, {0}")]
    Cast(ConfigError),
    #[error("failed to set default for key '{0}', {1}")]
    Default(String, ConfigError),
    #[error("failed to build configuration, {0}")]
    Build(ConfigError),
}

// -----------------------------------------------------------------------------
// Configuration structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct Configuration {
    #[serde(rename = "api", default)]
    pub api: Api,
    #[serde(rename = "reconciler", default)]
    pub reconciler: Reconciler,
}

/// returns a builder holding the defaults and the environment source, files
/// are added on top of it by the caller
fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigurationError> {
    Config::builder()
        .set_default("api.region", DEFAULT_REGION)
        .map_err(|err| ConfigurationError::Default("api.region".into(), err))?
        .set_default("reconciler.dry_run", false)
        .map_err(|err| ConfigurationError::Default("reconciler.dry_run".into(), err))
        .map(|builder| {
            builder.add_source(
                Environment::with_prefix(ENVIRONMENT_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
        })
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<Configuration, ConfigurationError> {
    builder
        .build()
        .map_err(ConfigurationError::Build)?
        .try_deserialize()
        .map_err(ConfigurationError::Cast)
}

impl TryFrom<PathBuf> for Configuration {
    type Error = ConfigurationError;

    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        if !path.exists() {
            return Err(ConfigurationError::File(
                path.to_owned(),
                ConfigError::NotFound(path.display().to_string()),
            ));
        }

        build(builder()?.add_source(File::from(path).required(true)))
    }
}

impl Configuration {
    pub fn try_default() -> Result<Self, ConfigurationError> {
        let mut paths = vec![
            PathBuf::from(format!("/usr/share/{}/config", env!("CARGO_PKG_NAME"))),
            PathBuf::from(format!("/etc/{}/config", env!("CARGO_PKG_NAME"))),
        ];

        if let Ok(home) = std::env::var("HOME") {
            paths.push(PathBuf::from(format!(
                "{}/.config/{}/config",
                home,
                env!("CARGO_PKG_NAME")
            )));
        }

        paths.push(PathBuf::from("config"));

        let builder = paths.into_iter().fold(builder()?, |builder, path| {
            builder.add_source(File::from(path).required(false))
        });

        build(builder)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_configuration() {
        let config = Configuration::default();

        assert_eq!(DEFAULT_REGION, config.api.region);
        assert_eq!(None, config.api.endpoint);
        assert!(!config.reconciler.dry_run);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temporary file to be created");

        file.write_all(b"[api]\nregion = \"eu-west-1\"\nprofile = \"render\"\n\n[reconciler]\ndry_run = true\n")
            .expect("file to be written");

        let config = Configuration::try_from(file.path().to_path_buf())
            .expect("configuration to be loaded");

        assert_eq!("eu-west-1", config.api.region);
        assert_eq!(Some("render".to_string()), config.api.profile);
        assert!(config.reconciler.dry_run);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = Configuration::try_from(PathBuf::from("/nonexistent/deadline-provisioner.toml"));

        assert!(matches!(result, Err(ConfigurationError::File(_, _))));
    }
}
