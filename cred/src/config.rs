//! Configuration loader. The file names the organization's password policy
//! and the cost settings of the adaptive algorithms. Secret salts or peppers
//! can be kept out of the file by naming an environment variable instead.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::credential::Organization;
use crate::crypto::registry::{ManagerSettings, PasswordType, UnknownPasswordType};

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("environment variable {0} is required but missing")]
    MissingEnvVar(String),
    #[error(transparent)]
    UnknownPasswordType(#[from] UnknownPasswordType),
    #[error("invalid argon2 parameters: {0}")]
    Argon2(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationConfig {
    #[serde(default = "default_organization_name")]
    pub name: String,
    pub password_type: String,
    /// Literal organization salt.
    #[serde(default)]
    pub password_salt: String,
    /// Environment variable holding the organization salt. Takes precedence
    /// over `password_salt`.
    pub password_salt_env: Option<String>,
}

fn default_organization_name() -> String {
    "built-in".to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argon2Config {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCredConfig {
    pub organization: OrganizationConfig,
    #[serde(default)]
    pub argon2: Argon2Config,
    pub bcrypt_cost: Option<u32>,
    pub django_iterations: Option<u32>,
    pub log_level: Option<String>,
}

#[derive(Debug)]
pub struct RuntimeConfig {
    pub organization: Organization,
    pub settings: ManagerSettings,
    pub log_level: String,
}

impl Argon2Config {
    fn params(&self) -> Result<argon2::Params, ConfigError> {
        let defaults = argon2::Params::default();
        argon2::Params::new(
            self.memory_kib.unwrap_or(defaults.m_cost()),
            self.iterations.unwrap_or(defaults.t_cost()),
            self.parallelism.unwrap_or(defaults.p_cost()),
            None,
        )
        .map_err(|e| ConfigError::Argon2(format!("{e}")))
    }
}

impl RawCredConfig {
    /// Resolves environment references and validates the password type.
    pub fn resolve(self) -> Result<RuntimeConfig, ConfigError> {
        let password_type: PasswordType = self.organization.password_type.parse()?;

        let password_salt = match &self.organization.password_salt_env {
            Some(var) => {
                std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.clone()))?
            }
            None => self.organization.password_salt,
        };

        let defaults = ManagerSettings::default();
        let settings = ManagerSettings {
            argon2: self.argon2.params()?,
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
            django_iterations: self.django_iterations.unwrap_or(defaults.django_iterations),
        };

        Ok(RuntimeConfig {
            organization: Organization {
                name: self.organization.name,
                password_type,
                password_salt,
            },
            settings,
            log_level: self
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

/// Loads the JSON configuration file and returns the resolved runtime
/// values. Salts read from the environment never appear in logs.
pub fn load_config(path: impl AsRef<Path>) -> Result<RuntimeConfig, ConfigError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading credential config");

    let raw_json = fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let raw_config: RawCredConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    let config = raw_config.resolve()?;

    info!(
        organization = %config.organization.name,
        password_type = %config.organization.password_type,
        "credential config loaded"
    );
    Ok(config)
}
