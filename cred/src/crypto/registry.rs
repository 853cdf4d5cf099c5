//! Maps the password type configured on an organization to its manager.
//!
//! The set of algorithms is closed: [`PasswordType`] enumerates every tag and
//! [`CredManager`] dispatches to the matching strategy, so an unknown tag is
//! rejected when the configuration is read rather than discovered at login.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::crypto::managers::{
    Argon2idCredManager, BcryptCredManager, CredentialManager, HashError, Md5SaltCredManager,
    Pbkdf2DjangoCredManager, Pbkdf2SaltCredManager, PlainCredManager, Salt,
    Sha256SaltCredManager, Sha512SaltCredManager,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown password type '{0}'")]
pub struct UnknownPasswordType(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PasswordType {
    Plain,
    Sha256Salt,
    Md5Salt,
    Sha512Salt,
    Bcrypt,
    Pbkdf2Salt,
    Pbkdf2Django,
    Argon2id,
}

impl PasswordType {
    pub const ALL: [PasswordType; 8] = [
        PasswordType::Plain,
        PasswordType::Sha256Salt,
        PasswordType::Md5Salt,
        PasswordType::Sha512Salt,
        PasswordType::Bcrypt,
        PasswordType::Pbkdf2Salt,
        PasswordType::Pbkdf2Django,
        PasswordType::Argon2id,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordType::Plain => "plain",
            PasswordType::Sha256Salt => "salt",
            PasswordType::Md5Salt => "md5-salt",
            PasswordType::Sha512Salt => "sha512-salt",
            PasswordType::Bcrypt => "bcrypt",
            PasswordType::Pbkdf2Salt => "pbkdf2-salt",
            PasswordType::Pbkdf2Django => "pbkdf2-django",
            PasswordType::Argon2id => "argon2id",
        }
    }

    /// Builds the manager with default cost settings.
    pub fn manager(&self) -> CredManager {
        self.manager_with(&ManagerSettings::default())
    }

    pub fn manager_with(&self, settings: &ManagerSettings) -> CredManager {
        match self {
            PasswordType::Plain => CredManager::Plain(PlainCredManager::new()),
            PasswordType::Sha256Salt => CredManager::Sha256Salt(Sha256SaltCredManager::new()),
            PasswordType::Md5Salt => CredManager::Md5Salt(Md5SaltCredManager::new()),
            PasswordType::Sha512Salt => CredManager::Sha512Salt(Sha512SaltCredManager::new()),
            PasswordType::Bcrypt => {
                CredManager::Bcrypt(BcryptCredManager::with_cost(settings.bcrypt_cost))
            }
            PasswordType::Pbkdf2Salt => CredManager::Pbkdf2Salt(Pbkdf2SaltCredManager::new()),
            PasswordType::Pbkdf2Django => CredManager::Pbkdf2Django(
                Pbkdf2DjangoCredManager::with_iterations(settings.django_iterations),
            ),
            PasswordType::Argon2id => CredManager::Argon2id(Argon2idCredManager::with_params(
                settings.argon2.clone(),
            )),
        }
    }

    /// Scheme name used when exposing the stored hash over LDAP as
    /// `{scheme}hash`. Plain passwords carry no scheme.
    pub fn ldap_scheme(&self) -> Option<&'static str> {
        match self {
            PasswordType::Plain => None,
            PasswordType::Sha256Salt => Some("sha256"),
            PasswordType::Md5Salt => Some("md5"),
            PasswordType::Pbkdf2Salt => Some("pbkdf2"),
            other => Some(other.as_str()),
        }
    }
}

/// Renders a stored hash the way the LDAP bridge exposes `userPassword`.
pub fn ldap_password(password_type: PasswordType, hash: &str) -> String {
    match password_type.ldap_scheme() {
        Some(scheme) => format!("{{{scheme}}}{hash}"),
        None => hash.to_string(),
    }
}

impl fmt::Display for PasswordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasswordType {
    type Err = UnknownPasswordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PasswordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownPasswordType(s.to_string()))
    }
}

impl TryFrom<String> for PasswordType {
    type Error = UnknownPasswordType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PasswordType> for String {
    fn from(value: PasswordType) -> Self {
        value.as_str().to_string()
    }
}

/// Cost knobs for the adaptive algorithms, usually loaded from configuration.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    pub argon2: argon2::Params,
    pub bcrypt_cost: u32,
    /// Iteration count written into new `pbkdf2-django` hashes.
    pub django_iterations: u32,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            argon2: argon2::Params::default(),
            bcrypt_cost: ::bcrypt::DEFAULT_COST,
            django_iterations: crate::crypto::managers::DJANGO_ITERATIONS,
        }
    }
}

/// A constructed manager for one of the supported password types.
#[derive(Debug, Clone)]
pub enum CredManager {
    Plain(PlainCredManager),
    Sha256Salt(Sha256SaltCredManager),
    Md5Salt(Md5SaltCredManager),
    Sha512Salt(Sha512SaltCredManager),
    Bcrypt(BcryptCredManager),
    Pbkdf2Salt(Pbkdf2SaltCredManager),
    Pbkdf2Django(Pbkdf2DjangoCredManager),
    Argon2id(Argon2idCredManager),
}

impl CredManager {
    fn inner(&self) -> &dyn CredentialManager {
        match self {
            CredManager::Plain(m) => m,
            CredManager::Sha256Salt(m) => m,
            CredManager::Md5Salt(m) => m,
            CredManager::Sha512Salt(m) => m,
            CredManager::Bcrypt(m) => m,
            CredManager::Pbkdf2Salt(m) => m,
            CredManager::Pbkdf2Django(m) => m,
            CredManager::Argon2id(m) => m,
        }
    }

    pub fn password_type(&self) -> PasswordType {
        match self {
            CredManager::Plain(_) => PasswordType::Plain,
            CredManager::Sha256Salt(_) => PasswordType::Sha256Salt,
            CredManager::Md5Salt(_) => PasswordType::Md5Salt,
            CredManager::Sha512Salt(_) => PasswordType::Sha512Salt,
            CredManager::Bcrypt(_) => PasswordType::Bcrypt,
            CredManager::Pbkdf2Salt(_) => PasswordType::Pbkdf2Salt,
            CredManager::Pbkdf2Django(_) => PasswordType::Pbkdf2Django,
            CredManager::Argon2id(_) => PasswordType::Argon2id,
        }
    }
}

impl CredentialManager for CredManager {
    fn hash_password(&self, password: &str, salt: &Salt<'_>) -> Result<String, HashError> {
        self.inner().hash_password(password, salt)
    }

    fn is_password_correct(&self, password: &str, hash: &str, salt: &Salt<'_>) -> bool {
        self.inner().is_password_correct(password, hash, salt)
    }
}

/// Looks up the manager for a configured password type name.
pub fn get_cred_manager(name: &str) -> Result<CredManager, UnknownPasswordType> {
    match name.parse::<PasswordType>() {
        Ok(password_type) => Ok(password_type.manager()),
        Err(err) => {
            warn!(password_type = name, "no credential manager for password type");
            Err(err)
        }
    }
}
