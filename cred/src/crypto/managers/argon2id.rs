//! Argon2id with an optional pepper and per-call cost parameters.
//!
//! The organization salt of an Argon2id organization is not a salt at all:
//! it carries a pepper and, optionally, cost overrides in the form
//! `pepper|m=<KiB>|t=<iterations>|p=<lanes>`. [`Argon2Options`] is the typed
//! form of that string. The real salt is generated per hash and stored in the
//! PHC string together with the cost parameters, so verification never needs
//! the overrides, only the pepper.

use std::fmt;
use std::str::FromStr;

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use super::{CredentialManager, HashError, Salt};

const OPTION_DELIMITER: char = '|';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Argon2OptionsError {
    #[error("expected 'key=value', found '{0}'")]
    MalformedSegment(String),
    #[error("unknown cost parameter '{0}'")]
    UnknownKey(String),
    #[error("cost parameter '{key}' is not a number: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Pepper and cost overrides for a single Argon2id hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argon2Options {
    pub pepper: Option<String>,
    /// Memory cost in KiB (`m`).
    pub memory_kib: Option<u32>,
    /// Number of passes (`t`).
    pub iterations: Option<u32>,
    /// Degree of parallelism (`p`).
    pub parallelism: Option<u32>,
}

impl Argon2Options {
    pub fn with_pepper(pepper: impl Into<String>) -> Self {
        Self {
            pepper: Some(pepper.into()),
            ..Self::default()
        }
    }

    /// Extracts only the pepper from an encoded options string. Cost
    /// parameters are ignored, so this never fails.
    pub fn pepper_of(encoded: &str) -> &str {
        encoded.split(OPTION_DELIMITER).next().unwrap_or_default()
    }

    /// Applies the overrides on top of `base`.
    pub fn params(&self, base: &Params) -> Result<Params, HashError> {
        Params::new(
            self.memory_kib.unwrap_or(base.m_cost()),
            self.iterations.unwrap_or(base.t_cost()),
            self.parallelism.unwrap_or(base.p_cost()),
            base.output_len(),
        )
        .map_err(|e| HashError::Argon2(format!("{e}")))
    }
}

fn peppered(pepper: &str, password: &str) -> Zeroizing<String> {
    let mut buffer = Zeroizing::new(String::with_capacity(pepper.len() + password.len()));
    buffer.push_str(pepper);
    buffer.push_str(password);
    buffer
}

impl FromStr for Argon2Options {
    type Err = Argon2OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split(OPTION_DELIMITER);
        let mut options = Argon2Options {
            pepper: segments
                .next()
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            ..Argon2Options::default()
        };

        for segment in segments {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| Argon2OptionsError::MalformedSegment(segment.to_string()))?;
            let parsed = value
                .trim()
                .parse::<u32>()
                .map_err(|_| Argon2OptionsError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })?;
            match key.trim() {
                "m" => options.memory_kib = Some(parsed),
                "t" => options.iterations = Some(parsed),
                "p" => options.parallelism = Some(parsed),
                other => return Err(Argon2OptionsError::UnknownKey(other.to_string())),
            }
        }

        Ok(options)
    }
}

impl fmt::Display for Argon2Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pepper.as_deref().unwrap_or_default())?;
        if let Some(m) = self.memory_kib {
            write!(f, "|m={m}")?;
        }
        if let Some(t) = self.iterations {
            write!(f, "|t={t}")?;
        }
        if let Some(p) = self.parallelism {
            write!(f, "|p={p}")?;
        }
        Ok(())
    }
}

/// Argon2id producing PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`).
///
/// The pepper and cost overrides come from the organization salt.
#[derive(Debug, Clone)]
pub struct Argon2idCredManager {
    params: Params,
}

impl Default for Argon2idCredManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Argon2idCredManager {
    /// Uses the `argon2` crate's default cost parameters.
    pub fn new() -> Self {
        Self::with_params(Params::default())
    }

    /// Cost parameters used when the options string does not override them.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl CredentialManager for Argon2idCredManager {
    fn hash_password(&self, password: &str, salt: &Salt<'_>) -> Result<String, HashError> {
        let options: Argon2Options = salt.organization.parse()?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, options.params(&self.params)?);
        let input = peppered(options.pepper.as_deref().unwrap_or_default(), password);

        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(input.as_bytes(), &salt)
            .map_err(|e| HashError::Argon2(format!("{e}")))?;
        Ok(hash.to_string())
    }

    fn is_password_correct(&self, password: &str, hash: &str, salt: &Salt<'_>) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(error = %err, "stored argon2 hash is malformed");
                return false;
            }
        };
        let input = peppered(Argon2Options::pepper_of(salt.organization), password);

        // The parameters embedded in `parsed` take precedence over the
        // context's own, so a default context verifies any cost.
        match Argon2::default().verify_password(input.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(password_hash::Error::Password) => false,
            Err(err) => {
                debug!(error = %err, "argon2 verification failed");
                false
            }
        }
    }
}
