//! The "standard password" format: a single `$`-delimited string carrying the
//! algorithm tag, the organization salt, the user salt, and the hash.
//!
//! ```text
//! $<type>$<organizationSalt>$<userSalt>$<hash>
//! $<type>$<organizationSalt>$<hash>
//! $<type>$<hash>
//! ```
//!
//! Parsing is positional. Anything before the first `$` is ignored, and any
//! segments after the hash are kept in [`StandardPassword::overflow`] without
//! being interpreted.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::crypto::managers::{CredentialManager, Salt};
use crate::crypto::registry::PasswordType;

const DELIMITER: char = '$';
const MIN_SEGMENTS: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StandardPasswordError {
    #[error("standard password must have at least 3 '$'-separated segments, found {0}")]
    Format(usize),
}

/// A serialized credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardPassword {
    password_type: String,
    organization_salt: String,
    user_salt: String,
    password_hash: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    overflow: Vec<String>,
}

impl StandardPassword {
    pub fn new(
        password_type: impl Into<String>,
        organization_salt: impl Into<String>,
        user_salt: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            password_type: password_type.into(),
            organization_salt: organization_salt.into(),
            user_salt: user_salt.into(),
            password_hash: password_hash.into(),
            overflow: Vec::new(),
        }
    }

    /// Splits `input` on `$` and maps the segments onto fields by count.
    pub fn parse(input: &str) -> Result<Self, StandardPasswordError> {
        let segments: Vec<&str> = input.split(DELIMITER).collect();
        match segments.len() {
            n if n < MIN_SEGMENTS => Err(StandardPasswordError::Format(n)),
            3 => Ok(Self::new(segments[1], "", "", segments[2])),
            4 => Ok(Self::new(segments[1], segments[2], "", segments[3])),
            _ => {
                let mut parsed = Self::new(segments[1], segments[2], segments[3], segments[4]);
                parsed.overflow = segments[5..].iter().map(|s| s.to_string()).collect();
                Ok(parsed)
            }
        }
    }

    pub fn password_type(&self) -> &str {
        &self.password_type
    }

    pub fn organization_salt(&self) -> &str {
        &self.organization_salt
    }

    pub fn user_salt(&self) -> &str {
        &self.user_salt
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Segments found after the hash when parsing. Never written back out.
    pub fn overflow(&self) -> &[String] {
        &self.overflow
    }

    /// Checks `password` against the stored hash using the stored salts and
    /// the manager registered for the stored type.
    ///
    /// Unknown types never match.
    pub fn verify(&self, password: &str) -> bool {
        let password_type = match self.password_type.parse::<PasswordType>() {
            Ok(password_type) => password_type,
            Err(err) => {
                debug!(error = %err, "standard password has an unusable type");
                return false;
            }
        };
        let salt = Salt::new(&self.user_salt, &self.organization_salt);
        password_type
            .manager()
            .is_password_correct(password, &self.password_hash, &salt)
    }
}

impl fmt::Display for StandardPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.user_salt.is_empty() {
            write!(
                f,
                "${}${}${}",
                self.password_type, self.organization_salt, self.password_hash
            )
        } else {
            write!(
                f,
                "${}${}${}${}",
                self.password_type, self.organization_salt, self.user_salt, self.password_hash
            )
        }
    }
}

impl FromStr for StandardPassword {
    type Err = StandardPasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
