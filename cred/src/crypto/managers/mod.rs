//! Credential managers: one hashing strategy per supported password type.
//!
//! Every manager is a small stateless value implementing
//! [`CredentialManager`]. Hashing is fallible and reports library failures as
//! a [`HashError`]; verification only ever answers yes or no, so a malformed
//! stored hash is simply "not correct".

mod argon2id;
mod bcrypt;
mod md5;
mod pbkdf2;
mod plain;
mod sha256;
mod sha512;

pub use self::argon2id::{Argon2Options, Argon2OptionsError, Argon2idCredManager};
pub use self::bcrypt::BcryptCredManager;
pub use self::md5::Md5SaltCredManager;
pub use self::pbkdf2::{
    Pbkdf2DjangoCredManager, Pbkdf2SaltCredManager, DJANGO_ITERATIONS, PBKDF2_SALT_ITERATIONS,
};
pub use self::plain::PlainCredManager;
pub use self::sha256::Sha256SaltCredManager;
pub use self::sha512::Sha512SaltCredManager;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("bcrypt hashing failed: {0}")]
    Bcrypt(#[from] ::bcrypt::BcryptError),
    #[error("argon2 hashing failed: {0}")]
    Argon2(String),
    #[error("invalid argon2 options: {0}")]
    Options(#[from] Argon2OptionsError),
    #[error("salt must not contain '{0}'")]
    InvalidSalt(char),
}

/// The salts available when hashing or verifying a password.
///
/// Which of the two a manager consumes depends on the algorithm; managers
/// ignore the ones they have no use for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Salt<'a> {
    /// Per-user salt, usually generated when the user is created.
    pub user: &'a str,
    /// Tenant-wide salt configured on the organization.
    pub organization: &'a str,
}

impl<'a> Salt<'a> {
    pub fn new(user: &'a str, organization: &'a str) -> Self {
        Self { user, organization }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn user(user: &'a str) -> Self {
        Self { user, organization: "" }
    }

    pub fn organization(organization: &'a str) -> Self {
        Self { user: "", organization }
    }

    /// The user salt when present, otherwise the organization salt.
    pub fn effective(&self) -> &'a str {
        if self.user.is_empty() {
            self.organization
        } else {
            self.user
        }
    }
}

/// Hash-on-registration and verify-on-login for one password algorithm.
pub trait CredentialManager {
    /// Produces the string stored in the user record for `password`.
    fn hash_password(&self, password: &str, salt: &Salt<'_>) -> Result<String, HashError>;

    /// Returns whether `password` matches a previously stored `hash`.
    fn is_password_correct(&self, password: &str, hash: &str, salt: &Salt<'_>) -> bool;
}
