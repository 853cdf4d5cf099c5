use super::{CredentialManager, HashError, Salt};
use crate::crypto::digest::{constant_time_eq, sha256_hex};

/// `sha256(sha256(password) + organizationSalt)`, hex encoded. Registered as
/// the `salt` password type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256SaltCredManager;

impl Sha256SaltCredManager {
    pub fn new() -> Self {
        Self
    }

    fn digest(password: &str, organization_salt: &str) -> String {
        let inner = sha256_hex(password.as_bytes());
        sha256_hex(format!("{inner}{organization_salt}").as_bytes())
    }
}

impl CredentialManager for Sha256SaltCredManager {
    fn hash_password(&self, password: &str, salt: &Salt<'_>) -> Result<String, HashError> {
        Ok(Self::digest(password, salt.organization))
    }

    fn is_password_correct(&self, password: &str, hash: &str, salt: &Salt<'_>) -> bool {
        constant_time_eq(&Self::digest(password, salt.organization), hash)
    }
}
