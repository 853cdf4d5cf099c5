use tracing::debug;

use super::{CredentialManager, HashError, Salt};

/// bcrypt with a library-managed salt embedded in the hash. Salts passed in
/// by the caller are ignored.
#[derive(Debug, Clone, Copy)]
pub struct BcryptCredManager {
    cost: u32,
}

impl Default for BcryptCredManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BcryptCredManager {
    pub fn new() -> Self {
        Self::with_cost(::bcrypt::DEFAULT_COST)
    }

    /// Cost must lie within 4..=31, otherwise hashing fails.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl CredentialManager for BcryptCredManager {
    fn hash_password(&self, password: &str, _salt: &Salt<'_>) -> Result<String, HashError> {
        Ok(::bcrypt::hash(password, self.cost)?)
    }

    fn is_password_correct(&self, password: &str, hash: &str, _salt: &Salt<'_>) -> bool {
        match ::bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(err) => {
                debug!(error = %err, "stored bcrypt hash is malformed");
                false
            }
        }
    }
}
