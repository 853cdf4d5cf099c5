use super::{CredentialManager, HashError, Salt};
use crate::crypto::digest::constant_time_eq;

/// Stores the password as-is. Only suitable for legacy imports and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCredManager;

impl PlainCredManager {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialManager for PlainCredManager {
    fn hash_password(&self, password: &str, _salt: &Salt<'_>) -> Result<String, HashError> {
        Ok(password.to_string())
    }

    fn is_password_correct(&self, password: &str, hash: &str, _salt: &Salt<'_>) -> bool {
        constant_time_eq(password, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::PlainCredManager;
    use crate::crypto::managers::{CredentialManager, Salt};

    #[test]
    fn stores_password_verbatim() {
        let cm = PlainCredManager::new();
        let hash = cm.hash_password("123", &Salt::new("user", "org")).unwrap();
        assert_eq!(hash, "123");
        assert!(cm.is_password_correct("123", &hash, &Salt::none()));
        assert!(!cm.is_password_correct("1234", &hash, &Salt::none()));
    }
}
