use tracing::debug;

use super::{CredentialManager, HashError, Salt};
use crate::crypto::digest::{constant_time_eq, sha512_hex};

/// `sha512(sha512(password) + salt)` when a salt is available, `sha512(password)`
/// otherwise. The salt is the user salt, falling back to the organization salt.
///
/// Records created before salts were introduced hold the unsalted digest, so
/// verification accepts that form too.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512SaltCredManager;

impl Sha512SaltCredManager {
    pub fn new() -> Self {
        Self
    }

    fn digest(password: &str, salt: &str) -> String {
        let inner = sha512_hex(password.as_bytes());
        if salt.is_empty() {
            inner
        } else {
            sha512_hex(format!("{inner}{salt}").as_bytes())
        }
    }
}

impl CredentialManager for Sha512SaltCredManager {
    fn hash_password(&self, password: &str, salt: &Salt<'_>) -> Result<String, HashError> {
        Ok(Self::digest(password, salt.effective()))
    }

    fn is_password_correct(&self, password: &str, hash: &str, salt: &Salt<'_>) -> bool {
        let salt = salt.effective();
        if constant_time_eq(&Self::digest(password, salt), hash) {
            return true;
        }
        if salt.is_empty() {
            return false;
        }

        let legacy = constant_time_eq(&Self::digest(password, ""), hash);
        if legacy {
            debug!("sha512 password matched the unsalted legacy form");
        }
        legacy
    }
}

#[cfg(test)]
mod tests {
    use super::Sha512SaltCredManager;
    use crate::crypto::digest::sha512_hex;
    use crate::crypto::managers::{CredentialManager, Salt};

    #[test]
    fn matches_known_digests() {
        let cm = Sha512SaltCredManager::new();
        assert_eq!(
            cm.hash_password("123", &Salt::user("salt")).unwrap(),
            "843f30643b6878b4360b7ba7ebc2cde14bdf8319a54c5ae83cbe9b0068fadb68\
             1b777a724b46ca405a3fb59417f9088ddeef1c545541a1cba3bb53952ed79270"
        );
        assert_eq!(
            cm.hash_password("123", &Salt::none()).unwrap(),
            sha512_hex(b"123")
        );
    }

    #[test]
    fn falls_back_to_organization_salt() {
        let cm = Sha512SaltCredManager::new();
        let by_org = cm.hash_password("123", &Salt::organization("salt")).unwrap();
        let by_user = cm.hash_password("123", &Salt::user("salt")).unwrap();
        assert_eq!(by_org, by_user);
    }

    #[test]
    fn accepts_legacy_unsalted_hash() {
        let cm = Sha512SaltCredManager::new();
        let legacy = sha512_hex(b"123");
        let salt = Salt::user("salt");
        assert!(cm.is_password_correct("123", &legacy, &salt));
        assert!(!cm.is_password_correct("1234", &legacy, &salt));
    }

    #[test]
    fn rejects_wrong_salt() {
        let cm = Sha512SaltCredManager::new();
        let hash = cm.hash_password("123", &Salt::user("salt")).unwrap();
        assert!(cm.is_password_correct("123", &hash, &Salt::user("salt")));
        assert!(!cm.is_password_correct("123", &hash, &Salt::user("pepper")));
        assert!(!cm.is_password_correct("123", &hash, &Salt::none()));
    }
}
