use super::{CredentialManager, HashError, Salt};
use crate::crypto::digest::{constant_time_eq, md5_hex};

/// Salted MD5. The digest of the password is re-hashed once per non-empty
/// salt, appending the user salt first and the organization salt second, so
/// a record carrying both salts is a double salted MD5.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5SaltCredManager;

impl Md5SaltCredManager {
    pub fn new() -> Self {
        Self
    }

    fn digest(password: &str, salt: &Salt<'_>) -> String {
        [salt.user, salt.organization]
            .into_iter()
            .filter(|s| !s.is_empty())
            .fold(md5_hex(password.as_bytes()), |hash, s| {
                md5_hex(format!("{hash}{s}").as_bytes())
            })
    }
}

impl CredentialManager for Md5SaltCredManager {
    fn hash_password(&self, password: &str, salt: &Salt<'_>) -> Result<String, HashError> {
        Ok(Self::digest(password, salt))
    }

    fn is_password_correct(&self, password: &str, hash: &str, salt: &Salt<'_>) -> bool {
        constant_time_eq(&Self::digest(password, salt), hash)
    }
}

#[cfg(test)]
mod tests {
    use super::Md5SaltCredManager;
    use crate::crypto::digest::md5_hex;
    use crate::crypto::managers::{CredentialManager, Salt};

    #[test]
    fn matches_known_digest() {
        let cm = Md5SaltCredManager::new();
        let hash = cm.hash_password("123", &Salt::user("abc")).unwrap();
        assert_eq!(hash, "db289e24f1a592e56eeebe6643b075db");
    }

    #[test]
    fn without_salt_is_a_single_md5() {
        let cm = Md5SaltCredManager::new();
        let hash = cm.hash_password("123", &Salt::none()).unwrap();
        assert_eq!(hash, md5_hex(b"123"));
    }

    #[test]
    fn applies_both_salts_in_order() {
        let cm = Md5SaltCredManager::new();
        let salt = Salt::new("user", "org");
        let hash = cm.hash_password("123", &salt).unwrap();

        let expected = md5_hex(format!("{}user", md5_hex(b"123")).as_bytes());
        let expected = md5_hex(format!("{expected}org").as_bytes());
        assert_eq!(hash, expected);

        assert!(cm.is_password_correct("123", &hash, &salt));
        assert!(!cm.is_password_correct("123", &hash, &Salt::new("org", "user")));
        assert!(!cm.is_password_correct("123", &hash, &Salt::user("user")));
    }
}
