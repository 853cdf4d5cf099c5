//! Password handling for users of an organization: choosing the manager,
//! generating user salts, and hashing or checking a user's password.

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::crypto::managers::{CredentialManager, HashError, Salt};
use crate::crypto::registry::{ManagerSettings, PasswordType, UnknownPasswordType};
use crate::crypto::standard::StandardPassword;

const SALT_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    UnsupportedPasswordType(#[from] UnknownPasswordType),
    #[error("failed to set password: {0}")]
    Hash(#[from] HashError),
}

/// The password policy of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub name: String,
    pub password_type: PasswordType,
    /// Tenant-wide salt. For `argon2id` this holds the pepper and optional
    /// cost overrides.
    #[serde(default)]
    pub password_salt: String,
}

/// The password columns of a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredential {
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_type: Option<PasswordType>,
    #[serde(default)]
    pub password_salt: String,
}

/// Generates a random alphanumeric user salt.
///
/// Twelve alphanumeric characters are also valid base64, which `pbkdf2-salt`
/// requires.
pub fn generate_salt() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}

impl UserCredential {
    /// Hashes `plaintext` under the organization's password type, generating
    /// a user salt first if the user has none. Password, type and salt are
    /// replaced together, and only when hashing succeeds.
    pub fn set_password(
        &mut self,
        organization: &Organization,
        settings: &ManagerSettings,
        plaintext: &str,
    ) -> Result<(), CredentialError> {
        let user_salt = if self.password_salt.is_empty() {
            generate_salt()
        } else {
            self.password_salt.clone()
        };

        let manager = organization.password_type.manager_with(settings);
        let salt = Salt::new(&user_salt, &organization.password_salt);
        let password = manager.hash_password(plaintext, &salt)?;

        self.password = password;
        self.password_type = Some(organization.password_type);
        self.password_salt = user_salt;
        debug!(
            organization = %organization.name,
            password_type = %organization.password_type,
            "user password updated"
        );
        Ok(())
    }

    /// Checks `plaintext` against the stored password. Users without a
    /// recorded type fall back to the organization's type.
    pub fn check_password(
        &self,
        organization: &Organization,
        settings: &ManagerSettings,
        plaintext: &str,
    ) -> bool {
        let password_type = self.password_type.unwrap_or(organization.password_type);
        let salt = Salt::new(&self.password_salt, &organization.password_salt);
        password_type
            .manager_with(settings)
            .is_password_correct(plaintext, &self.password, &salt)
    }

    /// Imports a password produced elsewhere in the standard format. The
    /// organization salt it carried is returned alongside.
    pub fn from_standard(
        standard: &StandardPassword,
    ) -> Result<(UserCredential, String), CredentialError> {
        let password_type: PasswordType = standard.password_type().parse()?;
        let credential = UserCredential {
            password: standard.password_hash().to_string(),
            password_type: Some(password_type),
            password_salt: standard.user_salt().to_string(),
        };
        Ok((credential, standard.organization_salt().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_salt, CredentialError, Organization, UserCredential};
    use crate::crypto::digest::md5_hex;
    use crate::crypto::registry::{ManagerSettings, PasswordType};
    use crate::crypto::standard::StandardPassword;

    fn settings() -> ManagerSettings {
        ManagerSettings {
            argon2: argon2::Params::new(8 * 1024, 1, 1, None).unwrap(),
            bcrypt_cost: 4,
            django_iterations: 1000,
        }
    }

    fn organization(password_type: PasswordType, salt: &str) -> Organization {
        Organization {
            name: "built-in".to_string(),
            password_type,
            password_salt: salt.to_string(),
        }
    }

    #[test]
    fn generated_salts_are_random_base64() {
        let a = generate_salt();
        let b = generate_salt();
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn sets_and_checks_passwords_for_every_type() {
        let settings = settings();
        for password_type in PasswordType::ALL {
            let org = organization(password_type, "org-salt");
            let mut user = UserCredential::default();
            user.set_password(&org, &settings, "test123").unwrap();

            assert_eq!(user.password_type, Some(password_type));
            assert!(!user.password_salt.is_empty());
            assert!(user.check_password(&org, &settings, "test123"), "{password_type}");
            assert!(!user.check_password(&org, &settings, "test124"), "{password_type}");
        }
    }

    #[test]
    fn keeps_existing_user_salt() {
        let org = organization(PasswordType::Md5Salt, "");
        let mut user = UserCredential {
            password_salt: "fixed".to_string(),
            ..UserCredential::default()
        };
        user.set_password(&org, &settings(), "123").unwrap();
        assert_eq!(user.password_salt, "fixed");
    }

    #[test]
    fn stored_type_wins_over_organization_type() {
        let settings = settings();
        let mut user = UserCredential::default();
        user.set_password(&organization(PasswordType::Sha512Salt, ""), &settings, "123")
            .unwrap();

        // The organization switched algorithms after the password was set.
        let org = organization(PasswordType::Bcrypt, "");
        assert!(user.check_password(&org, &settings, "123"));

        let legacy = UserCredential {
            password: "123".to_string(),
            password_type: None,
            password_salt: String::new(),
        };
        assert!(legacy.check_password(&organization(PasswordType::Plain, ""), &settings, "123"));
    }

    #[test]
    fn failed_hash_leaves_password_untouched() {
        let settings = settings();
        let md5_org = organization(PasswordType::Md5Salt, "");
        let mut user = UserCredential {
            password: md5_hex(b"old"),
            password_type: Some(PasswordType::Md5Salt),
            password_salt: String::new(),
        };
        assert!(user.check_password(&md5_org, &settings, "old"));

        let org = organization(PasswordType::Argon2id, "pepper|m=oops");
        assert!(matches!(
            user.set_password(&org, &settings, "new"),
            Err(CredentialError::Hash(_))
        ));
        assert_eq!(user.password, md5_hex(b"old"));
        assert_eq!(user.password_type, Some(PasswordType::Md5Salt));
        assert!(user.password_salt.is_empty());
        assert!(user.check_password(&md5_org, &settings, "old"));
    }

    #[test]
    fn imports_standard_passwords() {
        let settings = settings();
        let standard: StandardPassword = "$plain$org$user$secret".parse().unwrap();
        let (user, org_salt) = UserCredential::from_standard(&standard).unwrap();
        assert_eq!(org_salt, "org");
        assert_eq!(user.password_salt, "user");
        assert_eq!(user.password_type, Some(PasswordType::Plain));
        assert!(user.check_password(&organization(PasswordType::Bcrypt, &org_salt), &settings, "secret"));

        let unknown: StandardPassword = "$whirlpool$hash".parse().unwrap();
        assert!(matches!(
            UserCredential::from_standard(&unknown),
            Err(CredentialError::UnsupportedPasswordType(_))
        ));
    }

    #[test]
    fn serializes_like_the_user_record() {
        let user = UserCredential {
            password: "hash".to_string(),
            password_type: Some(PasswordType::Sha256Salt),
            password_salt: "abc".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"password": "hash", "passwordType": "salt", "passwordSalt": "abc"})
        );
    }
}
