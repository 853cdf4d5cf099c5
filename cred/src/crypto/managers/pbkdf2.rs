//! PBKDF2-HMAC-SHA256 managers.
//!
//! `pbkdf2-salt` reproduces Keycloak's stored credentials: a fixed iteration
//! count, a 64 byte key, and a base64 salt. `pbkdf2-django` reproduces Django's
//! `pbkdf2_sha256` hasher, whose stored string records its own iteration count
//! so the cost can be raised without invalidating existing records.

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::Sha256;
use tracing::debug;

use super::{CredentialManager, HashError, Salt};
use crate::crypto::digest::constant_time_eq;

pub const PBKDF2_SALT_ITERATIONS: u32 = 27_500;
pub const PBKDF2_SALT_KEY_LEN: usize = 64;

pub const DJANGO_ALGORITHM: &str = "pbkdf2_sha256";
pub const DJANGO_ITERATIONS: u32 = 260_000;
const DJANGO_KEY_LEN: usize = 32;
const DJANGO_SEGMENTS: usize = 4;
const DJANGO_SEPARATOR: char = '$';

fn derive(password: &str, salt: &[u8], iterations: u32, key_len: usize) -> String {
    let mut key = vec![0u8; key_len];
    ::pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    STANDARD.encode(key)
}

/// Keycloak compatible PBKDF2. The salt (user salt, falling back to the
/// organization salt) is expected to be base64; a salt that does not decode
/// is used as raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pbkdf2SaltCredManager;

impl Pbkdf2SaltCredManager {
    pub fn new() -> Self {
        Self
    }

    fn digest(password: &str, salt: &str) -> String {
        let salt = match STANDARD.decode(salt) {
            Ok(decoded) => decoded,
            Err(err) => {
                debug!(error = %err, "pbkdf2 salt is not base64, using raw bytes");
                salt.as_bytes().to_vec()
            }
        };
        derive(password, &salt, PBKDF2_SALT_ITERATIONS, PBKDF2_SALT_KEY_LEN)
    }
}

impl CredentialManager for Pbkdf2SaltCredManager {
    fn hash_password(&self, password: &str, salt: &Salt<'_>) -> Result<String, HashError> {
        Ok(Self::digest(password, salt.effective()))
    }

    fn is_password_correct(&self, password: &str, hash: &str, salt: &Salt<'_>) -> bool {
        constant_time_eq(&Self::digest(password, salt.effective()), hash)
    }
}

/// Django compatible PBKDF2, serialized as
/// `pbkdf2_sha256$<iterations>$<salt>$<base64 hash>`. Salts containing `$`
/// are rejected when hashing.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2DjangoCredManager {
    iterations: u32,
}

impl Default for Pbkdf2DjangoCredManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pbkdf2DjangoCredManager {
    pub fn new() -> Self {
        Self::with_iterations(DJANGO_ITERATIONS)
    }

    /// Iteration count written into new hashes. Verification always uses the
    /// count stored in the hash.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl CredentialManager for Pbkdf2DjangoCredManager {
    fn hash_password(&self, password: &str, salt: &Salt<'_>) -> Result<String, HashError> {
        let salt = salt.effective();
        if salt.contains(DJANGO_SEPARATOR) {
            return Err(HashError::InvalidSalt(DJANGO_SEPARATOR));
        }
        let hash = derive(password, salt.as_bytes(), self.iterations, DJANGO_KEY_LEN);
        Ok(format!("{DJANGO_ALGORITHM}${}${salt}${hash}", self.iterations))
    }

    fn is_password_correct(&self, password: &str, hash: &str, _salt: &Salt<'_>) -> bool {
        let parts: Vec<&str> = hash.split(DJANGO_SEPARATOR).collect();
        if parts.len() != DJANGO_SEGMENTS {
            debug!(segments = parts.len(), "django pbkdf2 hash has the wrong shape");
            return false;
        }

        let (algorithm, iterations, salt, expected) = (parts[0], parts[1], parts[2], parts[3]);
        if algorithm != DJANGO_ALGORITHM {
            debug!(algorithm, "django pbkdf2 hash has an unexpected algorithm");
            return false;
        }
        let iterations = match iterations.parse::<u32>() {
            Ok(iterations) if iterations > 0 => iterations,
            _ => {
                debug!("django pbkdf2 hash has an invalid iteration count");
                return false;
            }
        };

        let computed = derive(password, salt.as_bytes(), iterations, DJANGO_KEY_LEN);
        constant_time_eq(&computed, expected)
    }
}
