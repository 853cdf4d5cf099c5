//! Password credential handling for Casdoor organizations: pluggable hashing
//! strategies selected by password type, the standard password string format,
//! and the user password flow built on top of them.

pub mod config;
pub mod credential;
pub mod crypto;

pub use crate::credential::{generate_salt, CredentialError, Organization, UserCredential};
pub use crate::crypto::managers::{CredentialManager, HashError, Salt};
pub use crate::crypto::registry::{
    get_cred_manager, ldap_password, CredManager, ManagerSettings, PasswordType,
    UnknownPasswordType,
};
pub use crate::crypto::standard::{StandardPassword, StandardPasswordError};
