//! Digest helpers used by the salted credential managers. These are plain
//! hex-encoded hash functions kept apart from the strategies so every manager
//! produces digests the same way.

use md5::Md5;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

/// Produces a raw MD5 digest of the provided bytes.
pub fn md5_digest(data: &[u8]) -> [u8; 16] {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Produces a raw SHA-256 digest of the provided bytes.
pub fn sha256_digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Produces a raw SHA-512 digest of the provided bytes.
pub fn sha512_digest(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Returns the lowercase hexadecimal representation of an MD5 digest.
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(md5_digest(data))
}

/// Returns the lowercase hexadecimal representation of a SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256_digest(data))
}

/// Returns the lowercase hexadecimal representation of a SHA-512 digest.
pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(sha512_digest(data))
}

/// Compares two strings without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::{constant_time_eq, md5_hex, sha256_hex, sha512_hex};

    #[test]
    fn hashes_to_hex() {
        assert_eq!(md5_hex(b"casdoor"), "0b874f488b4705693a60256b8f3a32da");
        assert_eq!(
            sha256_hex(b"casdoor"),
            "c2505b2a50c5ff8ffcffb24954667ebc46d789aeae28454ff4e4425b696506bf"
        );
        assert_eq!(
            sha512_hex(b"casdoor"),
            "207c02d2d1be43541e12f273489a56ec3def12662e6c43e565fa01c8ae2924da\
             880d02051bddc14ecdd68421a5c25a52b846c7bfbd4adbd9d026ebfb085ecfd8"
        );
    }

    #[test]
    fn hex_lengths_are_twice_the_digest_size() {
        assert_eq!(md5_hex(b"").len(), 32);
        assert_eq!(sha256_hex(b"").len(), 64);
        assert_eq!(sha512_hex(b"").len(), 128);
    }

    #[test]
    fn compares_in_constant_time() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(constant_time_eq("", ""));
    }
}
