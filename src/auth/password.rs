//! Password hashing and verification
//!
//! Stored format is `<hex salt>:<hex derived key>`. Keys are derived with
//! scrypt, which is deliberately slow and memory-hard; do not swap it for a
//! fast hash.

use rand::RngCore;
use scrypt::Params;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 64;

// N=2^14, r=8, p=1
fn scrypt_params() -> Params {
    // Parameters are compile-time constants, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    Params::new(14, 8, 1, KEY_LEN).expect("Invalid scrypt parameters - this is a bug in the codebase")
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(password.as_bytes(), &salt, &scrypt_params(), &mut key)
        .expect("Invalid scrypt output length - this is a bug in the codebase");

    format!("{}:{}", hex::encode(salt), hex::encode(key))
}

/// Verify a password against a stored hash.
///
/// Always resolves to a boolean: malformed stored values, bad hex and length
/// mismatches all verify as false rather than erroring.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, key_hex)) = stored.split_once(':') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(key_hex) else {
        return false;
    };
    if salt.is_empty() || expected.len() != KEY_LEN {
        return false;
    }

    let mut derived = [0u8; KEY_LEN];
    if scrypt::scrypt(password.as_bytes(), &salt, &scrypt_params(), &mut derived).is_err() {
        return false;
    }

    constant_time_eq(&derived, &expected)
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
    }

    #[test]
    fn test_wrong_password_fails() {
        let stored = hash_password("correct horse");
        assert!(!verify_password("battery staple", &stored));
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn test_stored_format() {
        let stored = hash_password("pw");
        let (salt, key) = stored.split_once(':').expect("delimiter");
        assert_eq!(salt.len(), SALT_LEN * 2);
        assert_eq!(key.len(), KEY_LEN * 2);
    }

    #[test]
    fn test_malformed_stored_values_verify_false() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "no-delimiter"));
        assert!(!verify_password("pw", "nothex:alsonothex"));
        assert!(!verify_password("pw", "abcd:1234")); // wrong key length
        assert!(!verify_password("pw", ":"));
    }

    #[test]
    fn test_constant_time_eq_length_check() {
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
    }
}
