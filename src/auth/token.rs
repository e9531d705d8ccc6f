//! Stateless session tokens
//!
//! Token format: `base64url(claims JSON) + "." + base64url(HMAC-SHA256(secret, payload))`.
//! The codec is the only owner of the signing secret and the serialization
//! format; nothing else in the crate constructs or validates tokens.

use crate::auth::models::Role;
use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const TOKEN_VERSION: u8 = 1;

/// Signed session claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Protocol version
    pub v: u8,
    /// Issued at (epoch milliseconds)
    pub iat: i64,
    /// Expiry (epoch milliseconds)
    pub exp: i64,
    /// Subject user id
    pub uid: String,
    /// Subject role
    pub role: Role,
    /// Subject username
    pub username: String,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() >= self.exp
    }
}

/// Why a token was rejected. Collapsed to `None` at the public boundary so
/// callers and clients never learn which check failed.
#[derive(Debug)]
enum Rejection {
    Malformed,
    SignatureMismatch,
    Expired,
    UnsupportedVersion,
}

/// Creates and verifies signed session tokens
pub struct TokenCodec {
    secret: String,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a signed token for a subject
    pub fn issue(&self, uid: &str, role: Role, username: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            v: TOKEN_VERSION,
            iat: now.timestamp_millis(),
            exp: (now + ttl).timestamp_millis(),
            uid: uid.to_string(),
            role,
            username: username.to_string(),
        };

        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(&payload)?);
        Ok(format!("{}.{}", payload, signature))
    }

    /// Verify a token and return its claims.
    ///
    /// Malformed input, signature mismatch, expiry and unsupported versions
    /// all return `None`; the sub-case is only visible in debug logs.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        match self.check(token) {
            Ok(claims) => Some(claims),
            Err(rejection) => {
                tracing::debug!(?rejection, "rejected session token");
                None
            }
        }
    }

    fn check(&self, token: &str) -> std::result::Result<Claims, Rejection> {
        let mut parts = token.split('.');
        let (Some(payload), Some(signature), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Rejection::Malformed);
        };

        let supplied = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| Rejection::Malformed)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| Rejection::Malformed)?;
        mac.update(payload.as_bytes());
        // verify_slice is constant-time and rejects length mismatches
        mac.verify_slice(&supplied)
            .map_err(|_| Rejection::SignatureMismatch)?;

        let raw = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| Rejection::Malformed)?;
        let claims: Claims = serde_json::from_slice(&raw).map_err(|_| Rejection::Malformed)?;

        if claims.v != TOKEN_VERSION {
            return Err(Rejection::UnsupportedVersion);
        }
        if claims.is_expired() {
            return Err(Rejection::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, payload: &str) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| Error::Token(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret")
    }

    #[test]
    fn test_issue_and_verify() {
        let token = codec()
            .issue("u-1", Role::Admin, "alice", Duration::days(1))
            .expect("issue");
        let claims = codec().verify(&token).expect("valid token");

        assert_eq!(claims.v, TOKEN_VERSION);
        assert_eq!(claims.uid, "u-1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_two_segment_format() {
        let token = codec()
            .issue("u-1", Role::User, "bob", Duration::days(1))
            .expect("issue");
        assert_eq!(token.split('.').count(), 2);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = codec()
            .issue("u-1", Role::Admin, "alice", Duration::milliseconds(-1))
            .expect("issue");
        assert!(codec().verify(&token).is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = codec()
            .issue("u-1", Role::Admin, "alice", Duration::days(1))
            .expect("issue");
        assert!(TokenCodec::new("other-secret").verify(&token).is_none());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = codec()
            .issue("u-1", Role::User, "bob", Duration::days(1))
            .expect("issue");
        let (payload, signature) = token.split_once('.').expect("two segments");
        let mut bytes = payload.as_bytes().to_vec();
        bytes[0] ^= 1;
        let tampered = format!("{}.{}", String::from_utf8(bytes).unwrap(), signature);
        assert!(codec().verify(&tampered).is_none());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = codec()
            .issue("u-1", Role::User, "bob", Duration::days(1))
            .expect("issue");
        let (payload, signature) = token.split_once('.').expect("two segments");
        let mut sig = signature.as_bytes().to_vec();
        let last = sig.len() - 1;
        sig[last] = if sig[last] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{}.{}", payload, String::from_utf8(sig).unwrap());
        assert!(codec().verify(&tampered).is_none());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(codec().verify("").is_none());
        assert!(codec().verify("only-one-segment").is_none());
        assert!(codec().verify("a.b.c").is_none());
        assert!(codec().verify("!!!.???").is_none());
    }

    #[test]
    fn test_unsupported_version_rejected() {
        // Re-sign a claims payload with a bumped version; the signature is
        // valid, the version is not.
        let claims = serde_json::json!({
            "v": 2,
            "iat": 0,
            "exp": i64::MAX,
            "uid": "u-1",
            "role": "ADMIN",
            "username": "alice",
        });
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let signature = URL_SAFE_NO_PAD.encode(codec().sign(&payload).unwrap());
        let token = format!("{}.{}", payload, signature);
        assert!(codec().verify(&token).is_none());
    }

    #[test]
    fn test_missing_claims_rejected() {
        // Properly signed payload with a missing username field
        let claims = serde_json::json!({
            "v": 1,
            "iat": 0,
            "exp": i64::MAX,
            "uid": "u-1",
            "role": "ADMIN",
        });
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let signature = URL_SAFE_NO_PAD.encode(codec().sign(&payload).unwrap());
        let token = format!("{}.{}", payload, signature);
        assert!(codec().verify(&token).is_none());
    }
}
