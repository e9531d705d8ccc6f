//! Session cookie gateway
//!
//! Binds a session token to the single HTTP cookie used for authentication.
//! Works directly on `http::HeaderMap` so the auth core never depends on the
//! shape of the hosting HTTP layer.

use crate::error::{Error, Result};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

/// Read and write the named session cookie
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    secure: bool,
    max_age_secs: i64,
}

impl SessionCookies {
    pub fn new(name: impl Into<String>, secure: bool, max_age_secs: i64) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age_secs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the session cookie on a response
    pub fn attach(&self, headers: &mut HeaderMap, token: &str) -> Result<()> {
        let value = self.build(token, self.max_age_secs)?;
        headers.append(SET_COOKIE, value);
        Ok(())
    }

    /// Clear the session cookie, forcing client deletion
    pub fn clear(&self, headers: &mut HeaderMap) -> Result<()> {
        let value = self.build("", 0)?;
        headers.append(SET_COOKIE, value);
        Ok(())
    }

    /// Extract the session cookie value from a request. Absent is `None`,
    /// not an error.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        for header in headers.get_all(COOKIE) {
            let Ok(raw) = header.to_str() else {
                continue;
            };
            for pair in raw.split(';') {
                if let Some((name, value)) = pair.trim().split_once('=') {
                    if name.trim() == self.name {
                        return Some(value.trim().to_string());
                    }
                }
            }
        }
        None
    }

    fn build(&self, value: &str, max_age_secs: i64) -> Result<HeaderValue> {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.name, value, max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
            .map_err(|_| Error::Config(format!("Invalid cookie name: {}", self.name)))
    }
}
