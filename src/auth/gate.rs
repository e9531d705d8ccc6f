//! Authorization gate
//!
//! The single decision procedure every protected surface calls before doing
//! privileged work. Composes the cookie gateway and the token codec; applied
//! as router middleware so unauthenticated requests never reach a handler or
//! its body extractors.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Duration;

use crate::api::server::SharedState;
use crate::auth::cookie::SessionCookies;
use crate::auth::models::Role;
use crate::auth::token::{Claims, TokenCodec};
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use axum::http::HeaderMap;

/// Session authentication context: codec + cookie gateway + deployment TTL.
///
/// Built once at startup; the signing secret is injected here and owned by
/// the codec for the process lifetime.
pub struct SessionAuth {
    codec: TokenCodec,
    cookies: SessionCookies,
    ttl: Duration,
}

impl SessionAuth {
    pub fn new(config: &SessionConfig, secret: impl Into<String>) -> Self {
        let ttl = Duration::days(config.ttl_days);
        Self {
            codec: TokenCodec::new(secret),
            cookies: SessionCookies::new(
                config.cookie_name.clone(),
                config.secure_cookies,
                ttl.num_seconds(),
            ),
            ttl,
        }
    }

    /// Issue a session token for a subject using the deployment TTL
    pub fn issue(&self, uid: &str, role: Role, username: &str) -> Result<String> {
        self.codec.issue(uid, role, username, self.ttl)
    }

    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.codec.verify(token)
    }

    pub fn attach(&self, headers: &mut HeaderMap, token: &str) -> Result<()> {
        self.cookies.attach(headers, token)
    }

    pub fn clear(&self, headers: &mut HeaderMap) -> Result<()> {
        self.cookies.clear(headers)
    }

    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        self.cookies.read(headers)
    }
}

/// Authorize a request from its headers.
///
/// Absent cookie short-circuits before any signature work. A missing cookie,
/// an invalid token and an insufficient role are indistinguishable to the
/// caller; all yield `None`.
pub fn authorize(auth: &SessionAuth, headers: &HeaderMap, required: Option<Role>) -> Option<Claims> {
    let token = auth.read(headers)?;
    let claims = auth.verify(&token)?;
    if let Some(role) = required {
        if claims.role != role {
            return None;
        }
    }
    Some(claims)
}

/// Middleware guarding admin API routes: 401 JSON on failure.
///
/// Verified claims are stored in request extensions for handlers that need
/// the subject identity.
pub async fn require_admin_api(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    match authorize(&state.auth, req.headers(), Some(Role::Admin)) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => Error::Unauthorized.into_response(),
    }
}

/// Middleware guarding admin HTML pages: redirect to the login page on failure
pub async fn require_admin_page(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    match authorize(&state.auth, req.headers(), Some(Role::Admin)) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}
