//! API route handlers

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::ffi::OsStr;
use uuid::Uuid;

use super::server::SharedState;
use crate::auth::models::{ChangePasswordRequest, LoginRequest, LoginResponse, Role};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::Claims;
use crate::directory::{self, NewUser, UserInfo};
use crate::error::{Error, Result};
use crate::gallery::{CaseDraft, MediaDraft};

const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "mp4", "webm"];

/// Run a CPU-heavy closure off the async reactor
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Other(e.to_string()))
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// Auth routes

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response> {
    // Provision the default admin before touching credentials; idempotent.
    directory::ensure_bootstrap_admin(state.directory.as_ref(), &state.config.bootstrap).await?;

    let username = req.username.trim().to_string();
    if username.is_empty() || req.password.is_empty() {
        return Err(Error::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = state.directory.find_by_username(&username).await?;

    // Verify against a dummy hash when the account is unknown so response
    // timing does not reveal whether the username exists.
    let password = req.password.clone();
    let stored = match &user {
        Some(user) => user.password_hash.clone(),
        None => format!("{}:{}", "00".repeat(16), "00".repeat(64)),
    };
    let ok = run_blocking(move || verify_password(&password, &stored)).await?;

    let user = user.ok_or(Error::InvalidCredentials)?;
    if !ok {
        return Err(Error::InvalidCredentials);
    }

    let token = state.auth.issue(&user.id, user.role, &user.username)?;
    let mut headers = HeaderMap::new();
    state.auth.attach(&mut headers, &token)?;

    tracing::info!(username = %user.username, "login succeeded");
    Ok((
        headers,
        Json(LoginResponse {
            ok: true,
            role: user.role,
        }),
    )
        .into_response())
}

pub async fn logout(State(state): State<SharedState>) -> Result<Response> {
    let mut headers = HeaderMap::new();
    state.auth.clear(&mut headers)?;
    Ok((headers, Json(json!({ "ok": true }))).into_response())
}

pub async fn change_password(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Response> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(Error::BadRequest("Missing fields".to_string()));
    }

    let user = state
        .directory
        .find_by_id(&claims.uid)
        .await?
        .ok_or_else(|| Error::UserNotFound(claims.uid.clone()))?;

    let current = req.current_password.clone();
    let stored = user.password_hash.clone();
    if !run_blocking(move || verify_password(&current, &stored)).await? {
        return Err(Error::InvalidCredentials);
    }

    let new_password = req.new_password.clone();
    let new_hash = run_blocking(move || hash_password(&new_password)).await?;
    state.directory.update_hash(&user.id, &new_hash).await?;

    tracing::info!(username = %user.username, "password changed");
    Ok(Json(json!({ "ok": true })).into_response())
}

// User management routes (ADMIN)

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub new_password: String,
}

pub async fn list_users(State(state): State<SharedState>) -> Result<Response> {
    let users = state.directory.list().await?;
    let users: Vec<UserInfo> = users.iter().map(UserInfo::from).collect();
    Ok(Json(json!({ "users": users })).into_response())
}

pub async fn create_user(
    State(state): State<SharedState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response> {
    let username = req.username.trim().to_string();
    if username.is_empty() || req.password.is_empty() {
        return Err(Error::BadRequest(
            "Username and password are required".to_string(),
        ));
    }
    directory::validate_username(&username)?;

    // Anything other than ADMIN provisions a regular account
    let role = req
        .role
        .as_deref()
        .and_then(|r| r.parse::<Role>().ok())
        .unwrap_or(Role::User);

    let password = req.password.clone();
    let hash = run_blocking(move || hash_password(&password)).await?;

    let user = state
        .directory
        .create(NewUser {
            username,
            password_hash: hash,
            role,
        })
        .await?;

    tracing::info!(username = %user.username, role = %user.role, "user created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "user": UserInfo::from(&user) })),
    )
        .into_response())
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Response> {
    if req.new_password.is_empty() {
        return Err(Error::BadRequest("new_password required".to_string()));
    }

    let user = state
        .directory
        .find_by_id(&id)
        .await?
        .ok_or_else(|| Error::UserNotFound(id.clone()))?;

    let new_password = req.new_password.clone();
    let hash = run_blocking(move || hash_password(&new_password)).await?;
    state.directory.update_hash(&user.id, &hash).await?;

    tracing::info!(username = %user.username, "password reset by admin");
    Ok(Json(json!({ "ok": true })).into_response())
}

// Public case routes

pub async fn list_cases(State(state): State<SharedState>) -> Result<Response> {
    let cases = state.gallery.list(false).await?;
    Ok(Json(json!({ "cases": cases })).into_response())
}

pub async fn get_case(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let case = state
        .gallery
        .get(&id)
        .await?
        .filter(|c| c.published)
        .ok_or_else(|| Error::CaseNotFound(id.clone()))?;
    Ok(Json(json!({ "case": case })).into_response())
}

// Admin case routes

pub async fn admin_list_cases(State(state): State<SharedState>) -> Result<Response> {
    let cases = state.gallery.list(true).await?;
    Ok(Json(json!({ "cases": cases })).into_response())
}

pub async fn create_case(
    State(state): State<SharedState>,
    Json(draft): Json<CaseDraft>,
) -> Result<Response> {
    if draft.title.trim().is_empty() {
        return Err(Error::BadRequest("Title is required".to_string()));
    }

    let case = state.gallery.create(draft).await?;
    tracing::info!(case_id = %case.id, "case created");
    Ok((StatusCode::CREATED, Json(json!({ "case": case }))).into_response())
}

pub async fn update_case(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(draft): Json<CaseDraft>,
) -> Result<Response> {
    if draft.title.trim().is_empty() {
        return Err(Error::BadRequest("Title is required".to_string()));
    }

    let case = state.gallery.update(&id, draft).await?;
    Ok(Json(json!({ "case": case })).into_response())
}

pub async fn delete_case(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.gallery.delete(&id).await?;
    tracing::info!(case_id = %id, "case deleted");
    Ok(Json(json!({ "ok": true })).into_response())
}

pub async fn add_media(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(draft): Json<MediaDraft>,
) -> Result<Response> {
    if draft.url.trim().is_empty() {
        return Err(Error::BadRequest("Media url is required".to_string()));
    }

    let item = state.gallery.add_media(&id, draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "media": item }))).into_response())
}

pub async fn remove_media(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.gallery.remove_media(&id).await?;
    Ok(Json(json!({ "ok": true })).into_response())
}

// Upload route (ADMIN)

pub async fn upload_media(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .ok_or_else(|| Error::BadRequest("Uploaded file needs a filename".to_string()))?;

        let extension = std::path::Path::new(&filename)
            .extension()
            .and_then(OsStr::to_str)
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::BadRequest(format!(
                "Unsupported file type: .{}",
                extension
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(e.to_string()))?;
        if data.is_empty() {
            return Err(Error::BadRequest("Uploaded file is empty".to_string()));
        }

        let stored_name = format!("{}-{}", Uuid::new_v4(), filename);
        let dir = &state.config.uploads.dir;
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(dir.join(&stored_name), &data).await?;

        tracing::info!(file = %stored_name, bytes = data.len(), "media uploaded");
        return Ok((
            StatusCode::CREATED,
            Json(json!({ "url": format!("/uploads/{}", stored_name) })),
        )
            .into_response());
    }

    Err(Error::BadRequest("Multipart field 'file' required".to_string()))
}

/// Keep only filesystem-safe characters from a client-supplied filename
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
