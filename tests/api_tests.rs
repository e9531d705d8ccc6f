//! HTTP API integration tests
//!
//! Each test spins up the full router on an ephemeral port with in-memory
//! storage and drives it over real HTTP.

use std::sync::Arc;

use chrono::Duration;
use reqwest::header::SET_COOKIE;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use tempfile::TempDir;

use seatgallery::api::server::{create_router, AppState};
use seatgallery::auth::{Role, SessionAuth, TokenCodec};
use seatgallery::config::Config;
use seatgallery::directory::MemoryDirectory;
use seatgallery::gallery::MemoryGallery;

const TEST_SECRET: &str = "api-test-secret";

struct TestApp {
    base: String,
    client: reqwest::Client,
    // Keeps the uploads directory alive for the duration of the test
    _uploads: TempDir,
}

async fn spawn_app() -> TestApp {
    let uploads = TempDir::new().expect("temp uploads dir");

    let mut config = Config::default();
    config.uploads.dir = uploads.path().to_path_buf();

    let auth = SessionAuth::new(&config.session, TEST_SECRET);
    let state = Arc::new(AppState {
        config,
        auth,
        directory: Arc::new(MemoryDirectory::new()),
        gallery: Arc::new(MemoryGallery::new()),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let app = create_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("client");

    TestApp {
        base: format!("http://{}", addr),
        client,
        _uploads: uploads,
    }
}

impl TestApp {
    /// Log in and return the session cookie pair ("sc_session=...")
    async fn login(&self, username: &str, password: &str) -> Option<String> {
        let res = self
            .client
            .post(format!("{}/api/auth/login", self.base))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request");

        if !res.status().is_success() {
            return None;
        }

        let set_cookie = res.headers().get(SET_COOKIE)?.to_str().ok()?;
        set_cookie.split(';').next().map(|s| s.to_string())
    }

    /// Log in as the bootstrap administrator (provisioned lazily by login)
    async fn admin_cookie(&self) -> String {
        self.login("admin", "change-me")
            .await
            .expect("bootstrap admin login")
    }
}

// Scenario: correct credentials set the session cookie and grant access to
// an admin-only route

#[tokio::test]
async fn test_login_sets_cookie_and_grants_admin_access() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;
    assert!(cookie.starts_with("sc_session="));

    let res = app
        .client
        .get(format!("{}/api/admin/users", app.base))
        .header("Cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["users"][0]["username"], "admin");
    assert_eq!(body["users"][0]["role"], "ADMIN");
    // Password hashes never leave the directory layer
    assert!(body["users"][0].get("password_hash").is_none());
}

// Scenario: wrong password is a 401 and no cookie is set

#[tokio::test]
async fn test_login_wrong_password_sets_no_cookie() {
    let app = spawn_app().await;
    // First login provisions the bootstrap account
    app.admin_cookie().await;

    let res = app
        .client
        .post(format!("{}/api/auth/login", app.base))
        .json(&serde_json::json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_unknown_user_same_response() {
    let app = spawn_app().await;

    let res = app
        .client
        .post(format!("{}/api/auth/login", app.base))
        .json(&serde_json::json!({ "username": "nobody", "password": "whatever" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    // Unknown user and wrong password are indistinguishable
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_missing_fields_is_bad_request() {
    let app = spawn_app().await;

    let res = app
        .client
        .post(format!("{}/api/auth/login", app.base))
        .json(&serde_json::json!({ "username": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

// Scenario: USER-role session presented to an ADMIN-only route is externally
// identical to having no session at all

#[tokio::test]
async fn test_user_role_rejected_from_admin_route() {
    let app = spawn_app().await;
    let admin = app.admin_cookie().await;

    let res = app
        .client
        .post(format!("{}/api/admin/users", app.base))
        .header("Cookie", &admin)
        .json(&serde_json::json!({
            "username": "regular",
            "password": "user-password",
            "role": "USER",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let user_cookie = app.login("regular", "user-password").await.expect("user login");

    let with_user = app
        .client
        .get(format!("{}/api/admin/users", app.base))
        .header("Cookie", &user_cookie)
        .send()
        .await
        .unwrap();
    let without_cookie = app
        .client
        .get(format!("{}/api/admin/users", app.base))
        .send()
        .await
        .unwrap();

    assert_eq!(with_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(without_cookie.status(), StatusCode::UNAUTHORIZED);

    let a: serde_json::Value = with_user.json().await.unwrap();
    let b: serde_json::Value = without_cookie.json().await.unwrap();
    assert_eq!(a, b);
}

// Scenario: a token that was valid at issuance is rejected once its expiry
// has passed

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = spawn_app().await;

    let expired = TokenCodec::new(TEST_SECRET)
        .issue("some-uid", Role::Admin, "admin", Duration::seconds(-5))
        .expect("issue");

    let res = app
        .client
        .get(format!("{}/api/admin/users", app.base))
        .header("Cookie", format!("sc_session={}", expired))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

// Scenario: tampering with the signature segment invalidates the session

#[tokio::test]
async fn test_tampered_cookie_rejected() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let res = app
        .client
        .get(format!("{}/api/admin/users", app.base))
        .header("Cookie", &tampered)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

// Scenario: password change invalidates the old password for the next login

#[tokio::test]
async fn test_change_password_flow() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    let res = app
        .client
        .post(format!("{}/api/admin/change-password", app.base))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "current_password": "change-me",
            "new_password": "rotated-password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert!(app.login("admin", "change-me").await.is_none());
    assert!(app.login("admin", "rotated-password").await.is_some());
}

#[tokio::test]
async fn test_change_password_requires_current_password() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    let res = app
        .client
        .post(format!("{}/api/admin/change-password", app.base))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "current_password": "not-the-password",
            "new_password": "whatever",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Old password still works
    assert!(app.login("admin", "change-me").await.is_some());
}

// Unauthenticated mutations are rejected before any state is touched

#[tokio::test]
async fn test_unauthenticated_mutations_rejected() {
    let app = spawn_app().await;

    let res = app
        .client
        .post(format!("{}/api/admin/cases", app.base))
        .json(&serde_json::json!({ "title": "x", "brand": "y", "model": "z" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Nothing was created
    let cases = app
        .client
        .get(format!("{}/api/cases", app.base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(cases["cases"].as_array().unwrap().len(), 0);
}

// Protected pages redirect to the login page instead of returning 401

#[tokio::test]
async fn test_admin_page_redirects_to_login() {
    let app = spawn_app().await;

    let res = app
        .client
        .get(format!("{}/admin", app.base))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_redirection());
    assert_eq!(res.headers().get("location").unwrap(), "/login");
}

#[tokio::test]
async fn test_admin_page_renders_for_admin() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    let res = app
        .client
        .get(format!("{}/admin", app.base))
        .header("Cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("Admin Dashboard"));
    assert!(body.contains("admin"));
}

// Case CRUD over the admin API, public visibility rules

#[tokio::test]
async fn test_case_crud_and_publication() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    let created: serde_json::Value = app
        .client
        .post(format!("{}/api/admin/cases", app.base))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "title": "Ford Expedition - Driver Bottom",
            "brand": "Ford",
            "model": "Expedition",
            "year_start": 2018,
            "year_end": 2020,
            "published": false,
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let case_id = created["case"]["id"].as_str().unwrap().to_string();

    // Draft is invisible publicly, visible to admin
    let public: serde_json::Value = app
        .client
        .get(format!("{}/api/cases", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(public["cases"].as_array().unwrap().len(), 0);

    let res = app
        .client
        .get(format!("{}/api/cases/{}", app.base, case_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Publish it
    let res = app
        .client
        .put(format!("{}/api/admin/cases/{}", app.base, case_id))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "title": "Ford Expedition - Driver Bottom",
            "brand": "Ford",
            "model": "Expedition",
            "year_start": 2018,
            "year_end": 2020,
            "published": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let public: serde_json::Value = app
        .client
        .get(format!("{}/api/cases", app.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(public["cases"].as_array().unwrap().len(), 1);

    // Attach media, then delete the case
    let res = app
        .client
        .post(format!("{}/api/admin/cases/{}/media", app.base, case_id))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "kind": "BEFORE",
            "media_type": "IMAGE",
            "url": "/uploads/before.jpg",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .client
        .delete(format!("{}/api/admin/cases/{}", app.base, case_id))
        .header("Cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_username_conflict() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let res = app
            .client
            .post(format!("{}/api/admin/users", app.base))
            .header("Cookie", &cookie)
            .json(&serde_json::json!({ "username": "duplicate", "password": "pw-1234" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), expected);
    }
}

#[tokio::test]
async fn test_upload_roundtrip() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
            .file_name("before shot.jpg"),
    );

    let res = app
        .client
        .post(format!("{}/api/admin/upload", app.base))
        .header("Cookie", &cookie)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = res.json().await.unwrap();
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/"));

    // Uploaded file is served back
    let res = app
        .client
        .get(format!("{}{}", app.base, url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.bytes().await.unwrap().as_ref(), &[0xFF, 0xD8, 0xFF, 0xE0]);
}

#[tokio::test]
async fn test_upload_rejects_unknown_extension() {
    let app = spawn_app().await;
    let cookie = app.admin_cookie().await;

    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(b"#!/bin/sh".to_vec()).file_name("script.sh"),
    );

    let res = app
        .client
        .post(format!("{}/api/admin/upload", app.base))
        .header("Cookie", &cookie)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = spawn_app().await;

    let res = app
        .client
        .post(format!("{}/api/auth/logout", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let set_cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("sc_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let res = app
        .client
        .get(format!("{}/api/health", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
