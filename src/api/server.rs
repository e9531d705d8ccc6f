//! HTTP API server

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::gate::{require_admin_api, require_admin_page};
use crate::auth::SessionAuth;
use crate::config::Config;
use crate::directory::UserDirectory;
use crate::error::Result;
use crate::gallery::GalleryStore;
use crate::ui;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub auth: SessionAuth,
    pub directory: Arc<dyn UserDirectory>,
    pub gallery: Arc<dyn GalleryStore>,
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP server
pub async fn run_server(state: SharedState, host: &str, port: u16) -> Result<()> {
    tokio::fs::create_dir_all(&state.config.uploads.dir).await?;

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    let app = create_router(state);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes.
///
/// Every admin surface sits behind the authorization gate middleware, so an
/// unauthenticated request is rejected before any body is read.
pub fn create_router(state: SharedState) -> Router {
    let admin_api = Router::new()
        .route("/cases", get(routes::admin_list_cases).post(routes::create_case))
        .route("/cases/{id}", put(routes::update_case).delete(routes::delete_case))
        .route("/cases/{id}/media", post(routes::add_media))
        .route("/media/{id}", delete(routes::remove_media))
        .route("/upload", post(routes::upload_media))
        .route("/users", get(routes::list_users).post(routes::create_user))
        .route("/users/{id}/password", post(routes::reset_password))
        .route("/change-password", post(routes::change_password))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_api,
        ));

    let admin_pages = Router::new()
        .route("/admin", get(ui::admin_dashboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_page,
        ));

    Router::new()
        // Public API
        .route("/api/health", get(routes::health))
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", post(routes::logout))
        .route("/api/cases", get(routes::list_cases))
        .route("/api/cases/{id}", get(routes::get_case))
        // Admin API
        .nest("/api/admin", admin_api)
        // Pages
        .route("/", get(ui::gallery_page))
        .route("/login", get(ui::login_page))
        .merge(admin_pages)
        // Uploaded media
        .nest_service("/uploads", ServeDir::new(&state.config.uploads.dir))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
