//! Configuration management for Seatgallery

pub mod loader;
mod schema;

pub use loader::{load_config, load_config_from_path, session_secret};
pub use schema::*;
