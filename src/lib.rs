//! Seatgallery - admin-managed before/after media gallery
//!
//! This is the library interface for Seatgallery, exposing the session
//! authentication core, the user directory and the gallery store for
//! programmatic use and testing.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod gallery;
pub mod ui;

pub use config::Config;
pub use error::Error;
