//! Server-rendered HTML pages

mod handlers;

pub use handlers::{admin_dashboard, gallery_page, login_page};
