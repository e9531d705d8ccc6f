//! Session authentication: password hashing, signed tokens, cookie
//! issuance and the authorization gate.

pub mod cookie;
pub mod gate;
pub mod models;
pub mod password;
pub mod token;

pub use cookie::SessionCookies;
pub use gate::{authorize, SessionAuth};
pub use models::{ChangePasswordRequest, LoginRequest, LoginResponse, Role};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenCodec};
