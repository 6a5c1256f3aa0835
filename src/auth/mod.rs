//! Credential hashing and signed session tokens.

mod password;
mod session;
pub use password::{hash_password, verify_password};
pub use session::{Claims, SessionKeys, ADMIN_ONLY, SESSION_COOKIE, STAFF};
