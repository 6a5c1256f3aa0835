//! Request extractors: verified session and client address.

pub mod client_ip;
pub mod session;
pub use client_ip::ClientIp;
pub use session::{session_token, Session};
