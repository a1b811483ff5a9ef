//! Authentication module
//!
//! Provides JWT-based session authentication with HTTP-only cookies

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, SessionKeys};
pub use middleware::{AuthUser, authenticate, protect_route};

/// Cookie name for the session token
pub const AUTH_COOKIE_NAME: &str = "jwt";
