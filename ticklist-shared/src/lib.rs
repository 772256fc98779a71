//! # Ticklist Shared Library
//!
//! This crate contains the types and business logic shared by the Ticklist
//! API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, todos) and their owner-scoped queries
//! - `auth`: Password hashing, token signing, and session management
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Ticklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
