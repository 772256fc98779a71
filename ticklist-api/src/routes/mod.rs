/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login, current identity, and token revocation
/// - `todos`: Ownership-scoped todo CRUD

pub mod health;
pub mod todos;
pub mod users;
