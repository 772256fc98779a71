//! # Ticklist API Server Library
//!
//! This library provides the core functionality for the Ticklist API server.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder, and the auth middleware layer
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
