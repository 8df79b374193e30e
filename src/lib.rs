//! # secret-link
//!
//! Share a URL behind a password without storing anything server-side.
//!
//! This library provides:
//! - A codec that turns a URL plus password into an opaque, URL-safe token
//!   and back (PBKDF2-HMAC-SHA256 + AES-256-GCM)
//! - An HTTP front end with encrypt/decrypt pages and a JSON encrypt API
//!
//! ## Flow
//!
//! ```text
//!   url + password ──► /secret/encrypt ──► /secret/decrypt?secret=<token>
//!                                                   │
//!                                     password ─────┤
//!                                                   ▼
//!                                                  url
//! ```
//!
//! ## Modules
//! - `secrets`: token codec
//! - `api`: axum router and handlers
//! - `config`: environment-driven configuration

pub mod api;
pub mod config;
pub mod secrets;
pub mod util;

pub use config::Config;
pub use secrets::SecretError;
