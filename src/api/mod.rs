//! HTTP front end for URL secrets.
//!
//! ## Endpoints
//!
//! - `GET /` - Home page
//! - `GET /api/health` - Health check
//! - `GET|POST /secret/encrypt` - Encrypt form / JSON encrypt API
//! - `GET|POST /secret/encrypt/view` - Encrypt form and its submission
//! - `GET|POST /secret/decrypt` - Decrypt form and its submission

pub mod pages;
mod routes;
pub mod secret;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
