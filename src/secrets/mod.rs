//! Password-protected URL secrets.
//!
//! A secret is a self-contained token: everything needed to decrypt it,
//! except the password, is packed inside.
//!
//! ## Token format
//!
//! ```text
//! base64url_nopad( salt[16] || iv[12] || AES-256-GCM(ciphertext || tag[16]) )
//!
//! key = PBKDF2-HMAC-SHA256(password, salt, 150_000 rounds, 32 bytes)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let token = secrets::seal(url, password).await?;
//! let url = secrets::open(token, password).await?;
//! ```
//!
//! The synchronous [`encrypt`]/[`decrypt`] pair is CPU-bound (tens of
//! milliseconds). Async callers should go through [`seal`]/[`open`], which
//! move the work onto the blocking pool.

mod crypto;
pub mod envelope;
mod error;
pub mod params;

pub use crypto::{decrypt, derive_key, encrypt, open, seal, DerivedKey};
pub use envelope::{decode_base64url, encode_base64url, Envelope};
pub use error::SecretError;
