//! Fixed parameters of the secret token format.
//!
//! Every token ever issued depends on these values. Changing any of them
//! makes previously issued secrets undecryptable, so treat an edit here as a
//! format break.

/// Random salt fed to PBKDF2, stored at the front of the envelope.
pub const SALT_LENGTH: usize = 16;

/// AES-GCM nonce length (96 bits), stored right after the salt.
pub const IV_LENGTH: usize = 12;

/// Authentication tag appended to the ciphertext by AES-GCM.
pub const TAG_LENGTH: usize = 16;

/// Derived key length in bytes (256 bits for AES-256).
pub const KEY_LENGTH: usize = 32;

/// PBKDF2-HMAC-SHA256 round count.
pub const PBKDF2_ITERATIONS: u32 = 150_000;

/// Size of the salt and IV header. A decoded token must be strictly longer.
pub const HEADER_LENGTH: usize = SALT_LENGTH + IV_LENGTH;

/// Smallest decoded token length that is structurally acceptable.
pub const MIN_ENVELOPE_LENGTH: usize = HEADER_LENGTH + 1;
