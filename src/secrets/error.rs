//! Failure kinds of the secret codec.

use thiserror::Error;

/// Error returned by [`encrypt`](super::encrypt) and [`decrypt`](super::decrypt).
///
/// Decryption deliberately reports a wrong password and a corrupted token
/// through the same variant. Do not split `AuthenticationFailed` into finer
/// cases on any path that reaches a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SecretError {
    /// No secure random source or cipher primitive could be used.
    #[error("cryptographic primitives are unavailable")]
    CryptoUnavailable,

    /// The token is not unpadded base64url or is too short to hold a salt and IV.
    #[error("invalid secret")]
    MalformedToken,

    /// Tag verification failed: wrong password, or tampered/corrupted bytes.
    #[error("incorrect password or invalid secret")]
    AuthenticationFailed,
}

impl SecretError {
    /// Whether the caller can fix the problem by changing its input.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, SecretError::CryptoUnavailable)
    }
}
