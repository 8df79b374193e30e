//! Binary envelope layout and its URL-safe text encoding.
//!
//! ```text
//! +-----------+---------+------------------------------+
//! | salt (16) | iv (12) | ciphertext || tag (16)       |
//! +-----------+---------+------------------------------+
//! ```
//!
//! The whole byte string is encoded as RFC 4648 §5 base64 without padding.
//! Nothing here touches the cipher, so these helpers are plain functions over
//! byte slices.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

use super::error::SecretError;
use super::params::{IV_LENGTH, MIN_ENVELOPE_LENGTH, SALT_LENGTH};

/// URL-safe alphabet, never emits `=`, accepts input with or without it.
/// Unused low bits in the final symbol are ignored on decode.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Borrowed view over a decoded token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub salt: &'a [u8; SALT_LENGTH],
    pub iv: &'a [u8; IV_LENGTH],
    /// Ciphertext with the GCM tag still attached.
    pub ciphertext: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split decoded token bytes into salt, IV and ciphertext.
    ///
    /// Fails with [`SecretError::MalformedToken`] unless `bytes` is strictly
    /// longer than the salt and IV together.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, SecretError> {
        if bytes.len() < MIN_ENVELOPE_LENGTH {
            return Err(SecretError::MalformedToken);
        }

        let (salt, rest) = bytes.split_at(SALT_LENGTH);
        let (iv, ciphertext) = rest.split_at(IV_LENGTH);

        Ok(Self {
            salt: salt.try_into().map_err(|_| SecretError::MalformedToken)?,
            iv: iv.try_into().map_err(|_| SecretError::MalformedToken)?,
            ciphertext,
        })
    }

    /// Concatenate `salt || iv || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut combined = Vec::with_capacity(SALT_LENGTH + IV_LENGTH + self.ciphertext.len());
        combined.extend_from_slice(self.salt);
        combined.extend_from_slice(self.iv);
        combined.extend_from_slice(self.ciphertext);
        combined
    }
}

/// Encode bytes as unpadded base64url (`-` and `_` instead of `+` and `/`).
pub fn encode_base64url(data: &[u8]) -> String {
    BASE64URL.encode(data)
}

/// Decode base64url text, tolerating missing or present `=` padding.
///
/// Any character outside the URL-safe alphabet yields
/// [`SecretError::MalformedToken`].
pub fn decode_base64url(input: &str) -> Result<Vec<u8>, SecretError> {
    BASE64URL
        .decode(input)
        .map_err(|_| SecretError::MalformedToken)
}
