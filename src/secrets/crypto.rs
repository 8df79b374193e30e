//! Password-based encryption of URL secrets.
//!
//! Key derivation is PBKDF2-HMAC-SHA256 over a random per-token salt; the
//! payload is sealed with AES-256-GCM under a random 96-bit nonce. Salt, nonce
//! and ciphertext travel together in the token (see [`super::envelope`]), so
//! nothing has to be stored server-side.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use hmac::Hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::envelope::{decode_base64url, encode_base64url, Envelope};
use super::error::SecretError;
use super::params::{IV_LENGTH, KEY_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};

/// AES-256 key material, wiped when dropped.
pub type DerivedKey = Zeroizing<[u8; KEY_LENGTH]>;

/// Derive the AES-256-GCM key for `password` and `salt`.
///
/// Any password is accepted, including the empty string. Rejecting weak
/// passwords is up to the caller.
pub fn derive_key(password: &str, salt: &[u8; SALT_LENGTH]) -> Result<DerivedKey, SecretError> {
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key[..])
        .map_err(|_| SecretError::CryptoUnavailable)?;
    Ok(key)
}

fn cipher_for(key: &DerivedKey) -> Result<Aes256Gcm, SecretError> {
    Aes256Gcm::new_from_slice(&key[..]).map_err(|_| SecretError::CryptoUnavailable)
}

fn random_bytes<const N: usize>() -> Result<[u8; N], SecretError> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| SecretError::CryptoUnavailable)?;
    Ok(bytes)
}

/// Encrypt `plaintext` under `password` and return the URL-safe token.
///
/// Salt and nonce are drawn fresh on every call, so encrypting the same
/// input twice yields two different tokens.
///
/// This runs 150k PBKDF2 rounds. From async code use [`seal`] instead.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, SecretError> {
    let salt = random_bytes::<SALT_LENGTH>()?;
    let iv = random_bytes::<IV_LENGTH>()?;

    let key = derive_key(password, &salt)?;
    let ciphertext = cipher_for(&key)?
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|_| SecretError::CryptoUnavailable)?;

    let envelope = Envelope {
        salt: &salt,
        iv: &iv,
        ciphertext: &ciphertext,
    };
    Ok(encode_base64url(&envelope.to_bytes()))
}

/// Recover the plaintext from a token produced by [`encrypt`].
///
/// Returns [`SecretError::MalformedToken`] for text that is not base64url or
/// decodes to 28 bytes or fewer, and [`SecretError::AuthenticationFailed`]
/// for everything the GCM tag rejects.
///
/// This runs 150k PBKDF2 rounds. From async code use [`open`] instead.
pub fn decrypt(token: &str, password: &str) -> Result<String, SecretError> {
    let bytes = decode_base64url(token)?;
    let envelope = Envelope::parse(&bytes)?;

    let key = derive_key(password, envelope.salt)?;
    let plaintext = Zeroizing::new(
        cipher_for(&key)?
            .decrypt(Nonce::from_slice(envelope.iv), envelope.ciphertext)
            .map_err(|_| SecretError::AuthenticationFailed)?,
    );

    // Only reachable with a forged tag, so it gets the same answer.
    std::str::from_utf8(&plaintext)
        .map(str::to_owned)
        .map_err(|_| SecretError::AuthenticationFailed)
}

/// [`encrypt`] on the blocking thread pool.
pub async fn seal(plaintext: String, password: String) -> Result<String, SecretError> {
    let password = Zeroizing::new(password);
    run_blocking(move || encrypt(&plaintext, &password)).await
}

/// [`decrypt`] on the blocking thread pool.
pub async fn open(token: String, password: String) -> Result<String, SecretError> {
    let password = Zeroizing::new(password);
    run_blocking(move || decrypt(&token, &password)).await
}

async fn run_blocking<F>(f: F) -> Result<String, SecretError>
where
    F: FnOnce() -> Result<String, SecretError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        // Cancelled: the runtime is shutting down underneath us.
        Err(_) => Err(SecretError::CryptoUnavailable),
    }
}
