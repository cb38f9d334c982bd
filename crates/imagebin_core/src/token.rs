//! Random identifier generation.
//!
//! Tokens are drawn from the operating system CSPRNG and encoded as URL-safe
//! base64 without padding, so they can be embedded in a path unescaped.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::ImageExtension;

/// Entropy for on-disk names (512 bits).
pub const STORED_NAME_BYTES: usize = 64;

/// Entropy for public filenames (192 bits).
pub const PUBLIC_NAME_BYTES: usize = 24;

/// Generate a random URL-safe token from `byte_len` random bytes.
///
/// # Examples
///
/// ```
/// use imagebin_core::generate_token;
///
/// let token = generate_token(24);
/// assert_eq!(token.len(), 32);
/// assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_token(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Fresh on-disk filename carrying the original extension.
pub fn stored_name(ext: ImageExtension) -> String {
    format!("{}{}", generate_token(STORED_NAME_BYTES), ext)
}

/// Fresh public filename carrying the original extension.
pub fn public_filename(ext: ImageExtension) -> String {
    format!("{}{}", generate_token(PUBLIC_NAME_BYTES), ext)
}
