//! Webhook signature verification using HMAC-SHA256.
//!
//! The hosting service signs each delivery body with a shared secret and
//! sends the digest in the `X-Hub-Signature-256` header as `sha256=<hex>`.
//! Verification runs before the body is parsed.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Reasons a delivery fails authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The signature header is absent.
    #[error("missing signature header")]
    Missing,
    /// The header is not `sha256=<hex>`.
    #[error("malformed signature header")]
    Malformed,
    /// The digest does not match the body.
    #[error("signature mismatch")]
    Mismatch,
    /// The secret cannot key the MAC.
    #[error("invalid webhook secret")]
    InvalidKey,
}

/// Shared secret used to authenticate deliveries.
///
/// The secret never appears in `Debug` output.
#[derive(Clone)]
pub struct WebhookSecret(Vec<u8>);

impl WebhookSecret {
    /// Wraps raw secret bytes.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// Returns the raw secret bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn mac(&self) -> Result<HmacSha256, SignatureError> {
        HmacSha256::new_from_slice(&self.0).map_err(|_| SignatureError::InvalidKey)
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

/// Verifies a delivery signature against the raw body.
///
/// The digest comparison is constant-time.
///
/// # Errors
///
/// Returns [`SignatureError::Missing`] when no header was sent,
/// [`SignatureError::Malformed`] when it is not `sha256=<hex>`, and
/// [`SignatureError::Mismatch`] when the digest is wrong.
///
/// # Examples
///
/// ```
/// use tracksync::sync::signature::{WebhookSecret, sign_payload, verify_signature};
///
/// let secret = WebhookSecret::new("my-secret-key");
/// let header = sign_payload(&secret, b"{}").expect("secret keys the MAC");
/// assert!(verify_signature(b"{}", Some(&header), &secret).is_ok());
/// assert!(verify_signature(b"[]", Some(&header), &secret).is_err());
/// ```
pub fn verify_signature(
    body: &[u8],
    signature_header: Option<&str>,
    secret: &WebhookSecret,
) -> Result<(), SignatureError> {
    let header = signature_header.ok_or(SignatureError::Missing)?;
    let hex_digest = header
        .trim()
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or(SignatureError::Malformed)?;
    let received = hex::decode(hex_digest).map_err(|_| SignatureError::Malformed)?;

    let mut mac = secret.mac()?;
    mac.update(body);
    mac.verify_slice(&received)
        .map_err(|_| SignatureError::Mismatch)
}

/// Computes the `sha256=<hex>` header value for a body.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidKey`] when the secret cannot key the MAC.
pub fn sign_payload(secret: &WebhookSecret, body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = secret.mac()?;
    mac.update(body);
    Ok(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}
