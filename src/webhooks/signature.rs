//! GitHub webhook signature verification using HMAC-SHA256.
//!
//! GitHub signs webhook payloads using HMAC-SHA256 with a shared secret.
//! The signature is provided in the `X-Hub-Signature-256` header as
//! `sha256=<hex>`.
//!
//! Verification is the first step in webhook processing and the service's
//! only authentication boundary: nothing else (IP allow-lists, client certs)
//! is assumed. The outcome distinguishes a missing header from a mismatched
//! signature, because the former usually means a misconfigured webhook while
//! the latter may be a forgery attempt.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Result of checking a delivery's signature header.
///
/// Only `Valid` lets the delivery proceed; every other variant maps to an
/// HTTP 401 with its own reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// The signature matches the body under the shared secret.
    Valid,
    /// No `X-Hub-Signature-256` header was sent at all.
    MissingHeader,
    /// The header was present but not `sha256=<hex>` shaped.
    Malformed,
    /// The header decoded cleanly but does not match the body.
    Mismatch,
}

impl SignatureCheck {
    /// Returns true if the delivery is authenticated.
    pub fn is_valid(&self) -> bool {
        matches!(self, SignatureCheck::Valid)
    }

    /// Stable reason code for logging and response bodies.
    ///
    /// Never includes any signature material.
    pub fn reason(&self) -> &'static str {
        match self {
            SignatureCheck::Valid => "valid",
            SignatureCheck::MissingHeader => "missing signature header",
            SignatureCheck::Malformed => "malformed signature header",
            SignatureCheck::Mismatch => "signature mismatch",
        }
    }
}

/// Parses a GitHub signature header (e.g., "sha256=abc123...") into raw bytes.
///
/// Returns `None` for malformed headers (missing prefix, wrong algorithm,
/// invalid hex). Never panics.
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let hex_sig = header.strip_prefix("sha256=")?;
    hex::decode(hex_sig).ok()
}

/// Computes the HMAC-SHA256 signature of a payload using the given secret.
///
/// Used by tests to generate expected signatures.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a signature as a GitHub-style header value (`sha256=<hex>`).
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("sha256={}", hex::encode(signature))
}

/// Checks a delivery's signature against the raw body bytes and shared secret.
///
/// The HMAC is computed over the exact bytes GitHub sent; re-serializing the
/// parsed body would change whitespace and field order and break the
/// signature. Comparison goes through the HMAC library's `verify_slice`,
/// which is constant-time and fails closed on length mismatch.
///
/// # Arguments
///
/// * `secret` - The webhook secret configured in GitHub
/// * `payload` - The raw request body bytes
/// * `signature_header` - The `X-Hub-Signature-256` header value, if any
pub fn verify_delivery(
    secret: &[u8],
    payload: &[u8],
    signature_header: Option<&str>,
) -> SignatureCheck {
    let Some(header) = signature_header else {
        return SignatureCheck::MissingHeader;
    };

    let Some(provided) = parse_signature_header(header) else {
        return SignatureCheck::Malformed;
    };

    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => return SignatureCheck::Mismatch,
    };
    mac.update(payload);

    if mac.verify_slice(&provided).is_ok() {
        SignatureCheck::Valid
    } else {
        SignatureCheck::Mismatch
    }
}
