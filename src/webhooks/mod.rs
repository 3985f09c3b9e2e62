//! Webhook ingestion primitives.
//!
//! This module provides the two pure, synchronous steps that run before any
//! handler is involved:
//!
//! - Signature verification for webhook payloads (HMAC-SHA256)
//! - Envelope parsing (event type, action, delivery ID, payload document)

pub mod envelope;
pub mod signature;

pub use envelope::{parse_envelope, EventEnvelope, ParseError, HEADER_DELIVERY, HEADER_EVENT};
pub use signature::{
    compute_signature, format_signature_header, parse_signature_header, verify_delivery,
    SignatureCheck,
};
