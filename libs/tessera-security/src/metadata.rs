//! Header-borne operator metadata channel.
//!
//! The resolved [`OperatorMetadata`] travels between internal services as a
//! single `x-md-operator` header: the versioned binary blob from
//! [`crate::bin_codec`] encoded with standard base64 without padding.
//! Decoding fails closed; callers either get the operator that was sent or a
//! [`MetadataError`], never a default identity.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use http::{HeaderMap, HeaderValue};
use thiserror::Error;

use crate::OperatorMetadata;
use crate::bin_codec::{OperatorDecodeError, OperatorEncodeError, decode_bin, encode_bin};

/// Header carrying the encoded operator.
pub const OPERATOR_HEADER: &str = "x-md-operator";

/// Reserved for a detached signature over [`OPERATOR_HEADER`]; not produced yet.
pub const SIGNATURE_HEADER: &str = "x-md-signature";

/// Machine-readable reason attached to every metadata failure.
pub const UNAUTHORIZED_REASON: &str = "UNAUTHORIZED";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata: missing operator header")]
    MissingHeader,

    #[error("metadata: invalid operator header encoding: {0}")]
    InvalidEncoding(String),

    #[error("metadata: invalid operator header: {0}")]
    InvalidPayload(#[from] OperatorDecodeError),

    #[error("metadata: cannot encode operator: {0}")]
    Encode(#[from] OperatorEncodeError),
}

impl MetadataError {
    /// Stable reason code. Every decode failure is an authentication failure.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            MetadataError::Encode(_) => "INTERNAL",
            _ => UNAUTHORIZED_REASON,
        }
    }
}

/// Encode an operator into a header value.
///
/// # Errors
/// Returns [`MetadataError::Encode`] if serialization fails.
pub fn encode_header(op: &OperatorMetadata) -> Result<HeaderValue, MetadataError> {
    let blob = encode_bin(op)?;
    let text = STANDARD_NO_PAD.encode(blob);
    // base64 output is always visible ASCII
    HeaderValue::from_str(&text).map_err(|e| MetadataError::InvalidEncoding(e.to_string()))
}

/// Decode an operator from the raw header text.
///
/// # Errors
/// [`MetadataError::InvalidEncoding`] for bad base64, [`MetadataError::InvalidPayload`]
/// when the blob does not decode.
pub fn decode_header(value: &str) -> Result<OperatorMetadata, MetadataError> {
    let blob = STANDARD_NO_PAD
        .decode(value.trim())
        .map_err(|e| MetadataError::InvalidEncoding(e.to_string()))?;
    Ok(decode_bin(&blob)?)
}

/// Attach the operator to an outgoing request, replacing any previous value.
///
/// # Errors
/// Propagates [`encode_header`] failures.
pub fn inject(headers: &mut HeaderMap, op: &OperatorMetadata) -> Result<(), MetadataError> {
    let value = encode_header(op)?;
    headers.insert(OPERATOR_HEADER, value);
    Ok(())
}

/// Read the operator from incoming headers, failing closed.
///
/// # Errors
/// Distinguishes a missing header from an undecodable one.
pub fn extract(headers: &HeaderMap) -> Result<OperatorMetadata, MetadataError> {
    let value = headers
        .get(OPERATOR_HEADER)
        .ok_or(MetadataError::MissingHeader)?;
    if value.is_empty() {
        return Err(MetadataError::MissingHeader);
    }
    let text = value
        .to_str()
        .map_err(|e| MetadataError::InvalidEncoding(e.to_string()))?;
    decode_header(text)
}

/// Lenient form of [`extract`]: any failure means "no operator".
#[must_use]
pub fn from_headers(headers: &HeaderMap) -> Option<OperatorMetadata> {
    extract(headers).ok()
}
