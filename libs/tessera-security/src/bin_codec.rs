use crate::OperatorMetadata;
use thiserror::Error;

pub const OPERATOR_BIN_VERSION: u8 = 1;

#[derive(Debug, Error)]
pub enum OperatorEncodeError {
    #[error("operator metadata serialization failed: {0}")]
    Postcard(#[from] postcard::Error),
}

#[derive(Debug, Error)]
pub enum OperatorDecodeError {
    #[error("empty operator blob")]
    Empty,

    #[error("unsupported operator blob version: {0}")]
    UnsupportedVersion(u8),

    #[error("operator metadata deserialization failed: {0}")]
    Postcard(#[from] postcard::Error),

    #[error("{0} trailing bytes after operator payload")]
    TrailingBytes(usize),
}

/// Encode [`OperatorMetadata`] into a versioned binary blob.
/// This does not sign or encrypt anything, it is just a transport format.
///
/// # Errors
/// Returns [`OperatorEncodeError`] if the payload cannot be serialized.
pub fn encode_bin(op: &OperatorMetadata) -> Result<Vec<u8>, OperatorEncodeError> {
    let mut buf = Vec::with_capacity(32);
    buf.push(OPERATOR_BIN_VERSION);
    buf.extend_from_slice(&postcard::to_allocvec(op)?);
    Ok(buf)
}

/// Decode [`OperatorMetadata`] from a blob produced by [`encode_bin`].
///
/// # Errors
/// Fails on an empty input, an unknown version byte, a malformed payload or
/// bytes left over after it.
pub fn decode_bin(bytes: &[u8]) -> Result<OperatorMetadata, OperatorDecodeError> {
    let Some((&version, payload)) = bytes.split_first() else {
        return Err(OperatorDecodeError::Empty);
    };

    if version != OPERATOR_BIN_VERSION {
        return Err(OperatorDecodeError::UnsupportedVersion(version));
    }

    let (op, rest) = postcard::take_from_bytes(payload)?;
    if !rest.is_empty() {
        return Err(OperatorDecodeError::TrailingBytes(rest.len()));
    }
    Ok(op)
}
