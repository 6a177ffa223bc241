use thiserror::Error;

/// Errors that can occur during JWT claims validation and processing
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("Invalid signature or key")]
    InvalidSignature,

    #[error("Invalid issuer: expected {expected}, got {actual}")]
    InvalidIssuer { expected: String, actual: String },

    #[error("Token expired")]
    Expired,

    #[error("Token issued in the future")]
    NotYetValid,

    #[error("Unexpected token kind: expected {expected:?}, got {actual:?}")]
    WrongKind {
        expected: crate::claims::TokenKind,
        actual: crate::claims::TokenKind,
    },

    #[error("Invalid claim format: {field} - {reason}")]
    InvalidClaimFormat { field: String, reason: String },

    #[error("JWT decode failed: {0}")]
    DecodeFailed(String),

    #[error("JWT encode failed: {0}")]
    EncodeFailed(String),
}

impl From<jsonwebtoken::errors::Error> for ClaimsError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => ClaimsError::InvalidSignature,
            ErrorKind::ExpiredSignature => ClaimsError::Expired,
            _ => ClaimsError::DecodeFailed(err.to_string()),
        }
    }
}

impl From<ClaimsError> for crate::errors::AuthError {
    fn from(err: ClaimsError) -> Self {
        match err {
            ClaimsError::Expired => crate::errors::AuthError::TokenExpired,
            ClaimsError::InvalidSignature => {
                crate::errors::AuthError::InvalidToken("Invalid signature".into())
            }
            ClaimsError::InvalidIssuer { expected, actual } => {
                crate::errors::AuthError::IssuerMismatch { expected, actual }
            }
            ClaimsError::EncodeFailed(msg) => crate::errors::AuthError::Internal(msg),
            other => crate::errors::AuthError::ValidationFailed(other.to_string()),
        }
    }
}
