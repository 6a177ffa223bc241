use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required: missing or invalid token")]
    Unauthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token validation failed: {0}")]
    ValidationFailed(String),

    #[error("Issuer mismatch: expected {expected}, got {actual}")]
    IssuerMismatch { expected: String, actual: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid operator metadata: {0}")]
    InvalidOperator(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable reason code.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::Internal(_) => "INTERNAL",
            _ => "UNAUTHORIZED",
        }
    }
}

impl From<tessera_security::MetadataError> for AuthError {
    fn from(err: tessera_security::MetadataError) -> Self {
        match err {
            tessera_security::MetadataError::MissingHeader => AuthError::Unauthenticated,
            tessera_security::MetadataError::Encode(e) => AuthError::Internal(e.to_string()),
            other => AuthError::InvalidOperator(other.to_string()),
        }
    }
}

#[cfg(feature = "axum-ext")]
impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::response::Json;
        use serde_json::json;

        let status = match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "reason": self.reason(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
