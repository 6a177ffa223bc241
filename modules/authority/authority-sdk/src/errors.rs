//! Public error types for the `authority` module.
//!
//! These errors are safe to expose to other modules and consumers. Every
//! variant maps to a stable reason code so clients can branch on it
//! without parsing messages.

use thiserror::Error;

/// Stable machine-readable reason codes.
pub mod reason {
    pub const INVALID_GRANT_TYPE: &str = "INVALID_GRANT_TYPE";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const INSUFFICIENT_AUTHORITY: &str = "INSUFFICIENT_AUTHORITY";
    pub const INSUFFICIENT_DATA_SCOPE: &str = "INSUFFICIENT_DATA_SCOPE";
    pub const INCORRECT_REFRESH_TOKEN: &str = "INCORRECT_REFRESH_TOKEN";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Errors that can be returned by the `AuthenticationApi`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("invalid grant type")]
    InvalidGrantType,

    #[error("invalid username or password")]
    InvalidCredentials,

    /// Neither platform- nor tenant-admin authority was resolved.
    #[error("insufficient authority")]
    InsufficientAuthority,

    /// Admin authority was resolved but the data scope is `SELF`.
    #[error("insufficient data scope")]
    InsufficientDataScope,

    #[error("invalid refresh token")]
    IncorrectRefreshToken,

    /// Transient failure of a collaborator; the whole call may be retried.
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("user not found: {user}")]
    UserNotFound { user: String },

    #[error("internal error")]
    Internal { message: String },
}

impl AuthorityError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn user_not_found(user: impl ToString) -> Self {
        Self::UserNotFound {
            user: user.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            AuthorityError::InvalidGrantType => reason::INVALID_GRANT_TYPE,
            AuthorityError::InvalidCredentials => reason::INVALID_CREDENTIALS,
            AuthorityError::InsufficientAuthority => reason::INSUFFICIENT_AUTHORITY,
            AuthorityError::InsufficientDataScope => reason::INSUFFICIENT_DATA_SCOPE,
            AuthorityError::IncorrectRefreshToken => reason::INCORRECT_REFRESH_TOKEN,
            AuthorityError::ServiceUnavailable { .. } => reason::SERVICE_UNAVAILABLE,
            AuthorityError::Unauthorized { .. } => reason::UNAUTHORIZED,
            AuthorityError::UserNotFound { .. } => reason::USER_NOT_FOUND,
            AuthorityError::Internal { .. } => reason::INTERNAL,
        }
    }

    /// Authorization denials are terminal for the presented credentials.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            AuthorityError::InsufficientAuthority | AuthorityError::InsufficientDataScope
        )
    }

    /// Transient failures are worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthorityError::ServiceUnavailable { .. })
    }
}
