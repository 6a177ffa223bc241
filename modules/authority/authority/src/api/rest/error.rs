use authority_sdk::AuthorityError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// HTTP wrapper for [`AuthorityError`].
#[derive(Debug)]
pub struct ApiError(pub AuthorityError);

impl From<AuthorityError> for ApiError {
    fn from(e: AuthorityError) -> Self {
        Self(e)
    }
}

#[must_use]
pub fn status_for(e: &AuthorityError) -> StatusCode {
    match e {
        AuthorityError::InvalidGrantType => StatusCode::BAD_REQUEST,
        AuthorityError::InvalidCredentials
        | AuthorityError::IncorrectRefreshToken
        | AuthorityError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AuthorityError::InsufficientAuthority | AuthorityError::InsufficientDataScope => {
            StatusCode::FORBIDDEN
        }
        AuthorityError::UserNotFound { .. } => StatusCode::NOT_FOUND,
        AuthorityError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AuthorityError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = match &self.0 {
            AuthorityError::Internal { message } => {
                // Log the internal error details but don't expose them to the client
                tracing::error!(error = %message, "internal error");
                self.0.to_string()
            }
            AuthorityError::ServiceUnavailable { .. } => {
                tracing::warn!(error = %self.0, "request failed on a dependency");
                "service unavailable".to_owned()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": message,
            "reason": self.0.reason(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn denials_are_forbidden_and_transients_unavailable() {
        assert_eq!(
            status_for(&AuthorityError::InsufficientDataScope),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&AuthorityError::service_unavailable("db down")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&AuthorityError::InvalidGrantType),
            StatusCode::BAD_REQUEST
        );
    }
}
