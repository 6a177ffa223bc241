//! Axum extractors and middleware for auth

use crate::{claims::TokenClaims, claims::TokenKind, errors::AuthError, traits::TokenValidator};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tessera_security::{OperatorMetadata, UserViewer, metadata};

/// Extractor for the request operator.
///
/// Prefers the value placed by a middleware; otherwise decodes the
/// `x-md-operator` header. Never falls back to an anonymous identity.
#[derive(Debug, Clone)]
pub struct Operator(pub OperatorMetadata);

impl<S> FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(op) = parts.extensions.get::<OperatorMetadata>() {
            return Ok(Operator(op.clone()));
        }
        Ok(Operator(metadata::extract(&parts.headers)?))
    }
}

/// Extractor for a [`UserViewer`] over the request operator.
#[derive(Debug, Clone)]
pub struct CurrentViewer(pub UserViewer);

impl<S> FromRequestParts<S> for CurrentViewer
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(viewer) = parts.extensions.get::<UserViewer>() {
            return Ok(CurrentViewer(viewer.clone()));
        }
        let Operator(op) = Operator::from_request_parts(parts, state).await?;
        Ok(CurrentViewer(UserViewer::new(op)))
    }
}

/// Extractor for validated access-token claims - requires [`bearer_operator`] to have run
#[derive(Debug, Clone)]
pub struct AuthClaims(pub TokenClaims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(AuthClaims)
            .ok_or(AuthError::Internal(
                "TokenClaims not found - auth middleware not configured".to_owned(),
            ))
    }
}

/// Edge middleware: turns a bearer access token into operator metadata.
///
/// On success the request carries the claims, the operator and a
/// [`UserViewer`] as extensions and the encoded operator in `x-md-operator`,
/// so handlers and downstream services read the resolved authority without
/// another lookup.
/// Any client-supplied `x-md-operator` header is overwritten.
///
/// Returns Response directly (Axum 0.8 style) with errors converted via `IntoResponse`.
pub async fn bearer_operator(
    State(validator): State<Arc<dyn TokenValidator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(request.headers()) else {
        return AuthError::Unauthenticated.into_response();
    };

    let claims = match validator.validate_and_parse(token, TokenKind::Access).await {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    let op = match OperatorMetadata::try_from(&claims) {
        Ok(op) => op,
        Err(err) => return AuthError::from(err).into_response(),
    };

    if let Err(err) = metadata::inject(request.headers_mut(), &op) {
        return AuthError::from(err).into_response();
    }

    tracing::trace!(user_id = op.user_id(), tenant_id = op.tenant_id(), "operator attached");
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(UserViewer::new(op.clone()));
    request.extensions_mut().insert(op);
    next.run(request).await
}

/// Internal-hop middleware: trusts the `x-md-operator` header set upstream
/// and rejects requests without a decodable one.
pub async fn trusted_operator(mut request: Request, next: Next) -> Response {
    match metadata::extract(request.headers()) {
        Ok(op) => {
            request.extensions_mut().insert(UserViewer::new(op.clone()));
            request.extensions_mut().insert(op);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "operator header rejected");
            AuthError::from(err).into_response()
        }
    }
}

/// Extract Bearer token from Authorization header
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Basic Zm9vOmJhcg=="),
        );
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer "),
        );
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
