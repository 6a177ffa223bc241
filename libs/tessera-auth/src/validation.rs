use crate::claims::{TokenClaims, TokenKind};
use crate::claims_error::ClaimsError;
use time::OffsetDateTime;

/// Configuration for common validation
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Required issuer (if empty, any issuer is accepted)
    pub issuer: String,

    /// Leeway in seconds for time-based validations (exp, iat)
    pub leeway_seconds: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            leeway_seconds: 60,
        }
    }
}

/// Perform common validation checks on claims.
///
/// # Errors
/// Returns `ClaimsError` if any check fails (issuer, expiration, kind, subject).
pub fn validate_claims(
    claims: &TokenClaims,
    expected: TokenKind,
    config: &ValidationConfig,
) -> Result<(), ClaimsError> {
    // 1. Validate issuer
    if !config.issuer.is_empty() && config.issuer != claims.iss {
        return Err(ClaimsError::InvalidIssuer {
            expected: config.issuer.clone(),
            actual: claims.iss.clone(),
        });
    }

    // 2. Validate expiration with leeway
    let now = OffsetDateTime::now_utc();
    let leeway = time::Duration::seconds(config.leeway_seconds);
    if now > claims.expires_at()? + leeway {
        return Err(ClaimsError::Expired);
    }

    // 3. Reject tokens minted in the future
    let issued_at =
        OffsetDateTime::from_unix_timestamp(claims.iat).map_err(|_| ClaimsError::InvalidClaimFormat {
            field: "iat".to_owned(),
            reason: "invalid unix timestamp".to_owned(),
        })?;
    if now < issued_at - leeway {
        return Err(ClaimsError::NotYetValid);
    }

    // 4. An access token must never be accepted as a refresh token and vice versa
    if claims.kind != expected {
        return Err(ClaimsError::WrongKind {
            expected,
            actual: claims.kind,
        });
    }

    // 5. Subject must name a user
    claims.user_id()?;

    Ok(())
}
