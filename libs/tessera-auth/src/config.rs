use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config_error::ConfigError;
use crate::validation::ValidationConfig;

/// Minimum HS256 key length accepted at startup.
pub const MIN_SECRET_LEN: usize = 32;

/// Token issuing and validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC key used to sign and verify tokens. Never serialized back out.
    #[serde(skip_serializing)]
    pub secret: SecretString,

    /// Value of the `iss` claim; tokens from other issuers are rejected.
    pub issuer: String,

    #[serde(with = "tessera_utils::humantime_serde")]
    pub access_token_ttl: Duration,

    #[serde(with = "tessera_utils::humantime_serde")]
    pub refresh_token_ttl: Duration,

    /// Leeway in seconds for time-based validations (exp, iat)
    pub leeway_seconds: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::from(String::new()),
            issuer: "tessera".to_owned(),
            access_token_ttl: Duration::from_secs(2 * 60 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            leeway_seconds: 60,
        }
    }
}

impl AuthConfig {
    /// Validate the configuration for consistency
    ///
    /// # Errors
    /// Rejects a missing or short secret and zero TTLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let len = self.secret.expose_secret().len();
        if len == 0 {
            return Err(ConfigError::MissingSecret);
        }
        if len < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                min: MIN_SECRET_LEN,
                actual: len,
            });
        }
        if self.access_token_ttl.is_zero() {
            return Err(ConfigError::ZeroTtl {
                field: "auth.access_token_ttl",
            });
        }
        if self.refresh_token_ttl.is_zero() {
            return Err(ConfigError::ZeroTtl {
                field: "auth.refresh_token_ttl",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            issuer: self.issuer.clone(),
            leeway_seconds: self.leeway_seconds,
        }
    }
}
