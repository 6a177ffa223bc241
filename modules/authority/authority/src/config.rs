use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration for the authority module
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorityConfig {
    /// Accept the historical role-code allow-lists (`super_admin`,
    /// `tenant_admin`, ...) when neither the structural test nor the
    /// explicit capability flags grant admin authority.
    pub legacy_code_fallback: bool,
    /// Upper bound for one authority resolution, all lookups included.
    #[serde(with = "tessera_utils::humantime_serde")]
    pub lookup_timeout: Duration,
    /// Period of the background sweep dropping expired tokens from the store.
    #[serde(with = "tessera_utils::humantime_serde")]
    pub token_sweep_interval: Duration,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            legacy_code_fallback: true,
            lookup_timeout: Duration::from_secs(5),
            token_sweep_interval: Duration::from_secs(10 * 60),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthorityConfigError {
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
}

impl AuthorityConfig {
    /// # Errors
    /// A zero `lookup_timeout` would fail every resolution; a zero
    /// `token_sweep_interval` cannot drive a timer.
    pub fn validate(&self) -> Result<(), AuthorityConfigError> {
        if self.lookup_timeout.is_zero() {
            return Err(AuthorityConfigError::ZeroDuration {
                field: "authority.lookup_timeout",
            });
        }
        if self.token_sweep_interval.is_zero() {
            return Err(AuthorityConfigError::ZeroDuration {
                field: "authority.token_sweep_interval",
            });
        }
        Ok(())
    }
}
