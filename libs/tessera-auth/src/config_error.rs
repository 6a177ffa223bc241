use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("auth.secret must be set")]
    MissingSecret,

    #[error("auth.secret must be at least {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    #[error("{field} must be greater than zero")]
    ZeroTtl { field: &'static str },

    #[error("{field} is out of range")]
    TtlOutOfRange { field: &'static str },
}
