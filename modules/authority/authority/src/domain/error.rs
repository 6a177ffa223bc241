use authority_sdk::AuthorityError;
use thiserror::Error;

/// Errors raised by repositories and stores
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Membership not found: user {user_id} in tenant {tenant_id}")]
    MembershipNotFound { user_id: u32, tenant_id: u32 },

    #[error("User not found: {user}")]
    UserNotFound { user: String },

    #[error("Invalid stored value for {field}: {message}")]
    InvalidData { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

impl DomainError {
    pub fn membership_not_found(user_id: u32, tenant_id: u32) -> Self {
        Self::MembershipNotFound { user_id, tenant_id }
    }

    pub fn user_not_found(user: impl ToString) -> Self {
        Self::UserNotFound {
            user: user.to_string(),
        }
    }

    pub fn invalid_data(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::database(e.to_string())
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for AuthorityError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::UserNotFound { user } => AuthorityError::user_not_found(user),
            DomainError::MembershipNotFound { .. }
            | DomainError::Database { .. }
            | DomainError::Unavailable { .. } => {
                AuthorityError::service_unavailable(domain_error.to_string())
            }
            DomainError::InvalidData { .. } => AuthorityError::internal(domain_error.to_string()),
        }
    }
}
