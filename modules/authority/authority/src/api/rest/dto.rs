use authority_sdk::{AuthorityError, GrantType, LoginRequest};
use serde::Deserialize;

/// Body of `POST /auth/v1/login` and `POST /auth/v1/refresh`.
///
/// `grant_type` stays a string here so an unknown value maps to
/// `INVALID_GRANT_TYPE` instead of a generic body rejection.
#[derive(Clone, Deserialize)]
pub struct LoginBody {
    pub grant_type: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl TryFrom<LoginBody> for LoginRequest {
    type Error = AuthorityError;

    fn try_from(body: LoginBody) -> Result<Self, Self::Error> {
        Ok(LoginRequest {
            grant_type: body.grant_type.parse::<GrantType>()?,
            username: body.username,
            password: body.password,
            refresh_token: body.refresh_token,
            client_id: body.client_id,
            device_id: body.device_id,
        })
    }
}

/// Body of `POST /auth/v1/validate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateBody {
    pub token: String,
}
